use std::fmt;

/// Untrusted text that has not been through a sanitizer yet.
///
/// `Tainted<T>` marks markup, query fragments, or any other value that came
/// from outside the process. The only way to get the value back out is to
/// hand it to a [`Sanitizer`](crate::Sanitizer), which returns a
/// [`Verified<T>`](crate::Verified).
///
/// # Security Properties
///
/// - Does NOT implement `Deref`, `AsRef`, or `Display`
/// - Inner value is only reachable from sanitizers inside this crate
///
/// # Examples
///
/// ```
/// use safe_inputs::{HtmlSanitizer, Sanitizer, Tainted};
///
/// let comment = Tainted::new("<b>hi</b><script>steal()</script>".to_string());
/// let clean = HtmlSanitizer::default().sanitize(comment);
///
/// assert_eq!(clean.as_ref(), "<b>hi</b>");
/// ```
// BREAKING CHANGE WARNING: Do NOT remove Clone - callers sanitize the same input
// for several contexts.
#[derive(Clone)]
pub struct Tainted<T> {
    // BREAKING CHANGE WARNING: This field MUST remain private.
    // A public field lets raw markup reach an output sink without filtering (CWE-79).
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Extracts the raw value for a sanitizer.
    ///
    /// Restricted to this crate: only sanitizer implementations may read
    /// tainted data, and they must never return it without filtering.
    ///
    /// BREAKING CHANGE WARNING: Changing visibility to `pub` is a security bypass.
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }
}

// BREAKING CHANGE WARNING: Do NOT add Deref, AsRef, Borrow, Display, or Into<T> to Tainted<T>.

impl<T: fmt::Debug> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tainted")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tainted_debug_is_marked() {
        let input = Tainted::new("<img src=x onerror=alert(1)>".to_string());
        let debug_output = format!("{:?}", input);

        assert!(debug_output.starts_with("Tainted"));
        assert!(debug_output.contains("onerror"));
    }

    #[test]
    fn tainted_raw_access_is_crate_only() {
        let tainted = Tainted::new("raw".to_string());

        // Outside this crate this does not compile:
        // let s: String = tainted.into_inner();
        assert_eq!(tainted.into_inner(), "raw");
    }

    mod proptests {
        use super::*;
        use crate::{test_utils::arb_markup, HtmlSanitizer, Sanitizer};
        use proptest::prelude::*;

        proptest! {
            /// Property: Cloning a Tainted value yields identical sanitizer output
            #[test]
            fn proptest_tainted_clone_sanitizes_identically(input in arb_markup()) {
                let sanitizer = HtmlSanitizer::default();

                let tainted1 = Tainted::new(input);
                let tainted2 = tainted1.clone();

                let verified1 = sanitizer.sanitize(tainted1);
                let verified2 = sanitizer.sanitize(tainted2);

                prop_assert_eq!(verified1.as_ref(), verified2.as_ref());
            }
        }
    }
}
