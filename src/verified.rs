/// Text that has passed through a sanitizer for a specific output context.
///
/// `Verified<T>` is the only thing a [`Sanitizer`](crate::Sanitizer) returns.
/// It cannot be built from outside this crate, so holding one proves the
/// value went through a filtering path such as the markup engine or one of
/// the escaping sanitizers.
///
/// # Construction Invariants
///
/// There are no public constructors and no `From<T>` implementation.
/// Crate-internal sanitizers call `new_unchecked` after filtering.
///
/// # Examples
///
/// External callers cannot create `Verified<T>` directly:
///
/// ```compile_fail
/// use safe_inputs::Verified;
///
/// let verified = Verified::new("<script>".to_string());
/// ```
///
/// Access is explicit:
///
/// ```
/// use safe_inputs::{Sanitizer, SqlSanitizer, Tainted};
///
/// let verified = SqlSanitizer.sanitize(Tainted::new("O'Reilly".to_string()));
///
/// let borrowed: &String = verified.as_ref();
/// assert_eq!(borrowed, "O''Reilly");
///
/// let owned: String = verified.into_inner();
/// assert_eq!(owned, "O''Reilly");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Creates a `Verified<T>` without performing validation.
    ///
    /// # Safety (Policy-Level)
    ///
    /// `pub(crate)` so that only sanitizers in this crate can mint verified
    /// values. Callers must have filtered or escaped the value first.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the `Verified<T>` and returns the inner value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
