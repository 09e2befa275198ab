use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{Tainted, Verified};

/// Trait for turning tainted text into text that is safe for one output context.
///
/// Every sanitizer in this crate is total: malformed or hostile input is
/// filtered or escaped, never rejected. The result is always a
/// [`Verified<String>`].
///
/// # Invariants
///
/// Implementations MUST:
/// - Filter or escape the input for their context before calling
///   `Verified::new_unchecked`
/// - Never return the raw input for a context it was not escaped for
///
/// # Examples
///
/// ```
/// use safe_inputs::{AttributeSanitizer, Sanitizer, Tainted};
///
/// let value = Tainted::new(r#"" onfocus="x"#.to_string());
/// let escaped = AttributeSanitizer.sanitize(value);
///
/// assert_eq!(escaped.as_ref(), "&quot; onfocus=&quot;x");
/// ```
pub trait Sanitizer {
    /// Sanitizes a tainted value for this sanitizer's context.
    fn sanitize(&self, input: Tainted<String>) -> Verified<String>;
}

/// Plain-text cleaner: drops control characters and trims whitespace.
///
/// Line feeds and carriage returns inside the text are kept; every other
/// control character (tabs, NUL, escape sequences, ...) is removed.
/// Whitespace-only input becomes the empty string.
///
/// # Examples
///
/// ```
/// use safe_inputs::{PlainTextSanitizer, Sanitizer, Tainted};
///
/// let out = PlainTextSanitizer.sanitize(Tainted::new("  Hello\tWorld\u{1b}[31m\n".to_string()));
/// assert_eq!(out.as_ref(), "HelloWorld[31m");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSanitizer;

impl PlainTextSanitizer {
    fn clean(input: &str) -> String {
        if input.trim().is_empty() {
            return String::new();
        }
        let kept: String = input
            .chars()
            .filter(|&c| !c.is_control() || c == '\n' || c == '\r')
            .collect();
        kept.trim().to_string()
    }
}

impl Sanitizer for PlainTextSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Verified<String> {
        Verified::new_unchecked(Self::clean(&input.into_inner()))
    }
}

/// SQL string-literal escaper: doubles every single quote.
///
/// Suitable only for values placed inside a single-quoted literal. Prefer
/// bound parameters wherever the driver supports them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlSanitizer;

impl SqlSanitizer {
    fn clean(input: &str) -> String {
        input.replace('\'', "''")
    }
}

impl Sanitizer for SqlSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Verified<String> {
        Verified::new_unchecked(Self::clean(&input.into_inner()))
    }
}

/// Everything except the RFC 3986 unreserved set: `A-Z a-z 0-9 - _ . ~`.
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URL component encoder: percent-encodes the UTF-8 bytes of every
/// character outside the unreserved set.
///
/// # Examples
///
/// ```
/// use safe_inputs::{Sanitizer, Tainted, UrlSanitizer};
///
/// let out = UrlSanitizer.sanitize(Tainted::new("a b/ü?".to_string()));
/// assert_eq!(out.as_ref(), "a%20b%2F%C3%BC%3F");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlSanitizer;

impl UrlSanitizer {
    fn clean(input: &str) -> String {
        utf8_percent_encode(input, URL_COMPONENT).to_string()
    }
}

impl Sanitizer for UrlSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Verified<String> {
        Verified::new_unchecked(Self::clean(&input.into_inner()))
    }
}

/// Attribute-value escaper for quoted markup attributes.
///
/// Replaces `"`, `'`, `<`, `>` and `&` with character references.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeSanitizer;

impl AttributeSanitizer {
    fn clean(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            match c {
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '&' => out.push_str("&amp;"),
                _ => out.push(c),
            }
        }
        out
    }
}

impl Sanitizer for AttributeSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Verified<String> {
        Verified::new_unchecked(Self::clean(&input.into_inner()))
    }
}
