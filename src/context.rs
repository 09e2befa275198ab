use std::fmt;

/// Output context a piece of untrusted text is headed for.
///
/// Each context has exactly one sanitizer. [`sanitize`](crate::sanitize)
/// and [`SanitizerDispatcher`](crate::SanitizerDispatcher) use this value
/// to select it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SanitizationContext {
    /// Plain text: control characters removed, surrounding whitespace trimmed.
    #[default]
    PlainText,
    /// Markup filtered through a [`Policy`](crate::Policy) allowlist.
    Html,
    /// Value inside a single-quoted SQL string literal.
    Sql,
    /// URL component, percent-encoded.
    Url,
    /// Value inside a quoted markup attribute.
    Attribute,
}

impl SanitizationContext {
    /// Every context, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::PlainText,
        Self::Html,
        Self::Sql,
        Self::Url,
        Self::Attribute,
    ];

    /// Short lower-case name, used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::Html => "html",
            Self::Sql => "sql",
            Self::Url => "url",
            Self::Attribute => "attribute",
        }
    }
}

impl fmt::Display for SanitizationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
