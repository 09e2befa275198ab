use crate::{context::SanitizationContext, dispatch::sanitize, Policy};

/// Chained front end over [`sanitize`].
///
/// Pick a context, then call [`apply`](Self::apply). Without a context
/// selector the input is treated as plain text.
///
/// # Examples
///
/// ```
/// use safe_inputs::{FluentSanitizer, Policy};
///
/// let out = FluentSanitizer::new("<p onclick='x()'>Hi</p>").html(None).apply();
/// assert_eq!(out, "<p>Hi</p>");
///
/// let policy = Policy::empty();
/// let out = FluentSanitizer::new("<p>Hi</p>").html(Some(&policy)).apply();
/// assert_eq!(out, "Hi");
///
/// let out = FluentSanitizer::new("  padded\u{7}  ").apply();
/// assert_eq!(out, "padded");
/// ```
#[derive(Debug, Clone)]
#[must_use = "a FluentSanitizer does nothing until `apply` is called"]
pub struct FluentSanitizer<'p> {
    input: String,
    context: SanitizationContext,
    policy: Option<&'p Policy>,
}

impl<'p> FluentSanitizer<'p> {
    /// Starts a chain for `input`.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            context: SanitizationContext::default(),
            policy: None,
        }
    }

    /// Targets markup, filtered by `policy` or [`Policy::default`] when `None`.
    pub fn html(mut self, policy: Option<&'p Policy>) -> Self {
        self.context = SanitizationContext::Html;
        self.policy = policy;
        self
    }

    /// Targets plain text.
    pub fn plain_text(self) -> Self {
        self.with_context(SanitizationContext::PlainText)
    }

    /// Targets a single-quoted SQL literal.
    pub fn sql(self) -> Self {
        self.with_context(SanitizationContext::Sql)
    }

    /// Targets a URL component.
    pub fn url(self) -> Self {
        self.with_context(SanitizationContext::Url)
    }

    /// Targets a quoted markup attribute value.
    pub fn attribute(self) -> Self {
        self.with_context(SanitizationContext::Attribute)
    }

    /// Returns the currently selected context.
    pub fn context(&self) -> SanitizationContext {
        self.context
    }

    /// Runs the selected sanitizer.
    pub fn apply(self) -> String {
        sanitize(&self.input, self.context, self.policy)
    }

    fn with_context(mut self, context: SanitizationContext) -> Self {
        self.context = context;
        self.policy = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_plain_text() {
        let chain = FluentSanitizer::new("\tx\u{0}y ");

        assert_eq!(chain.context(), SanitizationContext::PlainText);
        assert_eq!(chain.apply(), "xy");
    }

    #[test]
    fn last_selector_wins() {
        let chain = FluentSanitizer::new("it's").html(None).sql();

        assert_eq!(chain.context(), SanitizationContext::Sql);
        assert_eq!(chain.apply(), "it''s");
    }

    #[test]
    fn switching_away_from_html_drops_policy() {
        let policy = Policy::empty();
        let chain = FluentSanitizer::new("<b>x</b>")
            .html(Some(&policy))
            .url()
            .html(None);

        assert_eq!(chain.apply(), "<b>x</b>");
    }

    #[test]
    fn each_selector_matches_sanitize() {
        let input = "<a href=\"/x?q=1&r=2\" onclick=y>go</a>";
        let cases = [
            (FluentSanitizer::new(input).html(None), SanitizationContext::Html),
            (FluentSanitizer::new(input).plain_text(), SanitizationContext::PlainText),
            (FluentSanitizer::new(input).sql(), SanitizationContext::Sql),
            (FluentSanitizer::new(input).url(), SanitizationContext::Url),
            (FluentSanitizer::new(input).attribute(), SanitizationContext::Attribute),
        ];

        for (chain, ctx) in cases {
            assert_eq!(chain.context(), ctx);
            assert_eq!(chain.apply(), sanitize(input, ctx, None));
        }
    }
}
