use std::fmt;

use crate::{
    context::SanitizationContext, error::Error, html::sanitize_html, AttributeSanitizer,
    HtmlSanitizer, PlainTextSanitizer, Policy, Sanitizer, SqlSanitizer, Tainted, UrlSanitizer,
    Verified,
};

/// Sanitizes `input` for `context`.
///
/// `policy` applies to [`SanitizationContext::Html`] only; `None` means
/// [`Policy::default`]. Every context is handled, so this never fails.
///
/// # Examples
///
/// ```
/// use safe_inputs::{sanitize, SanitizationContext};
///
/// let html = sanitize("<b>Bold</b><script>alert(1)</script>", SanitizationContext::Html, None);
/// assert_eq!(html, "<b>Bold</b>");
///
/// let sql = sanitize("O'Reilly", SanitizationContext::Sql, None);
/// assert_eq!(sql, "O''Reilly");
/// ```
pub fn sanitize(input: &str, context: SanitizationContext, policy: Option<&Policy>) -> String {
    let tainted = || Tainted::new(input.to_string());
    match context {
        SanitizationContext::Html => sanitize_html(input, policy),
        SanitizationContext::PlainText => PlainTextSanitizer.sanitize(tainted()).into_inner(),
        SanitizationContext::Sql => SqlSanitizer.sanitize(tainted()).into_inner(),
        SanitizationContext::Url => UrlSanitizer.sanitize(tainted()).into_inner(),
        SanitizationContext::Attribute => AttributeSanitizer.sanitize(tainted()).into_inner(),
    }
}

/// A sanitizer that can be registered with a [`SanitizerDispatcher`].
///
/// Implementations outside this crate cannot mint [`Verified`] values, so
/// they delegate to one of the crate's sanitizers (for example an
/// [`HtmlSanitizer`] with a site-specific policy).
pub trait ContextSanitizer: Send + Sync {
    /// The context this sanitizer serves.
    fn context(&self) -> SanitizationContext;

    /// Sanitizes `input`. `policy` is the caller's markup policy, if any;
    /// sanitizers for other contexts ignore it.
    fn sanitize_in_context(
        &self,
        input: Tainted<String>,
        policy: Option<&Policy>,
    ) -> Verified<String>;
}

impl ContextSanitizer for HtmlSanitizer {
    fn context(&self) -> SanitizationContext {
        SanitizationContext::Html
    }

    fn sanitize_in_context(
        &self,
        input: Tainted<String>,
        policy: Option<&Policy>,
    ) -> Verified<String> {
        self.sanitize_with(input, policy)
    }
}

macro_rules! policy_free_context {
    ($($sanitizer:ident => $context:ident),* $(,)?) => {
        $(
            impl ContextSanitizer for $sanitizer {
                fn context(&self) -> SanitizationContext {
                    SanitizationContext::$context
                }

                fn sanitize_in_context(
                    &self,
                    input: Tainted<String>,
                    _policy: Option<&Policy>,
                ) -> Verified<String> {
                    self.sanitize(input)
                }
            }
        )*
    };
}

policy_free_context! {
    PlainTextSanitizer => PlainText,
    SqlSanitizer => Sql,
    UrlSanitizer => Url,
    AttributeSanitizer => Attribute,
}

/// Registry that routes input to the sanitizer registered for its context.
///
/// Unlike [`sanitize`], a dispatcher can hold replacement sanitizers and
/// can be missing contexts entirely. Input for an unregistered context is
/// reported as [`Error::Unregistered`] and never passed through unsanitized.
///
/// # Examples
///
/// ```
/// use safe_inputs::{SanitizationContext, SanitizerDispatcher, Tainted};
///
/// let dispatcher = SanitizerDispatcher::with_defaults();
/// let out = dispatcher
///     .sanitize(Tainted::new("a b".to_string()), SanitizationContext::Url, None)
///     .expect("url sanitizer is registered");
///
/// assert_eq!(out.as_ref(), "a%20b");
/// ```
#[derive(Default)]
pub struct SanitizerDispatcher {
    sanitizers: Vec<Box<dyn ContextSanitizer>>,
}

impl SanitizerDispatcher {
    /// Creates a dispatcher with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher with the crate's sanitizer for every context.
    ///
    /// The markup sanitizer uses [`Policy::default`] unless a call supplies one.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(PlainTextSanitizer)
            .register(HtmlSanitizer::default())
            .register(SqlSanitizer)
            .register(UrlSanitizer)
            .register(AttributeSanitizer)
    }

    /// Registers `sanitizer`, replacing any sanitizer already serving its context.
    pub fn register(mut self, sanitizer: impl ContextSanitizer + 'static) -> Self {
        let context = sanitizer.context();
        self.sanitizers.retain(|s| s.context() != context);
        self.sanitizers.push(Box::new(sanitizer));
        self
    }

    /// Iterates over the registered contexts in registration order.
    pub fn contexts(&self) -> impl Iterator<Item = SanitizationContext> + '_ {
        self.sanitizers.iter().map(|s| s.context())
    }

    /// Sanitizes `input` with the sanitizer registered for `context`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unregistered`] if no sanitizer serves `context`.
    pub fn sanitize(
        &self,
        input: Tainted<String>,
        context: SanitizationContext,
        policy: Option<&Policy>,
    ) -> Result<Verified<String>, Error> {
        let Some(sanitizer) = self.sanitizers.iter().find(|s| s.context() == context) else {
            tracing::warn!(%context, "no sanitizer registered for context");
            return Err(Error::Unregistered(context));
        };

        tracing::trace!(%context, custom_policy = policy.is_some(), "dispatching input");
        Ok(sanitizer.sanitize_in_context(input, policy))
    }
}

impl fmt::Debug for SanitizerDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitizerDispatcher")
            .field("contexts", &self.contexts().collect::<Vec<_>>())
            .finish()
    }
}
