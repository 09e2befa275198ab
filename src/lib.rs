//! Context-aware sanitization of untrusted text.
//!
//! The centerpiece is an allowlist-driven markup sanitizer: given untrusted
//! markup and a [`Policy`], it emits markup in which every tag and attribute
//! is permitted by the policy, and from which dangerous containers
//! (`script`, `iframe`, `style`, `object`, `embed`, `form`) have been removed
//! together with their content.
//!
//! Around it sit simple escapers for other output contexts:
//! - **Plain text**: control characters removed, whitespace trimmed
//! - **SQL**: single quotes doubled for string literals
//! - **URL**: percent-encoding of everything outside the unreserved set
//! - **Attribute**: quotes, angle brackets and ampersands escaped
//!
//! # Core Types
//!
//! - [`Tainted<T>`]: Wrapper for untrusted data requiring sanitization
//! - [`Verified<T>`]: Proof that a value went through a sanitizer
//! - [`Sanitizer`]: Trait turning `Tainted<String>` into `Verified<String>`
//! - [`Policy`] / [`PolicyBuilder`]: Tag and attribute allowlist
//! - [`SanitizerDispatcher`] / [`FluentSanitizer`]: Selection by [`SanitizationContext`]
//!
//! # Examples
//!
//! ```
//! use safe_inputs::{sanitize, HtmlSanitizer, Policy, SanitizationContext, Sanitizer, Tainted};
//!
//! // One-shot, default policy
//! let out = sanitize(
//!     r#"<b>Bold</b><script>alert(1)</script><a href="/" onclick="x()">home</a>"#,
//!     SanitizationContext::Html,
//!     None,
//! );
//! assert_eq!(out, "<b>Bold</b><a href='/'>home</a>");
//!
//! // Reusable sanitizer with a custom policy
//! let policy = Policy::builder()
//!     .allow_tags(["p", "em"])
//!     .build()
//!     .expect("valid policy");
//! let sanitizer = HtmlSanitizer::new(policy);
//!
//! let verified = sanitizer.sanitize(Tainted::new("<p><em>hi</em> <u>there</u></p>".to_string()));
//! assert_eq!(verified.as_ref(), "<p><em>hi</em> there</p>");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod dispatch;
mod error;
mod fluent;
mod html;
mod policy;
mod sanitizer;
mod tainted;
mod verified;

#[cfg(test)]
mod test_utils;

pub use context::SanitizationContext;
pub use dispatch::{sanitize, ContextSanitizer, SanitizerDispatcher};
pub use error::{Error, PolicyError, PolicyErrorKind};
pub use fluent::FluentSanitizer;
pub use html::{
    filter_attributes, sanitize_html, sanitize_html_with_report, HtmlSanitizer, SanitizeReport,
    DANGEROUS_CONTAINERS,
};
pub use policy::{Policy, PolicyBuilder};
pub use sanitizer::{AttributeSanitizer, PlainTextSanitizer, Sanitizer, SqlSanitizer, UrlSanitizer};
pub use tainted::Tainted;
pub use verified::Verified;
