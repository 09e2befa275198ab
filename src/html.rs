//! Allowlist-driven markup sanitizer.
//!
//! A pass runs three stages, strictly in order:
//!
//! 1. delete `<!-- ... -->` comments,
//! 2. delete dangerous containers ([`DANGEROUS_CONTAINERS`]) together with
//!    their bodies,
//! 3. scan the remaining text once, rebuilding allowed tags with their
//!    allowed attributes and dropping every other tag.
//!
//! Each stage runs once, so a pass takes time proportional to the input.
//! Text outside tags is copied through unchanged; no entity encoding or
//! decoding happens.
//!
//! The engine never fails on malformed markup. Text from a `<` with no later
//! `>` is copied as-is, unless it opens a dangerous container, in which case
//! stage 2 drops it. An empty or disallowed tag is dropped.

mod attributes;
mod strip;

pub use attributes::filter_attributes;

use attributes::Attribute;

use crate::{Policy, Sanitizer, Tainted, Verified};

/// Elements removed with their entire content, whatever the policy says.
///
/// [`PolicyBuilder::build`](crate::PolicyBuilder::build) refuses to put any
/// of these on a tag allowlist.
pub const DANGEROUS_CONTAINERS: [&str; 6] =
    ["script", "iframe", "style", "object", "embed", "form"];

/// Counts describing what one sanitize pass removed.
///
/// Holds numbers only, so it is safe to log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Comments deleted in stage 1.
    pub comments_removed: usize,
    /// Dangerous container spans deleted in stage 2.
    pub containers_removed: usize,
    /// Tags dropped by the scanner (disallowed names, empty tags).
    pub tags_dropped: usize,
    /// Attributes dropped from tags that were kept.
    pub attributes_dropped: usize,
}

impl SanitizeReport {
    /// Returns `true` if the pass removed nothing.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Sanitizes `input` against `policy`, or [`Policy::default`] when `None`.
///
/// # Examples
///
/// ```
/// use safe_inputs::sanitize_html;
///
/// let out = sanitize_html(r#"<a href="http://x" onclick="evil()">link</a><br/>"#, None);
/// assert_eq!(out, "<a href='http://x'>link</a><br />");
/// ```
pub fn sanitize_html(input: &str, policy: Option<&Policy>) -> String {
    sanitize_html_with_report(input, policy).0
}

/// Like [`sanitize_html`], and also returns a [`SanitizeReport`] for the pass.
pub fn sanitize_html_with_report(
    input: &str,
    policy: Option<&Policy>,
) -> (String, SanitizeReport) {
    let mut report = SanitizeReport::default();
    if input.is_empty() {
        return (String::new(), report);
    }

    let fallback;
    let policy = match policy {
        Some(policy) => policy,
        None => {
            fallback = Policy::default();
            &fallback
        }
    };

    let stripped = strip::strip_blocks(input, &mut report);
    let output = filter_tags(&stripped, policy, &mut report);

    tracing::debug!(
        input_len = input.len(),
        output_len = output.len(),
        comments_removed = report.comments_removed,
        containers_removed = report.containers_removed,
        tags_dropped = report.tags_dropped,
        attributes_dropped = report.attributes_dropped,
        "markup sanitized"
    );

    (output, report)
}

/// Whitespace that ends a tag name or separates attributes.
pub(crate) fn is_tag_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Stage 3: single left-to-right scan over comment- and container-free text.
fn filter_tags(text: &str, policy: &Policy, report: &mut SanitizeReport) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('<') {
        let open = cursor + offset;
        out.push_str(&text[cursor..open]);

        // No `>` ahead means no tag can start anywhere in the rest.
        let Some(len) = text[open + 1..].find('>') else {
            cursor = open;
            break;
        };
        let close = open + 1 + len;

        match TagRecord::parse(&text[open + 1..close], policy, report) {
            Some(tag) => tag.write_to(&mut out),
            None => report.tags_dropped += 1,
        }
        cursor = close + 1;
    }

    out.push_str(&text[cursor..]);
    out
}

/// A tag that passed the allowlist, ready to be written back out.
#[derive(Debug)]
struct TagRecord<'a> {
    name: String,
    closing: bool,
    self_closing: bool,
    attributes: Vec<Attribute<'a>>,
}

impl<'a> TagRecord<'a> {
    /// Parses the text between `<` and `>`. Returns `None` if the tag must be dropped.
    fn parse(inner: &'a str, policy: &Policy, report: &mut SanitizeReport) -> Option<Self> {
        let inner = inner.trim();
        if inner.is_empty() {
            return None;
        }

        if let Some(rest) = inner.strip_prefix('/') {
            let (name, _) = split_name(rest);
            let name = name.to_lowercase();
            if !policy.is_tag_allowed(&name) {
                return None;
            }
            return Some(Self {
                name,
                closing: true,
                self_closing: false,
                attributes: Vec::new(),
            });
        }

        let (body, self_closing) = match inner.strip_suffix('/') {
            Some(body) => (body.trim_end(), true),
            None => (inner, false),
        };
        let (name, raw_attributes) = split_name(body);
        let name = name.to_lowercase();
        if !policy.is_tag_allowed(&name) {
            return None;
        }

        let dropped = &mut report.attributes_dropped;
        let attributes = attributes::retain_allowed(raw_attributes, &name, policy, dropped);
        Some(Self {
            name,
            closing: false,
            self_closing,
            attributes,
        })
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        if self.closing {
            out.push('/');
        }
        out.push_str(&self.name);
        if !self.attributes.is_empty() {
            out.push(' ');
            attributes::render(&self.attributes, out);
        }
        out.push_str(if self.self_closing { " />" } else { ">" });
    }
}

/// Splits tag text at the first whitespace into `(name, rest)`.
fn split_name(text: &str) -> (&str, &str) {
    match text.find(is_tag_space) {
        Some(end) => (&text[..end], &text[end..]),
        None => (text, ""),
    }
}

/// Markup sanitizer bound to one [`Policy`].
///
/// # Examples
///
/// ```
/// use safe_inputs::{HtmlSanitizer, Policy, Sanitizer, Tainted};
///
/// let policy = Policy::builder().allow_tags(["p"]).build().unwrap();
/// let sanitizer = HtmlSanitizer::new(policy);
///
/// let out = sanitizer.sanitize(Tainted::new("<p><b>hi</b></p>".to_string()));
/// assert_eq!(out.as_ref(), "<p>hi</p>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct HtmlSanitizer {
    policy: Policy,
}

impl HtmlSanitizer {
    /// Creates a sanitizer that applies `policy` on every call.
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    /// Returns the policy this sanitizer applies.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Sanitizes with an explicit policy instead of the bound one.
    pub(crate) fn sanitize_with(
        &self,
        input: Tainted<String>,
        policy: Option<&Policy>,
    ) -> Verified<String> {
        let policy = policy.unwrap_or(&self.policy);
        Verified::new_unchecked(sanitize_html(&input.into_inner(), Some(policy)))
    }
}

impl Sanitizer for HtmlSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Verified<String> {
        self.sanitize_with(input, None)
    }
}
