//! Attribute parsing and filtering for a single tag.

use crate::policy::Policy;

use super::is_tag_space;

/// One attribute read from raw tag text. Names are lower-cased; values are
/// borrowed verbatim from between the quotes (or up to whitespace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute<'a> {
    pub(crate) name: String,
    pub(crate) value: &'a str,
}

/// Left-to-right reader over the text that follows a tag name.
///
/// Stops at the first position where no attribute name can be read (end of
/// input, or a stray `=`).
pub(crate) struct AttributeParser<'a> {
    rest: &'a str,
}

impl<'a> AttributeParser<'a> {
    pub(crate) fn new(raw: &'a str) -> Self {
        Self { rest: raw }
    }
}

impl<'a> Iterator for AttributeParser<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest.trim_start_matches(is_tag_space);
        let name_len = rest
            .find(|c: char| is_tag_space(c) || c == '=')
            .unwrap_or(rest.len());
        if name_len == 0 {
            self.rest = "";
            return None;
        }
        let name = rest[..name_len].to_lowercase();

        let after_name = rest[name_len..].trim_start_matches(is_tag_space);
        let (value, rest) = match after_name.strip_prefix('=') {
            Some(after_eq) => read_value(after_eq.trim_start_matches(is_tag_space)),
            None => ("", after_name),
        };

        self.rest = rest;
        Some(Attribute { name, value })
    }
}

/// Splits `text` into an attribute value and whatever follows it.
fn read_value(text: &str) -> (&str, &str) {
    match text.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &text[1..];
            match body.find(quote) {
                Some(end) => (&body[..end], &body[end + 1..]),
                // Unterminated quote: the value runs to the end.
                None => (body, ""),
            }
        }
        _ => {
            let end = text.find(is_tag_space).unwrap_or(text.len());
            (&text[..end], &text[end..])
        }
    }
}

/// Parses `raw` and keeps only the attributes `policy` allows on `tag`.
///
/// Each rejected attribute increments `dropped`.
pub(crate) fn retain_allowed<'a>(
    raw: &'a str,
    tag: &str,
    policy: &Policy,
    dropped: &mut usize,
) -> Vec<Attribute<'a>> {
    AttributeParser::new(raw)
        .filter(|attr| {
            let allowed = policy.is_attribute_allowed(tag, &attr.name);
            if !allowed {
                *dropped += 1;
            }
            allowed
        })
        .collect()
}

/// Writes attributes as `name='value'` pairs separated by single spaces.
///
/// Empty values are written as bare names. Inside a value, `'` becomes
/// `&#39;` so it cannot close the attribute, and `<` becomes `&lt;` so a
/// value can never start a comment or tag on a later pass.
pub(crate) fn render(attributes: &[Attribute<'_>], out: &mut String) {
    for (i, attr) in attributes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&attr.name);
        if attr.value.is_empty() {
            continue;
        }
        out.push_str("='");
        for c in attr.value.chars() {
            match c {
                '\'' => out.push_str("&#39;"),
                '<' => out.push_str("&lt;"),
                _ => out.push(c),
            }
        }
        out.push('\'');
    }
}

/// Filters the raw attribute text of one tag against `policy`.
///
/// `raw` is everything after the tag name; `tag` is the tag name. Returns
/// the surviving attributes re-quoted with single quotes, or an empty
/// string when none survive.
///
/// # Examples
///
/// ```
/// use safe_inputs::{filter_attributes, Policy};
///
/// let policy = Policy::default();
/// let out = filter_attributes(r#"HREF="/home" onclick="steal()" rel=nofollow"#, "a", &policy);
///
/// assert_eq!(out, "href='/home' rel='nofollow'");
/// ```
pub fn filter_attributes(raw: &str, tag: &str, policy: &Policy) -> String {
    let mut dropped = 0;
    let kept = retain_allowed(raw, tag, policy, &mut dropped);

    let mut out = String::new();
    render(&kept, &mut out);
    out.truncate(out.trim_end().len());
    out
}
