use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::error::{PolicyError, PolicyErrorKind};
use crate::html::DANGEROUS_CONTAINERS;

const DEFAULT_TAGS: &[&str] = &[
    "b", "i", "u", "p", "strong", "em", "ul", "ol", "li", "br", "span", "div", "a", "img",
];

const DEFAULT_GLOBAL_ATTRIBUTES: &[&str] =
    &["class", "id", "title", "href", "src", "alt", "target"];

const DEFAULT_ANCHOR_ATTRIBUTES: &[&str] = &["href", "target", "rel"];

const DEFAULT_IMAGE_ATTRIBUTES: &[&str] = &["src", "alt", "width", "height"];

/// Allowlist of tags and attributes that survive markup sanitization.
///
/// A policy is immutable once built. Every name it stores is lower-case, and
/// every lookup lower-cases its argument first, so `<B>` and `<b>` are the
/// same tag. One instance can be shared by any number of concurrent
/// sanitize calls.
///
/// Attribute rules come in two layers:
///
/// - a global set that applies to every allowed tag, and
/// - per-tag sets. When a tag has its own set, only that set is consulted
///   and the global set is ignored for that tag.
///
/// # Examples
///
/// ```
/// use safe_inputs::Policy;
///
/// let policy = Policy::default();
///
/// assert!(policy.is_tag_allowed("B"));
/// assert!(!policy.is_tag_allowed("script"));
///
/// // `a` has its own attribute set, so the global `class` does not apply.
/// assert!(policy.is_attribute_allowed("a", "href"));
/// assert!(!policy.is_attribute_allowed("a", "class"));
/// assert!(policy.is_attribute_allowed("div", "class"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    allowed_tags: HashSet<String>,
    global_attributes: HashSet<String>,
    tag_attributes: HashMap<String, HashSet<String>>,
}

impl Policy {
    /// Returns a builder starting from an empty allowlist.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// Returns a policy that allows nothing; every tag is stripped.
    pub fn empty() -> Self {
        Self {
            allowed_tags: HashSet::new(),
            global_attributes: HashSet::new(),
            tag_attributes: HashMap::new(),
        }
    }

    /// Returns a builder seeded with this policy's rules.
    ///
    /// This is how a customized variant is derived; the original policy is
    /// left untouched.
    ///
    /// ```
    /// use safe_inputs::Policy;
    ///
    /// let base = Policy::default();
    /// let strict = base.to_builder().disallow_tags(["img", "a"]).build().unwrap();
    ///
    /// assert!(base.is_tag_allowed("img"));
    /// assert!(!strict.is_tag_allowed("img"));
    /// ```
    pub fn to_builder(&self) -> PolicyBuilder {
        PolicyBuilder {
            allowed_tags: self.allowed_tags.iter().cloned().collect(),
            global_attributes: self.global_attributes.iter().cloned().collect(),
            tag_attributes: self
                .tag_attributes
                .iter()
                .map(|(tag, attrs)| (tag.clone(), attrs.iter().cloned().collect()))
                .collect(),
        }
    }

    /// Returns `true` if `tag` is on the allowlist. Empty names are never allowed.
    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        if tag.is_empty() {
            return false;
        }
        self.allowed_tags.contains(lower(tag).as_ref())
    }

    /// Returns `true` if `attr` may appear on `tag`.
    ///
    /// A per-tag entry is exhaustive: when one exists for `tag`, the global
    /// attribute set is not consulted.
    pub fn is_attribute_allowed(&self, tag: &str, attr: &str) -> bool {
        if tag.is_empty() || attr.is_empty() {
            return false;
        }
        let attr = lower(attr);
        match self.tag_attributes.get(lower(tag).as_ref()) {
            Some(allowed) => allowed.contains(attr.as_ref()),
            None => self.global_attributes.contains(attr.as_ref()),
        }
    }

    /// Iterates over the allowed tag names, in no particular order.
    pub fn allowed_tags(&self) -> impl Iterator<Item = &str> {
        self.allowed_tags.iter().map(String::as_str)
    }

    /// Iterates over the globally allowed attribute names.
    pub fn global_attributes(&self) -> impl Iterator<Item = &str> {
        self.global_attributes.iter().map(String::as_str)
    }

    /// Returns the per-tag attribute set for `tag`, if one overrides the global set.
    pub fn tag_attributes(&self, tag: &str) -> Option<impl Iterator<Item = &str>> {
        self.tag_attributes
            .get(lower(tag).as_ref())
            .map(|attrs| attrs.iter().map(String::as_str))
    }
}

impl Default for Policy {
    /// A fresh baseline policy for user-authored formatting.
    ///
    /// Allows common inline and structural tags plus anchors and images.
    /// No event-handler or `style` attribute is reachable from it.
    fn default() -> Self {
        let mut tag_attributes = HashMap::new();
        tag_attributes.insert("a".to_string(), owned_set(DEFAULT_ANCHOR_ATTRIBUTES));
        tag_attributes.insert("img".to_string(), owned_set(DEFAULT_IMAGE_ATTRIBUTES));

        Self {
            allowed_tags: owned_set(DEFAULT_TAGS),
            global_attributes: owned_set(DEFAULT_GLOBAL_ATTRIBUTES),
            tag_attributes,
        }
    }
}

/// Builder for [`Policy`] that validates the allowlist before handing it out.
///
/// Names are trimmed and lower-cased as they are added. [`build`](Self::build)
/// rejects structurally unsafe configurations (see [`PolicyErrorKind`]).
///
/// # Examples
///
/// ```
/// use safe_inputs::Policy;
///
/// let policy = Policy::builder()
///     .allow_tags(["p", "BR", "a"])
///     .allow_global_attributes(["class"])
///     .allow_tag_attributes("a", ["href"])
///     .build()
///     .expect("valid policy");
///
/// assert!(policy.is_tag_allowed("br"));
/// assert!(policy.is_attribute_allowed("p", "class"));
/// assert!(!policy.is_attribute_allowed("a", "class"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    // Ordered so that validation reports the same fault on every run.
    allowed_tags: BTreeSet<String>,
    global_attributes: BTreeSet<String>,
    tag_attributes: BTreeMap<String, BTreeSet<String>>,
}

impl PolicyBuilder {
    /// Creates a builder with nothing allowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds tags to the allowlist.
    pub fn allow_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_tags
            .extend(tags.into_iter().map(|t| normalize(t.as_ref())));
        self
    }

    /// Removes tags from the allowlist. Their per-tag attribute sets are kept.
    pub fn disallow_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            self.allowed_tags.remove(&normalize(tag.as_ref()));
        }
        self
    }

    /// Adds attributes allowed on every tag that has no per-tag set.
    pub fn allow_global_attributes<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.global_attributes
            .extend(attrs.into_iter().map(|a| normalize(a.as_ref())));
        self
    }

    /// Removes attributes from the global set.
    pub fn disallow_global_attributes<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for attr in attrs {
            self.global_attributes.remove(&normalize(attr.as_ref()));
        }
        self
    }

    /// Adds attributes to `tag`'s own set, creating the set if needed.
    ///
    /// Once a tag has its own set, the global attributes no longer apply to it.
    pub fn allow_tag_attributes<I, S>(mut self, tag: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tag_attributes
            .entry(normalize(tag))
            .or_default()
            .extend(attrs.into_iter().map(|a| normalize(a.as_ref())));
        self
    }

    /// Drops `tag`'s own attribute set so the global set applies again.
    pub fn clear_tag_attributes(mut self, tag: &str) -> Self {
        self.tag_attributes.remove(&normalize(tag));
        self
    }

    /// Validates the configuration and produces an immutable [`Policy`].
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] naming the first offending entry if:
    /// - a name is empty or contains characters that cannot appear in a tag
    ///   or attribute name,
    /// - a dangerous container (`script`, `iframe`, ...) is on the tag allowlist,
    /// - an `on*` event-handler attribute appears in any attribute set.
    pub fn build(self) -> Result<Policy, PolicyError> {
        for tag in &self.allowed_tags {
            check_name(tag)?;
            if DANGEROUS_CONTAINERS.contains(&tag.as_str()) {
                return Err(PolicyError::new(PolicyErrorKind::DangerousTag, tag.clone()));
            }
        }
        for attr in &self.global_attributes {
            check_attribute(attr)?;
        }
        for (tag, attrs) in &self.tag_attributes {
            check_name(tag)?;
            for attr in attrs {
                check_attribute(attr)?;
            }
        }

        tracing::debug!(
            tags = self.allowed_tags.len(),
            global_attributes = self.global_attributes.len(),
            tag_overrides = self.tag_attributes.len(),
            "markup policy built"
        );

        Ok(Policy {
            allowed_tags: self.allowed_tags.into_iter().collect(),
            global_attributes: self.global_attributes.into_iter().collect(),
            tag_attributes: self
                .tag_attributes
                .into_iter()
                .map(|(tag, attrs)| (tag, attrs.into_iter().collect()))
                .collect(),
        })
    }
}

fn owned_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn lower(name: &str) -> Cow<'_, str> {
    if name.chars().any(char::is_uppercase) {
        Cow::Owned(name.to_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn check_name(name: &str) -> Result<(), PolicyError> {
    if name.is_empty() {
        return Err(PolicyError::new(PolicyErrorKind::EmptyName, name));
    }
    let invalid = |c: char| {
        c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '/' | '=' | '"' | '\'')
    };
    if name.chars().any(invalid) {
        return Err(PolicyError::new(PolicyErrorKind::InvalidName, name));
    }
    Ok(())
}

fn check_attribute(attr: &str) -> Result<(), PolicyError> {
    check_name(attr)?;
    if attr.starts_with("on") {
        return Err(PolicyError::new(PolicyErrorKind::EventHandlerAttribute, attr));
    }
    Ok(())
}
