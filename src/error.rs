use std::fmt;

use crate::context::SanitizationContext;

/// Errors that can occur in this crate.
///
/// Malformed markup and disallowed tags are never errors; they are filtered.
/// Only configuration faults reach the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A policy failed validation while being built.
    Policy(PolicyError),
    /// No sanitizer is registered for the requested context.
    Unregistered(SanitizationContext),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Policy(e) => write!(f, "invalid policy: {}", e),
            Error::Unregistered(ctx) => write!(f, "no sanitizer registered for {} context", ctx),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Policy(e) => Some(e),
            Error::Unregistered(_) => None,
        }
    }
}

impl From<PolicyError> for Error {
    fn from(e: PolicyError) -> Self {
        Error::Policy(e)
    }
}

/// A structurally invalid policy, reported by
/// [`PolicyBuilder::build`](crate::PolicyBuilder::build).
///
/// # Examples
///
/// ```
/// use safe_inputs::{Policy, PolicyErrorKind};
///
/// let err = Policy::builder().allow_tags(["script"]).build().unwrap_err();
/// assert_eq!(err.kind(), PolicyErrorKind::DangerousTag);
/// assert_eq!(err.name(), "script");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyError {
    kind: PolicyErrorKind,
    name: String,
}

impl PolicyError {
    /// Creates a new policy error for the offending tag or attribute name.
    pub fn new(kind: PolicyErrorKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> PolicyErrorKind {
        self.kind
    }

    /// Returns the tag or attribute name that was rejected.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.kind, self.name)
    }
}

impl std::error::Error for PolicyError {}

/// Kind of policy configuration fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyErrorKind {
    /// A tag or attribute name is empty after trimming.
    EmptyName,
    /// A name contains whitespace, markup delimiters, quotes, or control characters.
    InvalidName,
    /// A dangerous container element was placed on the tag allowlist.
    DangerousTag,
    /// An event-handler attribute was placed on an attribute allowlist.
    ///
    /// Every attribute name beginning with `on` is treated as an event
    /// handler, including a bare `on` and custom names such as `on-load`.
    /// Names that do not begin with `on` (`open`, `option`) are accepted.
    /// No standard non-handler attribute begins with `on`.
    EventHandlerAttribute,
}

impl fmt::Display for PolicyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "empty name"),
            Self::InvalidName => write!(f, "invalid name"),
            Self::DangerousTag => write!(f, "dangerous tag cannot be allowed"),
            Self::EventHandlerAttribute => write!(f, "event handler attribute cannot be allowed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_error_accessors() {
        let err = PolicyError::new(PolicyErrorKind::InvalidName, "a b");

        assert_eq!(err.kind(), PolicyErrorKind::InvalidName);
        assert_eq!(err.name(), "a b");
    }

    #[test]
    fn policy_error_display() {
        let err = PolicyError::new(PolicyErrorKind::EventHandlerAttribute, "onclick");

        let output = format!("{}", err);
        assert!(output.contains("event handler"));
        assert!(output.contains("onclick"));
    }

    #[test]
    fn error_wraps_policy_error() {
        let err: Error = PolicyError::new(PolicyErrorKind::DangerousTag, "iframe").into();

        assert!(matches!(err, Error::Policy(_)));
        assert!(format!("{}", err).starts_with("invalid policy"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_unregistered_display() {
        let err = Error::Unregistered(SanitizationContext::Url);

        assert_eq!(format!("{}", err), "no sanitizer registered for url context");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn error_kinds_display() {
        assert_eq!(format!("{}", PolicyErrorKind::EmptyName), "empty name");
        assert_eq!(format!("{}", PolicyErrorKind::InvalidName), "invalid name");
        assert_eq!(
            format!("{}", PolicyErrorKind::DangerousTag),
            "dangerous tag cannot be allowed"
        );
        assert_eq!(
            format!("{}", PolicyErrorKind::EventHandlerAttribute),
            "event handler attribute cannot be allowed"
        );
    }
}
