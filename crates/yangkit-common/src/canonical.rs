use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::ValueError;

/// Structured report of a string that is not a valid lexical form.
///
/// Parsers return this instead of failing hard, so that callers validating
/// defaults or leaf values can keep going and decide for themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalValueViolation {
    /// Optional NETCONF `error-app-tag`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_tag: Option<String>,
    /// Human-readable explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CanonicalValueViolation {
    /// Creates a violation with a message and no app tag.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            app_tag: None,
            message: Some(message.into()),
        }
    }

    /// Creates a violation carrying both an app tag and a message.
    pub fn with_app_tag(app_tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            app_tag: Some(app_tag.into()),
            message: Some(message.into()),
        }
    }

    /// Shorthand for `Err(CanonicalValueViolation::new(message))`.
    pub fn variant_of<T>(message: impl Into<String>) -> Result<T, Self> {
        Err(Self::new(message))
    }
}

impl fmt::Display for CanonicalValueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.app_tag, &self.message) {
            (_, Some(message)) => f.write_str(message),
            (Some(tag), None) => write!(f, "violation ({})", tag),
            (None, None) => f.write_str("invalid value"),
        }
    }
}

impl std::error::Error for CanonicalValueViolation {}

impl From<ValueError> for CanonicalValueViolation {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::Violation(violation) => violation,
            other => CanonicalValueViolation::new(other.to_string()),
        }
    }
}

/// A value with exactly one textual representation and a total order.
pub trait CanonicalValue: Sized + Ord + Clone {
    /// Parses any valid lexical form into a value, or reports why it is not valid.
    fn parse_canonical(text: &str) -> Result<Self, CanonicalValueViolation>;

    /// Renders the canonical lexical form.
    fn to_canonical_string(&self) -> String;

    /// Boundary entry point: a violation becomes a hard [`ValueError`].
    fn value_of(text: &str) -> Result<Self, ValueError> {
        Self::parse_canonical(text).map_err(ValueError::Violation)
    }
}
