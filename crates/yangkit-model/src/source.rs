use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque reference to the declaration a statement came from.
///
/// Produced by the parser front-end (`file.yang:12:4` or similar) and carried
/// through unchanged so errors can point back at their origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(Arc<str>);

impl SourceRef {
    /// Wraps a location token.
    pub fn new(location: impl Into<Arc<str>>) -> Self {
        Self(location.into())
    }

    /// Placeholder for statements synthesized without a declaration.
    pub fn unknown() -> Self {
        Self::new("<unknown>")
    }

    /// The location token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
