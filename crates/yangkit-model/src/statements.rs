//! Declared substatements of a `type` statement, as supplied by the parser.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use yangkit_common::{CanonicalValueViolation, QName};

use crate::definition::TypeDefinition;
use crate::source::SourceRef;

/// Declared documentation and error reporting of a restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementMeta {
    /// `description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `reference`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// `error-app-tag`
    #[serde(default, rename = "error-app-tag", skip_serializing_if = "Option::is_none")]
    pub error_app_tag: Option<String>,
    /// `error-message`
    #[serde(default, rename = "error-message", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// `status` argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// `current`
    #[default]
    Current,
    /// `deprecated`
    Deprecated,
    /// `obsolete`
    Obsolete,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Current => "current",
            Status::Deprecated => "deprecated",
            Status::Obsolete => "obsolete",
        })
    }
}

/// Documentation of an enum or bit member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberMeta {
    /// `description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `reference`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// `status`
    #[serde(default)]
    pub status: Status,
}

/// One end of a `range` or `length` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundArg {
    /// `min`: the lowest value allowed by the base type.
    Min,
    /// `max`: the highest value allowed by the base type.
    Max,
    /// A literal, parsed later with the type's own value syntax.
    Literal(String),
}

impl BoundArg {
    fn parse(text: &str) -> Result<Self, CanonicalValueViolation> {
        match text.trim() {
            "" => CanonicalValueViolation::variant_of("empty bound"),
            "min" => Ok(BoundArg::Min),
            "max" => Ok(BoundArg::Max),
            literal => Ok(BoundArg::Literal(literal.to_string())),
        }
    }
}

impl fmt::Display for BoundArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundArg::Min => f.write_str("min"),
            BoundArg::Max => f.write_str("max"),
            BoundArg::Literal(text) => f.write_str(text),
        }
    }
}

/// One `|`-separated part of a `range` or `length` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundPair {
    /// Lower end.
    pub low: BoundArg,
    /// Upper end; equal to `low` for a single value.
    pub high: BoundArg,
}

impl BoundPair {
    /// Parses an argument such as `1..10 | 20..max | 42`.
    pub fn parse_list(text: &str) -> Result<Vec<BoundPair>, CanonicalValueViolation> {
        text.split('|')
            .map(|part| match part.split_once("..") {
                Some((low, high)) => Ok(BoundPair {
                    low: BoundArg::parse(low)?,
                    high: BoundArg::parse(high)?,
                }),
                None => {
                    let single = BoundArg::parse(part)?;
                    Ok(BoundPair {
                        low: single.clone(),
                        high: single,
                    })
                }
            })
            .collect()
    }
}

/// A substatement of `type`, with its origin.
#[derive(Debug, Clone)]
pub struct Statement {
    /// What was declared.
    pub kind: StatementKind,
    /// Where it was declared.
    pub source: SourceRef,
}

impl Statement {
    /// Pairs a declaration with its origin.
    pub fn new(kind: StatementKind, source: impl Into<SourceRef>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }
}

/// Declared substatement payloads.
#[derive(Debug, Clone)]
pub enum StatementKind {
    /// `range`
    Range {
        /// Parsed argument.
        parts: Vec<BoundPair>,
        /// Documentation and error reporting.
        meta: StatementMeta,
    },
    /// `length`
    Length {
        /// Parsed argument.
        parts: Vec<BoundPair>,
        /// Documentation and error reporting.
        meta: StatementMeta,
    },
    /// `pattern`
    Pattern {
        /// Declared expression.
        regex: String,
        /// `modifier invert-match`.
        inverted: bool,
        /// Documentation and error reporting.
        meta: StatementMeta,
    },
    /// `fraction-digits`
    FractionDigits(u8),
    /// `base` of an identityref.
    Base(QName),
    /// `path` of a leafref.
    Path(String),
    /// `require-instance`
    RequireInstance(bool),
    /// `bit`
    Bit {
        /// Bit name.
        name: String,
        /// Declared `position`.
        position: Option<u32>,
        /// Documentation.
        meta: MemberMeta,
    },
    /// `enum`
    Enum {
        /// Enum name.
        name: String,
        /// Declared `value`.
        value: Option<i32>,
        /// Documentation.
        meta: MemberMeta,
    },
    /// Member `type` of a union, already built.
    Member(Arc<TypeDefinition>),
    /// `description`
    Description(String),
    /// `reference`
    Reference(String),
    /// `status`
    Status(Status),
    /// `units`
    Units(String),
    /// `default`
    Default(String),
}

impl StatementKind {
    /// YANG keyword of the statement.
    pub fn keyword(&self) -> &'static str {
        match self {
            StatementKind::Range { .. } => "range",
            StatementKind::Length { .. } => "length",
            StatementKind::Pattern { .. } => "pattern",
            StatementKind::FractionDigits(_) => "fraction-digits",
            StatementKind::Base(_) => "base",
            StatementKind::Path(_) => "path",
            StatementKind::RequireInstance(_) => "require-instance",
            StatementKind::Bit { .. } => "bit",
            StatementKind::Enum { .. } => "enum",
            StatementKind::Member(_) => "type",
            StatementKind::Description(_) => "description",
            StatementKind::Reference(_) => "reference",
            StatementKind::Status(_) => "status",
            StatementKind::Units(_) => "units",
            StatementKind::Default(_) => "default",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str) -> BoundArg {
        BoundArg::Literal(text.to_string())
    }

    #[test]
    fn parses_range_arguments() {
        let parts = BoundPair::parse_list("1..10 | 20..max|42").unwrap();
        assert_eq!(
            parts,
            vec![
                BoundPair { low: literal("1"), high: literal("10") },
                BoundPair { low: literal("20"), high: BoundArg::Max },
                BoundPair { low: literal("42"), high: literal("42") },
            ]
        );
    }

    #[test]
    fn decimal_and_negative_bounds() {
        let parts = BoundPair::parse_list("min..-1.5 | 0.25").unwrap();
        assert_eq!(parts[0].low, BoundArg::Min);
        assert_eq!(parts[0].high, literal("-1.5"));
        assert_eq!(parts[1].high, literal("0.25"));
    }

    #[test]
    fn rejects_empty_parts() {
        assert!(BoundPair::parse_list("1..").is_err());
        assert!(BoundPair::parse_list("1 || 2").is_err());
        assert!(BoundPair::parse_list("").is_err());
    }
}
