use thiserror::Error;

use crate::canonical::CanonicalValueViolation;

/// Lexical and range errors raised while constructing a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// A string did not parse; carries the violation reported by the parser.
    #[error("{0}")]
    Violation(CanonicalValueViolation),
    /// A numeric input lies outside the domain of the target type.
    #[error("Invalid range: {value}, expected: [[{expected}]].")]
    OutOfRange {
        /// Attempted value, rendered in decimal.
        value: String,
        /// Valid range, e.g. `0..255`.
        expected: String,
    },
    /// A decimal scale outside `1..=18` was requested.
    #[error("scale {0} is outside of allowed range [1..18]")]
    ScaleOutOfBounds(u8),
    /// A radix outside `2..=36` was requested.
    #[error("radix {0} is outside of allowed range [2..36]")]
    InvalidRadix(u32),
    /// A name does not satisfy the YANG identifier grammar.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}

impl From<CanonicalValueViolation> for ValueError {
    fn from(violation: CanonicalValueViolation) -> Self {
        ValueError::Violation(violation)
    }
}

/// Arithmetic failures: these are never silently truncated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// Rescaling would not fit into 64 bits.
    #[error("{value} cannot be represented with scale {scale}")]
    Overflow {
        /// Canonical form of the value being converted.
        value: String,
        /// Requested scale.
        scale: u8,
    },
    /// Rounding was required while [`RoundingMode::Unnecessary`](crate::RoundingMode) was in force.
    #[error("rounding necessary to represent {value} with scale {scale}")]
    RoundingNecessary {
        /// Canonical form of the value being converted.
        value: String,
        /// Requested scale.
        scale: u8,
    },
    /// An exact integer conversion would drop a non-zero fraction.
    #[error("conversion of {0} would lose fraction")]
    LostFraction(String),
    /// An exact integer conversion does not fit the target type.
    #[error("value {value} is outside of {target} range")]
    OutOfTargetRange {
        /// Integer part of the value.
        value: i64,
        /// Target primitive name.
        target: &'static str,
    },
    /// A scale outside `1..=18` was requested.
    #[error("scale {0} is outside of allowed range [1..18]")]
    ScaleOutOfBounds(u8),
}
