use thiserror::Error;

use crate::source::SourceRef;

/// Structural errors raised while deriving a type.
///
/// Every variant carries the location of the statement that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A restriction is not contained in the base type's constraints.
    #[error("{location}: {interval} is not a subset of the base constraints {base}")]
    NarrowingViolated {
        /// Offending statement.
        location: SourceRef,
        /// Interval that escaped the base set.
        interval: String,
        /// Base intervals, rendered.
        base: String,
    },
    /// A bound could not be parsed or the interval is malformed.
    #[error("{location}: invalid bound: {reason}")]
    InvalidBound {
        /// Offending statement.
        location: SourceRef,
        /// What went wrong.
        reason: String,
    },
    /// The same restriction appears twice in one derivation step.
    #[error("{location}: multiple {statement} statements")]
    MultipleConstraints {
        /// Second occurrence.
        location: SourceRef,
        /// Statement keyword.
        statement: &'static str,
    },
    /// Derived `fraction-digits` differs from the base's.
    #[error("{location}: fraction-digits {declared} conflicts with base value {base}")]
    FractionDigitsConflict {
        /// Offending statement.
        location: SourceRef,
        /// Value fixed at the chain root.
        base: u8,
        /// Value declared here.
        declared: u8,
    },
    /// A root `decimal64` type without `fraction-digits`.
    #[error("{location}: decimal64 type requires fraction-digits")]
    MissingFractionDigits {
        /// Type declaration.
        location: SourceRef,
    },
    /// `fraction-digits` outside `1..=18`.
    #[error("{location}: fraction-digits {value} is outside of [1..18]")]
    InvalidFractionDigits {
        /// Offending statement.
        location: SourceRef,
        /// Declared value.
        value: u8,
    },
    /// A restricted `bits` type names a bit its base lacks.
    #[error("{location}: bit '{name}' is not defined in the base type")]
    UnknownBit {
        /// Offending statement.
        location: SourceRef,
        /// Bit name.
        name: String,
    },
    /// A restricted bit declares a different position than its base.
    #[error("{location}: bit '{name}' has position {declared}, base declares {base}")]
    BitPositionMismatch {
        /// Offending statement.
        location: SourceRef,
        /// Bit name.
        name: String,
        /// Position in the base type.
        base: u32,
        /// Position declared here.
        declared: u32,
    },
    /// A restricted enumeration names a member its base lacks.
    #[error("{location}: enum '{name}' is not defined in the base type")]
    UnknownEnum {
        /// Offending statement.
        location: SourceRef,
        /// Enum name.
        name: String,
    },
    /// A restricted enum declares a different value than its base.
    #[error("{location}: enum '{name}' has value {declared}, base declares {base}")]
    EnumValueMismatch {
        /// Offending statement.
        location: SourceRef,
        /// Enum name.
        name: String,
        /// Value in the base type.
        base: i32,
        /// Value declared here.
        declared: i32,
    },
    /// Two members of one type share a name.
    #[error("{location}: duplicate member name '{name}'")]
    DuplicateName {
        /// Second occurrence.
        location: SourceRef,
        /// Shared name.
        name: String,
    },
    /// Two bits share a position.
    #[error("{location}: bit position {position} is already used by '{other}'")]
    DuplicatePosition {
        /// Second occurrence.
        location: SourceRef,
        /// Shared position.
        position: u32,
        /// Bit that claimed it first.
        other: String,
    },
    /// Two enums share a value.
    #[error("{location}: enum value {value} is already used by '{other}'")]
    DuplicateValue {
        /// Second occurrence.
        location: SourceRef,
        /// Shared value.
        value: i32,
        /// Enum that claimed it first.
        other: String,
    },
    /// `require-instance false` over a base requiring instances.
    #[error("{location}: require-instance cannot be relaxed from true to false")]
    RequireInstanceRelaxed {
        /// Offending statement.
        location: SourceRef,
    },
    /// A root `leafref` without `path`.
    #[error("{location}: leafref type requires a path")]
    MissingPath {
        /// Type declaration.
        location: SourceRef,
    },
    /// A root `identityref` without `base`.
    #[error("{location}: identityref type requires at least one base")]
    MissingBase {
        /// Type declaration.
        location: SourceRef,
    },
    /// A root `union` without member types.
    #[error("{location}: union type requires at least one member type")]
    EmptyUnion {
        /// Type declaration.
        location: SourceRef,
    },
    /// A root `enumeration` without enums.
    #[error("{location}: enumeration type requires at least one enum")]
    EmptyEnumeration {
        /// Type declaration.
        location: SourceRef,
    },
    /// A root `bits` type without bits.
    #[error("{location}: bits type requires at least one bit")]
    EmptyBits {
        /// Type declaration.
        location: SourceRef,
    },
    /// A restricted union member does not refine the base member.
    #[error("{location}: union member {index}: {reason}")]
    UnionMemberMismatch {
        /// Offending statement.
        location: SourceRef,
        /// Member position.
        index: usize,
        /// What went wrong.
        reason: String,
    },
    /// A pattern does not compile.
    #[error("{location}: invalid pattern '{regex}': {reason}")]
    InvalidPattern {
        /// Offending statement.
        location: SourceRef,
        /// Declared expression.
        regex: String,
        /// Compiler diagnostic.
        reason: String,
    },
    /// The effective default is not a valid value of the type.
    #[error("{location}: invalid default value '{value}': {reason}")]
    InvalidDefault {
        /// Default statement, or the type itself when inherited.
        location: SourceRef,
        /// Default value.
        value: String,
        /// Violation message.
        reason: String,
    },
    /// A statement that does not apply to the type's kind.
    #[error("{location}: {statement} is not allowed on {kind} types")]
    UnsupportedStatement {
        /// Offending statement.
        location: SourceRef,
        /// Statement keyword.
        statement: &'static str,
        /// Built-in kind name.
        kind: &'static str,
    },
}

impl TypeError {
    /// Location of the statement that caused the error.
    pub fn location(&self) -> &SourceRef {
        match self {
            TypeError::NarrowingViolated { location, .. }
            | TypeError::InvalidBound { location, .. }
            | TypeError::MultipleConstraints { location, .. }
            | TypeError::FractionDigitsConflict { location, .. }
            | TypeError::MissingFractionDigits { location }
            | TypeError::InvalidFractionDigits { location, .. }
            | TypeError::UnknownBit { location, .. }
            | TypeError::BitPositionMismatch { location, .. }
            | TypeError::UnknownEnum { location, .. }
            | TypeError::EnumValueMismatch { location, .. }
            | TypeError::DuplicateName { location, .. }
            | TypeError::DuplicatePosition { location, .. }
            | TypeError::DuplicateValue { location, .. }
            | TypeError::RequireInstanceRelaxed { location }
            | TypeError::MissingPath { location }
            | TypeError::MissingBase { location }
            | TypeError::EmptyUnion { location }
            | TypeError::EmptyEnumeration { location }
            | TypeError::EmptyBits { location }
            | TypeError::UnionMemberMismatch { location, .. }
            | TypeError::InvalidPattern { location, .. }
            | TypeError::InvalidDefault { location, .. }
            | TypeError::UnsupportedStatement { location, .. } => location,
        }
    }
}
