//! YANG type definitions and derivation.
//!
//! This crate provides:
//! - Immutable type definitions for every built-in kind
//! - Shared singletons for the built-ins that take no arguments
//! - A builder applying one `typedef`/`type` restriction step to a base type
//! - Value validation against the effective constraints of a type
//!
//! Core invariants:
//! - A derived type only ever narrows its base
//! - `fraction-digits` is fixed at the root of a `decimal64` chain
//! - Definitions are never mutated after they are built
//!
#![deny(missing_docs)]

/// Per-step constraint accumulation and narrowing checks.
pub mod accumulator;
/// Built-in type singletons.
pub mod builtin;
/// Range, length and pattern restrictions.
pub mod constraints;
/// Type definitions and their payloads.
pub mod definition;
/// The derivation builder.
pub mod derive;
/// Error types for derivation.
pub mod errors;
/// Schema paths.
pub mod path;
/// Statement source locations.
pub mod source;
/// Declared type substatements.
pub mod statements;
/// XSD pattern translation.
pub mod xsd;

pub use accumulator::{validate_narrowing, ConstraintSet, DerivationOptions, TypeConstraints};
pub use builtin::{builtin_qname, by_name, singleton, YANG_NAMESPACE};
pub use constraints::{
    IntervalConstraint, LengthConstraint, Number, PatternConstraint, RangeConstraint, ValueRange,
};
pub use definition::{
    Bit, BuiltinKind, EnumPair, IntegerKind, TypeDefinition, TypePayload, TypeSummary,
};
pub use derive::{build_builtin, derive, derive_with, TypeBuilder};
pub use errors::TypeError;
pub use path::SchemaPath;
pub use source::SourceRef;
pub use statements::{
    BoundArg, BoundPair, MemberMeta, Statement, StatementKind, StatementMeta, Status,
};
