//! Canonical value types of the YANG type system.
//!
//! Fixed-point `decimal64`, the fixed-width unsigned integers, the
//! parse/render contract they share, their versioned binary form and the
//! names used to identify schema nodes.
//!
#![deny(missing_docs)]

/// Parse/render contract shared by value types.
pub mod canonical;
/// Environment-driven process configuration.
pub mod config;
/// Fixed-point decimal with 1 to 18 fraction digits.
pub mod decimal;
/// Weak intern tables and the `Interned` trait.
pub mod intern;
/// Qualified and unqualified schema names.
pub mod names;
/// `uint8` .. `uint64` value types.
pub mod uint;
/// Error types raised by value construction and arithmetic.
pub mod validation;
/// Tagged big-endian binary encoding.
pub mod wire;

pub use canonical::{CanonicalValue, CanonicalValueViolation};
pub use decimal::{Decimal64, RoundingMode, MAX_SCALE};
pub use intern::Interned;
pub use names::{Identifier, QName, Revision, XmlNamespace, YangName};
pub use uint::{Uint16, Uint32, Uint64, Uint8};
pub use validation::{ArithmeticError, ValueError};
pub use wire::{ScalarValue, WireError, WireFormat};
