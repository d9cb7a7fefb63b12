//! Fixed-width unsigned integers backing YANG's `uint8` .. `uint64`.
//!
//! Each type is a `Copy` newtype over the native unsigned primitive. Range
//! checked factories accept any integer that fits in `i128`, so the full
//! domain of every width, plus every negative input, is reachable without
//! wrapping.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::canonical::{CanonicalValue, CanonicalValueViolation};
use crate::config;
use crate::intern::{Interned, WeakInterner};
use crate::validation::ValueError;

macro_rules! unsigned_type {
    (
        $(#[$doc:meta])*
        $name:ident($prim:ty, $signed:ty), yang = $yang:literal, cache_var = $var:path
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($prim);

        impl $name {
            /// `0`
            pub const ZERO: Self = Self(0);
            /// `1`
            pub const ONE: Self = Self(1);
            /// `2`
            pub const TWO: Self = Self(2);
            /// `10`
            pub const TEN: Self = Self(10);
            /// Largest representable value.
            pub const MAX_VALUE: Self = Self(<$prim>::MAX);

            /// Reinterprets the bits of a signed integer of the same width.
            pub const fn from_bits(bits: $signed) -> Self {
                Self(bits as $prim)
            }

            /// Wraps a native value; always in range.
            pub const fn new(value: $prim) -> Self {
                Self(value)
            }

            /// The native value.
            pub const fn get(self) -> $prim {
                self.0
            }

            /// The bits of this value as a signed integer of the same width.
            pub const fn to_bits(self) -> $signed {
                self.0 as $signed
            }

            /// Range-checked factory.
            pub fn of(value: impl Into<i128>) -> Result<Self, ValueError> {
                let value = value.into();
                <$prim>::try_from(value)
                    .map(Self)
                    .map_err(|_| Self::out_of_range(value))
            }

            /// Clamps `value` into `[0, MAX_VALUE]`.
            pub fn saturating_of(value: impl Into<i128>) -> Self {
                let value = value.into();
                if value <= 0 {
                    Self::ZERO
                } else {
                    <$prim>::try_from(value)
                        .map(Self)
                        .unwrap_or(Self::MAX_VALUE)
                }
            }

            /// Parses `text` in the given radix (`2..=36`) and range-checks it.
            pub fn of_string(text: &str, radix: u32) -> Result<Self, ValueError> {
                if !(2..=36).contains(&radix) {
                    return Err(ValueError::InvalidRadix(radix));
                }
                let parsed = i128::from_str_radix(text, radix).map_err(|_| {
                    ValueError::Violation(CanonicalValueViolation::new(format!(
                        "'{}' is not a valid {} in radix {}",
                        text, $yang, radix
                    )))
                })?;
                Self::of(parsed)
            }

            /// Returns the shared instance from the small-value cache, or a
            /// fresh allocation for values beyond it.
            pub fn cached(value: $prim) -> Arc<Self> {
                match Self::cache_slot(value) {
                    Some(shared) => Arc::clone(shared),
                    None => Arc::new(Self(value)),
                }
            }

            fn cache_slot(value: $prim) -> Option<&'static Arc<Self>> {
                static CACHE: OnceLock<Vec<Arc<$name>>> = OnceLock::new();
                let cache = CACHE.get_or_init(|| {
                    let limit = u128::from(<$prim>::MAX) + 1;
                    let max_entries = usize::try_from(limit).unwrap_or(usize::MAX);
                    let size = config::cache_size($var, max_entries);
                    // size <= MAX + 1, so every index fits the primitive
                    (0..size).map(|i| Arc::new(Self(i as $prim))).collect()
                });
                usize::try_from(value).ok().and_then(|idx| cache.get(idx))
            }

            fn out_of_range(value: i128) -> ValueError {
                ValueError::OutOfRange {
                    value: value.to_string(),
                    expected: format!("0..{}", <$prim>::MAX),
                }
            }
        }

        impl Interned for $name {
            fn intern(&self) -> Arc<Self> {
                if let Some(shared) = Self::cache_slot(self.0) {
                    return Arc::clone(shared);
                }
                static TABLE: OnceLock<WeakInterner<$prim, $name>> = OnceLock::new();
                let value = *self;
                TABLE
                    .get_or_init(WeakInterner::new)
                    .intern_with(self.0, move || value)
            }
        }

        impl CanonicalValue for $name {
            fn parse_canonical(text: &str) -> Result<Self, CanonicalValueViolation> {
                Self::of_string(text, 10).map_err(CanonicalValueViolation::from)
            }

            fn to_canonical_string(&self) -> String {
                self.0.to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::of_string(s, 10)
            }
        }

        impl From<$prim> for $name {
            fn from(value: $prim) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $prim {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl From<$name> for i128 {
            fn from(value: $name) -> Self {
                i128::from(value.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_canonical_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                Self::parse_canonical(&text).map_err(de::Error::custom)
            }
        }
    };
}

unsigned_type! {
    /// YANG `uint8`.
    Uint8(u8, i8), yang = "uint8", cache_var = config::UINT8_CACHE_SIZE_VAR
}

unsigned_type! {
    /// YANG `uint16`.
    Uint16(u16, i16), yang = "uint16", cache_var = config::UINT16_CACHE_SIZE_VAR
}

unsigned_type! {
    /// YANG `uint32`.
    Uint32(u32, i32), yang = "uint32", cache_var = config::UINT32_CACHE_SIZE_VAR
}

unsigned_type! {
    /// YANG `uint64`.
    Uint64(u64, i64), yang = "uint64", cache_var = config::UINT64_CACHE_SIZE_VAR
}

macro_rules! widening {
    ($from:ident => $($to:ident),+) => {
        $(
            impl From<$from> for $to {
                fn from(value: $from) -> Self {
                    Self(value.0.into())
                }
            }

            impl TryFrom<$to> for $from {
                type Error = ValueError;

                fn try_from(value: $to) -> Result<Self, Self::Error> {
                    Self::of(value.0)
                }
            }
        )+
    };
}

widening!(Uint8 => Uint16, Uint32, Uint64);
widening!(Uint16 => Uint32, Uint64);
widening!(Uint32 => Uint64);
