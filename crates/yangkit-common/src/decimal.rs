use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::canonical::{CanonicalValue, CanonicalValueViolation};
use crate::validation::{ArithmeticError, ValueError};

/// Largest number of fraction digits a `decimal64` may carry.
pub const MAX_SCALE: u8 = 18;

const SCALE: [i64; MAX_SCALE as usize] = [
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
];

fn pow10(exp: u8) -> i64 {
    if exp == 0 {
        1
    } else {
        SCALE[usize::from(exp - 1)]
    }
}

/// Policy applied when [`Decimal64::scale_to`] has to drop digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Toward zero (truncation).
    Down,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// Nearest neighbour, ties away from zero.
    HalfUp,
    /// Nearest neighbour, ties toward zero.
    HalfDown,
    /// Nearest neighbour, ties to the even retained digit.
    HalfEven,
    /// Fail if any non-zero digit would be dropped.
    Unnecessary,
}

impl RoundingMode {
    /// Kebab-case name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            RoundingMode::Up => "up",
            RoundingMode::Down => "down",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::Floor => "floor",
            RoundingMode::HalfUp => "half-up",
            RoundingMode::HalfDown => "half-down",
            RoundingMode::HalfEven => "half-even",
            RoundingMode::Unnecessary => "unnecessary",
        }
    }
}

impl FromStr for RoundingMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(RoundingMode::Up),
            "down" => Ok(RoundingMode::Down),
            "ceiling" => Ok(RoundingMode::Ceiling),
            "floor" => Ok(RoundingMode::Floor),
            "half-up" => Ok(RoundingMode::HalfUp),
            "half-down" => Ok(RoundingMode::HalfDown),
            "half-even" => Ok(RoundingMode::HalfEven),
            "unnecessary" => Ok(RoundingMode::Unnecessary),
            other => Err(ValueError::PatternMismatch {
                field: "rounding_mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-point decimal backing YANG's `decimal64` type.
///
/// The value is stored as a 64-bit integer scaled by `10^scale`, with the
/// scale in `1..=18`. Values with different scales compare equal when they
/// denote the same number, so `1.50` (scale 2) equals `1.5` (scale 1) and both
/// hash identically.
///
/// Ordering across different scales goes through an `f64` approximation and
/// can misorder values that differ only beyond 53 bits of precision; values
/// that are equal always order as [`Ordering::Equal`].
#[derive(Clone, Copy)]
pub struct Decimal64 {
    offset: u8,
    value: i64,
}

impl Decimal64 {
    fn offset_of(scale: u8) -> Result<u8, ValueError> {
        if (1..=MAX_SCALE).contains(&scale) {
            Ok(scale - 1)
        } else {
            Err(ValueError::ScaleOutOfBounds(scale))
        }
    }

    /// Returns a decimal with the given scale and unscaled value.
    pub fn of(scale: u8, unscaled: i64) -> Result<Self, ValueError> {
        Ok(Self {
            offset: Self::offset_of(scale)?,
            value: unscaled,
        })
    }

    /// Returns the integer `value` represented with `scale` fraction digits.
    ///
    /// Fails if the integer does not fit the range available at that scale.
    pub fn from_integer(scale: u8, value: i64) -> Result<Self, ValueError> {
        let offset = Self::offset_of(scale)?;
        match value.checked_mul(SCALE[usize::from(offset)]) {
            Some(scaled) => Ok(Self {
                offset,
                value: scaled,
            }),
            None => Err(ValueError::OutOfRange {
                value: value.to_string(),
                expected: format!(
                    "{}..{}",
                    Self { offset, value: i64::MIN }.int_part(),
                    Self { offset, value: i64::MAX }.int_part()
                ),
            }),
        }
    }

    /// Smallest value representable with `scale` fraction digits.
    pub fn min_value_in(scale: u8) -> Result<Self, ValueError> {
        Self::of(scale, i64::MIN)
    }

    /// Largest value representable with `scale` fraction digits.
    pub fn max_value_in(scale: u8) -> Result<Self, ValueError> {
        Self::of(scale, i64::MAX)
    }

    /// Number of fraction digits, in `1..=18`.
    pub fn scale(&self) -> u8 {
        self.offset + 1
    }

    /// The value multiplied by `10^scale`.
    pub fn unscaled_value(&self) -> i64 {
        self.value
    }

    fn divisor(&self) -> i64 {
        SCALE[usize::from(self.offset)]
    }

    /// Integer part, truncated toward zero.
    pub fn int_part(&self) -> i64 {
        self.value / self.divisor()
    }

    /// Magnitude of the fraction digits at this decimal's scale.
    pub fn frac_part(&self) -> u64 {
        (self.value % self.divisor()).unsigned_abs()
    }

    // Signed fraction expressed with MAX_SCALE digits; |x| < 10^18 always fits.
    fn normalized_frac(&self) -> i64 {
        (self.value % self.divisor()) * pow10(MAX_SCALE - self.scale())
    }

    /// `-1`, `0` or `1` depending on the sign of the value.
    pub fn signum(&self) -> i32 {
        self.value.signum() as i32
    }

    /// Whether this is zero, at any scale.
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Closest `f64` approximation.
    pub fn as_f64(&self) -> f64 {
        self.value as f64 / self.divisor() as f64
    }

    /// Converts to an integer, failing if a non-zero fraction would be lost.
    pub fn to_i64_exact(&self) -> Result<i64, ArithmeticError> {
        if self.frac_part() != 0 {
            return Err(ArithmeticError::LostFraction(self.to_canonical_string()));
        }
        Ok(self.int_part())
    }

    /// Re-expresses this value with `scale` fraction digits.
    ///
    /// Widening multiplies and fails on 64-bit overflow. Narrowing divides and
    /// resolves a non-zero remainder with `mode`.
    pub fn scale_to(self, scale: u8, mode: RoundingMode) -> Result<Self, ArithmeticError> {
        let offset = Self::offset_of(scale).map_err(|_| ArithmeticError::ScaleOutOfBounds(scale))?;
        if offset == self.offset {
            return Ok(self);
        }
        if self.value == 0 {
            return Ok(Self { offset, value: 0 });
        }

        if offset > self.offset {
            let factor = pow10(offset - self.offset);
            return self
                .value
                .checked_mul(factor)
                .map(|value| Self { offset, value })
                .ok_or_else(|| ArithmeticError::Overflow {
                    value: self.to_canonical_string(),
                    scale,
                });
        }

        let divisor = pow10(self.offset - offset);
        let quotient = self.value / divisor;
        let remainder = self.value % divisor;
        if remainder == 0 {
            return Ok(Self {
                offset,
                value: quotient,
            });
        }

        // divisor is a power of ten, so half is exact
        let significance = remainder.unsigned_abs().cmp(&(divisor / 2).unsigned_abs());
        let positive = self.value > 0;
        let away_from_zero = match mode {
            RoundingMode::Up => true,
            RoundingMode::Down => false,
            RoundingMode::Ceiling => positive,
            RoundingMode::Floor => !positive,
            RoundingMode::HalfUp => significance != Ordering::Less,
            RoundingMode::HalfDown => significance == Ordering::Greater,
            RoundingMode::HalfEven => match significance {
                Ordering::Less => false,
                Ordering::Greater => true,
                Ordering::Equal => quotient % 2 != 0,
            },
            RoundingMode::Unnecessary => {
                return Err(ArithmeticError::RoundingNecessary {
                    value: self.to_canonical_string(),
                    scale,
                })
            }
        };

        let value = if away_from_zero {
            quotient + self.value.signum()
        } else {
            quotient
        };
        Ok(Self { offset, value })
    }

    fn parse_str(text: &str) -> Result<Self, CanonicalValueViolation> {
        // RFC 7950 section 9.3.1: optional sign, digits, optional '.' and digits
        let bytes = text.as_bytes();
        if bytes.is_empty() {
            return CanonicalValueViolation::variant_of(
                "Empty string is not a valid decimal64 representation",
            );
        }

        let (negative, mut idx) = match bytes[0] {
            b'-' => (true, 1),
            b'+' => (false, 1),
            _ => (false, 0),
        };
        if idx == bytes.len() {
            return CanonicalValueViolation::variant_of("Missing digits after sign");
        }

        let mut limit = bytes.len() - 1;

        // Skip leading zeroes, but leave at least one digit
        while idx < limit && bytes[idx] == b'0' && bytes[idx + 1].is_ascii_digit() {
            idx += 1;
        }

        let mut int_len: u8 = 0;
        let mut int_part: i64 = 0;
        while idx <= limit {
            let ch = bytes[idx];
            if ch == b'.' {
                break;
            }
            if int_len == MAX_SCALE {
                return CanonicalValueViolation::variant_of(format!(
                    "Integer part is longer than {} digits",
                    MAX_SCALE
                ));
            }
            int_part = 10 * int_part + digit_at(ch, idx)?;
            idx += 1;
            int_len += 1;
        }

        if int_len == 0 {
            return CanonicalValueViolation::variant_of(format!(
                "Value '{}' is missing integer digits",
                text
            ));
        }
        if idx > limit {
            return Self::assemble(text, negative, int_part, 0, 1);
        }

        idx += 1;
        if idx > limit {
            return CanonicalValueViolation::variant_of(format!(
                "Value '{}' is missing fraction digits",
                text
            ));
        }

        while idx < limit && bytes[limit] == b'0' {
            limit -= 1;
        }

        let frac_limit = (MAX_SCALE - int_len + 1).min(MAX_SCALE);
        let mut frac_len: u8 = 0;
        let mut frac_part: i64 = 0;
        while idx <= limit {
            if frac_len == frac_limit {
                return CanonicalValueViolation::variant_of(format!(
                    "Fraction part longer than {} digits",
                    frac_limit
                ));
            }
            frac_part = 10 * frac_part + digit_at(bytes[idx], idx)?;
            idx += 1;
            frac_len += 1;
        }

        Self::assemble(text, negative, int_part, frac_part, frac_len)
    }

    fn assemble(
        text: &str,
        negative: bool,
        int_part: i64,
        frac_part: i64,
        frac_len: u8,
    ) -> Result<Self, CanonicalValueViolation> {
        let magnitude = i128::from(int_part) * i128::from(pow10(frac_len)) + i128::from(frac_part);
        let signed = if negative { -magnitude } else { magnitude };
        match i64::try_from(signed) {
            Ok(value) => Ok(Self {
                offset: frac_len - 1,
                value,
            }),
            Err(_) => CanonicalValueViolation::variant_of(format!(
                "Value '{}' is outside of decimal64 range",
                text
            )),
        }
    }
}

fn digit_at(ch: u8, index: usize) -> Result<i64, CanonicalValueViolation> {
    if ch.is_ascii_digit() {
        Ok(i64::from(ch - b'0'))
    } else {
        CanonicalValueViolation::variant_of(format!("Illegal character at offset {}", index))
    }
}

impl CanonicalValue for Decimal64 {
    fn parse_canonical(text: &str) -> Result<Self, CanonicalValueViolation> {
        Self::parse_str(text)
    }

    fn to_canonical_string(&self) -> String {
        // RFC 7950 section 9.3.2: point required, one digit minimum on each side
        let scale = usize::from(self.scale());
        let digits = self.value.unsigned_abs().to_string();
        let padded = if digits.len() < scale + 1 {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };

        let (int_digits, frac_digits) = padded.split_at(padded.len() - scale);
        let trimmed = frac_digits.trim_end_matches('0');
        let frac = if trimmed.is_empty() { "0" } else { trimmed };

        let mut out = String::with_capacity(padded.len() + 2);
        if self.value < 0 {
            out.push('-');
        }
        out.push_str(int_digits);
        out.push('.');
        out.push_str(frac);
        out
    }
}

impl PartialEq for Decimal64 {
    fn eq(&self, other: &Self) -> bool {
        if self.offset == other.offset {
            self.value == other.value
        } else {
            self.int_part() == other.int_part() && self.normalized_frac() == other.normalized_frac()
        }
    }
}

impl Eq for Decimal64 {}

impl Hash for Decimal64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.int_part().hash(state);
        self.normalized_frac().hash(state);
    }
}

impl PartialOrd for Decimal64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal64 {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.offset == other.offset {
            return self.value.cmp(&other.value);
        }
        if self == other {
            return Ordering::Equal;
        }
        match self.as_f64().partial_cmp(&other.as_f64()) {
            Some(Ordering::Equal) | None => (self.int_part(), self.normalized_frac())
                .cmp(&(other.int_part(), other.normalized_frac())),
            Some(ordering) => ordering,
        }
    }
}

impl fmt::Debug for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decimal64")
            .field("scale", &self.scale())
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl FromStr for Decimal64 {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::value_of(s)
    }
}

macro_rules! widening_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Decimal64 {
                fn from(value: $t) -> Self {
                    Self {
                        offset: 0,
                        value: i64::from(value) * 10,
                    }
                }
            }
        )*
    };
}

widening_from!(i8, i16, i32, u8, u16, u32);

macro_rules! exact_into {
    ($($t:ty),*) => {
        $(
            impl TryFrom<Decimal64> for $t {
                type Error = ArithmeticError;

                fn try_from(value: Decimal64) -> Result<Self, Self::Error> {
                    let int = value.to_i64_exact()?;
                    <$t>::try_from(int).map_err(|_| ArithmeticError::OutOfTargetRange {
                        value: int,
                        target: stringify!($t),
                    })
                }
            }
        )*
    };
}

exact_into!(i8, i16, i32, i64);

impl Serialize for Decimal64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Decimal64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_canonical(&text).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal64 {
        Decimal64::value_of(text).unwrap()
    }

    fn assert_parsed(text: &str, int_part: i64, frac_part: u64, scale: u8) {
        let parsed = dec(text);
        assert_eq!(parsed.int_part().abs(), int_part, "int part of {}", text);
        assert_eq!(parsed.frac_part(), frac_part, "fraction of {}", text);
        assert_eq!(parsed.scale(), scale, "scale of {}", text);
    }

    #[test]
    fn rejects_malformed_input() {
        for text in [
            "", "a", ":", "0a", "0:", "0.a", "0.:", ".a", "-", "+", ".", "..", "0.", "0.1.", ".5",
        ] {
            assert!(
                Decimal64::parse_canonical(text).is_err(),
                "{:?} should not parse",
                text
            );
        }
    }

    #[test]
    fn parses_variants() {
        assert_parsed("0", 0, 0, 1);
        assert_parsed("0.00", 0, 0, 1);
        assert_parsed("00.0", 0, 0, 1);
        assert_parsed("-000.0", 0, 0, 1);
        assert_parsed("10.09", 10, 9, 2);
        assert_parsed("+10.0900900", 10, 9009, 5);
        assert_parsed("0002210.09", 2210, 9, 2);
    }

    #[test]
    fn enforces_digit_limits() {
        dec("123456789012345678");
        dec("0.12345678901234568");
        dec("922337203685477580.7");
        dec("9.223372036854775807");

        assert!(Decimal64::value_of("1234567890123456789").is_err());
        assert!(Decimal64::value_of("0.1234567890123456789").is_err());
        assert!(Decimal64::value_of("922337203685477580.71").is_err());
        assert!(Decimal64::value_of("9.2233720368547758071").is_err());
    }

    #[test]
    fn overflowing_unscaled_value_is_a_violation() {
        let err = Decimal64::parse_canonical("999999999999999999").unwrap_err();
        assert!(err.to_string().contains("outside of decimal64 range"));
        assert_eq!(dec("-922337203685477580.8").unscaled_value(), i64::MIN);
    }

    #[test]
    fn illegal_character_reports_offset() {
        let err = Decimal64::parse_canonical("12x4").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Illegal character at offset 2"));
    }

    #[test]
    fn canonical_strings() {
        assert_eq!(Decimal64::of(2, 12345).unwrap().to_string(), "123.45");
        assert_eq!(dec("1.50").to_string(), "1.5");
        assert_eq!(dec("+0.0").to_string(), "0.0");
        assert_eq!(dec("-0.0").to_string(), "0.0");
        assert_eq!(dec("-10.09").to_string(), "-10.09");
        assert_eq!(Decimal64::of(3, -5).unwrap().to_string(), "-0.005");
        assert_eq!(Decimal64::of(18, 0).unwrap().to_string(), "0.0");
        assert_eq!(Decimal64::of(4, 10000).unwrap().to_string(), "1.0");
        assert_eq!(
            Decimal64::max_value_in(18).unwrap().to_string(),
            "9.223372036854775807"
        );
    }

    #[test]
    fn equality_normalizes_scale() {
        let a = Decimal64::of(1, 15).unwrap();
        let b = Decimal64::of(2, 150).unwrap();
        let c = Decimal64::of(3, -1500).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.cmp(&b), Ordering::Equal);

        use std::collections::hash_map::DefaultHasher;
        let hash = |d: &Decimal64| {
            let mut hasher = DefaultHasher::new();
            d.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&a), hash(&b));
        assert_ne!(Decimal64::of(1, 5).unwrap(), Decimal64::of(1, -5).unwrap());
    }

    #[test]
    fn ordering() {
        let one = dec("1");
        let two = dec("2");
        let neg_one = dec("-1");
        assert_eq!(one.cmp(&one), Ordering::Equal);
        assert_eq!(one.cmp(&two), Ordering::Less);
        assert_eq!(one.cmp(&neg_one), Ordering::Greater);
        assert!(dec("1.25") > dec("1.2"));
        assert!(dec("-1.25") < dec("-1.2"));
    }

    #[test]
    fn integer_factories_check_scale_range() {
        assert_eq!(Decimal64::from_integer(2, 25552555555).unwrap().unscaled_value(), 2555255555500);
        assert_eq!(Decimal64::from_integer(2, -25552555555).unwrap().unscaled_value(), -2555255555500);
        assert!(Decimal64::from_integer(17, i64::from(i8::MAX)).is_err());
        assert!(Decimal64::from_integer(16, i64::from(i8::MAX)).is_ok());
        assert!(Decimal64::from_integer(10, i64::from(i32::MAX)).is_err());
        assert!(matches!(
            Decimal64::of(0, 1),
            Err(ValueError::ScaleOutOfBounds(0))
        ));
        assert!(Decimal64::of(19, 1).is_err());
        assert_eq!(Decimal64::from(-1i32).to_string(), "-1.0");
    }

    #[test]
    fn exact_conversions() {
        assert_eq!(i8::try_from(Decimal64::from_integer(1, -128).unwrap()).unwrap(), -128);
        assert!(matches!(
            i8::try_from(Decimal64::from_integer(1, 128).unwrap()),
            Err(ArithmeticError::OutOfTargetRange { value: 128, target: "i8" })
        ));
        assert!(matches!(
            i64::try_from(dec("1.1")),
            Err(ArithmeticError::LostFraction(_))
        ));
        assert_eq!(dec("-12345678901").to_i64_exact().unwrap(), -12345678901);
    }

    #[test]
    fn scale_to_identity_zero_and_widening() {
        let d = dec("1.5");
        assert_eq!(d.scale_to(1, RoundingMode::Unnecessary).unwrap().unscaled_value(), 15);
        let zero = dec("0.0").scale_to(18, RoundingMode::Unnecessary).unwrap();
        assert_eq!((zero.scale(), zero.unscaled_value()), (18, 0));
        let wide = d.scale_to(18, RoundingMode::Unnecessary).unwrap();
        assert_eq!(wide.unscaled_value(), 1_500_000_000_000_000_000);
        assert!(matches!(
            dec("10").scale_to(18, RoundingMode::Unnecessary),
            Err(ArithmeticError::Overflow { scale: 18, .. })
        ));
        assert!(matches!(
            d.scale_to(19, RoundingMode::Down),
            Err(ArithmeticError::ScaleOutOfBounds(19))
        ));
    }

    #[test]
    fn widening_then_narrowing_restores_bits() {
        let d = Decimal64::of(3, -123456).unwrap();
        let back = d
            .scale_to(9, RoundingMode::Unnecessary)
            .unwrap()
            .scale_to(3, RoundingMode::Unnecessary)
            .unwrap();
        assert_eq!(back.unscaled_value(), -123456);
        assert_eq!(back.scale(), 3);
    }

    fn rounded(text: &str, mode: RoundingMode) -> String {
        dec(text).scale_to(1, mode).unwrap().to_string()
    }

    #[test]
    fn rounding_policies() {
        use RoundingMode::*;
        assert_eq!(rounded("1.21", Up), "1.3");
        assert_eq!(rounded("-1.21", Up), "-1.3");
        assert_eq!(rounded("1.29", Down), "1.2");
        assert_eq!(rounded("-1.29", Down), "-1.2");
        assert_eq!(rounded("1.21", Ceiling), "1.3");
        assert_eq!(rounded("-1.29", Ceiling), "-1.2");
        assert_eq!(rounded("1.29", Floor), "1.2");
        assert_eq!(rounded("-1.21", Floor), "-1.3");
        assert_eq!(rounded("1.25", HalfUp), "1.3");
        assert_eq!(rounded("1.24", HalfUp), "1.2");
        assert_eq!(rounded("1.25", HalfDown), "1.2");
        assert_eq!(rounded("1.26", HalfDown), "1.3");
        assert_eq!(rounded("-1.25", HalfUp), "-1.3");
        assert_eq!(rounded("-1.25", HalfDown), "-1.2");
    }

    #[test]
    fn half_even_breaks_ties_to_even_digit() {
        use RoundingMode::HalfEven;
        assert_eq!(rounded("1.25", HalfEven), "1.2");
        assert_eq!(rounded("1.35", HalfEven), "1.4");
        assert_eq!(rounded("-1.25", HalfEven), "-1.2");
        assert_eq!(rounded("-1.35", HalfEven), "-1.4");
        assert_eq!(rounded("1.251", HalfEven), "1.3");
        assert_eq!(rounded("0.05", HalfEven), "0.0");
    }

    #[test]
    fn unnecessary_fails_only_on_dropped_digits() {
        assert!(matches!(
            dec("1.25").scale_to(1, RoundingMode::Unnecessary),
            Err(ArithmeticError::RoundingNecessary { scale: 1, .. })
        ));
        assert_eq!(
            Decimal64::of(3, 1200)
                .unwrap()
                .scale_to(1, RoundingMode::Unnecessary)
                .unwrap()
                .to_string(),
            "1.2"
        );
    }

    #[test]
    fn rounding_mode_names_round_trip() {
        for mode in [
            RoundingMode::Up,
            RoundingMode::Down,
            RoundingMode::Ceiling,
            RoundingMode::Floor,
            RoundingMode::HalfUp,
            RoundingMode::HalfDown,
            RoundingMode::HalfEven,
            RoundingMode::Unnecessary,
        ] {
            assert_eq!(mode.as_str().parse::<RoundingMode>().unwrap(), mode);
        }
        assert!("banker".parse::<RoundingMode>().is_err());
    }

    #[test]
    fn serializes_as_canonical_string() {
        let d = Decimal64::of(2, 12345).unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), r#""123.45""#);
        let back: Decimal64 = serde_json::from_str(r#""123.450""#).unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<Decimal64>(r#""12..3""#).is_err());
    }
}
