//! Range, length and pattern restrictions.
//!
//! Descriptors are immutable once built. The generated `error_message` is
//! computed at construction and takes part in equality, so two ranges with
//! the same bounds but different declared messages are different constraints.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;
use serde::{Serialize, Serializer};
use yangkit_common::{CanonicalValueViolation, Decimal64};

use crate::statements::StatementMeta;
use crate::xsd;

/// `error-app-tag` reported when a value falls outside every range interval.
pub const RANGE_APP_TAG: &str = "range-out-of-specified-bounds";
/// `error-app-tag` reported when a length falls outside every length interval.
pub const LENGTH_APP_TAG: &str = "length-out-of-specified-bounds";
/// `error-app-tag` reported when a value does not satisfy a pattern.
pub const PATTERN_APP_TAG: &str = "invalid-regular-expression";

/// A range or length bound.
///
/// Integer kinds and lengths use `Integer`; `decimal64` uses `Decimal`, always
/// at the type's fraction-digits. Equality follows the numeric order, so
/// `Integer(2)` equals `Decimal(2.00)`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Exact integer covering every signed and unsigned 64-bit value.
    Integer(i128),
    /// Fixed-point decimal.
    Decimal(Decimal64),
}

impl Number {
    fn cmp_mixed(int: i128, dec: &Decimal64) -> Ordering {
        let int_part = i128::from(dec.int_part());
        if int != int_part {
            return int.cmp(&int_part);
        }
        let frac_sign = if dec.frac_part() == 0 { 0 } else { dec.signum() };
        0.cmp(&frac_sign)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Number::Integer(value) => value.hash(state),
            Number::Decimal(value) if value.frac_part() == 0 => {
                i128::from(value.int_part()).hash(state)
            }
            Number::Decimal(value) => value.hash(state),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.cmp(b),
            (Number::Decimal(a), Number::Decimal(b)) => a.cmp(b),
            (Number::Integer(a), Number::Decimal(b)) => Number::cmp_mixed(*a, b),
            (Number::Decimal(a), Number::Integer(b)) => Number::cmp_mixed(*b, a).reverse(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{}", value),
            Number::Decimal(value) => write!(f, "{}", value),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<i128> for Number {
    fn from(value: i128) -> Self {
        Number::Integer(value)
    }
}

impl From<Decimal64> for Number {
    fn from(value: Decimal64) -> Self {
        Number::Decimal(value)
    }
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ValueRange {
    /// Lower bound, inclusive.
    pub min: Number,
    /// Upper bound, inclusive.
    pub max: Number,
}

impl ValueRange {
    /// Creates an interval; bounds are not checked here.
    pub fn new(min: impl Into<Number>, max: impl Into<Number>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Whether `other` lies entirely within this interval.
    pub fn encloses(&self, other: &ValueRange) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Whether `value` lies within this interval.
    pub fn contains(&self, value: &Number) -> bool {
        self.min <= *value && *value <= self.max
    }

    /// Whether both intervals share at least one point.
    pub fn overlaps(&self, other: &ValueRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

/// Documentation and error reporting attached to a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConstraintMeta {
    /// `description` substatement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `reference` substatement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Reported `error-app-tag`.
    pub error_app_tag: String,
    /// Reported `error-message`.
    pub error_message: String,
}

impl ConstraintMeta {
    fn from_declared(declared: &StatementMeta, app_tag: &str, message: String) -> Self {
        Self {
            description: declared.description.clone(),
            reference: declared.reference.clone(),
            error_app_tag: declared
                .error_app_tag
                .clone()
                .unwrap_or_else(|| app_tag.to_string()),
            error_message: declared.error_message.clone().unwrap_or(message),
        }
    }

    /// Violation carrying this constraint's tag and message.
    pub fn violation(&self) -> CanonicalValueViolation {
        CanonicalValueViolation::with_app_tag(&self.error_app_tag, &self.error_message)
    }
}

/// A constraint consisting of one closed interval.
pub trait IntervalConstraint: Clone + fmt::Debug {
    /// Keyword of the declaring statement.
    const KEYWORD: &'static str;

    /// Builds the constraint, generating the error metadata.
    fn new(interval: ValueRange, declared: &StatementMeta) -> Self;

    /// The interval.
    fn interval(&self) -> &ValueRange;

    /// Attached metadata.
    fn meta(&self) -> &ConstraintMeta;
}

fn bounds_message(interval: &ValueRange) -> String {
    format!(
        "The argument is out of bounds <{}, {}>",
        interval.min, interval.max
    )
}

/// One interval of a `range` restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RangeConstraint {
    /// Allowed values.
    #[serde(flatten)]
    pub interval: ValueRange,
    /// Documentation and error reporting.
    #[serde(flatten)]
    pub meta: ConstraintMeta,
}

impl IntervalConstraint for RangeConstraint {
    const KEYWORD: &'static str = "range";

    fn new(interval: ValueRange, declared: &StatementMeta) -> Self {
        let message = bounds_message(&interval);
        Self {
            interval,
            meta: ConstraintMeta::from_declared(declared, RANGE_APP_TAG, message),
        }
    }

    fn interval(&self) -> &ValueRange {
        &self.interval
    }

    fn meta(&self) -> &ConstraintMeta {
        &self.meta
    }
}

/// One interval of a `length` restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LengthConstraint {
    /// Allowed lengths.
    #[serde(flatten)]
    pub interval: ValueRange,
    /// Documentation and error reporting.
    #[serde(flatten)]
    pub meta: ConstraintMeta,
}

impl IntervalConstraint for LengthConstraint {
    const KEYWORD: &'static str = "length";

    fn new(interval: ValueRange, declared: &StatementMeta) -> Self {
        let message = bounds_message(&interval);
        Self {
            interval,
            meta: ConstraintMeta::from_declared(declared, LENGTH_APP_TAG, message),
        }
    }

    fn interval(&self) -> &ValueRange {
        &self.interval
    }

    fn meta(&self) -> &ConstraintMeta {
        &self.meta
    }
}

/// Checks `value` against a list of intervals, reporting the first one's
/// metadata on failure.
pub fn check_intervals<C: IntervalConstraint>(
    constraints: &[C],
    value: &Number,
) -> Result<(), CanonicalValueViolation> {
    if constraints.is_empty() || constraints.iter().any(|c| c.interval().contains(value)) {
        return Ok(());
    }
    Err(constraints[0].meta().violation())
}

/// A `pattern` restriction.
///
/// The expression is matched against the whole value. With `inverted` set
/// (`modifier invert-match`) the value must *not* match.
#[derive(Debug, Clone, Serialize)]
pub struct PatternConstraint {
    /// Expression as declared.
    pub regex: String,
    /// `modifier invert-match`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inverted: bool,
    /// Documentation and error reporting.
    #[serde(flatten)]
    pub meta: ConstraintMeta,
    #[serde(skip)]
    compiled: Regex,
}

impl PatternConstraint {
    /// Translates the XSD expression and compiles it, anchored at both ends.
    pub fn new(regex: &str, inverted: bool, declared: &StatementMeta) -> Result<Self, regex::Error> {
        let compiled = Regex::new(&xsd::to_regex(regex))?;
        let message = format!(
            "Supplied value does not match the regular expression {}.",
            regex
        );
        Ok(Self {
            regex: regex.to_string(),
            inverted,
            meta: ConstraintMeta::from_declared(declared, PATTERN_APP_TAG, message),
            compiled,
        })
    }

    /// Whether `value` satisfies this restriction.
    pub fn accepts(&self, value: &str) -> bool {
        self.compiled.is_match(value) != self.inverted
    }

    /// Checks `value`, reporting this pattern's metadata on failure.
    pub fn check(&self, value: &str) -> Result<(), CanonicalValueViolation> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(self.meta.violation())
        }
    }
}

impl PartialEq for PatternConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.regex == other.regex && self.inverted == other.inverted && self.meta == other.meta
    }
}

impl Eq for PatternConstraint {}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_range(min: i128, max: i128) -> RangeConstraint {
        RangeConstraint::new(ValueRange::new(min, max), &StatementMeta::default())
    }

    #[test]
    fn generated_metadata() {
        let range = int_range(0, 100);
        assert_eq!(range.meta.error_app_tag, RANGE_APP_TAG);
        assert_eq!(range.meta.error_message, "The argument is out of bounds <0, 100>");

        let length = LengthConstraint::new(ValueRange::new(1, 8), &StatementMeta::default());
        assert_eq!(length.meta.error_app_tag, LENGTH_APP_TAG);
    }

    #[test]
    fn declared_metadata_overrides_and_affects_equality() {
        let declared = StatementMeta {
            error_app_tag: Some("too-big".into()),
            error_message: Some("nope".into()),
            ..StatementMeta::default()
        };
        let custom = RangeConstraint::new(ValueRange::new(0, 100), &declared);
        assert_eq!(custom.meta.error_app_tag, "too-big");
        assert_eq!(custom.meta.error_message, "nope");
        assert_ne!(custom, int_range(0, 100));
        assert_eq!(int_range(0, 100), int_range(0, 100));
    }

    #[test]
    fn pattern_matches_whole_value() {
        let pattern = PatternConstraint::new("[a-z]+", false, &StatementMeta::default()).unwrap();
        assert!(pattern.accepts("abc"));
        assert!(!pattern.accepts("abc1"));
        let violation = pattern.check("ABC").unwrap_err();
        assert_eq!(violation.app_tag.as_deref(), Some(PATTERN_APP_TAG));
        assert_eq!(
            violation.message.as_deref(),
            Some("Supplied value does not match the regular expression [a-z]+.")
        );

        let inverted = PatternConstraint::new("x.*", true, &StatementMeta::default()).unwrap();
        assert!(inverted.accepts("abc"));
        assert!(!inverted.accepts("xml"));
        assert!(PatternConstraint::new("(", false, &StatementMeta::default()).is_err());
    }

    #[test]
    fn mixed_number_ordering() {
        let half = Number::Decimal(Decimal64::of(1, 5).unwrap());
        let neg_half = Number::Decimal(Decimal64::of(1, -5).unwrap());
        assert!(Number::Integer(0) < half);
        assert!(Number::Integer(1) > half);
        assert!(Number::Integer(0) > neg_half);
        assert!(Number::Integer(-1) < neg_half);
        assert_eq!(
            Number::Integer(2).cmp(&Number::Decimal(Decimal64::of(2, 200).unwrap())),
            Ordering::Equal
        );
    }

    #[test]
    fn mixed_number_equality_agrees_with_ordering() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(number: &Number) -> u64 {
            let mut hasher = DefaultHasher::new();
            number.hash(&mut hasher);
            hasher.finish()
        }

        let two = Number::Integer(2);
        let two_decimal = Number::Decimal(Decimal64::of(2, 200).unwrap());
        assert_eq!(two, two_decimal);
        assert_eq!(hash_of(&two), hash_of(&two_decimal));
        assert_ne!(two, Number::Decimal(Decimal64::of(2, 201).unwrap()));
        assert_eq!(ValueRange::new(2, 5), ValueRange::new(two_decimal, Number::Integer(5)));
    }

    #[test]
    fn pattern_uses_xsd_anchoring() {
        let meta = StatementMeta::default();
        let dollar = PatternConstraint::new("[0-9]+$", false, &meta).unwrap();
        assert!(dollar.accepts("12$"));
        assert!(!dollar.accepts("12"));
        let caret = PatternConstraint::new("^abc", false, &meta).unwrap();
        assert!(caret.accepts("^abc"));
        assert!(!caret.accepts("abc"));
        let latin = PatternConstraint::new(r"\p{IsBasicLatin}*", false, &meta).unwrap();
        assert!(latin.accepts("plain ascii"));
        assert!(!latin.accepts("caf\u{e9}"));
        assert_eq!(latin.regex, r"\p{IsBasicLatin}*");
    }

    #[test]
    fn interval_checks() {
        let ranges = [int_range(1, 5), int_range(10, 20)];
        assert!(check_intervals(&ranges, &Number::Integer(12)).is_ok());
        let violation = check_intervals(&ranges, &Number::Integer(7)).unwrap_err();
        assert_eq!(violation.app_tag.as_deref(), Some(RANGE_APP_TAG));
        assert!(ValueRange::new(0, 10).overlaps(&ValueRange::new(10, 12)));
        assert_eq!(ValueRange::new(3, 3).to_string(), "3");
    }
}
