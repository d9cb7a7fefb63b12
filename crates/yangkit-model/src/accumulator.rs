//! Per-step constraint accumulation and narrowing validation.

use tracing::warn;
use yangkit_common::MAX_SCALE;

use crate::constraints::{IntervalConstraint, LengthConstraint, PatternConstraint, RangeConstraint};
use crate::errors::TypeError;
use crate::source::SourceRef;

/// Switches that tighten derivation beyond the default behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivationOptions {
    /// Treat a `fraction-digits` that differs from the base as an error
    /// instead of logging it and keeping the base value.
    pub strict_fraction_digits: bool,
}

/// Validated constraints of one type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    /// Effective range intervals, sorted.
    pub ranges: Vec<RangeConstraint>,
    /// Effective length intervals, sorted.
    pub lengths: Vec<LengthConstraint>,
    /// Every pattern of the chain; a value must satisfy all of them.
    pub patterns: Vec<PatternConstraint>,
    /// `decimal64` fraction-digits.
    pub fraction_digits: Option<u8>,
}

fn render<C: IntervalConstraint>(constraints: &[C]) -> String {
    let parts: Vec<String> = constraints.iter().map(|c| c.interval().to_string()).collect();
    format!("[{}]", parts.join(" | "))
}

/// Checks that `candidate` is a true narrowing of `base`.
///
/// Every candidate interval must have `min <= max`, must not overlap another
/// candidate interval, and must lie entirely within one base interval. On
/// success the sorted candidate replaces the base set.
pub fn validate_narrowing<C: IntervalConstraint>(
    base: &[C],
    mut candidate: Vec<C>,
    location: &SourceRef,
) -> Result<Vec<C>, TypeError> {
    for constraint in &candidate {
        let interval = constraint.interval();
        if interval.min > interval.max {
            return Err(TypeError::InvalidBound {
                location: location.clone(),
                reason: format!(
                    "{} lower bound {} exceeds upper bound {}",
                    C::KEYWORD,
                    interval.min,
                    interval.max
                ),
            });
        }
    }

    candidate.sort_by(|a, b| a.interval().min.cmp(&b.interval().min));
    for pair in candidate.windows(2) {
        if pair[0].interval().overlaps(pair[1].interval()) {
            return Err(TypeError::InvalidBound {
                location: location.clone(),
                reason: format!(
                    "{} intervals {} and {} overlap",
                    C::KEYWORD,
                    pair[0].interval(),
                    pair[1].interval()
                ),
            });
        }
    }

    for constraint in &candidate {
        let interval = constraint.interval();
        if !base.iter().any(|b| b.interval().encloses(interval)) {
            return Err(TypeError::NarrowingViolated {
                location: location.clone(),
                interval: interval.to_string(),
                base: render(base),
            });
        }
    }
    Ok(candidate)
}

/// Mutable constraint state of one derivation step.
///
/// Starts from the base type's constraints; [`finish`](Self::finish) consumes
/// the accumulator and yields the effective set.
#[derive(Debug)]
pub struct TypeConstraints {
    base: ConstraintSet,
    options: DerivationOptions,
    ranges: Option<Vec<RangeConstraint>>,
    lengths: Option<Vec<LengthConstraint>>,
    patterns: Vec<PatternConstraint>,
    fraction_digits: Option<u8>,
}

impl TypeConstraints {
    /// Starts accumulating on top of `base`.
    pub fn new(base: ConstraintSet, options: DerivationOptions) -> Self {
        Self {
            base,
            options,
            ranges: None,
            lengths: None,
            patterns: Vec::new(),
            fraction_digits: None,
        }
    }

    /// Base ranges the local ones are checked against.
    pub fn base_ranges(&self) -> &[RangeConstraint] {
        &self.base.ranges
    }

    /// Base lengths the local ones are checked against.
    pub fn base_lengths(&self) -> &[LengthConstraint] {
        &self.base.lengths
    }

    /// Effective fraction-digits so far.
    pub fn fraction_digits(&self) -> Option<u8> {
        self.base.fraction_digits.or(self.fraction_digits)
    }

    /// Records the local `range`; only one is allowed per step.
    pub fn set_ranges(
        &mut self,
        candidate: Vec<RangeConstraint>,
        location: &SourceRef,
    ) -> Result<(), TypeError> {
        if self.ranges.is_some() {
            return Err(TypeError::MultipleConstraints {
                location: location.clone(),
                statement: RangeConstraint::KEYWORD,
            });
        }
        self.ranges = Some(validate_narrowing(&self.base.ranges, candidate, location)?);
        Ok(())
    }

    /// Records the local `length`; only one is allowed per step.
    pub fn set_lengths(
        &mut self,
        candidate: Vec<LengthConstraint>,
        location: &SourceRef,
    ) -> Result<(), TypeError> {
        if self.lengths.is_some() {
            return Err(TypeError::MultipleConstraints {
                location: location.clone(),
                statement: LengthConstraint::KEYWORD,
            });
        }
        self.lengths = Some(validate_narrowing(&self.base.lengths, candidate, location)?);
        Ok(())
    }

    /// Adds a local pattern; patterns never replace inherited ones.
    pub fn add_pattern(&mut self, pattern: PatternConstraint) {
        self.patterns.push(pattern);
    }

    /// Records `fraction-digits`.
    ///
    /// On a chain that already has one, a different value is logged and
    /// ignored unless [`DerivationOptions::strict_fraction_digits`] is set.
    pub fn set_fraction_digits(&mut self, value: u8, location: &SourceRef) -> Result<(), TypeError> {
        if let Some(base) = self.base.fraction_digits {
            if base != value {
                if self.options.strict_fraction_digits {
                    return Err(TypeError::FractionDigitsConflict {
                        location: location.clone(),
                        base,
                        declared: value,
                    });
                }
                warn!(
                    %location,
                    base,
                    declared = value,
                    "ignoring fraction-digits that differs from the base type"
                );
            }
            return Ok(());
        }

        if !(1..=MAX_SCALE).contains(&value) {
            return Err(TypeError::InvalidFractionDigits {
                location: location.clone(),
                value,
            });
        }
        if self.fraction_digits.is_some() {
            return Err(TypeError::MultipleConstraints {
                location: location.clone(),
                statement: "fraction-digits",
            });
        }
        self.fraction_digits = Some(value);
        Ok(())
    }

    /// Produces the effective constraints of this step.
    pub fn finish(self) -> ConstraintSet {
        let mut patterns = self.base.patterns;
        patterns.extend(self.patterns);
        ConstraintSet {
            ranges: self.ranges.unwrap_or(self.base.ranges),
            lengths: self.lengths.unwrap_or(self.base.lengths),
            patterns,
            fraction_digits: self.base.fraction_digits.or(self.fraction_digits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ValueRange;
    use crate::statements::StatementMeta;

    fn ranges(bounds: &[(i128, i128)]) -> Vec<RangeConstraint> {
        bounds
            .iter()
            .map(|&(min, max)| RangeConstraint::new(ValueRange::new(min, max), &StatementMeta::default()))
            .collect()
    }

    fn here() -> SourceRef {
        SourceRef::new("test.yang:1:1")
    }

    #[test]
    fn rejects_widening_candidate() {
        let err = validate_narrowing(&ranges(&[(0, 100)]), ranges(&[(50, 150)]), &here()).unwrap_err();
        match err {
            TypeError::NarrowingViolated { interval, base, location } => {
                assert_eq!(interval, "50..150");
                assert_eq!(base, "[0..100]");
                assert_eq!(location, here());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn accepts_contained_candidate() {
        let narrowed = validate_narrowing(&ranges(&[(0, 100)]), ranges(&[(10, 90)]), &here()).unwrap();
        assert_eq!(narrowed, ranges(&[(10, 90)]));
    }

    #[test]
    fn candidate_must_fit_one_base_interval() {
        let base = ranges(&[(0, 10), (20, 30)]);
        assert!(validate_narrowing(&base, ranges(&[(25, 30), (1, 2)]), &here()).is_ok());
        assert!(matches!(
            validate_narrowing(&base, ranges(&[(5, 25)]), &here()),
            Err(TypeError::NarrowingViolated { .. })
        ));
    }

    #[test]
    fn malformed_candidates() {
        let base = ranges(&[(0, 100)]);
        assert!(matches!(
            validate_narrowing(&base, ranges(&[(9, 3)]), &here()),
            Err(TypeError::InvalidBound { .. })
        ));
        assert!(matches!(
            validate_narrowing(&base, ranges(&[(1, 5), (5, 8)]), &here()),
            Err(TypeError::InvalidBound { .. })
        ));
    }

    #[test]
    fn sorts_candidate() {
        let narrowed =
            validate_narrowing(&ranges(&[(0, 100)]), ranges(&[(50, 60), (1, 2)]), &here()).unwrap();
        assert_eq!(narrowed, ranges(&[(1, 2), (50, 60)]));
    }

    #[test]
    fn second_range_is_rejected() {
        let base = ConstraintSet {
            ranges: ranges(&[(0, 100)]),
            ..ConstraintSet::default()
        };
        let mut acc = TypeConstraints::new(base, DerivationOptions::default());
        acc.set_ranges(ranges(&[(1, 2)]), &here()).unwrap();
        assert!(matches!(
            acc.set_ranges(ranges(&[(3, 4)]), &here()),
            Err(TypeError::MultipleConstraints { statement: "range", .. })
        ));
        assert_eq!(acc.finish().ranges, ranges(&[(1, 2)]));
    }

    #[test]
    fn untouched_constraints_are_inherited() {
        let base = ConstraintSet {
            ranges: ranges(&[(0, 100)]),
            fraction_digits: Some(2),
            ..ConstraintSet::default()
        };
        let finished = TypeConstraints::new(base.clone(), DerivationOptions::default()).finish();
        assert_eq!(finished, base);
    }

    #[test]
    fn patterns_accumulate() {
        let meta = StatementMeta::default();
        let base = ConstraintSet {
            patterns: vec![PatternConstraint::new("[a-z]*", false, &meta).unwrap()],
            ..ConstraintSet::default()
        };
        let mut acc = TypeConstraints::new(base, DerivationOptions::default());
        acc.add_pattern(PatternConstraint::new(".{0,4}", false, &meta).unwrap());
        let patterns = acc.finish().patterns;
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].regex, "[a-z]*");
        assert_eq!(patterns[1].regex, ".{0,4}");
    }

    #[test]
    fn fraction_digits_conflict_keeps_base_by_default() {
        let base = ConstraintSet {
            fraction_digits: Some(2),
            ..ConstraintSet::default()
        };
        let mut lenient = TypeConstraints::new(base.clone(), DerivationOptions::default());
        lenient.set_fraction_digits(4, &here()).unwrap();
        assert_eq!(lenient.finish().fraction_digits, Some(2));

        let strict = DerivationOptions {
            strict_fraction_digits: true,
        };
        let mut acc = TypeConstraints::new(base, strict);
        assert!(matches!(
            acc.set_fraction_digits(4, &here()),
            Err(TypeError::FractionDigitsConflict { base: 2, declared: 4, .. })
        ));
        assert!(acc.set_fraction_digits(2, &here()).is_ok());
    }

    #[test]
    fn root_fraction_digits_bounds() {
        let mut acc = TypeConstraints::new(ConstraintSet::default(), DerivationOptions::default());
        assert!(matches!(
            acc.set_fraction_digits(0, &here()),
            Err(TypeError::InvalidFractionDigits { value: 0, .. })
        ));
        assert!(matches!(
            acc.set_fraction_digits(19, &here()),
            Err(TypeError::InvalidFractionDigits { value: 19, .. })
        ));
        acc.set_fraction_digits(18, &here()).unwrap();
        assert_eq!(acc.fraction_digits(), Some(18));
    }
}
