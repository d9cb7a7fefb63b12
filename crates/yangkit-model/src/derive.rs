//! Type derivation: one restriction step on top of a base type.
//!
//! A [`TypeBuilder`] partitions the declared statements once, then builds
//! the new [`TypeDefinition`] on demand. Building is memoized, so repeated
//! calls hand out the same `Arc`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use tracing::debug;
use yangkit_common::{
    CanonicalValue, CanonicalValueViolation, Decimal64, QName, RoundingMode, Uint64,
};

use crate::accumulator::{ConstraintSet, DerivationOptions, TypeConstraints};
use crate::builtin::{builtin_qname, singleton};
use crate::constraints::{
    IntervalConstraint, LengthConstraint, Number, PatternConstraint, RangeConstraint, ValueRange,
};
use crate::definition::{Bit, BuiltinKind, EnumPair, IntegerKind, TypeDefinition, TypePayload};
use crate::errors::TypeError;
use crate::path::SchemaPath;
use crate::source::SourceRef;
use crate::statements::{
    BoundArg, BoundPair, MemberMeta, Statement, StatementKind, StatementMeta, Status,
};

/// A declaration with its origin.
#[derive(Debug, Clone)]
struct Located<T> {
    value: T,
    source: SourceRef,
}

#[derive(Debug, Clone)]
struct Bounds {
    parts: Vec<BoundPair>,
    meta: StatementMeta,
    source: SourceRef,
}

#[derive(Debug, Clone)]
struct PatternDecl {
    regex: String,
    inverted: bool,
    meta: StatementMeta,
    source: SourceRef,
}

#[derive(Debug, Clone)]
struct MemberDecl<V> {
    name: String,
    value: Option<V>,
    meta: MemberMeta,
    source: SourceRef,
}

/// Local statements, partitioned by keyword.
#[derive(Debug, Default)]
struct LocalStatements {
    ranges: Vec<Bounds>,
    lengths: Vec<Bounds>,
    patterns: Vec<PatternDecl>,
    fraction_digits: Vec<Located<u8>>,
    bases: Vec<Located<QName>>,
    paths: Vec<Located<String>>,
    require_instance: Vec<Located<bool>>,
    bits: Vec<MemberDecl<u32>>,
    enums: Vec<MemberDecl<i32>>,
    members: Vec<Located<Arc<TypeDefinition>>>,
    description: Option<String>,
    reference: Option<String>,
    status: Option<Status>,
    units: Option<String>,
    default: Option<Located<String>>,
    restrictions: Vec<Located<&'static str>>,
    first_source: Option<SourceRef>,
}

impl LocalStatements {
    fn partition(statements: Vec<Statement>) -> Self {
        let mut local = LocalStatements::default();
        for Statement { kind, source } in statements {
            if local.first_source.is_none() {
                local.first_source = Some(source.clone());
            }
            let keyword = kind.keyword();
            match kind {
                StatementKind::Range { parts, meta } => local.ranges.push(Bounds {
                    parts,
                    meta,
                    source: source.clone(),
                }),
                StatementKind::Length { parts, meta } => local.lengths.push(Bounds {
                    parts,
                    meta,
                    source: source.clone(),
                }),
                StatementKind::Pattern {
                    regex,
                    inverted,
                    meta,
                } => local.patterns.push(PatternDecl {
                    regex,
                    inverted,
                    meta,
                    source: source.clone(),
                }),
                StatementKind::FractionDigits(value) => local.fraction_digits.push(Located {
                    value,
                    source: source.clone(),
                }),
                StatementKind::Base(value) => local.bases.push(Located {
                    value,
                    source: source.clone(),
                }),
                StatementKind::Path(value) => local.paths.push(Located {
                    value,
                    source: source.clone(),
                }),
                StatementKind::RequireInstance(value) => local.require_instance.push(Located {
                    value,
                    source: source.clone(),
                }),
                StatementKind::Bit {
                    name,
                    position,
                    meta,
                } => local.bits.push(MemberDecl {
                    name,
                    value: position,
                    meta,
                    source: source.clone(),
                }),
                StatementKind::Enum { name, value, meta } => local.enums.push(MemberDecl {
                    name,
                    value,
                    meta,
                    source: source.clone(),
                }),
                StatementKind::Member(value) => local.members.push(Located {
                    value,
                    source: source.clone(),
                }),
                // last write wins
                StatementKind::Description(text) => local.description = Some(text),
                StatementKind::Reference(text) => local.reference = Some(text),
                StatementKind::Status(status) => local.status = Some(status),
                StatementKind::Units(text) => local.units = Some(text),
                StatementKind::Default(value) => {
                    local.default = Some(Located {
                        value,
                        source: source.clone(),
                    })
                }
            }
            if !is_documentation(keyword) {
                local.restrictions.push(Located {
                    value: keyword,
                    source,
                });
            }
        }
        local
    }
}

fn is_documentation(keyword: &str) -> bool {
    matches!(
        keyword,
        "description" | "reference" | "status" | "units" | "default"
    )
}

fn allows(kind: BuiltinKind, keyword: &str) -> bool {
    match keyword {
        "range" => matches!(kind, BuiltinKind::Integer(_) | BuiltinKind::Decimal64),
        "length" => matches!(kind, BuiltinKind::String | BuiltinKind::Binary),
        "pattern" => kind == BuiltinKind::String,
        "fraction-digits" => kind == BuiltinKind::Decimal64,
        "base" => kind == BuiltinKind::Identityref,
        "path" => kind == BuiltinKind::Leafref,
        "require-instance" => {
            matches!(kind, BuiltinKind::Leafref | BuiltinKind::InstanceIdentifier)
        }
        "bit" => kind == BuiltinKind::Bits,
        "enum" => kind == BuiltinKind::Enumeration,
        "type" => kind == BuiltinKind::Union,
        _ => true,
    }
}

/// Builds one derivation step.
///
/// The base is either an existing type, or nothing for the argument-taking
/// built-ins (`decimal64`, `enumeration`, `bits`, `union`, `leafref`,
/// `identityref`), in which case the statements define the root.
#[derive(Debug)]
pub struct TypeBuilder {
    kind: BuiltinKind,
    base: Option<Arc<TypeDefinition>>,
    local: LocalStatements,
    path: SchemaPath,
    options: DerivationOptions,
    built: OnceCell<Arc<TypeDefinition>>,
}

impl TypeBuilder {
    /// Restricts `base` with `statements`.
    pub fn new(base: Arc<TypeDefinition>, statements: Vec<Statement>, path: SchemaPath) -> Self {
        Self {
            kind: base.kind(),
            base: Some(base),
            local: LocalStatements::partition(statements),
            path,
            options: DerivationOptions::default(),
            built: OnceCell::new(),
        }
    }

    /// Applies `statements` to a built-in type: restricts its singleton, or
    /// defines a new root for kinds without one.
    pub fn builtin(kind: BuiltinKind, statements: Vec<Statement>, path: SchemaPath) -> Self {
        Self {
            kind,
            base: singleton(kind),
            local: LocalStatements::partition(statements),
            path,
            options: DerivationOptions::default(),
            built: OnceCell::new(),
        }
    }

    /// Replaces the derivation options.
    pub fn with_options(mut self, options: DerivationOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the type, or returns the one built earlier.
    pub fn build(&self) -> Result<Arc<TypeDefinition>, TypeError> {
        self.built
            .get_or_try_init(|| self.build_definition().map(Arc::new))
            .map(Arc::clone)
    }

    fn type_location(&self) -> SourceRef {
        self.local
            .first_source
            .clone()
            .unwrap_or_else(|| SourceRef::new(self.path.as_str()))
    }

    fn base_payload(&self) -> Option<&TypePayload> {
        self.base.as_deref().map(TypeDefinition::payload)
    }

    fn build_definition(&self) -> Result<TypeDefinition, TypeError> {
        for restriction in &self.local.restrictions {
            if !allows(self.kind, restriction.value) {
                return Err(TypeError::UnsupportedStatement {
                    location: restriction.source.clone(),
                    statement: restriction.value,
                    kind: self.kind.name(),
                });
            }
        }

        let payload = match self.kind {
            BuiltinKind::Integer(kind) => TypePayload::Integer {
                kind,
                ranges: self.integer_ranges(kind)?,
            },
            BuiltinKind::Decimal64 => self.decimal_payload()?,
            BuiltinKind::String => self.string_payload()?,
            BuiltinKind::Binary => TypePayload::Binary {
                lengths: self.narrowed_lengths()?.lengths,
            },
            BuiltinKind::Boolean => TypePayload::Boolean,
            BuiltinKind::Empty => TypePayload::Empty,
            BuiltinKind::Bits => TypePayload::Bits {
                bits: self.bits()?,
            },
            BuiltinKind::Enumeration => TypePayload::Enumeration {
                values: self.enums()?,
            },
            BuiltinKind::Identityref => TypePayload::Identityref {
                identities: self.identities()?,
            },
            BuiltinKind::InstanceIdentifier => TypePayload::InstanceIdentifier {
                require_instance: self.require_instance(false)?,
            },
            BuiltinKind::Leafref => TypePayload::Leafref {
                path: self.leafref_path()?,
                require_instance: self.require_instance(true)?,
            },
            BuiltinKind::Union => TypePayload::Union {
                members: self.union_members()?,
            },
        };

        let base = self.base.clone();
        let inherited = base.as_deref();
        let definition = TypeDefinition {
            qname: self
                .path
                .last()
                .cloned()
                .or_else(|| inherited.map(|b| b.qname.clone()))
                .unwrap_or_else(|| builtin_qname(self.kind)),
            path: self.path.clone(),
            description: self
                .local
                .description
                .clone()
                .or_else(|| inherited.and_then(|b| b.description.clone())),
            reference: self
                .local
                .reference
                .clone()
                .or_else(|| inherited.and_then(|b| b.reference.clone())),
            status: self
                .local
                .status
                .or_else(|| inherited.map(|b| b.status))
                .unwrap_or_default(),
            units: self
                .local
                .units
                .clone()
                .or_else(|| inherited.and_then(|b| b.units.clone())),
            default_value: self
                .local
                .default
                .as_ref()
                .map(|d| d.value.clone())
                .or_else(|| inherited.and_then(|b| b.default_value.clone())),
            base,
            payload,
        };

        if let Some(default) = &definition.default_value {
            if let Err(violation) = definition.validate_value(default) {
                let location = self
                    .local
                    .default
                    .as_ref()
                    .map(|d| d.source.clone())
                    .unwrap_or_else(|| self.type_location());
                return Err(TypeError::InvalidDefault {
                    location,
                    value: default.clone(),
                    reason: violation.to_string(),
                });
            }
        }

        debug!(
            name = %definition.qname,
            kind = %self.kind,
            depth = definition.depth(),
            path = %definition.path,
            "built type definition"
        );
        Ok(definition)
    }

    fn accumulator(&self, base: ConstraintSet) -> TypeConstraints {
        TypeConstraints::new(base, self.options)
    }

    fn integer_ranges(&self, kind: IntegerKind) -> Result<Vec<RangeConstraint>, TypeError> {
        let base_ranges = self
            .base
            .as_deref()
            .map(|b| b.ranges().to_vec())
            .unwrap_or_default();
        let mut acc = self.accumulator(ConstraintSet {
            ranges: base_ranges,
            ..ConstraintSet::default()
        });
        for decl in &self.local.ranges {
            let candidate = resolve_bounds(decl, acc.base_ranges(), |text| {
                kind.parse_value(text).map(Number::Integer)
            })?;
            acc.set_ranges(candidate, &decl.source)?;
        }
        Ok(acc.finish().ranges)
    }

    fn decimal_payload(&self) -> Result<TypePayload, TypeError> {
        let (fraction_digits, base_ranges, pending) = match self.base_payload() {
            Some(TypePayload::Decimal64 {
                fraction_digits,
                ranges,
            }) => (*fraction_digits, ranges.clone(), self.local.fraction_digits.as_slice()),
            _ => {
                let first = self.local.fraction_digits.first().ok_or_else(|| {
                    TypeError::MissingFractionDigits {
                        location: self.type_location(),
                    }
                })?;
                let mut root = self.accumulator(ConstraintSet::default());
                for decl in &self.local.fraction_digits {
                    root.set_fraction_digits(decl.value, &decl.source)?;
                }
                let digits = root.fraction_digits().unwrap_or(first.value);
                let invalid = |_| TypeError::InvalidFractionDigits {
                    location: first.source.clone(),
                    value: digits,
                };
                let full = ValueRange::new(
                    Decimal64::min_value_in(digits).map_err(invalid)?,
                    Decimal64::max_value_in(digits).map_err(invalid)?,
                );
                let ranges = vec![RangeConstraint::new(full, &StatementMeta::default())];
                (digits, ranges, &[][..])
            }
        };

        let mut acc = self.accumulator(ConstraintSet {
            ranges: base_ranges,
            fraction_digits: Some(fraction_digits),
            ..ConstraintSet::default()
        });
        for decl in pending {
            acc.set_fraction_digits(decl.value, &decl.source)?;
        }
        for decl in &self.local.ranges {
            let candidate = resolve_bounds(decl, acc.base_ranges(), |text| {
                let parsed = Decimal64::parse_canonical(text)?;
                parsed
                    .scale_to(fraction_digits, RoundingMode::Unnecessary)
                    .map(Number::Decimal)
                    .map_err(|err| CanonicalValueViolation::new(err.to_string()))
            })?;
            acc.set_ranges(candidate, &decl.source)?;
        }

        let finished = acc.finish();
        Ok(TypePayload::Decimal64 {
            fraction_digits: finished.fraction_digits.unwrap_or(fraction_digits),
            ranges: finished.ranges,
        })
    }

    fn narrowed_lengths(&self) -> Result<ConstraintSet, TypeError> {
        let base = self.base.as_deref();
        let mut acc = self.accumulator(ConstraintSet {
            lengths: base.map(|b| b.lengths().to_vec()).unwrap_or_default(),
            patterns: base.map(|b| b.patterns().to_vec()).unwrap_or_default(),
            ..ConstraintSet::default()
        });
        for decl in &self.local.lengths {
            let candidate: Vec<LengthConstraint> =
                resolve_bounds(decl, acc.base_lengths(), |text| {
                    Uint64::parse_canonical(text).map(|len| Number::Integer(i128::from(len)))
                })?;
            acc.set_lengths(candidate, &decl.source)?;
        }
        for decl in &self.local.patterns {
            let pattern = PatternConstraint::new(&decl.regex, decl.inverted, &decl.meta).map_err(
                |err| TypeError::InvalidPattern {
                    location: decl.source.clone(),
                    regex: decl.regex.clone(),
                    reason: err.to_string(),
                },
            )?;
            acc.add_pattern(pattern);
        }
        Ok(acc.finish())
    }

    fn string_payload(&self) -> Result<TypePayload, TypeError> {
        let finished = self.narrowed_lengths()?;
        Ok(TypePayload::String {
            lengths: finished.lengths,
            patterns: finished.patterns,
        })
    }

    fn bits(&self) -> Result<Vec<Bit>, TypeError> {
        match self.base_payload() {
            Some(TypePayload::Bits { bits }) => restrict_bits(bits, &self.local.bits),
            _ => root_bits(&self.local.bits, self.type_location()),
        }
    }

    fn enums(&self) -> Result<Vec<EnumPair>, TypeError> {
        match self.base_payload() {
            Some(TypePayload::Enumeration { values }) => restrict_enums(values, &self.local.enums),
            _ => root_enums(&self.local.enums, self.type_location()),
        }
    }

    fn identities(&self) -> Result<Vec<QName>, TypeError> {
        if !self.local.bases.is_empty() {
            return Ok(self.local.bases.iter().map(|b| b.value.clone()).collect());
        }
        match self.base_payload() {
            Some(TypePayload::Identityref { identities }) => Ok(identities.clone()),
            _ => Err(TypeError::MissingBase {
                location: self.type_location(),
            }),
        }
    }

    fn leafref_path(&self) -> Result<String, TypeError> {
        if let Some(second) = self.local.paths.get(1) {
            return Err(TypeError::MultipleConstraints {
                location: second.source.clone(),
                statement: "path",
            });
        }
        if let Some(local) = self.local.paths.first() {
            return Ok(local.value.clone());
        }
        match self.base_payload() {
            Some(TypePayload::Leafref { path, .. }) => Ok(path.clone()),
            _ => Err(TypeError::MissingPath {
                location: self.type_location(),
            }),
        }
    }

    fn require_instance(&self, default: bool) -> Result<bool, TypeError> {
        if let Some(second) = self.local.require_instance.get(1) {
            return Err(TypeError::MultipleConstraints {
                location: second.source.clone(),
                statement: "require-instance",
            });
        }
        let inherited = self.base.as_deref().and_then(TypeDefinition::require_instance);
        match (inherited, self.local.require_instance.first()) {
            (Some(true), Some(decl)) if !decl.value => Err(TypeError::RequireInstanceRelaxed {
                location: decl.source.clone(),
            }),
            (_, Some(decl)) => Ok(decl.value),
            (Some(value), None) => Ok(value),
            (None, None) => Ok(default),
        }
    }

    fn union_members(&self) -> Result<Vec<Arc<TypeDefinition>>, TypeError> {
        let local = &self.local.members;
        let base_members = match self.base_payload() {
            Some(TypePayload::Union { members }) => members,
            _ => {
                if local.is_empty() {
                    return Err(TypeError::EmptyUnion {
                        location: self.type_location(),
                    });
                }
                return Ok(local.iter().map(|m| Arc::clone(&m.value)).collect());
            }
        };
        if local.is_empty() {
            return Ok(base_members.clone());
        }
        if local.len() != base_members.len() {
            return Err(TypeError::UnionMemberMismatch {
                location: local[0].source.clone(),
                index: local.len().min(base_members.len()),
                reason: format!(
                    "{} member types declared, base union has {}",
                    local.len(),
                    base_members.len()
                ),
            });
        }
        for (index, (member, inherited)) in local.iter().zip(base_members).enumerate() {
            if !member.value.derives_from(inherited) {
                return Err(TypeError::UnionMemberMismatch {
                    location: member.source.clone(),
                    index,
                    reason: format!(
                        "{} does not derive from {}",
                        member.value.qname(),
                        inherited.qname()
                    ),
                });
            }
        }
        Ok(local.iter().map(|m| Arc::clone(&m.value)).collect())
    }
}

fn resolve_bounds<C, F>(decl: &Bounds, base: &[C], parse: F) -> Result<Vec<C>, TypeError>
where
    C: IntervalConstraint,
    F: Fn(&str) -> Result<Number, CanonicalValueViolation>,
{
    let lowest = base.first().map(|c| c.interval().min);
    let highest = base.last().map(|c| c.interval().max);
    let resolve = |arg: &BoundArg| -> Result<Number, TypeError> {
        let resolved = match arg {
            BoundArg::Min => lowest,
            BoundArg::Max => highest,
            BoundArg::Literal(text) => {
                return parse(text).map_err(|violation| TypeError::InvalidBound {
                    location: decl.source.clone(),
                    reason: format!("'{}': {}", text, violation),
                })
            }
        };
        resolved.ok_or_else(|| TypeError::InvalidBound {
            location: decl.source.clone(),
            reason: format!("'{}' has no base value to refer to", arg),
        })
    };

    decl.parts
        .iter()
        .map(|pair| {
            let interval = ValueRange {
                min: resolve(&pair.low)?,
                max: resolve(&pair.high)?,
            };
            Ok(C::new(interval, &decl.meta))
        })
        .collect()
}

fn merged_meta(local: &MemberMeta, inherited: &MemberMeta) -> MemberMeta {
    if *local == MemberMeta::default() {
        inherited.clone()
    } else {
        local.clone()
    }
}

fn restrict_bits(base: &[Bit], local: &[MemberDecl<u32>]) -> Result<Vec<Bit>, TypeError> {
    if local.is_empty() {
        return Ok(base.to_vec());
    }
    let mut seen = HashSet::new();
    local
        .iter()
        .map(|decl| {
            if !seen.insert(decl.name.as_str()) {
                return Err(TypeError::DuplicateName {
                    location: decl.source.clone(),
                    name: decl.name.clone(),
                });
            }
            let inherited = base
                .iter()
                .find(|bit| bit.name == decl.name)
                .ok_or_else(|| TypeError::UnknownBit {
                    location: decl.source.clone(),
                    name: decl.name.clone(),
                })?;
            if let Some(declared) = decl.value {
                if declared != inherited.position {
                    return Err(TypeError::BitPositionMismatch {
                        location: decl.source.clone(),
                        name: decl.name.clone(),
                        base: inherited.position,
                        declared,
                    });
                }
            }
            Ok(Bit {
                name: decl.name.clone(),
                position: inherited.position,
                meta: merged_meta(&decl.meta, &inherited.meta),
            })
        })
        .collect()
}

fn root_bits(local: &[MemberDecl<u32>], location: SourceRef) -> Result<Vec<Bit>, TypeError> {
    if local.is_empty() {
        return Err(TypeError::EmptyBits { location });
    }
    let mut names = HashSet::new();
    let mut positions: HashMap<u32, &str> = HashMap::new();
    let mut next = Some(0u32);
    let mut bits = Vec::with_capacity(local.len());
    for decl in local {
        if !names.insert(decl.name.as_str()) {
            return Err(TypeError::DuplicateName {
                location: decl.source.clone(),
                name: decl.name.clone(),
            });
        }
        let position = decl.value.or(next).ok_or_else(|| TypeError::InvalidBound {
            location: decl.source.clone(),
            reason: format!("no position left for bit '{}'", decl.name),
        })?;
        if let Some(other) = positions.insert(position, &decl.name) {
            return Err(TypeError::DuplicatePosition {
                location: decl.source.clone(),
                position,
                other: other.to_string(),
            });
        }
        let following = position.checked_add(1);
        next = match (next, following) {
            (Some(current), Some(candidate)) => Some(current.max(candidate)),
            _ => None,
        };
        bits.push(Bit {
            name: decl.name.clone(),
            position,
            meta: decl.meta.clone(),
        });
    }
    Ok(bits)
}

fn restrict_enums(base: &[EnumPair], local: &[MemberDecl<i32>]) -> Result<Vec<EnumPair>, TypeError> {
    if local.is_empty() {
        return Ok(base.to_vec());
    }
    let mut seen = HashSet::new();
    local
        .iter()
        .map(|decl| {
            if !seen.insert(decl.name.as_str()) {
                return Err(TypeError::DuplicateName {
                    location: decl.source.clone(),
                    name: decl.name.clone(),
                });
            }
            let inherited = base
                .iter()
                .find(|pair| pair.name == decl.name)
                .ok_or_else(|| TypeError::UnknownEnum {
                    location: decl.source.clone(),
                    name: decl.name.clone(),
                })?;
            if let Some(declared) = decl.value {
                if declared != inherited.value {
                    return Err(TypeError::EnumValueMismatch {
                        location: decl.source.clone(),
                        name: decl.name.clone(),
                        base: inherited.value,
                        declared,
                    });
                }
            }
            Ok(EnumPair {
                name: decl.name.clone(),
                value: inherited.value,
                meta: merged_meta(&decl.meta, &inherited.meta),
            })
        })
        .collect()
}

fn root_enums(local: &[MemberDecl<i32>], location: SourceRef) -> Result<Vec<EnumPair>, TypeError> {
    if local.is_empty() {
        return Err(TypeError::EmptyEnumeration { location });
    }
    let mut names = HashSet::new();
    let mut values: HashMap<i32, &str> = HashMap::new();
    let mut highest: Option<i32> = None;
    let mut pairs = Vec::with_capacity(local.len());
    for decl in local {
        if decl.name.is_empty() || decl.name.trim() != decl.name {
            return Err(TypeError::InvalidBound {
                location: decl.source.clone(),
                reason: format!("enum name '{}' must be non-empty without surrounding whitespace", decl.name),
            });
        }
        if !names.insert(decl.name.as_str()) {
            return Err(TypeError::DuplicateName {
                location: decl.source.clone(),
                name: decl.name.clone(),
            });
        }
        let value = match (decl.value, highest) {
            (Some(value), _) => value,
            (None, None) => 0,
            (None, Some(max)) => max.checked_add(1).ok_or_else(|| TypeError::InvalidBound {
                location: decl.source.clone(),
                reason: format!("no value left for enum '{}'", decl.name),
            })?,
        };
        if let Some(other) = values.insert(value, &decl.name) {
            return Err(TypeError::DuplicateValue {
                location: decl.source.clone(),
                value,
                other: other.to_string(),
            });
        }
        highest = Some(highest.map_or(value, |max| max.max(value)));
        pairs.push(EnumPair {
            name: decl.name.clone(),
            value,
            meta: decl.meta.clone(),
        });
    }
    Ok(pairs)
}

/// Derives a new type from `base`.
pub fn derive(
    base: &Arc<TypeDefinition>,
    statements: Vec<Statement>,
    path: SchemaPath,
) -> Result<Arc<TypeDefinition>, TypeError> {
    TypeBuilder::new(Arc::clone(base), statements, path).build()
}

/// Like [`derive`], with explicit options.
pub fn derive_with(
    base: &Arc<TypeDefinition>,
    statements: Vec<Statement>,
    path: SchemaPath,
    options: DerivationOptions,
) -> Result<Arc<TypeDefinition>, TypeError> {
    TypeBuilder::new(Arc::clone(base), statements, path)
        .with_options(options)
        .build()
}

/// Applies `statements` directly to a built-in type, as in
/// `type decimal64 { fraction-digits 2; }`.
pub fn build_builtin(
    kind: BuiltinKind,
    statements: Vec<Statement>,
    path: SchemaPath,
) -> Result<Arc<TypeDefinition>, TypeError> {
    TypeBuilder::builtin(kind, statements, path).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::by_name;

    fn src(line: u32) -> SourceRef {
        SourceRef::new(format!("test.yang:{}", line))
    }

    fn range(text: &str, line: u32) -> Statement {
        Statement::new(
            StatementKind::Range {
                parts: BoundPair::parse_list(text).unwrap(),
                meta: StatementMeta::default(),
            },
            src(line),
        )
    }

    fn path(name: &str) -> SchemaPath {
        SchemaPath::root().push_step(QName::create("urn:test", None, name).unwrap())
    }

    #[test]
    fn build_is_memoized() {
        let builder = TypeBuilder::new(by_name("int8").unwrap(), vec![range("1..5", 1)], path("small"));
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.qname().local_name.as_str(), "small");
    }

    #[test]
    fn min_and_max_resolve_against_base() {
        let base = derive(&by_name("int32").unwrap(), vec![range("10..20 | 30..40", 1)], path("a")).unwrap();
        let derived = derive(&base, vec![range("min..12 | 35..max", 2)], path("b")).unwrap();
        let rendered: Vec<String> = derived.ranges().iter().map(|r| r.interval.to_string()).collect();
        assert_eq!(rendered, ["10..12", "35..40"]);
    }

    #[test]
    fn unsupported_statement_is_rejected() {
        let err = derive(&by_name("boolean").unwrap(), vec![range("1..2", 7)], path("x")).unwrap_err();
        assert_eq!(
            err,
            TypeError::UnsupportedStatement {
                location: src(7),
                statement: "range",
                kind: "boolean"
            }
        );
    }

    #[test]
    fn literal_outside_kind_is_invalid_bound() {
        let err = derive(&by_name("uint8").unwrap(), vec![range("0..300", 3)], path("x")).unwrap_err();
        assert!(matches!(err, TypeError::InvalidBound { .. }), "{:?}", err);
        assert_eq!(err.location(), &src(3));
    }

    #[test]
    fn enum_auto_values_follow_highest() {
        let decl = |name: &str, value: Option<i32>| MemberDecl {
            name: name.to_string(),
            value,
            meta: MemberMeta::default(),
            source: src(1),
        };
        let pairs = root_enums(&[decl("a", None), decl("b", Some(10)), decl("c", None)], src(0)).unwrap();
        let values: Vec<i32> = pairs.iter().map(|p| p.value).collect();
        assert_eq!(values, [0, 10, 11]);
        assert!(matches!(
            root_enums(&[decl("a", Some(i32::MAX)), decl("b", None)], src(0)),
            Err(TypeError::InvalidBound { .. })
        ));
    }
}
