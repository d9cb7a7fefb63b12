//! Built type definitions.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Serialize, Serializer};
use yangkit_common::{
    CanonicalValue, CanonicalValueViolation, Decimal64, QName, RoundingMode, Uint16, Uint32,
    Uint64, Uint8, YangName,
};

use crate::constraints::{
    check_intervals, LengthConstraint, Number, PatternConstraint, RangeConstraint,
};
use crate::path::SchemaPath;
use crate::statements::{MemberMeta, Status};

/// Integer built-in types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerKind {
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `uint8`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
}

impl IntegerKind {
    /// Every integer kind.
    pub const ALL: [IntegerKind; 8] = [
        IntegerKind::Int8,
        IntegerKind::Int16,
        IntegerKind::Int32,
        IntegerKind::Int64,
        IntegerKind::Uint8,
        IntegerKind::Uint16,
        IntegerKind::Uint32,
        IntegerKind::Uint64,
    ];

    /// Smallest value of the kind.
    pub fn min(self) -> i128 {
        match self {
            IntegerKind::Int8 => i128::from(i8::MIN),
            IntegerKind::Int16 => i128::from(i16::MIN),
            IntegerKind::Int32 => i128::from(i32::MIN),
            IntegerKind::Int64 => i128::from(i64::MIN),
            IntegerKind::Uint8 | IntegerKind::Uint16 | IntegerKind::Uint32 | IntegerKind::Uint64 => 0,
        }
    }

    /// Largest value of the kind.
    pub fn max(self) -> i128 {
        match self {
            IntegerKind::Int8 => i128::from(i8::MAX),
            IntegerKind::Int16 => i128::from(i16::MAX),
            IntegerKind::Int32 => i128::from(i32::MAX),
            IntegerKind::Int64 => i128::from(i64::MAX),
            IntegerKind::Uint8 => i128::from(u8::MAX),
            IntegerKind::Uint16 => i128::from(u16::MAX),
            IntegerKind::Uint32 => i128::from(u32::MAX),
            IntegerKind::Uint64 => i128::from(u64::MAX),
        }
    }

    /// Whether the kind is one of `uint8` .. `uint64`.
    pub fn is_unsigned(self) -> bool {
        self.min() == 0
    }

    /// Parses a literal with the kind's own lexical rules.
    pub fn parse_value(self, text: &str) -> Result<i128, CanonicalValueViolation> {
        let value = match self {
            IntegerKind::Uint8 => i128::from(Uint8::parse_canonical(text)?),
            IntegerKind::Uint16 => i128::from(Uint16::parse_canonical(text)?),
            IntegerKind::Uint32 => i128::from(Uint32::parse_canonical(text)?),
            IntegerKind::Uint64 => i128::from(Uint64::parse_canonical(text)?),
            _ => text.parse::<i128>().map_err(|_| {
                CanonicalValueViolation::new(format!(
                    "'{}' is not a valid {}",
                    text,
                    BuiltinKind::from(self).name()
                ))
            })?,
        };
        if value < self.min() || value > self.max() {
            return CanonicalValueViolation::variant_of(format!(
                "Invalid range: {}, expected: [[{}..{}]].",
                value,
                self.min(),
                self.max()
            ));
        }
        Ok(value)
    }
}

/// YANG built-in types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    /// `binary`
    Binary,
    /// `bits`
    Bits,
    /// `boolean`
    Boolean,
    /// `decimal64`
    Decimal64,
    /// `empty`
    Empty,
    /// `enumeration`
    Enumeration,
    /// `identityref`
    Identityref,
    /// `instance-identifier`
    InstanceIdentifier,
    /// `int8` .. `uint64`
    Integer(IntegerKind),
    /// `leafref`
    Leafref,
    /// `string`
    String,
    /// `union`
    Union,
}

impl BuiltinKind {
    /// Every built-in kind.
    pub const ALL: [BuiltinKind; 19] = [
        BuiltinKind::Binary,
        BuiltinKind::Bits,
        BuiltinKind::Boolean,
        BuiltinKind::Decimal64,
        BuiltinKind::Empty,
        BuiltinKind::Enumeration,
        BuiltinKind::Identityref,
        BuiltinKind::InstanceIdentifier,
        BuiltinKind::Integer(IntegerKind::Int8),
        BuiltinKind::Integer(IntegerKind::Int16),
        BuiltinKind::Integer(IntegerKind::Int32),
        BuiltinKind::Integer(IntegerKind::Int64),
        BuiltinKind::Integer(IntegerKind::Uint8),
        BuiltinKind::Integer(IntegerKind::Uint16),
        BuiltinKind::Integer(IntegerKind::Uint32),
        BuiltinKind::Integer(IntegerKind::Uint64),
        BuiltinKind::Leafref,
        BuiltinKind::String,
        BuiltinKind::Union,
    ];

    /// YANG keyword.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::Binary => "binary",
            BuiltinKind::Bits => "bits",
            BuiltinKind::Boolean => "boolean",
            BuiltinKind::Decimal64 => "decimal64",
            BuiltinKind::Empty => "empty",
            BuiltinKind::Enumeration => "enumeration",
            BuiltinKind::Identityref => "identityref",
            BuiltinKind::InstanceIdentifier => "instance-identifier",
            BuiltinKind::Integer(IntegerKind::Int8) => "int8",
            BuiltinKind::Integer(IntegerKind::Int16) => "int16",
            BuiltinKind::Integer(IntegerKind::Int32) => "int32",
            BuiltinKind::Integer(IntegerKind::Int64) => "int64",
            BuiltinKind::Integer(IntegerKind::Uint8) => "uint8",
            BuiltinKind::Integer(IntegerKind::Uint16) => "uint16",
            BuiltinKind::Integer(IntegerKind::Uint32) => "uint32",
            BuiltinKind::Integer(IntegerKind::Uint64) => "uint64",
            BuiltinKind::Leafref => "leafref",
            BuiltinKind::String => "string",
            BuiltinKind::Union => "union",
        }
    }

    /// Looks a kind up by keyword.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl Serialize for BuiltinKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl From<IntegerKind> for BuiltinKind {
    fn from(kind: IntegerKind) -> Self {
        BuiltinKind::Integer(kind)
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `bit` of a `bits` type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Bit {
    /// Bit name.
    pub name: String,
    /// Assigned position.
    pub position: u32,
    /// Documentation.
    #[serde(flatten)]
    pub meta: MemberMeta,
}

/// An `enum` of an `enumeration` type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EnumPair {
    /// Enum name.
    pub name: String,
    /// Assigned value.
    pub value: i32,
    /// Documentation.
    #[serde(flatten)]
    pub meta: MemberMeta,
}

/// Kind-specific part of a type definition, with every restriction of the
/// chain already applied.
#[derive(Debug, Clone)]
pub enum TypePayload {
    /// `binary`
    Binary {
        /// Effective length intervals, in octets.
        lengths: Vec<LengthConstraint>,
    },
    /// `bits`
    Bits {
        /// Effective bits, in declaration order.
        bits: Vec<Bit>,
    },
    /// `boolean`
    Boolean,
    /// `decimal64`
    Decimal64 {
        /// Fraction digits, fixed at the chain root.
        fraction_digits: u8,
        /// Effective range intervals.
        ranges: Vec<RangeConstraint>,
    },
    /// `empty`
    Empty,
    /// `enumeration`
    Enumeration {
        /// Effective enums, in declaration order.
        values: Vec<EnumPair>,
    },
    /// `identityref`
    Identityref {
        /// Base identities.
        identities: Vec<QName>,
    },
    /// `instance-identifier`
    InstanceIdentifier {
        /// `require-instance`
        require_instance: bool,
    },
    /// `int8` .. `uint64`
    Integer {
        /// Integer width and signedness.
        kind: IntegerKind,
        /// Effective range intervals.
        ranges: Vec<RangeConstraint>,
    },
    /// `leafref`
    Leafref {
        /// XPath argument of `path`.
        path: String,
        /// `require-instance`
        require_instance: bool,
    },
    /// `string`
    String {
        /// Effective length intervals, in characters.
        lengths: Vec<LengthConstraint>,
        /// All patterns of the chain.
        patterns: Vec<PatternConstraint>,
    },
    /// `union`
    Union {
        /// Member types, in declaration order.
        members: Vec<Arc<TypeDefinition>>,
    },
}

impl TypePayload {
    /// Built-in kind of this payload.
    pub fn kind(&self) -> BuiltinKind {
        match self {
            TypePayload::Binary { .. } => BuiltinKind::Binary,
            TypePayload::Bits { .. } => BuiltinKind::Bits,
            TypePayload::Boolean => BuiltinKind::Boolean,
            TypePayload::Decimal64 { .. } => BuiltinKind::Decimal64,
            TypePayload::Empty => BuiltinKind::Empty,
            TypePayload::Enumeration { .. } => BuiltinKind::Enumeration,
            TypePayload::Identityref { .. } => BuiltinKind::Identityref,
            TypePayload::InstanceIdentifier { .. } => BuiltinKind::InstanceIdentifier,
            TypePayload::Integer { kind, .. } => BuiltinKind::Integer(*kind),
            TypePayload::Leafref { .. } => BuiltinKind::Leafref,
            TypePayload::String { .. } => BuiltinKind::String,
            TypePayload::Union { .. } => BuiltinKind::Union,
        }
    }
}

/// An immutable YANG type: a built-in root or one derivation step on top of
/// its `base`.
#[derive(Debug)]
pub struct TypeDefinition {
    pub(crate) qname: QName,
    pub(crate) path: SchemaPath,
    pub(crate) base: Option<Arc<TypeDefinition>>,
    pub(crate) description: Option<String>,
    pub(crate) reference: Option<String>,
    pub(crate) status: Status,
    pub(crate) units: Option<String>,
    pub(crate) default_value: Option<String>,
    pub(crate) payload: TypePayload,
}

impl TypeDefinition {
    /// Qualified name.
    pub fn qname(&self) -> &QName {
        &self.qname
    }

    /// Where the type is defined.
    pub fn path(&self) -> &SchemaPath {
        &self.path
    }

    /// Immediate base; `None` for built-in and root types.
    pub fn base(&self) -> Option<&Arc<TypeDefinition>> {
        self.base.as_ref()
    }

    /// Effective `description`.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Effective `reference`.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Effective `status`.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Effective `units`.
    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Effective `default`.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Kind-specific constraints.
    pub fn payload(&self) -> &TypePayload {
        &self.payload
    }

    /// Built-in kind at the root of the chain.
    pub fn kind(&self) -> BuiltinKind {
        self.payload.kind()
    }

    /// This type followed by every ancestor, nearest first.
    pub fn ancestry(&self) -> impl Iterator<Item = &TypeDefinition> {
        std::iter::successors(Some(self), |def| def.base.as_deref())
    }

    /// Number of derivation steps above the root.
    pub fn depth(&self) -> usize {
        self.ancestry().count() - 1
    }

    /// Whether `other` is this type or one of its ancestors.
    pub fn derives_from(&self, other: &TypeDefinition) -> bool {
        self.ancestry().any(|def| std::ptr::eq(def, other))
    }

    /// Effective range intervals, for numeric kinds.
    pub fn ranges(&self) -> &[RangeConstraint] {
        match &self.payload {
            TypePayload::Integer { ranges, .. } | TypePayload::Decimal64 { ranges, .. } => ranges,
            _ => &[],
        }
    }

    /// Effective length intervals, for string and binary.
    pub fn lengths(&self) -> &[LengthConstraint] {
        match &self.payload {
            TypePayload::String { lengths, .. } | TypePayload::Binary { lengths } => lengths,
            _ => &[],
        }
    }

    /// Every pattern of the chain, for string.
    pub fn patterns(&self) -> &[PatternConstraint] {
        match &self.payload {
            TypePayload::String { patterns, .. } => patterns,
            _ => &[],
        }
    }

    /// Fraction digits, for decimal64.
    pub fn fraction_digits(&self) -> Option<u8> {
        match &self.payload {
            TypePayload::Decimal64 {
                fraction_digits, ..
            } => Some(*fraction_digits),
            _ => None,
        }
    }

    /// `require-instance`, for leafref and instance-identifier.
    pub fn require_instance(&self) -> Option<bool> {
        match &self.payload {
            TypePayload::Leafref {
                require_instance, ..
            }
            | TypePayload::InstanceIdentifier { require_instance } => Some(*require_instance),
            _ => None,
        }
    }

    /// Checks whether `text` is a valid lexical value of this type.
    ///
    /// Leafref targets and identity derivation cannot be checked without the
    /// schema tree; for those only the lexical form is validated.
    pub fn validate_value(&self, text: &str) -> Result<(), CanonicalValueViolation> {
        match &self.payload {
            TypePayload::Binary { lengths } => {
                let decoded = STANDARD.decode(text.trim()).map_err(|err| {
                    CanonicalValueViolation::new(format!("invalid base64 value: {}", err))
                })?;
                check_intervals(lengths, &Number::Integer(decoded.len() as i128))
            }
            TypePayload::Bits { bits } => {
                let mut seen = HashSet::new();
                for name in text.split_whitespace() {
                    if !bits.iter().any(|bit| bit.name == name) {
                        return CanonicalValueViolation::variant_of(format!(
                            "'{}' is not a bit of this type",
                            name
                        ));
                    }
                    if !seen.insert(name) {
                        return CanonicalValueViolation::variant_of(format!(
                            "bit '{}' is set more than once",
                            name
                        ));
                    }
                }
                Ok(())
            }
            TypePayload::Boolean => match text {
                "true" | "false" => Ok(()),
                _ => CanonicalValueViolation::variant_of(format!(
                    "'{}' is not a valid boolean",
                    text
                )),
            },
            TypePayload::Decimal64 {
                fraction_digits,
                ranges,
            } => {
                let value = Decimal64::parse_canonical(text)?
                    .scale_to(*fraction_digits, RoundingMode::Unnecessary)
                    .map_err(|err| CanonicalValueViolation::new(err.to_string()))?;
                check_intervals(ranges, &Number::Decimal(value))
            }
            TypePayload::Empty => {
                CanonicalValueViolation::variant_of("empty type does not have a value")
            }
            TypePayload::Enumeration { values } => {
                if values.iter().any(|pair| pair.name == text) {
                    Ok(())
                } else {
                    CanonicalValueViolation::variant_of(format!(
                        "'{}' is not an enum of this type",
                        text
                    ))
                }
            }
            TypePayload::Identityref { .. } => text
                .parse::<YangName>()
                .map(|_| ())
                .map_err(CanonicalValueViolation::from),
            TypePayload::InstanceIdentifier { .. } => {
                if text.starts_with('/') {
                    Ok(())
                } else {
                    CanonicalValueViolation::variant_of(format!(
                        "'{}' is not an absolute instance identifier",
                        text
                    ))
                }
            }
            TypePayload::Integer { kind, ranges } => {
                let value = kind.parse_value(text)?;
                check_intervals(ranges, &Number::Integer(value))
            }
            TypePayload::Leafref { .. } => Ok(()),
            TypePayload::String { lengths, patterns } => {
                check_intervals(lengths, &Number::Integer(text.chars().count() as i128))?;
                patterns.iter().try_for_each(|pattern| pattern.check(text))
            }
            TypePayload::Union { members } => {
                let mut last = None;
                for member in members {
                    match member.validate_value(text) {
                        Ok(()) => return Ok(()),
                        Err(violation) => last = Some(violation),
                    }
                }
                Err(last.unwrap_or_else(|| CanonicalValueViolation::new("union has no members")))
            }
        }
    }

    /// Serializable snapshot of the effective type.
    pub fn summary(&self) -> TypeSummary {
        TypeSummary {
            name: self.qname.to_string(),
            kind: self.kind(),
            path: self.path.to_string(),
            base: self.base.as_ref().map(|b| b.qname.to_string()),
            depth: self.depth(),
            description: self.description.clone(),
            reference: self.reference.clone(),
            status: self.status,
            units: self.units.clone(),
            default: self.default_value.clone(),
            fraction_digits: self.fraction_digits(),
            ranges: self.ranges().to_vec(),
            lengths: self.lengths().to_vec(),
            patterns: self.patterns().to_vec(),
            require_instance: self.require_instance(),
            path_expression: match &self.payload {
                TypePayload::Leafref { path, .. } => Some(path.clone()),
                _ => None,
            },
            identities: match &self.payload {
                TypePayload::Identityref { identities } => {
                    identities.iter().map(ToString::to_string).collect()
                }
                _ => Vec::new(),
            },
            bits: match &self.payload {
                TypePayload::Bits { bits } => bits.clone(),
                _ => Vec::new(),
            },
            enums: match &self.payload {
                TypePayload::Enumeration { values } => values.clone(),
                _ => Vec::new(),
            },
            members: match &self.payload {
                TypePayload::Union { members } => {
                    members.iter().map(|m| m.qname.to_string()).collect()
                }
                _ => Vec::new(),
            },
        }
    }
}

/// Flattened, serializable view of a [`TypeDefinition`].
#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    /// Qualified name.
    pub name: String,
    /// Built-in kind.
    pub kind: BuiltinKind,
    /// Schema path.
    pub path: String,
    /// Immediate base name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Derivation steps above the root.
    pub depth: usize,
    /// Effective description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Effective reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Effective status.
    pub status: Status,
    /// Effective units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Effective default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Fraction digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraction_digits: Option<u8>,
    /// Range intervals.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<RangeConstraint>,
    /// Length intervals.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lengths: Vec<LengthConstraint>,
    /// Patterns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<PatternConstraint>,
    /// `require-instance`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_instance: Option<bool>,
    /// Leafref path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_expression: Option<String>,
    /// Identityref bases.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identities: Vec<String>,
    /// Bits.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bits: Vec<Bit>,
    /// Enums.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumPair>,
    /// Union member names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}
