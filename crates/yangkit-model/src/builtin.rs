//! Registry of built-in type singletons.
//!
//! Kinds that need arguments (`decimal64`, `enumeration`, `bits`, `union`,
//! `leafref`, `identityref`) have no singleton; they are rooted by
//! [`build_builtin`](crate::derive::build_builtin).

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::trace;
use yangkit_common::{Identifier, QName, XmlNamespace};

use crate::constraints::{
    IntervalConstraint, LengthConstraint, Number, RangeConstraint, ValueRange,
};
use crate::definition::{BuiltinKind, IntegerKind, TypeDefinition, TypePayload};
use crate::path::SchemaPath;
use crate::statements::{StatementMeta, Status};

/// Namespace of the YANG language itself, used for built-in type names.
pub const YANG_NAMESPACE: &str = "urn:ietf:params:xml:ns:yang:1";

/// Qualified name of a built-in type.
pub fn builtin_qname(kind: BuiltinKind) -> QName {
    QName {
        namespace: XmlNamespace::new(YANG_NAMESPACE),
        revision: None,
        local_name: Identifier::new(kind.name()),
    }
}

fn full_length() -> Vec<LengthConstraint> {
    vec![LengthConstraint::new(
        ValueRange::new(0, i128::from(u64::MAX)),
        &StatementMeta::default(),
    )]
}

fn full_range(kind: IntegerKind) -> Vec<RangeConstraint> {
    vec![RangeConstraint::new(
        ValueRange::new(Number::Integer(kind.min()), Number::Integer(kind.max())),
        &StatementMeta::default(),
    )]
}

fn make(kind: BuiltinKind, payload: TypePayload) -> Arc<TypeDefinition> {
    let qname = builtin_qname(kind);
    Arc::new(TypeDefinition {
        path: SchemaPath::root().push_step(qname.clone()),
        qname,
        base: None,
        description: None,
        reference: None,
        status: Status::Current,
        units: None,
        default_value: None,
        payload,
    })
}

struct Registry {
    binary: Arc<TypeDefinition>,
    boolean: Arc<TypeDefinition>,
    empty: Arc<TypeDefinition>,
    instance_identifier: Arc<TypeDefinition>,
    integers: HashMap<IntegerKind, Arc<TypeDefinition>>,
    string: Arc<TypeDefinition>,
}

impl Registry {
    fn new() -> Self {
        let integers = IntegerKind::ALL
            .into_iter()
            .map(|int| {
                let payload = TypePayload::Integer {
                    kind: int,
                    ranges: full_range(int),
                };
                (int, make(BuiltinKind::Integer(int), payload))
            })
            .collect();
        trace!("initialized built-in type registry");
        Self {
            binary: make(
                BuiltinKind::Binary,
                TypePayload::Binary {
                    lengths: full_length(),
                },
            ),
            boolean: make(BuiltinKind::Boolean, TypePayload::Boolean),
            empty: make(BuiltinKind::Empty, TypePayload::Empty),
            instance_identifier: make(
                BuiltinKind::InstanceIdentifier,
                TypePayload::InstanceIdentifier {
                    require_instance: false,
                },
            ),
            integers,
            string: make(
                BuiltinKind::String,
                TypePayload::String {
                    lengths: full_length(),
                    patterns: Vec::new(),
                },
            ),
        }
    }
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

/// The shared singleton of a built-in kind, if it has one.
pub fn singleton(kind: BuiltinKind) -> Option<Arc<TypeDefinition>> {
    let registry = registry();
    match kind {
        BuiltinKind::Binary => Some(Arc::clone(&registry.binary)),
        BuiltinKind::Boolean => Some(Arc::clone(&registry.boolean)),
        BuiltinKind::Empty => Some(Arc::clone(&registry.empty)),
        BuiltinKind::InstanceIdentifier => Some(Arc::clone(&registry.instance_identifier)),
        BuiltinKind::Integer(int) => registry.integers.get(&int).cloned(),
        BuiltinKind::String => Some(Arc::clone(&registry.string)),
        BuiltinKind::Bits
        | BuiltinKind::Decimal64
        | BuiltinKind::Enumeration
        | BuiltinKind::Identityref
        | BuiltinKind::Leafref
        | BuiltinKind::Union => None,
    }
}

/// The singleton named by a YANG keyword such as `"int16"`.
pub fn by_name(name: &str) -> Option<Arc<TypeDefinition>> {
    BuiltinKind::from_name(name).and_then(singleton)
}

/// `binary`
pub fn binary_type() -> Arc<TypeDefinition> {
    Arc::clone(&registry().binary)
}

/// `boolean`
pub fn boolean_type() -> Arc<TypeDefinition> {
    Arc::clone(&registry().boolean)
}

/// `empty`
pub fn empty_type() -> Arc<TypeDefinition> {
    Arc::clone(&registry().empty)
}

/// `instance-identifier`
pub fn instance_identifier_type() -> Arc<TypeDefinition> {
    Arc::clone(&registry().instance_identifier)
}

/// `string`
pub fn string_type() -> Arc<TypeDefinition> {
    Arc::clone(&registry().string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_are_shared() {
        let a = by_name("int16").unwrap();
        let b = singleton(BuiltinKind::Integer(IntegerKind::Int16)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.base().is_none());
        assert_eq!(a.qname().to_string(), "(urn:ietf:params:xml:ns:yang:1)int16");
        assert_eq!(a.path().as_str(), "/int16");
    }

    #[test]
    fn intrinsic_ranges() {
        let int16 = by_name("int16").unwrap();
        let range = &int16.ranges()[0].interval;
        assert_eq!(range.min, Number::Integer(-32768));
        assert_eq!(range.max, Number::Integer(32767));

        let uint64 = by_name("uint64").unwrap();
        assert_eq!(uint64.ranges()[0].interval.max, Number::Integer(i128::from(u64::MAX)));
        assert_eq!(string_type().lengths()[0].interval.min, Number::Integer(0));
    }

    #[test]
    fn argument_kinds_have_no_singleton() {
        for name in ["decimal64", "enumeration", "bits", "union", "leafref", "identityref"] {
            assert!(by_name(name).is_none(), "{}", name);
        }
        assert!(by_name("int128").is_none());
        assert_eq!(instance_identifier_type().require_instance(), Some(false));
        assert_eq!(binary_type().kind(), BuiltinKind::Binary);
        assert_eq!(boolean_type().kind(), BuiltinKind::Boolean);
        assert_eq!(empty_type().kind(), BuiltinKind::Empty);
    }
}
