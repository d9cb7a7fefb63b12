use proptest::prelude::*;
use yangkit_common::QName;
use yangkit_model::{by_name, derive, BoundPair, SchemaPath, Statement, StatementKind, StatementMeta, TypeError};

fn path() -> SchemaPath {
    SchemaPath::root().push_step(QName::create("urn:example:props", None, "t").unwrap())
}

fn range(text: &str) -> Vec<Statement> {
    vec![Statement::new(
        StatementKind::Range {
            parts: BoundPair::parse_list(text).unwrap(),
            meta: StatementMeta::default(),
        },
        "props.yang:1",
    )]
}

proptest! {
    #[test]
    fn contained_intervals_are_accepted(a in -1000i64..1000, b in -1000i64..1000) {
        let base = derive(&by_name("int32").unwrap(), range("-1000..1000"), path()).unwrap();
        let (low, high) = (a.min(b), a.max(b));
        let derived = derive(&base, range(&format!("{}..{}", low, high)), path()).unwrap();
        prop_assert!(derived.validate_value(&low.to_string()).is_ok());
        prop_assert!(derived.validate_value(&high.to_string()).is_ok());
        prop_assert!(derived.validate_value(&(high + 1).to_string()).is_err());
    }

    #[test]
    fn escaping_intervals_are_rejected(low in -1000i64..1000, excess in 1i64..1000) {
        let base = derive(&by_name("int32").unwrap(), range("-1000..1000"), path()).unwrap();
        let err = derive(&base, range(&format!("{}..{}", low, 1000 + excess)), path()).unwrap_err();
        let is_narrowing = matches!(err, TypeError::NarrowingViolated { .. });
        prop_assert!(is_narrowing);
    }
}
