//! Typedef command implementation.
//!
//! Input is a JSON document standing in for a parsed module:
//!
//! ```json
//! {
//!   "module": { "name": "example", "namespace": "urn:example", "revision": "2024-03-01" },
//!   "typedefs": [
//!     { "name": "percent", "type": "decimal64", "fraction-digits": 2, "range": "0..100" },
//!     { "name": "small-percent", "type": "percent", "range": "0..10", "default": "5" }
//!   ]
//! }
//! ```
//!
//! A typedef may only refer to built-in types and to typedefs declared
//! before it.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;
use yangkit_common::{CanonicalValueViolation, Identifier, QName, ValueError, YangName};
use yangkit_model::{
    BoundPair, BuiltinKind, DerivationOptions, MemberMeta, SchemaPath, SourceRef, Statement,
    StatementKind, StatementMeta, Status, TypeBuilder, TypeDefinition, TypeError,
};

use crate::commands::read_input;
use crate::output;

/// Errors raised while turning a document into type definitions.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document is not valid JSON or has the wrong shape.
    #[error("Invalid typedef document: {0}")]
    Json(#[from] serde_json::Error),
    /// A module or typedef name is malformed.
    #[error("Invalid name: {0}")]
    Name(#[from] ValueError),
    /// A typedef refers to a type that is neither built in nor declared earlier.
    #[error("typedef {typedef}: unknown type '{name}'")]
    UnknownType {
        /// Referring typedef.
        typedef: String,
        /// Unresolved name.
        name: String,
    },
    /// Two typedefs share a name.
    #[error("typedef {0} is declared more than once")]
    DuplicateTypedef(String),
    /// A typedef reuses a built-in type name.
    #[error("typedef {0} shadows a built-in type")]
    ReservedName(String),
    /// A union member names a built-in type that needs arguments.
    #[error("typedef {typedef}: member type {name} cannot be used without restrictions")]
    IncompleteMember {
        /// Referring typedef.
        typedef: String,
        /// Member type name.
        name: String,
    },
    /// A `range` or `length` argument does not parse.
    #[error("typedef {typedef}: invalid {keyword} '{argument}': {reason}")]
    Restriction {
        /// Referring typedef.
        typedef: String,
        /// Statement keyword.
        keyword: &'static str,
        /// Declared argument.
        argument: String,
        /// Parse failure.
        reason: CanonicalValueViolation,
    },
    /// Derivation rejected the typedef.
    #[error("typedef {typedef}: {source}")]
    Type {
        /// Failing typedef.
        typedef: String,
        /// Structural error.
        source: TypeError,
    },
    /// `--name` selects a typedef the document does not declare.
    #[error("typedef {0} is not declared in the document")]
    NotDeclared(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    module: ModuleDecl,
    #[serde(default)]
    typedefs: Vec<TypedefDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleDecl {
    name: String,
    namespace: String,
    #[serde(default)]
    revision: Option<String>,
}

/// `"1..10"` or `{ "value": "1..10", "error-message": "..." }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RestrictionDecl {
    Plain(String),
    Detailed {
        value: String,
        #[serde(flatten)]
        meta: StatementMeta,
    },
}

impl RestrictionDecl {
    fn into_parts(self) -> (String, StatementMeta) {
        match self {
            RestrictionDecl::Plain(value) => (value, StatementMeta::default()),
            RestrictionDecl::Detailed { value, meta } => (value, meta),
        }
    }
}

/// `"[a-z]+"` or `{ "regex": "[a-z]+", "invert-match": true }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternDecl {
    Plain(String),
    Detailed {
        regex: String,
        #[serde(default, rename = "invert-match")]
        invert_match: bool,
        #[serde(flatten)]
        meta: StatementMeta,
    },
}

#[derive(Debug, Deserialize)]
struct BitDecl {
    name: String,
    #[serde(default)]
    position: Option<u32>,
    #[serde(flatten)]
    meta: MemberMeta,
}

#[derive(Debug, Deserialize)]
struct EnumDecl {
    name: String,
    #[serde(default)]
    value: Option<i32>,
    #[serde(flatten)]
    meta: MemberMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TypedefDecl {
    name: String,
    #[serde(rename = "type")]
    base: String,
    #[serde(default)]
    range: Option<RestrictionDecl>,
    #[serde(default)]
    length: Option<RestrictionDecl>,
    #[serde(default)]
    patterns: Vec<PatternDecl>,
    #[serde(default)]
    fraction_digits: Option<u8>,
    #[serde(default)]
    bases: Vec<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    require_instance: Option<bool>,
    #[serde(default)]
    bits: Vec<BitDecl>,
    #[serde(default)]
    enums: Vec<EnumDecl>,
    #[serde(default)]
    members: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    units: Option<String>,
    #[serde(default)]
    default: Option<String>,
}

/// Derived typedefs, in document order.
pub struct Derived {
    order: Vec<String>,
    types: HashMap<String, Arc<TypeDefinition>>,
}

impl Derived {
    /// Looks a typedef up by name.
    pub fn get(&self, name: &str) -> Option<&Arc<TypeDefinition>> {
        self.types.get(name)
    }

    /// Typedefs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDefinition>> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }
}

struct Resolver<'a> {
    origin: &'a str,
    module: QName,
    types: HashMap<String, Arc<TypeDefinition>>,
}

impl Resolver<'_> {
    fn source(&self, typedef: &str, keyword: &str) -> SourceRef {
        SourceRef::new(format!("{}:{}/{}", self.origin, typedef, keyword))
    }

    fn lookup(&self, typedef: &str, name: &str) -> Result<Reference, DocumentError> {
        // prefixes are accepted but not resolved: every name is local
        let local = name.rsplit(':').next().unwrap_or(name);
        if let Some(found) = self.types.get(local) {
            return Ok(Reference::Typedef(Arc::clone(found)));
        }
        match BuiltinKind::from_name(local) {
            Some(kind) => Ok(Reference::Builtin(kind)),
            None => Err(DocumentError::UnknownType {
                typedef: typedef.to_string(),
                name: name.to_string(),
            }),
        }
    }

    fn member(&self, typedef: &str, name: &str) -> Result<Arc<TypeDefinition>, DocumentError> {
        match self.lookup(typedef, name)? {
            Reference::Typedef(found) => Ok(found),
            Reference::Builtin(kind) => {
                yangkit_model::singleton(kind).ok_or_else(|| DocumentError::IncompleteMember {
                    typedef: typedef.to_string(),
                    name: name.to_string(),
                })
            }
        }
    }

    fn bounds(
        &self,
        typedef: &str,
        keyword: &'static str,
        decl: RestrictionDecl,
    ) -> Result<(Vec<BoundPair>, StatementMeta), DocumentError> {
        let (argument, meta) = decl.into_parts();
        let parts = BoundPair::parse_list(&argument).map_err(|reason| {
            DocumentError::Restriction {
                typedef: typedef.to_string(),
                keyword,
                argument: argument.clone(),
                reason,
            }
        })?;
        Ok((parts, meta))
    }

    fn statements(&self, decl: TypedefDecl) -> Result<Vec<Statement>, DocumentError> {
        let name = decl.name.as_str();
        let mut statements = Vec::new();
        let mut push = |kind: StatementKind, resolver: &Self| {
            let source = resolver.source(name, kind.keyword());
            statements.push(Statement::new(kind, source));
        };

        if let Some(digits) = decl.fraction_digits {
            push(StatementKind::FractionDigits(digits), self);
        }
        if let Some(range) = decl.range {
            let (parts, meta) = self.bounds(name, "range", range)?;
            push(StatementKind::Range { parts, meta }, self);
        }
        if let Some(length) = decl.length {
            let (parts, meta) = self.bounds(name, "length", length)?;
            push(StatementKind::Length { parts, meta }, self);
        }
        for pattern in decl.patterns {
            let kind = match pattern {
                PatternDecl::Plain(regex) => StatementKind::Pattern {
                    regex,
                    inverted: false,
                    meta: StatementMeta::default(),
                },
                PatternDecl::Detailed {
                    regex,
                    invert_match,
                    meta,
                } => StatementKind::Pattern {
                    regex,
                    inverted: invert_match,
                    meta,
                },
            };
            push(kind, self);
        }
        for base in &decl.bases {
            let parsed: YangName = base.parse()?;
            let module = self.module.clone();
            let qname = parsed
                .resolve(|_| Some(module))
                .ok_or_else(|| DocumentError::UnknownType {
                    typedef: name.to_string(),
                    name: base.clone(),
                })?;
            push(StatementKind::Base(qname), self);
        }
        if let Some(path) = decl.path {
            push(StatementKind::Path(path), self);
        }
        if let Some(required) = decl.require_instance {
            push(StatementKind::RequireInstance(required), self);
        }
        for bit in decl.bits {
            push(
                StatementKind::Bit {
                    name: bit.name,
                    position: bit.position,
                    meta: bit.meta,
                },
                self,
            );
        }
        for value in decl.enums {
            push(
                StatementKind::Enum {
                    name: value.name,
                    value: value.value,
                    meta: value.meta,
                },
                self,
            );
        }
        for member in &decl.members {
            push(StatementKind::Member(self.member(name, member)?), self);
        }
        if let Some(text) = decl.description {
            push(StatementKind::Description(text), self);
        }
        if let Some(text) = decl.reference {
            push(StatementKind::Reference(text), self);
        }
        if let Some(status) = decl.status {
            push(StatementKind::Status(status), self);
        }
        if let Some(text) = decl.units {
            push(StatementKind::Units(text), self);
        }
        if let Some(value) = decl.default {
            push(StatementKind::Default(value), self);
        }
        Ok(statements)
    }
}

enum Reference {
    Builtin(BuiltinKind),
    Typedef(Arc<TypeDefinition>),
}

/// Derives every typedef of a JSON document.
///
/// `origin` names the document in error locations.
pub fn derive_document(
    text: &str,
    origin: &str,
    options: DerivationOptions,
) -> Result<Derived, DocumentError> {
    let document: Document = serde_json::from_str(text)?;
    let module = QName::create(
        &document.module.namespace,
        document.module.revision.as_deref(),
        &document.module.name,
    )?;
    let mut resolver = Resolver {
        origin,
        module,
        types: HashMap::new(),
    };
    let mut order = Vec::with_capacity(document.typedefs.len());

    for decl in document.typedefs {
        let name = decl.name.clone();
        if BuiltinKind::from_name(&name).is_some() {
            return Err(DocumentError::ReservedName(name));
        }
        if resolver.types.contains_key(&name) {
            return Err(DocumentError::DuplicateTypedef(name));
        }

        let path = SchemaPath::root().push_step(resolver.module.bind_to(Identifier::parse(&name)?));
        let reference = resolver.lookup(&name, &decl.base)?;
        let statements = resolver.statements(decl)?;
        let builder = match reference {
            Reference::Builtin(kind) => TypeBuilder::builtin(kind, statements, path),
            Reference::Typedef(base) => TypeBuilder::new(base, statements, path),
        };
        let built = builder
            .with_options(options)
            .build()
            .map_err(|source| DocumentError::Type {
                typedef: name.clone(),
                source,
            })?;

        debug!(typedef = %name, kind = %built.kind(), "derived typedef");
        resolver.types.insert(name.clone(), built);
        order.push(name);
    }

    Ok(Derived {
        order,
        types: resolver.types,
    })
}

pub fn run(
    input: Option<String>,
    strict: bool,
    name: Option<String>,
    check: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input.as_deref())?;
    let origin = input.as_deref().unwrap_or("<stdin>");
    let options = DerivationOptions {
        strict_fraction_digits: strict,
    };
    let derived = derive_document(&text, origin, options)?;

    let selected: Vec<&Arc<TypeDefinition>> = match &name {
        Some(name) => vec![derived
            .get(name)
            .ok_or_else(|| DocumentError::NotDeclared(name.clone()))?],
        None => derived.iter().collect(),
    };

    if let Some(value) = check {
        // clap guarantees --name, so exactly one typedef is selected
        for definition in &selected {
            definition
                .validate_value(&value)
                .map_err(|violation| format!("Invalid value '{}': {}", value, violation))?;
        }
        if json {
            println!("{}", output::format_json(&json!({ "value": value, "valid": true })));
        } else {
            println!("valid");
        }
        return Ok(());
    }

    if json {
        let summaries: Vec<_> = selected.iter().map(|def| def.summary()).collect();
        println!("{}", output::format_json(&serde_json::to_value(summaries)?));
    } else {
        output::print_table_header();
        for definition in selected {
            println!("{}", output::format_summary_row(&definition.summary()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "module": { "name": "example", "namespace": "urn:example", "revision": "2024-03-01" },
        "typedefs": [
            { "name": "percent", "type": "decimal64", "fraction-digits": 2, "range": "0..100" },
            { "name": "small", "type": "percent", "range": { "value": "0..10", "error-message": "too big" } },
            { "name": "either", "type": "union", "members": ["int8", "small"] },
            { "name": "flags", "type": "bits", "bits": [{ "name": "a" }, { "name": "b", "position": 3 }] }
        ]
    }"#;

    #[test]
    fn derives_in_document_order() {
        let derived = derive_document(DOC, "doc.json", DerivationOptions::default()).unwrap();
        let names: Vec<String> = derived
            .iter()
            .map(|def| def.qname().local_name.to_string())
            .collect();
        assert_eq!(names, ["percent", "small", "either", "flags"]);

        let small = derived.get("small").unwrap();
        assert!(small.derives_from(derived.get("percent").unwrap()));
        let violation = small.validate_value("11").unwrap_err();
        assert_eq!(violation.message.as_deref(), Some("too big"));
        assert!(derived.get("either").unwrap().validate_value("-3").is_ok());
    }

    #[test]
    fn forward_references_are_unknown() {
        let doc = r#"{
            "module": { "name": "m", "namespace": "urn:m" },
            "typedefs": [
                { "name": "a", "type": "b" },
                { "name": "b", "type": "string" }
            ]
        }"#;
        let err = derive_document(doc, "doc.json", DerivationOptions::default()).err().unwrap();
        assert!(matches!(err, DocumentError::UnknownType { .. }), "{}", err);
    }

    #[test]
    fn type_errors_carry_statement_locations() {
        let doc = r#"{
            "module": { "name": "m", "namespace": "urn:m" },
            "typedefs": [
                { "name": "small", "type": "int8", "range": "0..10" },
                { "name": "wide", "type": "small", "range": "0..20" }
            ]
        }"#;
        let err = derive_document(doc, "doc.json", DerivationOptions::default()).err().unwrap();
        match err {
            DocumentError::Type { typedef, source } => {
                assert_eq!(typedef, "wide");
                assert_eq!(source.location().as_str(), "doc.json:wide/range");
            }
            other => panic!("unexpected {}", other),
        }
    }

    #[test]
    fn rejects_builtin_names_and_duplicates() {
        let doc = r#"{ "module": { "name": "m", "namespace": "urn:m" },
                       "typedefs": [{ "name": "string", "type": "string" }] }"#;
        assert!(matches!(
            derive_document(doc, "d", DerivationOptions::default()),
            Err(DocumentError::ReservedName(_))
        ));

        let doc = r#"{ "module": { "name": "m", "namespace": "urn:m" },
                       "typedefs": [{ "name": "a", "type": "string" }, { "name": "a", "type": "int8" }] }"#;
        assert!(matches!(
            derive_document(doc, "d", DerivationOptions::default()),
            Err(DocumentError::DuplicateTypedef(_))
        ));

        let doc = r#"{ "module": { "name": "m", "namespace": "urn:m" },
                       "typedefs": [{ "name": "u", "type": "union", "members": ["enumeration"] }] }"#;
        assert!(matches!(
            derive_document(doc, "d", DerivationOptions::default()),
            Err(DocumentError::IncompleteMember { .. })
        ));
    }
}
