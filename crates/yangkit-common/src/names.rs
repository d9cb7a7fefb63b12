use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::intern::{Interned, WeakInterner};
use crate::validation::ValueError;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Arc<str>);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: impl Into<Arc<str>>) -> Self {
                Self(value.into())
            }

            /// Parses a validated value from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValueError> {
                static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).expect("invalid regex"));
                let s = value.into();
                if !PATTERN.is_match(&s) {
                    return Err(ValueError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(Arc::from(s)))
            }

            /// The underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    Identifier,
    "YANG identifier (RFC 7950 section 6.2).",
    r"^[a-zA-Z_][a-zA-Z0-9_.-]*$"
);
newtype!(
    Revision,
    "Module revision date, `YYYY-MM-DD`.",
    r"^\d{4}-\d{2}-\d{2}$"
);
newtype!(
    XmlNamespace,
    "Module namespace URI; any non-empty string without whitespace.",
    r"^\S+$"
);

/// Fully resolved name: namespace, optional revision and local name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QName {
    /// Module namespace.
    pub namespace: XmlNamespace,
    /// Module revision, if the module declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<Revision>,
    /// Name within the module.
    pub local_name: Identifier,
}

impl QName {
    /// Validates and assembles a name.
    pub fn create(
        namespace: &str,
        revision: Option<&str>,
        local_name: &str,
    ) -> Result<Self, ValueError> {
        Ok(Self {
            namespace: XmlNamespace::parse(namespace)?,
            revision: revision.map(Revision::parse).transpose()?,
            local_name: Identifier::parse(local_name)?,
        })
    }

    /// Same module, different local name.
    pub fn bind_to(&self, local_name: Identifier) -> Self {
        Self {
            namespace: self.namespace.clone(),
            revision: self.revision.clone(),
            local_name,
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(rev) => write!(f, "({}?revision={}){}", self.namespace, rev, self.local_name),
            None => write!(f, "({}){}", self.namespace, self.local_name),
        }
    }
}

/// A name as it appears in a schema, resolved or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum YangName {
    /// Bound to a module namespace.
    Resolved(QName),
    /// `prefix:local-name`, prefix not yet resolved.
    Qualified {
        /// Module prefix.
        prefix: Identifier,
        /// Name within the module.
        local_name: Identifier,
    },
    /// Bare `local-name`.
    Unqualified {
        /// Name within the enclosing module.
        local_name: Identifier,
    },
}

impl YangName {
    /// The local name, whatever the variant.
    pub fn local_name(&self) -> &Identifier {
        match self {
            YangName::Resolved(qname) => &qname.local_name,
            YangName::Qualified { local_name, .. } | YangName::Unqualified { local_name } => {
                local_name
            }
        }
    }

    /// Resolves a prefix (or its absence) to a module; `Resolved` stays as is.
    pub fn resolve<F>(&self, lookup: F) -> Option<QName>
    where
        F: FnOnce(Option<&Identifier>) -> Option<QName>,
    {
        match self {
            YangName::Resolved(qname) => Some(qname.clone()),
            YangName::Qualified { prefix, local_name } => {
                lookup(Some(prefix)).map(|module| module.bind_to(local_name.clone()))
            }
            YangName::Unqualified { local_name } => {
                lookup(None).map(|module| module.bind_to(local_name.clone()))
            }
        }
    }
}

impl FromStr for YangName {
    type Err = ValueError;

    /// Parses `prefix:name` or `name`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((prefix, local)) => Ok(YangName::Qualified {
                prefix: Identifier::parse(prefix)?,
                local_name: Identifier::parse(local)?,
            }),
            None => Ok(YangName::Unqualified {
                local_name: Identifier::parse(s)?,
            }),
        }
    }
}

impl fmt::Display for YangName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YangName::Resolved(qname) => fmt::Display::fmt(qname, f),
            YangName::Qualified { prefix, local_name } => write!(f, "{}:{}", prefix, local_name),
            YangName::Unqualified { local_name } => f.write_str(local_name.as_str()),
        }
    }
}

impl From<QName> for YangName {
    fn from(qname: QName) -> Self {
        YangName::Resolved(qname)
    }
}

impl Interned for QName {
    fn intern(&self) -> Arc<Self> {
        static TABLE: OnceLock<WeakInterner<QName, QName>> = OnceLock::new();
        TABLE
            .get_or_init(WeakInterner::new)
            .intern_with(self.clone(), || self.clone())
    }
}

impl Interned for YangName {
    fn intern(&self) -> Arc<Self> {
        static TABLE: OnceLock<WeakInterner<YangName, YangName>> = OnceLock::new();
        TABLE
            .get_or_init(WeakInterner::new)
            .intern_with(self.clone(), || self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> QName {
        QName::create("urn:example:types", Some("2024-03-01"), "placeholder").unwrap()
    }

    #[test]
    fn identifiers_follow_yang_grammar() {
        assert!(Identifier::parse("interface-name").is_ok());
        assert!(Identifier::parse("_x.1").is_ok());
        assert!(Identifier::parse("1abc").is_err());
        assert!(Identifier::parse("").is_err());
        assert!(Revision::parse("2024-03-01").is_ok());
        assert!(Revision::parse("2024-3-1").is_err());
        assert!(XmlNamespace::parse("urn with space").is_err());
    }

    #[test]
    fn qname_display() {
        let q = module().bind_to(Identifier::parse("percent").unwrap());
        assert_eq!(q.to_string(), "(urn:example:types?revision=2024-03-01)percent");
        let bare = QName::create("urn:x", None, "y").unwrap();
        assert_eq!(bare.to_string(), "(urn:x)y");
    }

    #[test]
    fn yang_names_parse_and_resolve() {
        let qualified: YangName = "t:percent".parse().unwrap();
        let bare: YangName = "percent".parse().unwrap();
        assert_eq!(qualified.local_name().as_str(), "percent");
        assert_eq!(qualified.to_string(), "t:percent");
        assert!("t:".parse::<YangName>().is_err());

        let resolved = qualified
            .resolve(|prefix| {
                assert_eq!(prefix.map(Identifier::as_str), Some("t"));
                Some(module())
            })
            .unwrap();
        assert_eq!(resolved.local_name.as_str(), "percent");
        assert!(bare.resolve(|_| None).is_none());
    }

    #[test]
    fn interning_shares_equal_names() {
        let a: YangName = "a:b".parse().unwrap();
        let b: YangName = "a:b".parse().unwrap();
        let (ia, ib) = (a.intern(), b.intern());
        assert!(Arc::ptr_eq(&ia, &ib));
        let first = module().intern();
        let second = module().intern();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn serde_validates_on_input() {
        let json = serde_json::to_string(&module()).unwrap();
        let back: QName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, module());
        assert!(serde_json::from_str::<Identifier>(r#""9bad""#).is_err());
    }
}
