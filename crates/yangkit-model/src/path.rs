use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::race::OnceBox;
use yangkit_common::QName;

/// Location of a type in the schema tree, as a sequence of names.
///
/// The string form is rendered on first use and published lock-free; racing
/// threads may each render it but all observe the same stored value.
pub struct SchemaPath {
    steps: Vec<QName>,
    absolute: bool,
    rendered: OnceBox<String>,
}

impl SchemaPath {
    /// The absolute root path.
    pub fn root() -> Self {
        Self::new(Vec::new(), true)
    }

    /// Creates a path from its steps.
    pub fn new(steps: Vec<QName>, absolute: bool) -> Self {
        Self {
            steps,
            absolute,
            rendered: OnceBox::new(),
        }
    }

    /// Returns a child path with one more step.
    pub fn push_step(&self, step: QName) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self::new(steps, self.absolute)
    }

    /// Path steps, outermost first.
    pub fn steps(&self) -> &[QName] {
        &self.steps
    }

    /// Whether the path starts at the schema root.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Innermost step, if any.
    pub fn last(&self) -> Option<&QName> {
        self.steps.last()
    }

    /// Cached string form: local names joined by `/`.
    pub fn as_str(&self) -> &str {
        self.rendered.get_or_init(|| Box::new(self.render()))
    }

    fn render(&self) -> String {
        let joined = self
            .steps
            .iter()
            .map(|step| step.local_name.as_str())
            .collect::<Vec<_>>()
            .join("/");
        if self.absolute {
            format!("/{}", joined)
        } else {
            joined
        }
    }
}

impl Clone for SchemaPath {
    fn clone(&self) -> Self {
        Self::new(self.steps.clone(), self.absolute)
    }
}

impl PartialEq for SchemaPath {
    fn eq(&self, other: &Self) -> bool {
        self.absolute == other.absolute && self.steps == other.steps
    }
}

impl Eq for SchemaPath {}

impl Hash for SchemaPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.absolute.hash(state);
        self.steps.hash(state);
    }
}

impl fmt::Debug for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaPath")
            .field("steps", &self.steps)
            .field("absolute", &self.absolute)
            .finish()
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use yangkit_common::Identifier;

    fn qname(local: &str) -> QName {
        QName::create("urn:example:paths", None, local).unwrap()
    }

    #[test]
    fn renders_local_names() {
        let path = SchemaPath::root().push_step(qname("cont")).push_step(qname("leaf"));
        assert_eq!(path.to_string(), "/cont/leaf");
        let relative = SchemaPath::new(vec![qname("a")], false);
        assert_eq!(relative.as_str(), "a");
        assert_eq!(SchemaPath::root().as_str(), "/");
    }

    #[test]
    fn clone_and_equality_ignore_cache() {
        let path = SchemaPath::root().push_step(qname("x"));
        let _ = path.as_str();
        let copy = path.clone();
        assert_eq!(copy, path);
        assert_ne!(copy, SchemaPath::new(vec![qname("x")], false));
        assert_eq!(
            copy.last().map(|q| q.local_name.clone()),
            Some(Identifier::parse("x").unwrap())
        );
    }

    #[test]
    fn concurrent_rendering_publishes_one_value() {
        let path = Arc::new(SchemaPath::root().push_step(qname("shared")));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let path = Arc::clone(&path);
                thread::spawn(move || path.as_str().to_string())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "/shared");
        }
        let first = path.as_str() as *const str;
        assert_eq!(first, path.as_str() as *const str);
    }
}
