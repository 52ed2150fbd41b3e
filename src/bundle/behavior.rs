//! Bundle definition — the unit of composable behavior.
//!
//! A `BehaviorBundle` pairs descriptive metadata (namespaced id, version,
//! description, tags) with an ordered table of named operations. Bundles are
//! built once through [`BundleBuilder`] and never mutated afterwards; the
//! composer and registry only ever read them.

use std::fmt;
use std::sync::Arc;

use crate::errors::InvokeError;
use crate::target::{Slot, Target};

/// An operation: a callable dispatched with its receiver target and a slice
/// of argument slots.
///
/// Operations are reference-counted so a single definition can be bound onto
/// any number of targets without copying the body.
pub type Operation = Arc<dyn Fn(&Target, &[Slot]) -> Result<Slot, InvokeError> + Send + Sync>;

/// A named, immutable bundle of operations.
///
/// The operation table preserves insertion order; within a single builder a
/// re-used name is resolved last-writer-wins, the same rule the composer
/// applies across bundles.
pub struct BehaviorBundle {
    id: String,
    version: String,
    description: String,
    tags: Vec<String>,
    operations: Vec<(String, Operation)>,
}

impl BehaviorBundle {
    /// Start building a bundle with the given namespaced id
    /// (e.g. `"org:managed"`).
    pub fn builder(id: impl Into<String>) -> BundleBuilder {
        BundleBuilder {
            id: id.into(),
            version: "0.1.0".to_string(),
            description: String::new(),
            tags: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Namespaced identifier: `"namespace:name"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The namespace portion of the id, empty if the id is not namespaced.
    pub fn namespace(&self) -> &str {
        match self.id.split_once(':') {
            Some((ns, _)) => ns,
            None => "",
        }
    }

    /// Semantic version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Searchable tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Number of operations in the bundle.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the bundle defines no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Whether the bundle defines an operation with this name.
    pub fn provides(&self, name: &str) -> bool {
        self.operations.iter().any(|(n, _)| n == name)
    }

    /// Operation names in definition order.
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// The operation bound under this name, if any.
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, op)| op)
    }

    /// Iterate the operation table in definition order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.operations.iter().map(|(n, op)| (n.as_str(), op))
    }
}

impl fmt::Debug for BehaviorBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorBundle")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("operations", &self.operation_names())
            .finish()
    }
}

/// Builder for [`BehaviorBundle`].
pub struct BundleBuilder {
    id: String,
    version: String,
    description: String,
    tags: Vec<String>,
    operations: Vec<(String, Operation)>,
}

impl BundleBuilder {
    /// Set the semantic version (defaults to `"0.1.0"`).
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a searchable tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add an operation under the given name.
    ///
    /// Re-using a name replaces the earlier definition silently.
    pub fn operation<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Target, &[Slot]) -> Result<Slot, InvokeError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.operations.retain(|(n, _)| *n != name);
        self.operations.push((name, Arc::new(body)));
        self
    }

    /// Finish building; the resulting bundle is immutable.
    pub fn build(self) -> BehaviorBundle {
        BehaviorBundle {
            id: self.id,
            version: self.version,
            description: self.description,
            tags: self.tags,
            operations: self.operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_metadata() {
        let bundle = BehaviorBundle::builder("org:managed")
            .version("1.2.0")
            .description("Report-side management relationship")
            .tag("org")
            .tag("relationship")
            .operation("set_manager", |_, _| Ok(Slot::null()))
            .build();

        assert_eq!(bundle.id(), "org:managed");
        assert_eq!(bundle.namespace(), "org");
        assert_eq!(bundle.version(), "1.2.0");
        assert_eq!(bundle.tags(), ["org", "relationship"]);
        assert_eq!(bundle.len(), 1);
        assert!(bundle.provides("set_manager"));
        assert!(!bundle.provides("remove_manager"));
    }

    #[test]
    fn test_builder_duplicate_name_last_wins() {
        let bundle = BehaviorBundle::builder("test:dup")
            .operation("greet", |_, _| Ok(Slot::Value(json!("first"))))
            .operation("greet", |_, _| Ok(Slot::Value(json!("second"))))
            .build();

        assert_eq!(bundle.len(), 1);
        let target = Target::new();
        let op = bundle.operation("greet").unwrap();
        assert_eq!(op(&target, &[]).unwrap(), Slot::Value(json!("second")));
    }

    #[test]
    fn test_unnamespaced_id() {
        let bundle = BehaviorBundle::builder("plain").build();
        assert_eq!(bundle.namespace(), "");
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_entries_preserve_definition_order() {
        let bundle = BehaviorBundle::builder("test:order")
            .operation("b", |_, _| Ok(Slot::null()))
            .operation("a", |_, _| Ok(Slot::null()))
            .operation("c", |_, _| Ok(Slot::null()))
            .build();

        assert_eq!(bundle.operation_names(), ["b", "a", "c"]);
    }
}
