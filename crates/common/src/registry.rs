//! Named type registry
//!
//! Holds exactly one implementation per type name, in first-registration
//! order. Synthesis reserves a name with a placeholder before it resolves the
//! referenced schema, so a reference reached again while its own body is
//! being synthesized short-circuits to the name instead of recursing.

use crate::{GeneratorError, Result, TsType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named type's implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedType {
    pub ty: TsType,
    pub description: Option<String>,
}

impl NamedType {
    pub fn new(ty: TsType) -> Self {
        Self {
            ty,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    /// Name bound to itself while its body is synthesized
    Placeholder,
    Defined(NamedType),
}

/// Insertion-ordered mapping from type name to implementation
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: IndexMap<String, Entry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `implementation`
    ///
    /// Registering the identical implementation again is a no-op, replacing a
    /// placeholder is allowed, anything else fails with
    /// [`GeneratorError::ConflictingTypeDefinition`].
    pub fn register(&mut self, name: &str, implementation: NamedType) -> Result<()> {
        match self.entries.get(name) {
            Some(Entry::Defined(existing)) if existing.ty == implementation.ty => Ok(()),
            Some(Entry::Defined(_)) => Err(GeneratorError::ConflictingTypeDefinition {
                name: name.to_string(),
            }),
            Some(Entry::Placeholder) | None => {
                tracing::trace!(name, "registering type");
                // An existing placeholder keeps its position
                self.entries
                    .insert(name.to_string(), Entry::Defined(implementation));
                Ok(())
            }
        }
    }

    /// Bind `name` to a placeholder unless it is already bound
    pub fn reserve(&mut self, name: &str) {
        self.entries
            .entry(name.to_string())
            .or_insert(Entry::Placeholder);
    }

    /// The implementation bound to `name`; `None` for unknown or pending names
    pub fn lookup(&self, name: &str) -> Option<&NamedType> {
        match self.entries.get(name) {
            Some(Entry::Defined(named)) => Some(named),
            _ => None,
        }
    }

    /// Whether `name` is bound, either defined or pending
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether `name` is bound to a placeholder
    pub fn is_pending(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::Placeholder))
    }

    /// Defined types in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamedType)> {
        self.entries.iter().filter_map(|(name, entry)| match entry {
            Entry::Defined(named) => Some((name.as_str(), named)),
            Entry::Placeholder => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_type() -> NamedType {
        NamedType::new(TsType::string())
    }

    #[test]
    fn test_identical_registration_is_noop() {
        let mut registry = TypeRegistry::new();
        registry.register("Name", string_type()).unwrap();
        registry.register("Name", string_type()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("Name"), Some(&string_type()));
    }

    #[test]
    fn test_conflicting_registration_fails() {
        let mut registry = TypeRegistry::new();
        registry.register("Name", string_type()).unwrap();

        let err = registry
            .register("Name", NamedType::new(TsType::number()))
            .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::ConflictingTypeDefinition { ref name } if name == "Name"
        ));
        assert_eq!(registry.lookup("Name"), Some(&string_type()));
    }

    #[test]
    fn test_placeholder_is_replaced() {
        let mut registry = TypeRegistry::new();
        registry.reserve("Node");

        assert!(registry.contains("Node"));
        assert!(registry.is_pending("Node"));
        assert_eq!(registry.lookup("Node"), None);

        registry.register("Node", string_type()).unwrap();
        assert!(!registry.is_pending("Node"));
        assert_eq!(registry.lookup("Node"), Some(&string_type()));
    }

    #[test]
    fn test_reserve_keeps_existing_definition() {
        let mut registry = TypeRegistry::new();
        registry.register("Name", string_type()).unwrap();
        registry.reserve("Name");

        assert!(!registry.is_pending("Name"));
        assert_eq!(registry.lookup("Name"), Some(&string_type()));
    }

    #[test]
    fn test_iteration_follows_first_binding_order() {
        let mut registry = TypeRegistry::new();
        registry.reserve("Outer");
        registry.register("Inner", string_type()).unwrap();
        registry
            .register("Outer", NamedType::new(TsType::Ref("Inner".to_string())))
            .unwrap();
        registry.reserve("Pending");

        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Outer", "Inner"]);
    }
}
