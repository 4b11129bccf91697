//! Schema registry: component name → schema.

use std::collections::BTreeMap;

use super::field::ComponentSchema;
use super::validate::{validate_props, ValidationIssue, ValidationResult};
use crate::error::SchemaError;
use crate::props::Props;

/// Maps component names to their validation schemas.
///
/// Schemas are registered once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, ComponentSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the schemas of every built-in widget.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for schema in crate::widgets::builtin_schemas() {
            if let Err(err) = registry.register(schema) {
                tracing::warn!(%err, "skipping built-in schema");
            }
        }
        registry
    }

    /// Register a schema. Fails if the name is already taken.
    pub fn register(&mut self, schema: ComponentSchema) -> Result<(), SchemaError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::AlreadyRegistered(schema.name().to_owned()));
        }
        self.schemas.insert(schema.name().to_owned(), schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ComponentSchema> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered component names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Validate `raw` against the schema registered as `component`.
    ///
    /// An unknown component yields a failed result with a single error naming it.
    pub fn validate(&self, component: &str, raw: &Props) -> ValidationResult {
        match self.schemas.get(component) {
            Some(schema) => validate_props(schema, raw),
            None => ValidationResult::failure(ValidationIssue::new(
                "",
                format!("unknown component `{component}`"),
            )),
        }
    }
}
