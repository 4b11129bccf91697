//! Prop schemas: field descriptors, registry, validation.

pub mod field;
pub mod registry;
pub mod validate;

pub use field::{AdvisoryCheck, ComponentSchema, FieldDescriptor, FieldKind};
pub use registry::SchemaRegistry;
pub use validate::{validate_props, ValidationIssue, ValidationResult};

use crate::props::Props;

/// Validate `raw` against the schema registered for `component`.
pub fn validate(registry: &SchemaRegistry, component: &str, raw: &Props) -> ValidationResult {
    registry.validate(component, raw)
}
