//! Props validation against a [`ComponentSchema`].
//!
//! Validation is total: every field is checked and every problem is reported,
//! so callers see all invalid fields at once. Warnings are advisory and never
//! affect `success`.

use std::fmt;

use super::field::{ComponentSchema, FieldDescriptor, FieldKind};
use crate::props::{PropValue, Props};

// ---------------------------------------------------------------------------
// ValidationIssue / ValidationResult
// ---------------------------------------------------------------------------

/// A single validation error, located by field path (e.g. `agents[2].name`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub success: bool,
    /// Normalized props (defaults filled, unknown keys dropped) on success.
    pub data: Option<Props>,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// A failed result carrying a single error.
    pub fn failure(issue: ValidationIssue) -> Self {
        Self {
            success: false,
            data: None,
            errors: vec![issue],
            warnings: Vec::new(),
        }
    }

    /// Whether a given field path has at least one error.
    pub fn has_error_at(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate `raw` against `schema`.
pub fn validate_props(schema: &ComponentSchema, raw: &Props) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut data = Props::new();

    for field in schema.fields() {
        match raw.get(&field.key) {
            None | Some(PropValue::Null) => {
                if field.required {
                    errors.push(ValidationIssue::new(&field.key, "is required"));
                } else if let Some(default) = &field.default {
                    data.insert(field.key.clone(), default.clone());
                }
            }
            Some(value) => {
                let before = errors.len();
                check_value(&field.key, &field.kind, value, &mut errors);
                if errors.len() == before {
                    check_bounds(field, value, &mut errors);
                }
                if let Some(note) = &field.deprecated {
                    warnings.push(format!("`{}` is deprecated: {note}", field.key));
                }
                data.insert(field.key.clone(), value.clone());
            }
        }
    }

    for key in raw.keys() {
        if schema.get_field(key).is_none() {
            warnings.push(format!("unknown field `{key}` ignored"));
        }
    }

    let success = errors.is_empty();
    if success {
        warnings.extend(schema.advisories().iter().filter_map(|check| check(&data)));
    }

    tracing::debug!(
        component = schema.name(),
        success,
        errors = errors.len(),
        warnings = warnings.len(),
        "props validated"
    );

    ValidationResult {
        success,
        data: success.then_some(data),
        errors,
        warnings,
    }
}

/// Check `value` against `kind`, pushing one issue per mismatch (recursing
/// into array items).
fn check_value(path: &str, kind: &FieldKind, value: &PropValue, errors: &mut Vec<ValidationIssue>) {
    let mismatch = |errors: &mut Vec<ValidationIssue>| {
        errors.push(ValidationIssue::new(
            path,
            format!("expected {kind}, received {}", value.kind_name()),
        ));
    };

    match (kind, value) {
        (FieldKind::String, PropValue::String(_))
        | (FieldKind::Boolean, PropValue::Bool(_))
        | (FieldKind::Object, PropValue::Object(_))
        | (FieldKind::Function, PropValue::Function(_)) => {}
        (FieldKind::Number, PropValue::Number(n)) => {
            if !n.is_finite() {
                errors.push(ValidationIssue::new(path, "expected a finite number"));
            }
        }
        (FieldKind::Enum(allowed), PropValue::String(s)) => {
            if !allowed.iter().any(|a| a == s) {
                errors.push(ValidationIssue::new(
                    path,
                    format!("expected {kind}, received \"{s}\""),
                ));
            }
        }
        (FieldKind::Array(item_kind), PropValue::Array(items)) => {
            if let Some(item_kind) = item_kind {
                for (i, item) in items.iter().enumerate() {
                    check_value(&format!("{path}[{i}]"), item_kind, item, errors);
                }
            }
        }
        _ => mismatch(errors),
    }
}

fn check_bounds(field: &FieldDescriptor, value: &PropValue, errors: &mut Vec<ValidationIssue>) {
    let Some(n) = value.as_f64() else {
        return;
    };
    if let Some(min) = field.min {
        if n < min {
            errors.push(ValidationIssue::new(
                &field.key,
                format!("must be >= {min}, received {n}"),
            ));
        }
    }
    if let Some(max) = field.max {
        if n > max {
            errors.push(ValidationIssue::new(
                &field.key,
                format!("must be <= {max}, received {n}"),
            ));
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
