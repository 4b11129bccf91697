//! Field descriptors and component schemas.
//!
//! A [`ComponentSchema`] is an immutable description of the props a component
//! accepts: one [`FieldDescriptor`] per key, plus optional advisory checks that
//! produce non-fatal warnings.

use std::fmt;

use crate::props::{PropValue, Props};

// ---------------------------------------------------------------------------
// FieldKind
// ---------------------------------------------------------------------------

/// The expected kind of a prop value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// A string restricted to a fixed set of values.
    Enum(Vec<String>),
    /// An array, optionally with a kind every item must match.
    Array(Option<Box<FieldKind>>),
    Object,
    Function,
}

impl FieldKind {
    /// Enum kind from a list of allowed values.
    pub fn one_of(values: &[&str]) -> Self {
        Self::Enum(values.iter().map(|v| (*v).to_owned()).collect())
    }

    /// Array whose items must all be of `item` kind.
    pub fn array_of(item: FieldKind) -> Self {
        Self::Array(Some(Box::new(item)))
    }

    /// Array with unchecked items.
    pub fn any_array() -> Self {
        Self::Array(None)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Enum(values) => write!(f, "one of [{}]", values.join(", ")),
            Self::Array(None) => write!(f, "array"),
            Self::Array(Some(item)) => write!(f, "array of {item}"),
            Self::Object => write!(f, "object"),
            Self::Function => write!(f, "function"),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldDescriptor
// ---------------------------------------------------------------------------

/// Describes a single prop field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub key: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Value filled in when an optional field is omitted.
    pub default: Option<PropValue>,
    /// Inclusive lower bound for numbers.
    pub min: Option<f64>,
    /// Inclusive upper bound for numbers.
    pub max: Option<f64>,
    /// Present when the field is deprecated; the note is echoed as a warning.
    pub deprecated: Option<String>,
}

impl FieldDescriptor {
    fn new(key: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            key: key.into(),
            kind,
            required,
            default: None,
            min: None,
            max: None,
            deprecated: None,
        }
    }

    /// A field that must be present.
    pub fn required(key: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(key, kind, true)
    }

    /// A field that may be omitted.
    pub fn optional(key: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(key, kind, false)
    }

    /// Set the default value (builder).
    pub fn default_value(mut self, value: impl Into<PropValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the inclusive numeric minimum (builder).
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the inclusive numeric maximum (builder).
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Mark the field deprecated with an explanatory note (builder).
    pub fn deprecated(mut self, note: impl Into<String>) -> Self {
        self.deprecated = Some(note.into());
        self
    }
}

// ---------------------------------------------------------------------------
// ComponentSchema
// ---------------------------------------------------------------------------

/// An advisory check run on normalized props; returns a warning message.
pub type AdvisoryCheck = fn(&Props) -> Option<String>;

/// The validation schema for one component.
#[derive(Debug, Clone)]
pub struct ComponentSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
    advisories: Vec<AdvisoryCheck>,
}

impl ComponentSchema {
    /// Create an empty schema for the named component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            advisories: Vec::new(),
        }
    }

    /// Add a field descriptor (builder). A later descriptor with the same key
    /// replaces the earlier one.
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.retain(|f| f.key != descriptor.key);
        self.fields.push(descriptor);
        self
    }

    /// Add an advisory check (builder).
    pub fn advisory(mut self, check: AdvisoryCheck) -> Self {
        self.advisories.push(check);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn get_field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub(crate) fn advisories(&self) -> &[AdvisoryCheck] {
        &self.advisories
    }
}
