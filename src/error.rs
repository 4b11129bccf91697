//! Runtime error types.
//!
//! Parsing and collaborator errors live next to the code that produces them
//! ([`StyleParseError`](crate::style::StyleParseError),
//! [`ThemeError`](crate::style::ThemeError),
//! [`SurfaceError`](crate::surface::SurfaceError)); this module holds the
//! errors surfaced by the schema registry and the widget lifecycle.

use crate::schema::ValidationIssue;
use crate::style::ThemeError;
use crate::surface::SurfaceError;

/// Errors from schema registration.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("component `{0}` is already registered")]
    AlreadyRegistered(String),
}

/// Props rejected by the validator. Lists every offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid props for `{component}`: {}", join_issues(.issues))]
pub struct ValidationError {
    pub component: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// Paths of every invalid field, in report order.
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.path.as_str()).collect()
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors returned by widget construction, updates, and mutators.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("`{component}` was used after cleanup")]
    Destroyed { component: &'static str },
    #[error("`{component}` declares no parts to mount")]
    NoParts { component: &'static str },
    #[error("`{component}` was re-entered while it was updating")]
    Reentrant { component: &'static str },
    #[error("invalid argument to {operation}: {message}")]
    InvalidArgument {
        operation: &'static str,
        message: String,
    },
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Errors from loading an [`AppConfig`](crate::app::AppConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown theme `{0}`, expected `dark` or `light`")]
    UnknownTheme(String),
    #[error(transparent)]
    Theme(#[from] ThemeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_issue() {
        let err = ValidationError {
            component: "StatusIndicator".into(),
            issues: vec![
                ValidationIssue::new("status", "expected one of [idle, running]"),
                ValidationIssue::new("size", "is required"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("StatusIndicator"));
        assert!(msg.contains("status: expected"));
        assert!(msg.contains("size: is required"));
        assert_eq!(err.paths(), vec!["status", "size"]);
    }

    #[test]
    fn widget_error_wraps_validation() {
        let err: WidgetError = ValidationError {
            component: "X".into(),
            issues: vec![ValidationIssue::new("a", "bad")],
        }
        .into();
        assert!(matches!(err, WidgetError::Validation(_)));
        assert!(err.to_string().contains("a: bad"));
    }

    #[test]
    fn destroyed_message() {
        let err = WidgetError::Destroyed { component: "LogViewer" };
        assert_eq!(err.to_string(), "`LogViewer` was used after cleanup");
    }
}
