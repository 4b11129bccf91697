//! Built-in widgets: StatusIndicator, LogViewer, AgentList.
//!
//! Each is a [`Component`](crate::widget::Component) mounted through the
//! generic [`Widget`](crate::widget::Widget) runtime. The helpers here hold
//! the props and container styling the three have in common.

pub mod agent_list;
pub mod log_viewer;
pub mod status;

use std::time::Duration;

use crate::props::Props;
use crate::schema::{ComponentSchema, FieldDescriptor, FieldKind};
use crate::style::{Axes, Axis, Border, BorderKind, Padding, PartTable, StyleRecord};
use crate::widget::Component;

pub use agent_list::{Agent, AgentList, AgentListState};
pub use log_viewer::{LogEntry, LogLevel, LogViewer, LogViewerState};
pub use status::{Status, StatusIndicator, StatusState, StatusTransition};

/// Schemas of every built-in widget.
pub fn builtin_schemas() -> Vec<ComponentSchema> {
    vec![
        AgentList::schema(),
        LogViewer::schema(),
        StatusIndicator::schema(),
    ]
}

// ---------------------------------------------------------------------------
// Shared props
// ---------------------------------------------------------------------------

pub(crate) const VARIANTS: &[&str] = &["default", "primary", "minimal"];
pub(crate) const SIZES: &[&str] = &["small", "medium", "large"];

/// Add the props every built-in widget accepts.
pub(crate) fn common_fields(schema: ComponentSchema) -> ComponentSchema {
    schema
        .field(FieldDescriptor::optional("variant", FieldKind::one_of(VARIANTS)).default_value("default"))
        .field(FieldDescriptor::optional("size", FieldKind::one_of(SIZES)).default_value("medium"))
        .field(FieldDescriptor::optional("showHeader", FieldKind::Boolean).default_value(true))
        .field(
            FieldDescriptor::optional("refreshInterval", FieldKind::Number)
                .min(0.0)
                .default_value(0.0),
        )
        .field(FieldDescriptor::optional("disabled", FieldKind::Boolean).default_value(false))
        .field(FieldDescriptor::optional("style", FieldKind::String))
        .advisory(disabled_primary)
}

fn disabled_primary(props: &Props) -> Option<String> {
    (props.flag("disabled", false) && props.get_str("variant") == Some("primary"))
        .then(|| "`disabled` overrides the `primary` variant styling".to_owned())
}

/// Variant, size, and disabled selection shared by every container.
pub(crate) fn common_axes(props: &Props) -> Axes {
    Axes::new()
        .with(Axis::Variant, props.get_str("variant"))
        .with(Axis::Size, props.get_str("size"))
        .with(Axis::Override, props.flag("disabled", false).then_some("disabled"))
}

// ---------------------------------------------------------------------------
// Shared styling
// ---------------------------------------------------------------------------

/// The bordered box every built-in widget mounts as its root.
pub(crate) fn container_table(component: &'static str) -> PartTable {
    PartTable::new(component, "container")
        .base(|theme| {
            StyleRecord::new()
                .fg(theme.color("text.primary", "white"))
                .border(Border::colored(BorderKind::Round, theme.color("border.primary", "blue")))
                .padding(Padding::symmetric(0, 1))
        })
        .layer(Axis::Variant, "default", |_| StyleRecord::new())
        .layer(Axis::Variant, "primary", |theme| {
            StyleRecord::new()
                .border(Border::colored(BorderKind::Heavy, theme.color("accent.primary", "blue")))
        })
        .layer(Axis::Variant, "minimal", |_| {
            StyleRecord::new()
                .border(Border::new(BorderKind::None))
                .padding(Padding::all(0))
        })
        .layer(Axis::Size, "small", |_| StyleRecord::new().padding(Padding::all(0)))
        .layer(Axis::Size, "medium", |_| StyleRecord::new())
        .layer(Axis::Size, "large", |_| StyleRecord::new().padding(Padding::symmetric(1, 2)))
        .layer(Axis::Override, "disabled", |theme| {
            StyleRecord::new()
                .dim(true)
                .fg(theme.color("text.muted", "grey"))
                .border(Border::colored(BorderKind::Round, theme.color("border.muted", "dark_grey")))
        })
}

/// A bold single-line title part.
pub(crate) fn header_table(component: &'static str) -> PartTable {
    PartTable::new(component, "header")
        .base(|theme| StyleRecord::new().bold(true).fg(theme.color("accent.primary", "blue")))
        .layer(Axis::Override, "disabled", |theme| {
            StyleRecord::new().bold(false).fg(theme.color("text.muted", "grey"))
        })
}

/// `HH:MM:SS`.
pub(crate) fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

/// `MM:SS.mmm`, for log timestamps.
pub(crate) fn format_stamp(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}.{:03}", secs / 60, secs % 60, d.subsec_millis())
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;
    use crate::style::{resolve_style, Theme};

    #[test]
    fn builtins_are_registered() {
        let registry = SchemaRegistry::with_builtins();
        let mut names: Vec<_> = registry.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["AgentList", "LogViewer", "StatusIndicator"]);
    }

    #[test]
    fn disabled_primary_warns_without_failing() {
        let registry = SchemaRegistry::with_builtins();
        let props = Props::new().with("variant", "primary").with("disabled", true);
        let result = registry.validate("LogViewer", &props);
        assert!(result.success);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("disabled"));
    }

    #[test]
    fn container_cascade() {
        let theme = Theme::dark();
        let table = container_table("LogViewer");
        let props = Props::new().with("variant", "minimal").with("size", "large");
        let style = resolve_style(&theme, &table, &common_axes(&props));
        // Size comes after variant, so large padding wins over minimal's.
        assert_eq!(style.padding, Some(Padding::symmetric(1, 2)));
        assert_eq!(style.border, Some(Border::new(BorderKind::None)));

        let disabled = Props::new().with("disabled", true);
        let style = resolve_style(&theme, &table, &common_axes(&disabled));
        assert_eq!(style.dim, Some(true));
        assert_eq!(style.fg.as_deref(), Some("grey"));
    }

    #[test]
    fn clock_formats() {
        assert_eq!(format_clock(Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_stamp(Duration::from_millis(61_250)), "01:01.250");
    }
}
