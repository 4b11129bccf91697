//! LogViewer: a bounded, level-filtered log panel.
//!
//! Entries are kept newest-last up to `maxLines`; the body shows the last
//! `visibleLines` entries at or above the `level` filter.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde_json::json;

use crate::error::WidgetError;
use crate::event::Key;
use crate::props::{PropValue, Props};
use crate::schema::{ComponentSchema, FieldDescriptor, FieldKind};
use crate::style::{Axes, Axis, Border, BorderKind, PartTable, StyleRecord};
use crate::widget::{Component, KeyBinding, Mutation, PartSpec, RenderDegradation, View, Widget};

use super::{common_axes, common_fields, container_table, format_stamp, header_table};

// ---------------------------------------------------------------------------
// LogLevel
// ---------------------------------------------------------------------------

/// Severity of a log entry. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error];

    pub fn name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Fixed-width tag used in the body.
    fn tag(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("unknown log level `{s}`")),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Clock reading when the entry was added.
    pub at: Duration,
}

impl LogEntry {
    /// Parse a `{level, message}` object. Level defaults to info.
    fn from_prop(value: &PropValue, at: Duration) -> Option<Self> {
        let object = value.as_object()?;
        let message = object.get("message")?.as_str()?.to_owned();
        let level = match object.get("level") {
            None => LogLevel::Info,
            Some(level) => level.as_str()?.parse().ok()?,
        };
        Some(Self { level, message, at })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogViewerState {
    pub entries: VecDeque<LogEntry>,
    /// Entries dropped because the buffer was full.
    pub evicted: usize,
}

impl LogViewerState {
    fn push(&mut self, entry: LogEntry, capacity: usize) {
        self.entries.push_back(entry);
        while self.entries.len() > capacity {
            self.entries.pop_front();
            self.evicted += 1;
        }
    }
}

fn capacity(props: &Props) -> usize {
    props.get_f64("maxLines").map_or(100, |n| n.max(1.0) as usize)
}

fn min_level(props: &Props) -> LogLevel {
    props
        .get_str("level")
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogLevel::Debug)
}

fn visible<'a>(view: &View<'a, LogViewer>) -> impl Iterator<Item = &'a LogEntry> + 'a {
    let floor = min_level(view.props);
    view.state.entries.iter().filter(move |e| e.level >= floor)
}

// ---------------------------------------------------------------------------
// LogViewer
// ---------------------------------------------------------------------------

/// A scrolling log panel widget.
pub struct LogViewer;

impl LogViewer {
    fn clear_entries(m: &mut Mutation<'_, Self>) -> usize {
        let state = m.state_mut();
        let removed = state.entries.len();
        state.entries.clear();
        state.evicted = 0;
        m.emit("logs_cleared", json!({ "removed": removed }));
        removed
    }

    fn clear_key(m: &mut Mutation<'_, Self>) {
        if m.props().flag("disabled", false) {
            m.skip_render();
            return;
        }
        Self::clear_entries(m);
    }
}

impl Component for LogViewer {
    const NAME: &'static str = "LogViewer";
    type State = LogViewerState;

    fn schema() -> ComponentSchema {
        let levels: Vec<&str> = LogLevel::ALL.iter().map(|l| l.name()).collect();
        common_fields(ComponentSchema::new(Self::NAME))
            .field(FieldDescriptor::optional("title", FieldKind::String).default_value("Logs"))
            .field(
                FieldDescriptor::optional("maxLines", FieldKind::Number)
                    .min(1.0)
                    .max(100_000.0)
                    .default_value(100.0),
            )
            .field(
                FieldDescriptor::optional("visibleLines", FieldKind::Number)
                    .min(1.0)
                    .default_value(10.0),
            )
            .field(FieldDescriptor::optional("level", FieldKind::one_of(&levels)).default_value("debug"))
            .field(FieldDescriptor::optional("showTimestamps", FieldKind::Boolean).default_value(true))
            .field(FieldDescriptor::optional("logs", FieldKind::array_of(FieldKind::Object)))
    }

    fn parts() -> Vec<PartSpec> {
        vec![
            PartSpec::new(
                container_table(Self::NAME)
                    .layer(Axis::Status, "warn", |theme| {
                        StyleRecord::new()
                            .border(Border::colored(BorderKind::Round, theme.color("level.warn", "yellow")))
                    })
                    .layer(Axis::Status, "error", |theme| {
                        StyleRecord::new()
                            .border(Border::colored(BorderKind::Heavy, theme.color("level.error", "red")))
                    }),
            ),
            PartSpec::new(header_table(Self::NAME)).shown_by("showHeader"),
            PartSpec::new(
                PartTable::new(Self::NAME, "body")
                    .base(|theme| StyleRecord::new().fg(theme.color("level.info", "white")))
                    .layer(Axis::Variant, "minimal", |_| StyleRecord::new().dim(true))
                    .layer(Axis::Override, "disabled", |theme| {
                        StyleRecord::new().dim(true).fg(theme.color("text.muted", "grey"))
                    }),
            ),
        ]
    }

    fn init_state(props: &Props, now: Duration) -> LogViewerState {
        let mut state = LogViewerState::default();
        let capacity = capacity(props);
        for value in props.get("logs").and_then(PropValue::as_array).unwrap_or(&[]) {
            match LogEntry::from_prop(value, now) {
                Some(entry) => state.push(entry, capacity),
                None => tracing::warn!(entry = %value.describe(), "skipping malformed log entry"),
            }
        }
        state
    }

    fn axes(part: &str, view: &View<'_, Self>) -> Axes {
        match part {
            "container" => {
                // Highlight the frame when a visible entry is a warning or worse.
                let worst = visible(view).map(|e| e.level).max();
                let status = worst.filter(|l| *l >= LogLevel::Warn).map(LogLevel::name);
                common_axes(view.props).with(Axis::Status, status)
            }
            _ => common_axes(view.props),
        }
    }

    fn render(part: &str, view: &View<'_, Self>) -> Result<String, RenderDegradation> {
        match part {
            "container" => Ok(String::new()),
            "header" => {
                let title = view.props.get_str("title").unwrap_or("Logs");
                Ok(format!("{title} ({})", visible(view).count()))
            }
            "body" => {
                let shown: Vec<&LogEntry> = visible(view).collect();
                if shown.is_empty() {
                    return Ok("No log entries".to_owned());
                }
                let window = view.props.get_f64("visibleLines").map_or(10, |n| n.max(1.0) as usize);
                let stamps = view.props.flag("showTimestamps", true);
                let start = shown.len().saturating_sub(window);
                Ok(shown[start..]
                    .iter()
                    .map(|e| {
                        if stamps {
                            format!("[{}] {} {}", format_stamp(e.at), e.level.tag(), e.message)
                        } else {
                            format!("{} {}", e.level.tag(), e.message)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            other => Err(RenderDegradation::new(format!("unknown part `{other}`"))),
        }
    }

    fn key_bindings() -> Vec<KeyBinding<Self>> {
        vec![KeyBinding::focused(&[Key::Char('c')], Self::clear_key)]
    }

    fn on_props_changed(m: &mut Mutation<'_, Self>) {
        let capacity = capacity(m.props());
        let state = m.state_mut();
        while state.entries.len() > capacity {
            state.entries.pop_front();
            state.evicted += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl Widget<LogViewer> {
    /// Append an entry and emit `log_added`.
    pub fn add_log(&self, level: &str, message: impl Into<String>) -> Result<(), WidgetError> {
        let level: LogLevel = level.parse().map_err(|message| WidgetError::InvalidArgument {
            operation: "add_log",
            message,
        })?;
        let message = message.into();
        self.mutate(|m| {
            let entry = LogEntry {
                level,
                message,
                at: m.now(),
            };
            let payload = json!({ "level": level.name(), "message": &entry.message });
            let capacity = capacity(m.props());
            let state = m.state_mut();
            state.push(entry, capacity);
            let total = state.entries.len();
            m.emit("log_added", json!({ "entry": payload, "total": total }));
        })
    }

    /// Drop every entry and emit `logs_cleared`. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, WidgetError> {
        self.mutate(LogViewer::clear_entries)
    }

    pub fn entries(&self) -> Result<Vec<LogEntry>, WidgetError> {
        self.with_state(|s| s.entries.iter().cloned().collect())
    }

    pub fn len(&self) -> Result<usize, WidgetError> {
        self.with_state(|s| s.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, WidgetError> {
        Ok(self.len()? == 0)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyEvent;
    use crate::widget::Env;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn viewer(env: &Env, props: Props) -> Widget<LogViewer> {
        Widget::new(props, env).unwrap()
    }

    #[test]
    fn empty_body_placeholder() {
        let (env, surface) = Env::headless(40, 10);
        let w = viewer(&env, Props::new());
        let id = w.element("body").unwrap();
        assert_eq!(surface.borrow().content(id), Some("No log entries"));
        let header = w.element("header").unwrap();
        assert_eq!(surface.borrow().content(header), Some("Logs (0)"));
    }

    #[test]
    fn add_log_renders_and_emits() {
        let (env, surface) = Env::headless(60, 10);
        let w = viewer(&env, Props::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        w.on("log_added", move |e| sink.borrow_mut().push(e.data["total"].clone()))
            .unwrap();

        env.scheduler.advance(Duration::from_millis(1250));
        w.add_log("info", "started").unwrap();
        w.add_log("warn", "slow disk").unwrap();

        let id = w.element("body").unwrap();
        assert_eq!(
            surface.borrow().content(id),
            Some("[00:01.250] INFO  started\n[00:01.250] WARN  slow disk")
        );
        assert_eq!(*seen.borrow(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn buffer_is_bounded() {
        let (env, _surface) = Env::headless(40, 10);
        let w = viewer(&env, Props::new().with("maxLines", 3));
        for i in 0..5 {
            w.add_log("debug", format!("line {i}")).unwrap();
        }
        let messages: Vec<_> = w.entries().unwrap().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["line 2", "line 3", "line 4"]);
        assert_eq!(w.with_state(|s| s.evicted).unwrap(), 2);
    }

    #[test]
    fn level_filter_hides_entries() {
        let (env, surface) = Env::headless(40, 10);
        let w = viewer(
            &env,
            Props::new().with("level", "warn").with("showTimestamps", false),
        );
        w.add_log("info", "chatter").unwrap();
        w.add_log("error", "boom").unwrap();
        let id = w.element("body").unwrap();
        assert_eq!(surface.borrow().content(id), Some("ERROR boom"));
        // Hidden entries are still kept.
        assert_eq!(w.len().unwrap(), 2);
    }

    #[test]
    fn errors_color_the_frame() {
        let (env, surface) = Env::headless(40, 10);
        let w = viewer(&env, Props::new());
        let root = w.root().unwrap();
        w.add_log("error", "boom").unwrap();
        let border = surface.borrow().style(root).and_then(|s| s.border.clone());
        assert_eq!(border, Some(Border::colored(BorderKind::Heavy, "red")));
    }

    #[test]
    fn clear_emits_removed_count() {
        let (env, _surface) = Env::headless(40, 10);
        let w = viewer(&env, Props::new());
        w.add_log("info", "a").unwrap();
        w.add_log("info", "b").unwrap();
        let removed = Rc::new(RefCell::new(None));
        let sink = removed.clone();
        w.on("logs_cleared", move |e| *sink.borrow_mut() = Some(e.data["removed"].clone()))
            .unwrap();
        assert_eq!(w.clear().unwrap(), 2);
        assert!(w.is_empty().unwrap());
        assert_eq!(*removed.borrow(), Some(json!(2)));
    }

    #[test]
    fn clear_key_when_focused() {
        let (env, _surface) = Env::headless(40, 10);
        let w = viewer(&env, Props::new());
        w.add_log("info", "a").unwrap();
        w.focus().unwrap();
        env.surface.dispatch_key(&KeyEvent::plain(Key::Char('c')));
        assert!(w.is_empty().unwrap());
    }

    #[test]
    fn initial_logs_skip_malformed() {
        let (env, _surface) = Env::headless(40, 10);
        let props = Props::from_json(json!({
            "logs": [
                { "level": "warn", "message": "kept" },
                { "level": "loud", "message": "bad level" },
                { "message": "defaults to info" },
                { "level": "info" }
            ]
        }))
        .unwrap();
        let w = viewer(&env, props);
        let levels: Vec<_> = w.entries().unwrap().into_iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![LogLevel::Warn, LogLevel::Info]);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let (env, _surface) = Env::headless(40, 10);
        let w = viewer(&env, Props::new());
        assert!(matches!(
            w.add_log("loud", "x"),
            Err(WidgetError::InvalidArgument { operation: "add_log", .. })
        ));
        assert!(w.is_empty().unwrap());
    }
}
