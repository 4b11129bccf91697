//! StatusIndicator: a status badge with optional uptime and transition log.
//!
//! ```text
//! ╭──────────────╮
//! │ Worker       │
//! │ ● RUNNING    │
//! │ Up 00:00:12  │
//! ╰──────────────╯
//! ```
//!
//! # Examples
//!
//! ```ignore
//! let (env, _surface) = Env::headless(40, 10);
//! let widget = Widget::<StatusIndicator>::new(
//!     Props::new().with("status", "running").with("refreshInterval", 1000),
//!     &env,
//! )?;
//! widget.set_status("paused")?;
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde_json::json;

use crate::error::WidgetError;
use crate::event::Key;
use crate::props::Props;
use crate::schema::{ComponentSchema, FieldDescriptor, FieldKind};
use crate::style::{Axes, Axis, Border, BorderKind, PartTable, StyleRecord, Theme};
use crate::widget::{Component, KeyBinding, Mutation, PartSpec, RenderDegradation, View, Widget};

use super::{common_axes, common_fields, container_table, format_clock, header_table};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// The states a status indicator can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Idle,
    Running,
    Paused,
    Error,
    Completed,
    Stopped,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Idle,
        Status::Running,
        Status::Paused,
        Status::Error,
        Status::Completed,
        Status::Stopped,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Error => "error",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
        }
    }

    /// Badge text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Error => "ERROR",
            Self::Completed => "COMPLETED",
            Self::Stopped => "STOPPED",
        }
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.name()).collect()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.name() == s)
            .ok_or_else(|| format!("unknown status `{s}`, expected one of {:?}", Self::names()))
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// One recorded status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: Status,
    pub to: Status,
    /// Clock reading at the change.
    pub at: Duration,
    /// Time spent in `from`.
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct StatusState {
    pub status: Status,
    /// When the current status began.
    pub since: Duration,
    /// When the widget was constructed.
    pub started: Duration,
    /// Most recent changes, oldest first, bounded by `historyLimit`.
    pub history: VecDeque<StatusTransition>,
    /// Last `status` prop applied, so unrelated updates keep runtime changes.
    prop_status: Status,
    pub ticks: u64,
}

fn prop_status(props: &Props) -> Status {
    props
        .get_str("status")
        .and_then(|s| s.parse().ok())
        .unwrap_or(Status::Idle)
}

fn history_limit(props: &Props) -> usize {
    props.get_f64("historyLimit").map_or(10, |n| n.max(1.0) as usize)
}

// ---------------------------------------------------------------------------
// StatusIndicator
// ---------------------------------------------------------------------------

/// A status badge widget.
pub struct StatusIndicator;

impl StatusIndicator {
    /// Move to `next`, recording the transition and emitting `status_change`.
    fn apply(m: &mut Mutation<'_, Self>, next: Status) {
        let now = m.now();
        let limit = history_limit(m.props());
        let state = m.state_mut();
        if state.status == next {
            m.skip_render();
            return;
        }
        let transition = StatusTransition {
            from: state.status,
            to: next,
            at: now,
            duration: now.saturating_sub(state.since),
        };
        state.status = next;
        state.since = now;
        state.history.push_back(transition);
        while state.history.len() > limit {
            state.history.pop_front();
        }
        tracing::debug!(from = %transition.from, to = %next, "status changed");
        m.emit(
            "status_change",
            json!({
                "from": transition.from.name(),
                "to": next.name(),
                "duration": transition.duration.as_millis() as u64,
            }),
        );
    }

    fn interactive(m: &mut Mutation<'_, Self>) -> bool {
        if m.props().flag("disabled", false) {
            m.skip_render();
            return false;
        }
        true
    }

    fn toggle_pause(m: &mut Mutation<'_, Self>) {
        if !Self::interactive(m) {
            return;
        }
        match m.state().status {
            Status::Running => Self::apply(m, Status::Paused),
            Status::Paused => Self::apply(m, Status::Running),
            _ => m.skip_render(),
        }
    }

    fn start(m: &mut Mutation<'_, Self>) {
        if Self::interactive(m) {
            Self::apply(m, Status::Running);
        }
    }

    fn stop(m: &mut Mutation<'_, Self>) {
        if Self::interactive(m) {
            Self::apply(m, Status::Stopped);
        }
    }
}

fn chip(theme: &Theme, token: &str, symbol: &str) -> StyleRecord {
    StyleRecord::new().fg(theme.color(token, "white")).symbol(symbol)
}

impl Component for StatusIndicator {
    const NAME: &'static str = "StatusIndicator";
    type State = StatusState;

    fn schema() -> ComponentSchema {
        let statuses = Status::names();
        common_fields(ComponentSchema::new(Self::NAME))
            .field(FieldDescriptor::optional("status", FieldKind::one_of(&statuses)).default_value("idle"))
            .field(FieldDescriptor::optional("label", FieldKind::String).default_value("Status"))
            .field(FieldDescriptor::optional("showUptime", FieldKind::Boolean).default_value(false))
            .field(FieldDescriptor::optional("showHistory", FieldKind::Boolean).default_value(false))
            .field(
                FieldDescriptor::optional("historyLimit", FieldKind::Number)
                    .min(1.0)
                    .max(1000.0)
                    .default_value(10.0),
            )
            .field(FieldDescriptor::optional("color", FieldKind::String).deprecated("use `style` instead"))
    }

    fn parts() -> Vec<PartSpec> {
        vec![
            PartSpec::new(
                container_table(Self::NAME)
                    .layer(Axis::Status, "error", |theme| {
                        StyleRecord::new()
                            .border(Border::colored(BorderKind::Heavy, theme.color("status.error", "red")))
                    }),
            ),
            PartSpec::new(header_table(Self::NAME)).shown_by("showHeader"),
            PartSpec::new(
                PartTable::new(Self::NAME, "indicator")
                    .base(|_| StyleRecord::new().bold(true).symbol("?"))
                    .layer(Axis::Status, "idle", |t| chip(t, "status.idle", "○"))
                    .layer(Axis::Status, "running", |t| chip(t, "status.running", "●"))
                    .layer(Axis::Status, "paused", |t| chip(t, "status.paused", "‖"))
                    .layer(Axis::Status, "error", |t| chip(t, "status.error", "✖"))
                    .layer(Axis::Status, "completed", |t| chip(t, "status.completed", "✔"))
                    .layer(Axis::Status, "stopped", |t| chip(t, "status.stopped", "■"))
                    .layer(Axis::Size, "small", |_| StyleRecord::new().bold(false))
                    .layer(Axis::Override, "disabled", |theme| {
                        StyleRecord::new().dim(true).fg(theme.color("text.muted", "grey"))
                    }),
            ),
            PartSpec::new(
                PartTable::new(Self::NAME, "uptime")
                    .base(|theme| StyleRecord::new().fg(theme.color("text.muted", "grey"))),
            )
            .shown_by("showUptime"),
            PartSpec::new(
                PartTable::new(Self::NAME, "history")
                    .base(|theme| StyleRecord::new().fg(theme.color("text.muted", "grey")).dim(true)),
            )
            .shown_by("showHistory"),
        ]
    }

    fn init_state(props: &Props, now: Duration) -> StatusState {
        let status = prop_status(props);
        StatusState {
            status,
            since: now,
            started: now,
            history: VecDeque::new(),
            prop_status: status,
            ticks: 0,
        }
    }

    fn axes(part: &str, view: &View<'_, Self>) -> Axes {
        let status = Some(view.state.status.name());
        match part {
            "container" | "indicator" => common_axes(view.props).with(Axis::Status, status),
            _ => Axes::new().with(
                Axis::Override,
                view.props.flag("disabled", false).then_some("disabled"),
            ),
        }
    }

    fn render(part: &str, view: &View<'_, Self>) -> Result<String, RenderDegradation> {
        let state = view.state;
        match part {
            "container" => Ok(String::new()),
            "header" => Ok(view.props.get_str("label").unwrap_or("Status").to_owned()),
            "indicator" => Ok(state.status.label().to_owned()),
            "uptime" => {
                if view.now < state.started {
                    return Err(RenderDegradation::with_fallback(
                        "clock reads earlier than construction",
                        "Up --:--:--",
                    ));
                }
                Ok(format!("Up {}", format_clock(view.now - state.started)))
            }
            "history" => {
                if state.history.is_empty() {
                    return Ok("No transitions".to_owned());
                }
                Ok(state
                    .history
                    .iter()
                    .map(|t| format!("{} → {} ({:.1}s)", t.from, t.to, t.duration.as_secs_f64()))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            other => Err(RenderDegradation::new(format!("unknown part `{other}`"))),
        }
    }

    fn key_bindings() -> Vec<KeyBinding<Self>> {
        vec![
            KeyBinding::focused(&[Key::Char('p')], Self::toggle_pause),
            KeyBinding::focused(&[Key::Char('r')], Self::start),
            KeyBinding::focused(&[Key::Char('s')], Self::stop),
        ]
    }

    fn on_tick(m: &mut Mutation<'_, Self>) {
        m.state_mut().ticks += 1;
    }

    fn on_props_changed(m: &mut Mutation<'_, Self>) {
        let wanted = prop_status(m.props());
        let limit = history_limit(m.props());
        let state = m.state_mut();
        while state.history.len() > limit {
            state.history.pop_front();
        }
        if wanted != state.prop_status {
            state.prop_status = wanted;
            Self::apply(m, wanted);
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl Widget<StatusIndicator> {
    /// Change the displayed status by name.
    pub fn set_status(&self, status: &str) -> Result<(), WidgetError> {
        let next: Status = status.parse().map_err(|message| WidgetError::InvalidArgument {
            operation: "set_status",
            message,
        })?;
        self.mutate(|m| StatusIndicator::apply(m, next))
    }

    pub fn status(&self) -> Result<Status, WidgetError> {
        self.with_state(|s| s.status)
    }

    /// Recorded status changes, oldest first.
    pub fn transitions(&self) -> Result<Vec<StatusTransition>, WidgetError> {
        self.with_state(|s| s.history.iter().copied().collect())
    }

    /// Time spent in the current status.
    pub fn current_duration(&self, now: Duration) -> Result<Duration, WidgetError> {
        self.with_state(|s| now.saturating_sub(s.since))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
