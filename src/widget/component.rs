//! The component descriptor trait and the pieces a widget declares.
//!
//! A [`Component`] is a static description: its schema, its parts (each with
//! a style table), how props and state select style axes, and how they render
//! to text. All runtime behavior lives in [`Widget`](super::Widget), which is
//! identical for every component.

use std::time::Duration;

use crate::event::{Key, MouseEvent, MouseKind};
use crate::props::Props;
use crate::schema::ComponentSchema;
use crate::style::{Axes, PartTable, Theme};

use super::instance::Mutation;

/// Text shown when a part has nothing meaningful to display.
pub const NO_DATA: &str = "No data available";

// ---------------------------------------------------------------------------
// RenderDegradation
// ---------------------------------------------------------------------------

/// A render-time inconsistency. The widget logs it and shows `fallback`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct RenderDegradation {
    pub reason: String,
    pub fallback: String,
}

impl RenderDegradation {
    /// Degrade to [`NO_DATA`].
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            fallback: NO_DATA.to_owned(),
        }
    }

    /// Degrade to a specific best-effort text.
    pub fn with_fallback(reason: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            fallback: fallback.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parts
// ---------------------------------------------------------------------------

/// A sub-element a component mounts. The first declared part is the root.
#[derive(Debug, Clone)]
pub struct PartSpec {
    pub name: &'static str,
    /// Boolean prop gating the part; the part is only allocated while it is true.
    pub show_prop: Option<&'static str>,
    pub table: PartTable,
}

impl PartSpec {
    pub fn new(table: PartTable) -> Self {
        Self {
            name: table.part(),
            show_prop: None,
            table,
        }
    }

    /// Gate the part on a boolean prop (builder).
    pub fn shown_by(mut self, prop: &'static str) -> Self {
        self.show_prop = Some(prop);
        self
    }

    /// Whether `props` enable this part. Missing flags count as shown.
    pub fn is_shown(&self, props: &Props) -> bool {
        self.show_prop.map_or(true, |prop| props.flag(prop, true))
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Read-only inputs to style selection and rendering.
pub struct View<'a, C: Component + ?Sized> {
    pub props: &'a Props,
    pub state: &'a C::State,
    /// Clock reading for this render pass.
    pub now: Duration,
    pub theme: &'a Theme,
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// A key binding declared by a component.
pub struct KeyBinding<C: Component + ?Sized> {
    pub keys: Vec<Key>,
    /// Screen-level bindings fire regardless of focus; others need the widget
    /// root (or a descendant) focused.
    pub screen: bool,
    pub action: fn(&mut Mutation<'_, C>),
}

impl<C: Component + ?Sized> KeyBinding<C> {
    /// Fires while the widget has focus.
    pub fn focused(keys: &[Key], action: fn(&mut Mutation<'_, C>)) -> Self {
        Self {
            keys: keys.to_vec(),
            screen: false,
            action,
        }
    }

    /// Fires regardless of focus.
    pub fn screen(keys: &[Key], action: fn(&mut Mutation<'_, C>)) -> Self {
        Self {
            keys: keys.to_vec(),
            screen: true,
            action,
        }
    }
}

/// Where a mouse event landed inside a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseHit {
    pub event: MouseEvent,
    /// Content line under the pointer, counted from the top of the part's
    /// inner area. `None` when the pointer is on border or padding.
    pub line: Option<usize>,
}

/// A mouse binding on one part.
pub struct MouseBinding<C: Component + ?Sized> {
    pub part: &'static str,
    pub kind: MouseKind,
    pub action: fn(&mut Mutation<'_, C>, MouseHit),
}

impl<C: Component + ?Sized> MouseBinding<C> {
    pub fn new(part: &'static str, kind: MouseKind, action: fn(&mut Mutation<'_, C>, MouseHit)) -> Self {
        Self { part, kind, action }
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Static description of a widget type.
pub trait Component: 'static {
    /// Registry name, e.g. `"StatusIndicator"`.
    const NAME: &'static str;

    /// Internal mutable state (current status, log buffer, selection, …).
    type State: 'static;

    fn schema() -> ComponentSchema;

    /// Declared parts; the first is the root element.
    fn parts() -> Vec<PartSpec>;

    /// Initial state from validated props.
    fn init_state(props: &Props, now: Duration) -> Self::State;

    /// Axis selection for `part`.
    fn axes(part: &str, view: &View<'_, Self>) -> Axes;

    /// Text for `part`. Errors degrade to their fallback text.
    fn render(part: &str, view: &View<'_, Self>) -> Result<String, RenderDegradation>;

    fn key_bindings() -> Vec<KeyBinding<Self>> {
        Vec::new()
    }

    fn mouse_bindings() -> Vec<MouseBinding<Self>> {
        Vec::new()
    }

    /// Runs on every refresh tick, before the re-render.
    fn on_tick(_m: &mut Mutation<'_, Self>) {}

    /// Runs after `update()` accepted new props, before the re-render.
    fn on_props_changed(_m: &mut Mutation<'_, Self>) {}
}
