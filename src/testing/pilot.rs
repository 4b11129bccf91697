//! Pilot: drive a headless [`App`] from tests.
//!
//! The pilot owns an app without a terminal and exposes the same inputs a
//! user would produce (keys, clicks, resizes) plus a virtual clock, so
//! widget behavior can be exercised end to end without timing flakiness.
//!
//! # Examples
//!
//! ```ignore
//! use trellis_tui::testing::Pilot;
//! use trellis_tui::widgets::StatusIndicator;
//! use trellis_tui::Props;
//!
//! let mut pilot = Pilot::new(40, 10);
//! let status = pilot.mount::<StatusIndicator>(Props::new()).unwrap();
//! pilot.focus_next();
//! pilot.press_key(Key::Char('r'));
//! assert!(pilot.screen_text().contains("RUNNING"));
//! ```

use std::time::Duration;

use crate::app::{App, AppConfig};
use crate::error::WidgetError;
use crate::event::{InputEvent, Key, KeyEvent, Modifiers, MouseEvent, MouseKind};
use crate::props::Props;
use crate::surface::ElementId;
use crate::widget::{Component, Env, Widget};

/// A headless driver for an [`App`].
pub struct Pilot {
    app: App,
}

impl Pilot {
    /// A pilot over a headless app of `width` x `height` cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_config(AppConfig::new(), width, height)
    }

    /// A pilot using an explicit config.
    pub fn with_config(config: AppConfig, width: u16, height: u16) -> Self {
        Self {
            app: App::headless(config, width, height),
        }
    }

    /// Construct a widget on the pilot's surface.
    pub fn mount<C: Component>(&self, props: Props) -> Result<Widget<C>, WidgetError> {
        Widget::new(props, self.app.env())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Press a key without modifiers. Returns how many handlers ran.
    pub fn press_key(&mut self, key: Key) -> usize {
        self.press_key_with(key, Modifiers::NONE)
    }

    /// Press a key with modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> usize {
        self.app
            .handle_input(InputEvent::Key(KeyEvent::new(key, modifiers)))
    }

    /// Type each character of `text` as a separate key press.
    pub fn type_text(&mut self, text: &str) -> usize {
        text.chars().map(|c| self.press_key(Key::Char(c))).sum()
    }

    /// Click at (x, y).
    pub fn click(&mut self, x: u16, y: u16) -> usize {
        self.mouse(MouseKind::Click, x, y)
    }

    /// Send any mouse interaction at (x, y).
    pub fn mouse(&mut self, kind: MouseKind, x: u16, y: u16) -> usize {
        self.app
            .handle_input(InputEvent::Mouse(MouseEvent::new(kind, x, y)))
    }

    /// Resize the virtual terminal.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.app.handle_input(InputEvent::Resize { width, height });
    }

    /// Move focus to the next top-level widget, as Tab would.
    pub fn focus_next(&mut self) {
        self.app.cycle_focus(true);
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Advance the virtual clock by `ms` milliseconds. Returns how many
    /// timer callbacks fired.
    pub fn advance(&mut self, ms: u64) -> usize {
        match self.app.tick(Duration::from_millis(ms)) {
            Ok(fired) => fired,
            Err(err) => {
                tracing::warn!(%err, "headless flush failed");
                0
            }
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Borrow the underlying app immutably.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Borrow the underlying app mutably.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// The environment widgets are constructed with.
    pub fn env(&self) -> &Env {
        self.app.env()
    }

    /// Whether the app is still running (has not quit).
    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }

    /// Text content of one element.
    pub fn content(&self, element: ElementId) -> Option<String> {
        self.app
            .surface()
            .borrow()
            .content(element)
            .map(str::to_owned)
    }

    /// Number of surface flushes so far.
    pub fn render_count(&self) -> usize {
        self.app.surface().borrow().render_count()
    }

    /// The whole screen as plain text.
    pub fn screen_text(&self) -> String {
        super::snapshot::surface_to_string(&self.app.surface().borrow())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
