//! Input event types, decoupled from crossterm.
//!
//! The surface dispatches [`KeyEvent`]s and [`MouseEvent`]s to handlers bound
//! by widgets. Crossterm events convert via `TryFrom`, so nothing outside this
//! module and the terminal driver depends on crossterm's event types.

use std::ops::BitOr;

// ---------------------------------------------------------------------------
// Key / Modifiers
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    /// Whether this event's key is one of `keys`. Shift on a character key
    /// is ignored, since the character already carries it.
    pub fn matches(&self, keys: &[Key]) -> bool {
        let unmodified = match self.code {
            Key::Char(_) => self.modifiers.is_empty() || self.modifiers == Modifiers::SHIFT,
            _ => self.modifiers.is_empty(),
        };
        unmodified && keys.contains(&self.code)
    }
}

// ---------------------------------------------------------------------------
// MouseEvent
// ---------------------------------------------------------------------------

/// The mouse interactions handlers can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseKind {
    Click,
    Release,
    MouseOver,
    WheelUp,
    WheelDown,
}

/// A mouse interaction at a screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub x: u16,
    pub y: u16,
}

impl MouseEvent {
    pub fn new(kind: MouseKind, x: u16, y: u16) -> Self {
        Self { kind, x, y }
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
}

// ---------------------------------------------------------------------------
// crossterm conversions
// ---------------------------------------------------------------------------

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;
    let mut out = Modifiers::NONE;
    if m.contains(KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl TryFrom<crossterm::event::KeyEvent> for KeyEvent {
    type Error = ();

    fn try_from(ct: crossterm::event::KeyEvent) -> Result<Self, Self::Error> {
        use crossterm::event::{KeyCode, KeyEventKind};
        if ct.kind == KeyEventKind::Release {
            return Err(());
        }
        let code = match ct.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => return Err(()),
        };
        Ok(KeyEvent::new(code, convert_modifiers(ct.modifiers)))
    }
}

impl TryFrom<crossterm::event::Event> for InputEvent {
    type Error = ();

    /// Fails for events the surface does not dispatch (focus, paste, drags).
    fn try_from(ct: crossterm::event::Event) -> Result<Self, Self::Error> {
        use crossterm::event::{Event, MouseButton, MouseEventKind};
        match ct {
            Event::Key(ke) => KeyEvent::try_from(ke).map(InputEvent::Key),
            Event::Mouse(me) => {
                let kind = match me.kind {
                    MouseEventKind::Down(MouseButton::Left) => MouseKind::Click,
                    MouseEventKind::Up(MouseButton::Left) => MouseKind::Release,
                    MouseEventKind::Moved => MouseKind::MouseOver,
                    MouseEventKind::ScrollUp => MouseKind::WheelUp,
                    MouseEventKind::ScrollDown => MouseKind::WheelDown,
                    _ => return Err(()),
                };
                Ok(InputEvent::Mouse(MouseEvent::new(kind, me.column, me.row)))
            }
            Event::Resize(width, height) => Ok(InputEvent::Resize { width, height }),
            _ => Err(()),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn modifiers_combine() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn matches_plain_keys() {
        let ev = KeyEvent::plain(Key::Char('p'));
        assert!(ev.matches(&[Key::Char('p'), Key::Char('P')]));
        assert!(!ev.matches(&[Key::Char('q')]));
    }

    #[test]
    fn matches_ignores_shift_on_chars() {
        let ev = KeyEvent::new(Key::Char('P'), Modifiers::SHIFT);
        assert!(ev.matches(&[Key::Char('P')]));
    }

    #[test]
    fn matches_rejects_ctrl() {
        let ev = KeyEvent::new(Key::Char('c'), Modifiers::CTRL);
        assert!(!ev.matches(&[Key::Char('c')]));
        let ev = KeyEvent::new(Key::Up, Modifiers::SHIFT);
        assert!(!ev.matches(&[Key::Up]));
    }

    #[test]
    fn from_crossterm_key() {
        let ct = crossterm::event::KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        let ke = KeyEvent::try_from(ct).unwrap();
        assert_eq!(ke.code, Key::Char('x'));
        assert!(ke.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn from_crossterm_unsupported_key() {
        let ct = crossterm::event::KeyEvent::new(KeyCode::CapsLock, KeyModifiers::NONE);
        assert!(KeyEvent::try_from(ct).is_err());
    }

    #[test]
    fn from_crossterm_resize() {
        let ev = InputEvent::try_from(crossterm::event::Event::Resize(100, 40)).unwrap();
        assert_eq!(ev, InputEvent::Resize { width: 100, height: 40 });
    }

    #[test]
    fn from_crossterm_click() {
        let ct = crossterm::event::Event::Mouse(crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            column: 3,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            InputEvent::try_from(ct).unwrap(),
            InputEvent::Mouse(MouseEvent::new(MouseKind::Click, 3, 7))
        );
    }

    #[test]
    fn from_crossterm_focus_is_dropped() {
        assert!(InputEvent::try_from(crossterm::event::Event::FocusGained).is_err());
    }
}
