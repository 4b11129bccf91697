//! Event system: per-instance event bus and input event types.

pub mod bus;
pub mod input;

pub use bus::{EventBus, Listener, ListenerId, SharedBus, WidgetEvent};
pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseEvent, MouseKind};
