//! The terminal surface collaborator.
//!
//! Widgets never touch the terminal directly. They create box-like elements
//! on a [`Surface`], push resolved styles and text into them, and register
//! input handlers. [`HeadlessSurface`] is the in-process implementation used
//! both by tests and, with a [`Driver`](crate::render::Driver), by the app.

pub mod headless;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::new_key_type;

use crate::event::{InputEvent, Key, KeyEvent, MouseEvent, MouseKind};
use crate::geometry::Region;
use crate::style::ResolvedStyle;

pub use headless::{Element, HeadlessSurface};

new_key_type! {
    /// Handle to one surface element.
    pub struct ElementId;

    /// Handle to one key or mouse binding.
    pub struct BindingId;
}

pub type KeyHandler = Rc<dyn Fn(&KeyEvent)>;
pub type MouseHandler = Rc<dyn Fn(&MouseEvent)>;

/// Failures reported by a surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("element {0:?} does not exist")]
    MissingElement(ElementId),
    #[error("surface is already borrowed")]
    Busy,
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// Operations a widget may perform on the terminal surface.
pub trait Surface {
    /// Create an element under `parent` (or at top level).
    fn create_element(
        &mut self,
        parent: Option<ElementId>,
        style: &ResolvedStyle,
    ) -> Result<ElementId, SurfaceError>;

    fn set_content(&mut self, element: ElementId, content: &str) -> Result<(), SurfaceError>;

    fn set_style(&mut self, element: ElementId, style: &ResolvedStyle) -> Result<(), SurfaceError>;

    fn set_visible(&mut self, element: ElementId, visible: bool) -> Result<(), SurfaceError>;

    fn show(&mut self, element: ElementId) -> Result<(), SurfaceError> {
        self.set_visible(element, true)
    }

    fn hide(&mut self, element: ElementId) -> Result<(), SurfaceError> {
        self.set_visible(element, false)
    }

    fn focus(&mut self, element: ElementId) -> Result<(), SurfaceError>;

    /// Drop focus if `element` holds it.
    fn blur(&mut self, element: ElementId) -> Result<(), SurfaceError>;

    /// Remove `element`, its descendants, and every binding attached to them.
    fn destroy(&mut self, element: ElementId) -> Result<(), SurfaceError>;

    /// Bind `handler` to `keys`. With an element, the handler fires while that
    /// element or one of its descendants has focus; without one it is a
    /// screen-level binding.
    fn bind_key(
        &mut self,
        element: Option<ElementId>,
        keys: &[Key],
        handler: KeyHandler,
    ) -> Result<BindingId, SurfaceError>;

    /// Bind `handler` to mouse interactions of `kind` over `element`.
    fn on_mouse(
        &mut self,
        element: ElementId,
        kind: MouseKind,
        handler: MouseHandler,
    ) -> Result<BindingId, SurfaceError>;

    /// Remove one binding. Returns whether it existed.
    fn unbind(&mut self, binding: BindingId) -> bool;

    /// Where `element` was last laid out, if it is displayed.
    fn region_of(&self, element: ElementId) -> Option<Region>;

    /// Handlers an event should reach, in dispatch order.
    fn key_handlers(&self, event: &KeyEvent) -> Vec<KeyHandler>;

    fn mouse_handlers(&self, event: &MouseEvent) -> Vec<MouseHandler>;

    /// Compose and flush the current element tree.
    fn render(&mut self);
}

// ---------------------------------------------------------------------------
// SurfaceHandle
// ---------------------------------------------------------------------------

/// Shared access to the surface for every widget mounted on it.
#[derive(Clone)]
pub struct SurfaceHandle(Rc<RefCell<dyn Surface>>);

impl SurfaceHandle {
    pub fn new<S: Surface + 'static>(surface: S) -> Self {
        Self(Rc::new(RefCell::new(surface)))
    }

    /// Wrap an existing shared surface, keeping the caller's typed handle.
    pub fn from_shared<S: Surface + 'static>(shared: Rc<RefCell<S>>) -> Self {
        Self(shared)
    }

    /// Run `f` against the surface.
    ///
    /// Fails with [`SurfaceError::Busy`] when called from inside another
    /// surface operation.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut dyn Surface) -> Result<R, SurfaceError>,
    ) -> Result<R, SurfaceError> {
        let mut surface = self.0.try_borrow_mut().map_err(|_| SurfaceError::Busy)?;
        f(&mut *surface)
    }

    pub fn render(&self) -> Result<(), SurfaceError> {
        self.with(|s| {
            s.render();
            Ok(())
        })
    }

    /// Deliver a key to its handlers. Returns how many ran.
    ///
    /// Handlers are collected first and invoked with the surface released, so
    /// they may update elements.
    pub fn dispatch_key(&self, event: &KeyEvent) -> usize {
        let handlers = match self.0.try_borrow() {
            Ok(surface) => surface.key_handlers(event),
            Err(_) => return 0,
        };
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Deliver a mouse event to its handlers. Returns how many ran.
    pub fn dispatch_mouse(&self, event: &MouseEvent) -> usize {
        let handlers = match self.0.try_borrow() {
            Ok(surface) => surface.mouse_handlers(event),
            Err(_) => return 0,
        };
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Route an input event. Resize is handled by the owner of the surface.
    pub fn dispatch(&self, event: &InputEvent) -> usize {
        match event {
            InputEvent::Key(key) => self.dispatch_key(key),
            InputEvent::Mouse(mouse) => self.dispatch_mouse(mouse),
            InputEvent::Resize { .. } => 0,
        }
    }
}

impl fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SurfaceHandle")
    }
}
