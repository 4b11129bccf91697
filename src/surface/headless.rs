//! In-process surface backed by a slotmap arena.
//!
//! Elements live in one `SlotMap`; parent/child links sit in secondary maps
//! so removing a subtree is O(subtree size). `render()` lays the tree out,
//! paints a frame, and keeps the diff against the previous frame for a
//! driver to pick up.

use std::collections::{HashSet, VecDeque};

use slotmap::{SecondaryMap, SlotMap};

use crate::event::{Key, KeyEvent, MouseEvent, MouseKind};
use crate::geometry::Region;
use crate::render::{chrome, content_lines, paint_box, CellUpdate, Compositor};
use crate::style::ResolvedStyle;

use super::{BindingId, ElementId, KeyHandler, MouseHandler, Surface, SurfaceError};

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// One box on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub style: ResolvedStyle,
    pub content: String,
    pub visible: bool,
}

enum Trigger {
    Keys(Vec<Key>, KeyHandler),
    Mouse(MouseKind, MouseHandler),
}

struct Binding {
    element: Option<ElementId>,
    trigger: Trigger,
}

// ---------------------------------------------------------------------------
// HeadlessSurface
// ---------------------------------------------------------------------------

pub struct HeadlessSurface {
    elements: SlotMap<ElementId, Element>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    roots: Vec<ElementId>,
    bindings: SlotMap<BindingId, Binding>,
    focused: Option<ElementId>,
    width: u16,
    height: u16,
    render_count: usize,
    frame: Option<Compositor>,
    pending: Vec<CellUpdate>,
}

impl HeadlessSurface {
    /// A surface of `width` x `height` cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            elements: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            roots: Vec::new(),
            bindings: SlotMap::with_key(),
            focused: None,
            width,
            height,
            render_count: 0,
            frame: None,
            pending: Vec::new(),
        }
    }

    // ── Inspection ───────────────────────────────────────────────────

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn content(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).map(|e| e.content.as_str())
    }

    pub fn style(&self, id: ElementId) -> Option<&ResolvedStyle> {
        self.elements.get(id).map(|e| &e.style)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Whether `id` and all of its ancestors are visible.
    pub fn is_displayed(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            match self.elements.get(node) {
                Some(element) if element.visible => current = self.parent.get(node).copied(),
                _ => return false,
            }
        }
        true
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent.get(id).copied()
    }

    /// Top-level elements in creation order.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Number of completed `render()` flushes.
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Change the screen size. The next flush repaints every cell.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.frame = None;
    }

    /// The last flushed frame.
    pub fn frame(&self) -> Option<&Compositor> {
        self.frame.as_ref()
    }

    /// Cell changes produced by the last flushes, oldest first.
    pub fn take_updates(&mut self) -> Vec<CellUpdate> {
        std::mem::take(&mut self.pending)
    }

    // ── Layout & painting ────────────────────────────────────────────

    /// Place every displayed element, parents before children.
    ///
    /// Elements with an explicit `top`/`left` sit at that offset inside their
    /// parent's inner area; elements without `top` flow below the previous
    /// sibling. Width defaults to the remaining parent width, height to the
    /// content plus border and padding.
    pub fn layout(&self) -> Vec<(ElementId, Region)> {
        let mut out = Vec::new();
        let screen = Region::new(0, 0, i32::from(self.width), i32::from(self.height));
        let mut cursor = screen.y;
        for &root in &self.roots {
            if let Some(bottom) = self.place(root, screen, cursor, &mut out) {
                cursor = bottom;
            }
        }
        out
    }

    /// Lay out `id` inside `area`; returns its bottom edge when displayed.
    fn place(
        &self,
        id: ElementId,
        area: Region,
        cursor: i32,
        out: &mut Vec<(ElementId, Region)>,
    ) -> Option<i32> {
        let element = self.elements.get(id).filter(|e| e.visible)?;
        let style = &element.style;
        let x = area.x + style.left.map_or(0, i32::from);
        let y = style.top.map_or(cursor, |top| area.y + i32::from(top));
        let width = style
            .width
            .map_or(area.right() - x, i32::from)
            .max(0);

        let slot = out.len();
        out.push((id, Region::EMPTY));

        let insets = chrome(style);
        let inner = Region::new(x, y, width, i32::MAX / 4).shrink(insets);
        let lines = content_lines(style, &element.content).len() as i32;
        let mut child_cursor = inner.y + lines;
        let mut extent = lines;
        for &child in self.children(id) {
            if let Some(bottom) = self.place(child, inner, child_cursor, out) {
                child_cursor = bottom;
                extent = extent.max(bottom - inner.y);
            }
        }

        let height = style
            .height
            .map_or(extent + i32::from(insets.vertical()), i32::from);
        out[slot].1 = Region::new(x, y, width, height);
        Some(y + height)
    }

    /// Paint the current tree into a fresh frame.
    pub fn compose(&self) -> Compositor {
        let mut frame = Compositor::new(self.width, self.height);
        let bounds = frame.bounds();
        for (id, region) in self.layout() {
            if let Some(element) = self.elements.get(id) {
                let strips = paint_box(&element.style, &element.content, region);
                frame.place_strips(&strips, bounds);
            }
        }
        frame
    }

    /// The deepest displayed element under (x, y).
    pub fn element_at(&self, x: u16, y: u16) -> Option<ElementId> {
        self.layout()
            .into_iter()
            .rev()
            .find(|(_, region)| region.contains(i32::from(x), i32::from(y)))
            .map(|(id, _)| id)
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn require(&self, id: ElementId) -> Result<(), SurfaceError> {
        if self.elements.contains_key(id) {
            Ok(())
        } else {
            Err(SurfaceError::MissingElement(id))
        }
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element, SurfaceError> {
        self.elements
            .get_mut(id)
            .ok_or(SurfaceError::MissingElement(id))
    }

    /// `id` followed by its ancestors.
    fn lineage(&self, id: ElementId) -> Vec<ElementId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(&parent) = self.parent.get(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

impl Surface for HeadlessSurface {
    fn create_element(
        &mut self,
        parent: Option<ElementId>,
        style: &ResolvedStyle,
    ) -> Result<ElementId, SurfaceError> {
        if let Some(parent) = parent {
            self.require(parent)?;
        }
        let id = self.elements.insert(Element {
            style: style.clone(),
            content: String::new(),
            visible: true,
        });
        self.children.insert(id, Vec::new());
        match parent {
            Some(parent) => {
                self.parent.insert(id, parent);
                if let Some(siblings) = self.children.get_mut(parent) {
                    siblings.push(id);
                }
            }
            None => self.roots.push(id),
        }
        Ok(id)
    }

    fn set_content(&mut self, element: ElementId, content: &str) -> Result<(), SurfaceError> {
        let el = self.get_mut(element)?;
        if el.content != content {
            el.content = content.to_owned();
        }
        Ok(())
    }

    fn set_style(&mut self, element: ElementId, style: &ResolvedStyle) -> Result<(), SurfaceError> {
        self.get_mut(element)?.style = style.clone();
        Ok(())
    }

    fn set_visible(&mut self, element: ElementId, visible: bool) -> Result<(), SurfaceError> {
        self.get_mut(element)?.visible = visible;
        Ok(())
    }

    fn focus(&mut self, element: ElementId) -> Result<(), SurfaceError> {
        self.require(element)?;
        self.focused = Some(element);
        Ok(())
    }

    fn blur(&mut self, element: ElementId) -> Result<(), SurfaceError> {
        self.require(element)?;
        if self.focused == Some(element) {
            self.focused = None;
        }
        Ok(())
    }

    fn destroy(&mut self, element: ElementId) -> Result<(), SurfaceError> {
        self.require(element)?;

        match self.parent.remove(element) {
            Some(parent) => {
                if let Some(siblings) = self.children.get_mut(parent) {
                    siblings.retain(|&child| child != element);
                }
            }
            None => self.roots.retain(|&root| root != element),
        }

        let mut removed = HashSet::new();
        let mut queue = VecDeque::from([element]);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            self.elements.remove(current);
            removed.insert(current);
        }

        self.bindings
            .retain(|_, b| b.element.map_or(true, |el| !removed.contains(&el)));
        if self.focused.is_some_and(|f| removed.contains(&f)) {
            self.focused = None;
        }
        tracing::trace!(?element, removed = removed.len(), "elements destroyed");
        Ok(())
    }

    fn bind_key(
        &mut self,
        element: Option<ElementId>,
        keys: &[Key],
        handler: KeyHandler,
    ) -> Result<BindingId, SurfaceError> {
        if let Some(element) = element {
            self.require(element)?;
        }
        Ok(self.bindings.insert(Binding {
            element,
            trigger: Trigger::Keys(keys.to_vec(), handler),
        }))
    }

    fn on_mouse(
        &mut self,
        element: ElementId,
        kind: MouseKind,
        handler: MouseHandler,
    ) -> Result<BindingId, SurfaceError> {
        self.require(element)?;
        Ok(self.bindings.insert(Binding {
            element: Some(element),
            trigger: Trigger::Mouse(kind, handler),
        }))
    }

    fn unbind(&mut self, binding: BindingId) -> bool {
        self.bindings.remove(binding).is_some()
    }

    fn region_of(&self, element: ElementId) -> Option<Region> {
        self.layout()
            .into_iter()
            .find(|(id, _)| *id == element)
            .map(|(_, region)| region)
    }

    /// Focused-element bindings (innermost first), then screen-level ones,
    /// each group in registration order.
    fn key_handlers(&self, event: &KeyEvent) -> Vec<KeyHandler> {
        let matching = |b: &Binding| match &b.trigger {
            Trigger::Keys(keys, handler) if event.matches(keys) => Some(handler.clone()),
            _ => None,
        };
        let mut handlers = Vec::new();
        if let Some(focused) = self.focused {
            for el in self.lineage(focused) {
                handlers.extend(
                    self.bindings
                        .values()
                        .filter(|b| b.element == Some(el))
                        .filter_map(matching),
                );
            }
        }
        handlers.extend(
            self.bindings
                .values()
                .filter(|b| b.element.is_none())
                .filter_map(matching),
        );
        handlers
    }

    /// Bindings of the element under the pointer, then of its ancestors.
    fn mouse_handlers(&self, event: &MouseEvent) -> Vec<MouseHandler> {
        let Some(target) = self.element_at(event.x, event.y) else {
            return Vec::new();
        };
        let mut handlers = Vec::new();
        for el in self.lineage(target) {
            handlers.extend(self.bindings.values().filter_map(|b| match &b.trigger {
                Trigger::Mouse(kind, handler) if b.element == Some(el) && *kind == event.kind => {
                    Some(handler.clone())
                }
                _ => None,
            }));
        }
        handlers
    }

    fn render(&mut self) {
        let frame = self.compose();
        let previous = self
            .frame
            .take()
            .unwrap_or_else(|| Compositor::new(self.width, self.height));
        self.pending.extend(frame.diff(&previous));
        self.frame = Some(frame);
        self.render_count += 1;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
