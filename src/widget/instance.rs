//! The generic widget runtime.
//!
//! [`Widget<C>`] owns one mounted instance of a [`Component`]: validated props,
//! component state, allocated surface elements, bindings, the refresh timer,
//! and the event bus. Every component shares this code path; components only
//! describe themselves.
//!
//! All state sits behind one `Rc<RefCell<_>>`. Input handlers and timer
//! callbacks hold a `Weak` to it, so a dropped widget silently stops reacting.
//! Listener callbacks run after the borrow is released, which lets them call
//! back into the widget.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde_json::Value;

use crate::error::{ValidationError, WidgetError};
use crate::event::{KeyEvent, ListenerId, MouseEvent, SharedBus, WidgetEvent};
use crate::props::Props;
use crate::render::chrome;
use crate::schema::{SchemaRegistry, ValidationResult};
use crate::style::{resolve_style, ResolvedStyle, StyleRecord, Theme};
use crate::surface::{
    BindingId, ElementId, HeadlessSurface, KeyHandler, MouseHandler, SurfaceHandle,
};
use crate::timer::{cancel_if_present, Scheduler, TimerHandle};

use super::component::{Component, MouseHit, PartSpec, View};
use super::lifecycle::{LifecycleState, LifecycleTracker, Transition};

// ---------------------------------------------------------------------------
// Env
// ---------------------------------------------------------------------------

/// Collaborators every widget is constructed with.
#[derive(Clone)]
pub struct Env {
    pub registry: Rc<SchemaRegistry>,
    pub theme: Rc<Theme>,
    pub surface: SurfaceHandle,
    pub scheduler: Scheduler,
}

impl Env {
    pub fn new(
        registry: Rc<SchemaRegistry>,
        theme: Rc<Theme>,
        surface: SurfaceHandle,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            registry,
            theme,
            surface,
            scheduler,
        }
    }

    /// Built-in schemas, the dark theme, a fresh clock, and an in-memory
    /// surface of the given size. The typed surface is returned for inspection.
    pub fn headless(width: u16, height: u16) -> (Self, Rc<RefCell<HeadlessSurface>>) {
        let surface = Rc::new(RefCell::new(HeadlessSurface::new(width, height)));
        let env = Self::new(
            Rc::new(SchemaRegistry::with_builtins()),
            Rc::new(Theme::dark()),
            SurfaceHandle::from_shared(surface.clone()),
            Scheduler::new(),
        );
        (env, surface)
    }

    /// Replace the theme (builder).
    pub fn with_theme(mut self, theme: Rc<Theme>) -> Self {
        self.theme = theme;
        self
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Mutable access to a widget during one operation.
///
/// Events emitted here are delivered once the operation (and its re-render)
/// has finished.
pub struct Mutation<'a, C: Component + ?Sized> {
    props: &'a Props,
    state: &'a mut C::State,
    now: Duration,
    clock: &'a Scheduler,
    /// Queued events with the clock reading at which each was emitted.
    events: Vec<(String, Value, Duration)>,
    render: bool,
}

impl<C: Component + ?Sized> Mutation<'_, C> {
    pub fn props(&self) -> &Props {
        self.props
    }

    pub fn state(&self) -> &C::State {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut C::State {
        self.state
    }

    /// Clock reading at the start of the operation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `kind` for the widget's listeners, stamped with the current
    /// clock reading.
    pub fn emit(&mut self, kind: &str, data: Value) {
        self.events.push((kind.to_owned(), data, self.clock.now()));
    }

    /// Leave the surface untouched after this operation.
    pub fn skip_render(&mut self) {
        self.render = false;
    }
}

// ---------------------------------------------------------------------------
// Inner
// ---------------------------------------------------------------------------

struct Inner<C: Component> {
    props: Props,
    state: C::State,
    theme: Rc<Theme>,
    registry: Rc<SchemaRegistry>,
    surface: SurfaceHandle,
    scheduler: Scheduler,
    bus: SharedBus,
    lifecycle: LifecycleTracker,
    parts: Vec<PartSpec>,
    /// Allocated element per part, aligned with `parts`.
    elements: Vec<Option<ElementId>>,
    screen_bindings: Vec<BindingId>,
    timer: Option<TimerHandle>,
    this: Weak<RefCell<Inner<C>>>,
}

impl<C: Component> Inner<C> {
    fn ensure_live(&self) -> Result<(), WidgetError> {
        if self.lifecycle.state().is_destroyed() {
            Err(WidgetError::Destroyed { component: C::NAME })
        } else {
            Ok(())
        }
    }

    fn view(&self) -> View<'_, C> {
        View {
            props: &self.props,
            state: &self.state,
            now: self.scheduler.now(),
            theme: &self.theme,
        }
    }

    fn part_index(&self, name: &str) -> Option<usize> {
        self.parts.iter().position(|p| p.name == name)
    }

    /// Style declarations from the `style` prop, applied to the root part.
    fn custom_style(&self) -> Option<StyleRecord> {
        let text = self.props.get_str("style")?;
        match text.parse::<StyleRecord>() {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(component = C::NAME, %err, "ignoring unparsable style prop");
                None
            }
        }
    }

    fn part_style(&self, index: usize) -> ResolvedStyle {
        let part = &self.parts[index];
        let mut axes = C::axes(part.name, &self.view());
        if index == 0 {
            if let Some(custom) = self.custom_style() {
                axes = axes.custom(custom);
            }
        }
        resolve_style(&self.theme, &part.table, &axes)
    }

    fn part_text(&self, index: usize) -> String {
        let part = &self.parts[index];
        match C::render(part.name, &self.view()) {
            Ok(text) => text,
            Err(degradation) => {
                tracing::warn!(
                    component = C::NAME,
                    part = part.name,
                    reason = %degradation,
                    "render degraded"
                );
                degradation.fallback
            }
        }
    }

    // ── Mounting ──

    fn mount(&mut self) -> Result<(), WidgetError> {
        self.sync_parts()?;
        let root = self.elements[0].ok_or(WidgetError::Destroyed { component: C::NAME })?;
        for binding in C::key_bindings() {
            let handler = self.key_handler(binding.action);
            let target = (!binding.screen).then_some(root);
            let id = self
                .surface
                .with(|s| s.bind_key(target, &binding.keys, handler))?;
            if binding.screen {
                self.screen_bindings.push(id);
            }
        }
        self.restart_timer();
        self.lifecycle.transition(LifecycleState::Mounted, self.scheduler.now());
        tracing::debug!(component = C::NAME, parts = self.parts.len(), "mounted");
        Ok(())
    }

    /// Allocate or release parts so that exactly the shown ones exist.
    ///
    /// Non-root parts are recreated in declaration order whenever the set
    /// changes, which keeps the surface's sibling order stable.
    fn sync_parts(&mut self) -> Result<(), WidgetError> {
        let wanted: Vec<bool> = self
            .parts
            .iter()
            .enumerate()
            .map(|(index, part)| index == 0 || part.is_shown(&self.props))
            .collect();
        let current: Vec<bool> = self.elements.iter().map(Option::is_some).collect();
        if wanted == current {
            return Ok(());
        }

        let surface = self.surface.clone();
        for slot in self.elements.iter_mut().skip(1) {
            if let Some(id) = slot.take() {
                if let Err(err) = surface.with(|s| s.destroy(id)) {
                    tracing::warn!(component = C::NAME, %err, "failed to release part");
                }
            }
        }

        let mut created = Vec::new();
        let root = match self.elements[0] {
            Some(root) => root,
            None => {
                let style = self.part_style(0);
                let root = surface.with(|s| s.create_element(None, &style))?;
                self.elements[0] = Some(root);
                created.push(0);
                root
            }
        };
        for index in 1..self.parts.len() {
            if !wanted[index] {
                continue;
            }
            let style = self.part_style(index);
            let id = surface.with(|s| s.create_element(Some(root), &style))?;
            self.elements[index] = Some(id);
            created.push(index);
        }

        for binding in C::mouse_bindings() {
            let Some(index) = self.part_index(binding.part) else {
                tracing::warn!(component = C::NAME, part = binding.part, "mouse binding on unknown part");
                continue;
            };
            if !created.contains(&index) {
                continue;
            }
            if let Some(id) = self.elements[index] {
                let handler = self.mouse_handler(index, binding.action);
                surface.with(|s| s.on_mouse(id, binding.kind, handler))?;
            }
        }
        Ok(())
    }

    fn key_handler(&self, action: fn(&mut Mutation<'_, C>)) -> KeyHandler {
        let this = self.this.clone();
        Rc::new(move |_event: &KeyEvent| {
            if let Some(cell) = this.upgrade() {
                if let Err(err) = mutate_cell(&cell, action) {
                    tracing::debug!(component = C::NAME, %err, "key binding skipped");
                }
            }
        })
    }

    fn mouse_handler(
        &self,
        index: usize,
        action: fn(&mut Mutation<'_, C>, MouseHit),
    ) -> MouseHandler {
        let this = self.this.clone();
        Rc::new(move |event: &MouseEvent| {
            let Some(cell) = this.upgrade() else { return };
            let hit = match cell.try_borrow() {
                Ok(inner) => inner.hit(index, *event),
                Err(_) => return,
            };
            if let Err(err) = mutate_cell(&cell, |m| action(m, hit)) {
                tracing::debug!(component = C::NAME, %err, "mouse binding skipped");
            }
        })
    }

    /// Locate `event` relative to the content area of part `index`.
    fn hit(&self, index: usize, event: MouseEvent) -> MouseHit {
        let region = self.elements[index]
            .and_then(|id| self.surface.with(|s| Ok(s.region_of(id))).ok().flatten());
        let line = region.and_then(|region| {
            let inner = region.shrink(chrome(&self.part_style(index)));
            let (x, y) = (i32::from(event.x), i32::from(event.y));
            inner.contains(x, y).then(|| (y - inner.y) as usize)
        });
        MouseHit { event, line }
    }

    // ── Timer ──

    fn refresh_period(&self) -> Option<Duration> {
        let ms = self.props.get_f64("refreshInterval")?;
        (ms.is_finite() && ms > 0.0).then(|| Duration::from_millis(ms as u64))
    }

    fn restart_timer(&mut self) {
        cancel_if_present(&mut self.timer);
        let Some(period) = self.refresh_period() else {
            return;
        };
        let this = self.this.clone();
        let tick: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(cell) = this.upgrade() {
                if let Err(err) = mutate_cell(&cell, |m| C::on_tick(m)) {
                    tracing::debug!(component = C::NAME, %err, "refresh tick skipped");
                }
            }
        });
        self.timer = Some(self.scheduler.set_interval(period, tick));
        tracing::trace!(component = C::NAME, ?period, "refresh timer started");
    }

    // ── Rendering ──

    fn render(&mut self) -> Result<(), WidgetError> {
        self.ensure_live()?;
        let now = self.scheduler.now();
        self.lifecycle.transition(LifecycleState::Rendering, now);
        let painted = self.paint();
        self.lifecycle.transition(LifecycleState::Idle, now);
        painted
    }

    fn paint(&mut self) -> Result<(), WidgetError> {
        self.sync_parts()?;
        let surface = self.surface.clone();
        for index in 0..self.parts.len() {
            let Some(id) = self.elements[index] else {
                continue;
            };
            let style = self.part_style(index);
            let text = self.part_text(index);
            surface.with(|s| {
                s.set_style(id, &style)?;
                s.set_content(id, &text)
            })?;
        }
        surface.render()?;
        Ok(())
    }

    // ── Teardown ──

    /// Release everything the widget holds. Safe to call repeatedly.
    fn teardown(&mut self) {
        if self.lifecycle.state().is_destroyed() {
            return;
        }
        cancel_if_present(&mut self.timer);
        if !self.bus.clear() {
            tracing::warn!(component = C::NAME, "listeners busy during cleanup");
        }
        for id in self.screen_bindings.drain(..) {
            if let Err(err) = self.surface.with(|s| Ok(s.unbind(id))) {
                tracing::warn!(component = C::NAME, %err, "failed to unbind key");
            }
        }
        if let Some(root) = self.elements.first_mut().and_then(Option::take) {
            if let Err(err) = self.surface.with(|s| s.destroy(root)) {
                tracing::warn!(component = C::NAME, %err, "failed to destroy root element");
            }
        }
        self.elements.iter_mut().for_each(|slot| *slot = None);
        self.lifecycle
            .transition(LifecycleState::Destroyed, self.scheduler.now());
        tracing::debug!(component = C::NAME, "destroyed");
    }
}

/// Run `f` against the widget, re-render, then deliver queued events.
fn mutate_cell<C: Component, R>(
    cell: &Rc<RefCell<Inner<C>>>,
    f: impl FnOnce(&mut Mutation<'_, C>) -> R,
) -> Result<R, WidgetError> {
    let (output, events, bus, rendered) = {
        let mut guard = cell
            .try_borrow_mut()
            .map_err(|_| WidgetError::Reentrant { component: C::NAME })?;
        let inner = &mut *guard;
        inner.ensure_live()?;
        let mut mutation = Mutation {
            props: &inner.props,
            state: &mut inner.state,
            now: inner.scheduler.now(),
            clock: &inner.scheduler,
            events: Vec::new(),
            render: true,
        };
        let output = f(&mut mutation);
        let Mutation { events, render, .. } = mutation;
        let rendered = if render { inner.render() } else { Ok(()) };
        (output, events, inner.bus.clone(), rendered)
    };
    for (kind, data, at) in events {
        bus.emit(&kind, data, at);
    }
    rendered.map(|()| output)
}

fn check(component: &'static str, result: ValidationResult) -> Result<Props, ValidationError> {
    for warning in &result.warnings {
        tracing::warn!(component, %warning, "prop validation warning");
    }
    match result.data {
        Some(props) if result.success => Ok(props),
        _ => {
            tracing::debug!(component, errors = result.errors.len(), "props rejected");
            Err(ValidationError {
                component: component.to_owned(),
                issues: result.errors,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// A mounted instance of component `C`.
///
/// Dropping the widget performs [`cleanup`](Widget::cleanup).
pub struct Widget<C: Component> {
    inner: Rc<RefCell<Inner<C>>>,
}

impl<C: Component> Widget<C> {
    /// Validate `props`, mount every shown part, start the refresh timer, and
    /// render once.
    pub fn new(props: Props, env: &Env) -> Result<Self, WidgetError> {
        let props = check(C::NAME, env.registry.validate(C::NAME, &props))?;
        let parts = C::parts();
        if parts.is_empty() {
            return Err(WidgetError::NoParts { component: C::NAME });
        }
        let now = env.scheduler.now();
        let mut lifecycle = LifecycleTracker::new(C::NAME);
        lifecycle.transition(LifecycleState::Validated, now);
        let state = C::init_state(&props, now);
        let elements = vec![None; parts.len()];

        let inner = Rc::new_cyclic(|this| {
            RefCell::new(Inner {
                props,
                state,
                theme: env.theme.clone(),
                registry: env.registry.clone(),
                surface: env.surface.clone(),
                scheduler: env.scheduler.clone(),
                bus: SharedBus::new(),
                lifecycle,
                parts,
                elements,
                screen_bindings: Vec::new(),
                timer: None,
                this: this.clone(),
            })
        });
        let widget = Self { inner };
        {
            let mut inner = widget.inner.borrow_mut();
            if let Err(err) = inner.mount().and_then(|()| inner.render()) {
                inner.teardown();
                return Err(err);
            }
        }
        Ok(widget)
    }

    fn borrow(&self) -> Result<Ref<'_, Inner<C>>, WidgetError> {
        self.inner
            .try_borrow()
            .map_err(|_| WidgetError::Reentrant { component: C::NAME })
    }

    fn borrow_mut(&self) -> Result<RefMut<'_, Inner<C>>, WidgetError> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| WidgetError::Reentrant { component: C::NAME })
    }

    /// Run `f` with mutable access, re-render (unless skipped), then deliver
    /// the events `f` emitted.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Mutation<'_, C>) -> R) -> Result<R, WidgetError> {
        mutate_cell(&self.inner, f)
    }

    /// Merge `partial` into the current props and re-validate the result.
    ///
    /// On rejection the previous props stay in effect.
    pub fn update(&self, partial: Props) -> Result<(), WidgetError> {
        let (merged, registry) = {
            let inner = self.borrow()?;
            inner.ensure_live()?;
            (inner.props.merged(&partial), inner.registry.clone())
        };
        let props = check(C::NAME, registry.validate(C::NAME, &merged))?;
        {
            let mut inner = self.borrow_mut()?;
            let interval_changed = inner.props.get("refreshInterval") != props.get("refreshInterval");
            inner.props = props;
            if interval_changed {
                inner.restart_timer();
            }
        }
        self.mutate(|m| C::on_props_changed(m))
    }

    /// Change the refresh period; zero stops the timer.
    pub fn set_refresh_interval(&self, ms: u64) -> Result<(), WidgetError> {
        self.update(Props::new().with("refreshInterval", ms))
    }

    /// Switch theme and re-render.
    pub fn set_theme(&self, theme: Rc<Theme>) -> Result<(), WidgetError> {
        {
            let mut inner = self.borrow_mut()?;
            inner.ensure_live()?;
            inner.theme = theme;
        }
        self.render()
    }

    /// Re-render with the current props and state.
    pub fn render(&self) -> Result<(), WidgetError> {
        self.borrow_mut()?.render()
    }

    /// Subscribe to widget events of kind `event`.
    pub fn on(
        &self,
        event: &str,
        listener: impl Fn(&WidgetEvent) + 'static,
    ) -> Result<ListenerId, WidgetError> {
        let bus = {
            let inner = self.borrow()?;
            inner.ensure_live()?;
            inner.bus.clone()
        };
        Ok(bus.on(event, listener))
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn off(&self, event: &str, id: ListenerId) -> Result<bool, WidgetError> {
        let bus = {
            let inner = self.borrow()?;
            inner.ensure_live()?;
            inner.bus.clone()
        };
        Ok(bus.off(event, id))
    }

    pub fn focus(&self) -> Result<(), WidgetError> {
        let (surface, root) = self.live_root()?;
        surface.with(|s| s.focus(root))?;
        Ok(())
    }

    pub fn blur(&self) -> Result<(), WidgetError> {
        let (surface, root) = self.live_root()?;
        surface.with(|s| s.blur(root))?;
        Ok(())
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), WidgetError> {
        let (surface, root) = self.live_root()?;
        surface.with(|s| {
            s.set_visible(root, visible)?;
            s.render();
            Ok(())
        })?;
        Ok(())
    }

    fn live_root(&self) -> Result<(SurfaceHandle, ElementId), WidgetError> {
        let inner = self.borrow()?;
        inner.ensure_live()?;
        let root = inner.elements[0].ok_or(WidgetError::Destroyed { component: C::NAME })?;
        Ok((inner.surface.clone(), root))
    }

    /// Stop the timer, drop listeners and bindings, and release every element.
    ///
    /// Idempotent. Nothing is rendered afterwards.
    pub fn cleanup(&self) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.teardown(),
            Err(_) => tracing::warn!(component = C::NAME, "cleanup skipped while the widget is busy"),
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle_state().is_destroyed()
    }

    /// Current lifecycle state. Reports `Rendering` when called mid-render.
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.inner
            .try_borrow()
            .map_or(LifecycleState::Rendering, |inner| inner.lifecycle.state())
    }

    /// Recorded lifecycle transitions, oldest first.
    pub fn history(&self) -> Vec<Transition> {
        self.inner
            .try_borrow()
            .map(|inner| inner.lifecycle.history().copied().collect())
            .unwrap_or_default()
    }

    /// Completed and in-flight render passes.
    pub fn render_count(&self) -> usize {
        self.inner
            .try_borrow()
            .map_or(0, |inner| inner.lifecycle.renders())
    }

    /// The normalized props currently in effect.
    pub fn props(&self) -> Result<Props, WidgetError> {
        Ok(self.borrow()?.props.clone())
    }

    /// Read the component state.
    pub fn with_state<R>(&self, f: impl FnOnce(&C::State) -> R) -> Result<R, WidgetError> {
        Ok(f(&self.borrow()?.state))
    }

    /// Element allocated for `part`, if it is currently shown. `None` while
    /// the widget is mid-operation.
    pub fn element(&self, part: &str) -> Option<ElementId> {
        let inner = self.inner.try_borrow().ok()?;
        inner.part_index(part).and_then(|index| inner.elements[index])
    }

    pub fn root(&self) -> Option<ElementId> {
        self.inner.try_borrow().ok()?.elements.first().copied().flatten()
    }

    /// Whether a refresh timer is scheduled.
    pub fn has_timer(&self) -> Result<bool, WidgetError> {
        let inner = self.borrow()?;
        Ok(inner
            .timer
            .as_ref()
            .is_some_and(|handle| inner.scheduler.is_active(handle)))
    }

    pub fn listener_count(&self, event: &str) -> Result<usize, WidgetError> {
        Ok(self.borrow()?.bus.listener_count(event))
    }
}

impl<C: Component> Drop for Widget<C> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ComponentSchema;
    use crate::style::Axes;
    use crate::widget::RenderDegradation;
    use crate::widgets::{Status, StatusIndicator};
    use serde_json::json;

    /// A component with nothing to mount.
    struct Bare;

    impl Component for Bare {
        const NAME: &'static str = "Bare";
        type State = ();

        fn schema() -> ComponentSchema {
            ComponentSchema::new(Self::NAME)
        }

        fn parts() -> Vec<PartSpec> {
            Vec::new()
        }

        fn init_state(_props: &Props, _now: Duration) -> Self::State {}

        fn axes(_part: &str, _view: &View<'_, Self>) -> Axes {
            Axes::new()
        }

        fn render(_part: &str, _view: &View<'_, Self>) -> Result<String, RenderDegradation> {
            Ok(String::new())
        }
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn component_without_parts_is_rejected() {
        let surface = Rc::new(RefCell::new(HeadlessSurface::new(20, 4)));
        let mut registry = SchemaRegistry::new();
        registry.register(Bare::schema()).unwrap();
        let env = Env::new(
            Rc::new(registry),
            Rc::new(Theme::dark()),
            SurfaceHandle::from_shared(surface.clone()),
            Scheduler::new(),
        );
        let err = Widget::<Bare>::new(Props::new(), &env).err().unwrap();
        assert!(matches!(err, WidgetError::NoParts { component: "Bare" }));
        assert!(surface.borrow().is_empty());
    }

    // ── Events ───────────────────────────────────────────────────────

    #[test]
    fn queued_events_keep_their_emit_time() {
        let (env, _surface) = Env::headless(30, 8);
        let w = Widget::<StatusIndicator>::new(Props::new(), &env).unwrap();
        let stamps = Rc::new(RefCell::new(Vec::new()));

        let sink = stamps.clone();
        let clock = env.scheduler.clone();
        w.on("first", move |e| {
            sink.borrow_mut().push(e.timestamp);
            clock.advance(Duration::from_secs(1));
        })
        .unwrap();
        let sink = stamps.clone();
        w.on("second", move |e| sink.borrow_mut().push(e.timestamp))
            .unwrap();

        w.mutate(|m| {
            m.emit("first", json!({}));
            m.emit("second", json!({}));
        })
        .unwrap();

        assert_eq!(*stamps.borrow(), vec![Duration::ZERO, Duration::ZERO]);
        assert_eq!(env.scheduler.now(), Duration::from_secs(1));
    }

    // ── Re-entrancy ──────────────────────────────────────────────────

    #[test]
    fn accessors_inside_mutate_report_reentry() {
        let (env, _surface) = Env::headless(30, 8);
        let w = Widget::<StatusIndicator>::new(Props::new(), &env).unwrap();
        let (status, props, timer, listeners, element) = w
            .mutate(|_m| {
                (
                    w.status(),
                    w.props(),
                    w.has_timer(),
                    w.listener_count("status_change"),
                    w.element("indicator"),
                )
            })
            .unwrap();
        assert!(matches!(status, Err(WidgetError::Reentrant { .. })));
        assert!(matches!(props, Err(WidgetError::Reentrant { .. })));
        assert!(matches!(timer, Err(WidgetError::Reentrant { .. })));
        assert!(matches!(listeners, Err(WidgetError::Reentrant { .. })));
        assert!(element.is_none());

        // Outside the operation everything reads normally.
        assert_eq!(w.status().unwrap(), Status::Idle);
        assert!(w.element("indicator").is_some());
    }

    #[test]
    fn nested_mutation_is_rejected() {
        let (env, _surface) = Env::headless(30, 8);
        let w = Widget::<StatusIndicator>::new(Props::new(), &env).unwrap();
        let inner = w.mutate(|_m| w.set_status("running")).unwrap();
        assert!(matches!(inner, Err(WidgetError::Reentrant { .. })));
        assert_eq!(w.status().unwrap(), Status::Idle);
    }
}
