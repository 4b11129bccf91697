//! Per-instance event bus: named listeners, synchronous ordered dispatch.
//!
//! Listeners for one event name run in registration order, on the caller's
//! turn. The listener list is snapshotted before dispatch, so a listener may
//! register or remove listeners (or emit again) without affecting the
//! dispatch already in progress.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifies one registered listener. Returned by `on`, consumed by `off`.
    pub struct ListenerId;
}

// ---------------------------------------------------------------------------
// WidgetEvent
// ---------------------------------------------------------------------------

/// An emitted event: `{kind, data, timestamp}`.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEvent {
    /// Event name, e.g. `status_change`.
    pub kind: String,
    pub data: serde_json::Value,
    /// Runtime clock reading taken when the event was emitted.
    pub timestamp: Duration,
}

/// A registered event listener.
pub type Listener = Rc<dyn Fn(&WidgetEvent)>;

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Ordered listener registry for one widget instance.
#[derive(Default)]
pub struct EventBus {
    ids: SlotMap<ListenerId, ()>,
    listeners: BTreeMap<String, Vec<(ListenerId, Listener)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event`.
    pub fn on(&mut self, event: impl Into<String>, listener: Listener) -> ListenerId {
        let id = self.ids.insert(());
        self.listeners
            .entry(event.into())
            .or_default()
            .push((id, listener));
        id
    }

    /// Remove one listener from `event`. Unknown ids are a no-op.
    ///
    /// Returns whether a listener was removed.
    pub fn off(&mut self, event: &str, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(event);
        }
        if removed {
            self.ids.remove(id);
        }
        removed
    }

    /// Clone the current listeners of `event`, in registration order.
    pub fn snapshot(&self, event: &str) -> Vec<Listener> {
        self.listeners
            .get(event)
            .map(|list| list.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default()
    }

    /// Invoke every listener of `event.kind` in registration order.
    pub fn emit(&self, event: &WidgetEvent) {
        for listener in self.snapshot(&event.kind) {
            listener(event);
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }

    pub fn total_listeners(&self) -> usize {
        self.ids.len()
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.ids.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

// ---------------------------------------------------------------------------
// SharedBus
// ---------------------------------------------------------------------------

/// A cloneable handle to an [`EventBus`].
///
/// Dispatch releases the borrow before invoking listeners, so listeners may
/// call back into the same bus.
#[derive(Debug, Clone, Default)]
pub struct SharedBus(Rc<RefCell<EventBus>>);

impl SharedBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, event: impl Into<String>, listener: impl Fn(&WidgetEvent) + 'static) -> ListenerId {
        self.0.borrow_mut().on(event, Rc::new(listener))
    }

    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.0.borrow_mut().off(event, id)
    }

    /// Build and dispatch an event stamped with `timestamp`.
    pub fn emit(&self, kind: &str, data: serde_json::Value, timestamp: Duration) {
        let event = WidgetEvent {
            kind: kind.to_owned(),
            data,
            timestamp,
        };
        let listeners = self.0.borrow().snapshot(kind);
        tracing::trace!(event = kind, listeners = listeners.len(), "emit");
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.0.borrow().listener_count(event)
    }

    pub fn total_listeners(&self) -> usize {
        self.0.borrow().total_listeners()
    }

    /// Drop every listener. Fails only if called from inside a registration.
    pub fn clear(&self) -> bool {
        match self.0.try_borrow_mut() {
            Ok(mut bus) => {
                bus.clear();
                true
            }
            Err(_) => false,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> impl Fn(&WidgetEvent) + 'static {
        let log = log.clone();
        move |ev: &WidgetEvent| log.borrow_mut().push(format!("{tag}:{}", ev.kind))
    }

    // ── Ordering ─────────────────────────────────────────────────────

    #[test]
    fn listeners_run_in_registration_order() {
        let bus = SharedBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.on("tick", recorder(&log, "L1"));
        bus.on("tick", recorder(&log, "L2"));
        bus.on("tick", recorder(&log, "L3"));
        bus.emit("tick", json!(null), Duration::ZERO);
        assert_eq!(*log.borrow(), vec!["L1:tick", "L2:tick", "L3:tick"]);
    }

    #[test]
    fn first_listener_completes_before_second_starts() {
        let bus = SharedBus::new();
        let trace = Rc::new(RefCell::new(Vec::new()));
        let t1 = trace.clone();
        bus.on("go", move |_| {
            t1.borrow_mut().push("L1 start");
            t1.borrow_mut().push("L1 end");
        });
        let t2 = trace.clone();
        bus.on("go", move |_| t2.borrow_mut().push("L2 start"));
        bus.emit("go", json!({}), Duration::ZERO);
        assert_eq!(*trace.borrow(), vec!["L1 start", "L1 end", "L2 start"]);
    }

    #[test]
    fn emit_only_reaches_matching_event() {
        let bus = SharedBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.on("a", recorder(&log, "A"));
        bus.on("b", recorder(&log, "B"));
        bus.emit("b", json!(null), Duration::ZERO);
        assert_eq!(*log.borrow(), vec!["B:b"]);
    }

    #[test]
    fn event_carries_payload_and_timestamp() {
        let bus = SharedBus::new();
        let seen = Rc::new(RefCell::new(None));
        let seen_c = seen.clone();
        bus.on("status_change", move |ev| *seen_c.borrow_mut() = Some(ev.clone()));
        bus.emit("status_change", json!({"to": "paused"}), Duration::from_millis(1500));
        let ev = seen.borrow().clone().unwrap();
        assert_eq!(ev.kind, "status_change");
        assert_eq!(ev.data["to"], "paused");
        assert_eq!(ev.timestamp, Duration::from_millis(1500));
    }

    // ── off ──────────────────────────────────────────────────────────

    #[test]
    fn off_removes_only_that_listener() {
        let bus = SharedBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = bus.on("x", recorder(&log, "A"));
        bus.on("x", recorder(&log, "B"));
        assert!(bus.off("x", a));
        bus.emit("x", json!(null), Duration::ZERO);
        assert_eq!(*log.borrow(), vec!["B:x"]);
    }

    #[test]
    fn off_unknown_is_noop() {
        let bus = SharedBus::new();
        let id = bus.on("x", |_| {});
        assert!(!bus.off("y", id));
        assert!(bus.off("x", id));
        assert!(!bus.off("x", id));
        assert_eq!(bus.total_listeners(), 0);
    }

    // ── Re-entrancy ──────────────────────────────────────────────────

    #[test]
    fn listener_added_during_emit_waits_for_next_emit() {
        let bus = SharedBus::new();
        let calls = Rc::new(Cell::new(0));
        let bus_c = bus.clone();
        let calls_c = calls.clone();
        bus.on("x", move |_| {
            let calls_inner = calls_c.clone();
            bus_c.on("x", move |_| calls_inner.set(calls_inner.get() + 100));
            calls_c.set(calls_c.get() + 1);
        });
        bus.emit("x", json!(null), Duration::ZERO);
        assert_eq!(calls.get(), 1);
        assert_eq!(bus.listener_count("x"), 2);
    }

    #[test]
    fn listener_may_remove_itself() {
        let bus = SharedBus::new();
        let id_cell = Rc::new(Cell::new(None));
        let bus_c = bus.clone();
        let id_c = id_cell.clone();
        let id = bus.on("x", move |_| {
            if let Some(id) = id_c.get() {
                bus_c.off("x", id);
            }
        });
        id_cell.set(Some(id));
        bus.emit("x", json!(null), Duration::ZERO);
        assert_eq!(bus.listener_count("x"), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let bus = SharedBus::new();
        bus.on("a", |_| {});
        bus.on("b", |_| {});
        assert!(bus.clear());
        assert_eq!(bus.total_listeners(), 0);
        assert_eq!(bus.listener_count("a"), 0);
    }

    #[test]
    fn plain_bus_emit() {
        let mut bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let hits_c = hits.clone();
        bus.on("e", Rc::new(move |_: &WidgetEvent| hits_c.set(hits_c.get() + 1)));
        bus.emit(&WidgetEvent {
            kind: "e".into(),
            data: json!(null),
            timestamp: Duration::ZERO,
        });
        assert_eq!(hits.get(), 1);
        assert!(format!("{bus:?}").contains("EventBus"));
    }
}
