//! Interval timers on a virtual clock.
//!
//! [`Scheduler`] owns every interval registered by widgets and a monotonic
//! clock that only moves when [`Scheduler::advance`] is called. Tests drive it
//! directly with simulated time; the async host loop in [`crate::app`] feeds it
//! real elapsed time. Callbacks run on the caller's turn, with no scheduler
//! borrow held, so a callback may register or cancel timers.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key of one registered interval.
    pub struct TimerId;
}

/// Shortest accepted period. Zero periods are clamped to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

struct Interval {
    period: Duration,
    next_due: Duration,
    /// Registration sequence; breaks ties between intervals due together.
    seq: u64,
    callback: Rc<dyn Fn()>,
}

#[derive(Default)]
struct SchedulerInner {
    now: Duration,
    next_seq: u64,
    timers: SlotMap<TimerId, Interval>,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// A cloneable handle to the shared timer queue and clock.
#[derive(Clone, Default)]
pub struct Scheduler(Rc<RefCell<SchedulerInner>>);

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading (time since the scheduler was created).
    pub fn now(&self) -> Duration {
        self.0.borrow().now
    }

    /// Register `callback` to run every `period`, first at `now + period`.
    pub fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerHandle {
        let period = if period < MIN_PERIOD {
            tracing::warn!(?period, "interval period too short, clamping");
            MIN_PERIOD
        } else {
            period
        };
        let mut inner = self.0.borrow_mut();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let next_due = inner.now + period;
        let id = inner.timers.insert(Interval {
            period,
            next_due,
            seq,
            callback,
        });
        tracing::debug!(?id, ?period, "interval registered");
        TimerHandle {
            id,
            scheduler: Rc::downgrade(&self.0),
        }
    }

    /// Move the clock forward by `dt`, firing every interval that falls due.
    ///
    /// Due callbacks run in deadline order; intervals due at the same instant
    /// run in registration order. The clock reads the deadline while its
    /// callback runs. Returns the number of callbacks fired.
    pub fn advance(&self, dt: Duration) -> usize {
        let target = self.now() + dt;
        let mut fired = 0;
        loop {
            let callback = {
                let mut inner = self.0.borrow_mut();
                let due = inner
                    .timers
                    .iter()
                    .filter(|(_, t)| t.next_due <= target)
                    .min_by_key(|(_, t)| (t.next_due, t.seq))
                    .map(|(id, _)| id);
                let Some(id) = due else {
                    inner.now = target;
                    break;
                };
                let Some(timer) = inner.timers.get_mut(id) else {
                    break;
                };
                let deadline = timer.next_due;
                timer.next_due += timer.period;
                let callback = Rc::clone(&timer.callback);
                inner.now = deadline;
                callback
            };
            callback();
            fired += 1;
        }
        fired
    }

    /// Deadline of the next interval to fire, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.0.borrow().timers.values().map(|t| t.next_due).min()
    }

    /// Number of live intervals.
    pub fn active(&self) -> usize {
        self.0.borrow().timers.len()
    }

    pub fn is_active(&self, handle: &TimerHandle) -> bool {
        self.0.borrow().timers.contains_key(handle.id)
    }

    fn cancel(&self, id: TimerId) -> bool {
        self.0.borrow_mut().timers.remove(id).is_some()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Scheduler")
            .field("now", &inner.now)
            .field("active", &inner.timers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TimerHandle
// ---------------------------------------------------------------------------

/// Ownership token for one interval. Not `Clone`: exactly one owner cancels it.
pub struct TimerHandle {
    id: TimerId,
    scheduler: Weak<RefCell<SchedulerInner>>,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Stop the interval. Returns `false` if it was already gone.
    pub fn cancel(self) -> bool {
        match self.scheduler.upgrade() {
            Some(inner) => Scheduler(inner).cancel(self.id),
            None => false,
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TimerHandle").field(&self.id).finish()
    }
}

/// Cancel and clear the interval held in `slot`, if any.
///
/// The only place widget code releases a timer, so an interval is cancelled
/// exactly once.
pub fn cancel_if_present(slot: &mut Option<TimerHandle>) -> bool {
    match slot.take() {
        Some(handle) => {
            let id = handle.id();
            let cancelled = handle.cancel();
            tracing::debug!(?id, cancelled, "interval cancelled");
            cancelled
        }
        None => false,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
