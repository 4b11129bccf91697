//! Widget lifecycle states and the per-instance transition log.
//!
//! ```text
//! Constructing → Validated → Mounted → Rendering ⇄ Idle
//!                                 any live state → Destroyed
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Number of transitions the tracker keeps.
pub const HISTORY_LIMIT: usize = 64;

// ---------------------------------------------------------------------------
// LifecycleState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Constructing,
    Validated,
    Mounted,
    Rendering,
    Idle,
    /// Terminal.
    Destroyed,
}

impl LifecycleState {
    /// Whether `self → next` is a legal move.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Constructing, Validated)
                | (Validated, Mounted)
                | (Mounted, Rendering)
                | (Rendering, Idle)
                | (Idle, Rendering)
        ) || (next == Destroyed && self != Destroyed)
    }

    pub fn is_destroyed(self) -> bool {
        self == LifecycleState::Destroyed
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Constructing => "constructing",
            Self::Validated => "validated",
            Self::Mounted => "mounted",
            Self::Rendering => "rendering",
            Self::Idle => "idle",
            Self::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// LifecycleTracker
// ---------------------------------------------------------------------------

/// One recorded state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: LifecycleState,
    pub to: LifecycleState,
    /// Clock reading when the change happened.
    pub at: Duration,
}

/// Current state plus the most recent transitions of one widget instance.
#[derive(Debug, Clone)]
pub struct LifecycleTracker {
    component: &'static str,
    state: LifecycleState,
    history: VecDeque<Transition>,
    renders: usize,
}

impl LifecycleTracker {
    /// A tracker in `Constructing`.
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            state: LifecycleState::Constructing,
            history: VecDeque::new(),
            renders: 0,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Move to `next`. Illegal moves are logged and ignored.
    pub fn transition(&mut self, next: LifecycleState, at: Duration) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                component = self.component,
                from = %self.state,
                to = %next,
                "illegal lifecycle transition ignored"
            );
            return false;
        }
        if next == LifecycleState::Rendering {
            self.renders += 1;
        }
        tracing::trace!(component = self.component, from = %self.state, to = %next, "lifecycle");
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(Transition {
            from: self.state,
            to: next,
            at,
        });
        self.state = next;
        true
    }

    /// Recorded transitions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Transition> {
        self.history.iter()
    }

    /// Number of render passes entered.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn legal_path_is_recorded() {
        let mut t = LifecycleTracker::new("Test");
        assert!(t.transition(Validated, ms(0)));
        assert!(t.transition(Mounted, ms(0)));
        assert!(t.transition(Rendering, ms(1)));
        assert!(t.transition(Idle, ms(1)));
        assert!(t.transition(Rendering, ms(5)));
        assert!(t.transition(Idle, ms(5)));
        assert_eq!(t.state(), Idle);
        assert_eq!(t.renders(), 2);
        let states: Vec<_> = t.history().map(|tr| tr.to).collect();
        assert_eq!(states, vec![Validated, Mounted, Rendering, Idle, Rendering, Idle]);
    }

    #[test]
    fn illegal_moves_are_ignored() {
        let mut t = LifecycleTracker::new("Test");
        assert!(!t.transition(Rendering, ms(0)));
        assert_eq!(t.state(), Constructing);
        assert_eq!(t.history().count(), 0);
    }

    #[test]
    fn destroyed_is_terminal() {
        let mut t = LifecycleTracker::new("Test");
        assert!(t.transition(Destroyed, ms(0)));
        assert!(!t.transition(Destroyed, ms(1)));
        assert!(!t.transition(Rendering, ms(1)));
        assert!(t.state().is_destroyed());
    }

    #[test]
    fn history_is_bounded() {
        let mut t = LifecycleTracker::new("Test");
        t.transition(Validated, ms(0));
        t.transition(Mounted, ms(0));
        for i in 0..100 {
            t.transition(Rendering, ms(i));
            t.transition(Idle, ms(i));
        }
        assert_eq!(t.history().count(), HISTORY_LIMIT);
        assert_eq!(t.renders(), 100);
        assert_eq!(t.history().last().map(|tr| tr.to), Some(Idle));
    }

    #[test]
    fn state_names() {
        assert_eq!(Rendering.to_string(), "rendering");
        assert!(Idle.can_transition_to(Destroyed));
        assert!(!Idle.can_transition_to(Mounted));
    }
}
