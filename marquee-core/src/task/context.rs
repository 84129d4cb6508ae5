//! State handed to every task invocation

use crate::time::Instant;

/// Process-wide "slow work is safe now" signal
///
/// Written only by the display task after each refresh; everything else
/// reads it. Owned by the scheduler and threaded to tasks through
/// [`TickContext`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlowTaskGate {
    permitted: bool,
}

impl SlowTaskGate {
    /// Create a closed gate
    pub const fn new() -> Self {
        Self { permitted: false }
    }

    /// Check if a slow operation may run now
    pub fn is_permitted(&self) -> bool {
        self.permitted
    }

    pub(crate) fn set(&mut self, permitted: bool) {
        self.permitted = permitted;
    }
}

/// Context for one task invocation
pub struct TickContext<'a> {
    now: Instant,
    gate: &'a mut SlowTaskGate,
}

impl<'a> TickContext<'a> {
    /// Create a context for an invocation at `now`
    pub fn new(now: Instant, gate: &'a mut SlowTaskGate) -> Self {
        Self { now, gate }
    }

    /// Time of the current tick
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Check if the display leaves enough idle time for slow work
    pub fn slow_task_permitted(&self) -> bool {
        self.gate.is_permitted()
    }

    pub(crate) fn permit_slow_tasks(&mut self, permitted: bool) {
        self.gate.set(permitted);
    }
}
