//! Display state machine definition
//!
//! The task performs the side effects of a phase (select, render, scroll)
//! and reports what happened as an [`Outcome`]. [`Phase::step`] maps the
//! phase and outcome to the next phase and the scheduling effects, without
//! touching anything else.

use crate::time::Duration;

/// Minimum display period that leaves room for slow work in other tasks
pub const SLOW_TASK_THRESHOLD: Duration = Duration::from_secs(1);

/// Display task continuations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Select and load the next message (initial state)
    NextMessage,
    /// Advance the scroll by one step
    ScrollMessage,
    /// Re-render a static message
    RefreshMessage,
}

/// What the current phase did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// A message was loaded
    Loaded { scrolling: bool },
    /// One scroll step was taken
    Scrolled { done: bool, period: Duration },
    /// A static message was rendered and its cycle counted
    Refreshed { cycles_left: u16, period: Duration },
}

/// Scheduling effects of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Effects {
    /// Yield for this long
    pub sleep: Option<Duration>,
    /// New value of the slow-task permission
    pub slow_tasks: Option<bool>,
}

/// Next phase plus effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub next: Phase,
    pub effects: Effects,
}

impl Step {
    /// Change phase with no effects
    const fn to(next: Phase) -> Self {
        Self {
            next,
            effects: Effects {
                sleep: None,
                slow_tasks: None,
            },
        }
    }
}

impl Phase {
    /// Process an outcome and return the next phase and its effects
    pub fn step(self, outcome: Outcome) -> Step {
        use Outcome::*;
        use Phase::*;

        match (self, outcome) {
            // Loading never sleeps: the first render/scroll follows right away
            (NextMessage, Loaded { scrolling: true }) => Step::to(ScrollMessage),
            (NextMessage, Loaded { scrolling: false }) => Step::to(RefreshMessage),

            (ScrollMessage, Scrolled { done, period }) => Step {
                next: if done { NextMessage } else { ScrollMessage },
                effects: Effects {
                    sleep: Some(period),
                    slow_tasks: None,
                },
            },

            (RefreshMessage, Refreshed { cycles_left, period }) => Step {
                next: if cycles_left == 0 {
                    NextMessage
                } else {
                    RefreshMessage
                },
                effects: Effects {
                    sleep: Some(period),
                    slow_tasks: Some(period >= SLOW_TASK_THRESHOLD),
                },
            },

            // Outcome from another phase: start over with a fresh selection
            _ => Step::to(NextMessage),
        }
    }
}
