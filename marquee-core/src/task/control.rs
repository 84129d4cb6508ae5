//! Per-task scheduling state

use crate::time::{Duration, Instant};

/// Wake time and suspended flag of a task
///
/// Every task embeds one of these and hands it out through
/// [`Task::control`](super::Task::control).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskControl {
    /// Earliest time the next continuation may run
    wake_at: Instant,
    /// Suspended tasks are never invoked
    suspended: bool,
}

impl Default for TaskControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskControl {
    /// Create control state for a task that is ready immediately
    pub const fn new() -> Self {
        Self {
            wake_at: Instant::ZERO,
            suspended: false,
        }
    }

    /// Create control state for a task that starts suspended
    pub const fn suspended() -> Self {
        Self {
            wake_at: Instant::ZERO,
            suspended: true,
        }
    }

    /// Yield until `now + duration`
    pub fn sleep(&mut self, now: Instant, duration: Duration) {
        self.wake_at = now + duration;
    }

    /// Drop any pending sleep so the task is ready on the next tick
    pub fn wake_now(&mut self) {
        self.wake_at = Instant::ZERO;
    }

    /// Mark the task suspended
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Clear the suspended flag
    ///
    /// The pending wake time is kept.
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Check if the task is suspended
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Earliest time the next continuation may run
    pub fn wake_at(&self) -> Instant {
        self.wake_at
    }

    /// Check if the task may run at `now`
    pub fn is_ready(&self, now: Instant) -> bool {
        !self.suspended && now >= self.wake_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_ready() {
        let control = TaskControl::new();
        assert!(control.is_ready(Instant::ZERO));
    }

    #[test]
    fn test_sleep_delays_readiness() {
        let mut control = TaskControl::new();
        control.sleep(Instant::from_millis(100), Duration::from_millis(50));

        assert!(!control.is_ready(Instant::from_millis(149)));
        assert!(control.is_ready(Instant::from_millis(150)));
    }

    #[test]
    fn test_suspend_overrides_wake_time() {
        let mut control = TaskControl::new();
        control.suspend();
        assert!(!control.is_ready(Instant::from_millis(1_000_000)));

        control.resume();
        assert!(control.is_ready(Instant::from_millis(1_000_000)));
    }

    #[test]
    fn test_resume_keeps_pending_sleep() {
        let mut control = TaskControl::suspended();
        control.sleep(Instant::ZERO, Duration::from_secs(15));
        control.resume();

        assert!(!control.is_ready(Instant::from_millis(1000)));

        control.wake_now();
        assert!(control.is_ready(Instant::from_millis(1000)));
    }
}
