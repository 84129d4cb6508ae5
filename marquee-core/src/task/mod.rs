//! Cooperative task abstraction
//!
//! A task is an object with one current continuation, a wake time and a
//! suspended flag. The scheduler calls [`Task::run`] once per tick when the
//! task is ready; the task does a bounded amount of work, optionally sleeps
//! or changes its continuation, and returns. Nothing in here blocks.

pub mod context;
pub mod control;

pub use context::{SlowTaskGate, TickContext};
pub use control::TaskControl;

/// A unit of cooperative execution
pub trait Task {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Scheduling bookkeeping (wake time, suspended flag)
    fn control(&self) -> &TaskControl;

    /// Mutable scheduling bookkeeping
    fn control_mut(&mut self) -> &mut TaskControl;

    /// Execute the current continuation exactly once
    ///
    /// Must not block. Waiting is expressed by sleeping through
    /// [`TaskControl::sleep`] and returning.
    fn run(&mut self, ctx: &mut TickContext<'_>);

    /// Return to the initial continuation without destroying the task
    fn reset(&mut self);

    /// Stop the scheduler from invoking this task
    ///
    /// In-flight multi-tick work is left where it is and continues from the
    /// same point after [`Task::resume`].
    fn suspend(&mut self) {
        self.control_mut().suspend();
    }

    /// Allow the scheduler to invoke this task again
    fn resume(&mut self) {
        self.control_mut().resume();
    }

    /// Check if the task is suspended
    fn is_suspended(&self) -> bool {
        self.control().is_suspended()
    }
}
