//! Cooperative tick scheduler
//!
//! Holds every task registered at startup and, on each [`Scheduler::tick`],
//! runs the current continuation of each ready task once, in registration
//! order. There is no preemption and no runtime removal.
//!
//! Tasks are registered as shared `RefCell` handles so that collaborators
//! (e.g. a connectivity orchestrator) can keep their own handle to the same
//! task and suspend, resume or feed it between invocations.

use core::cell::RefCell;

use heapless::Vec;

use crate::task::{SlowTaskGate, Task, TickContext};
use crate::time::Instant;

/// Maximum number of tasks that can be registered
pub const MAX_TASKS: usize = 8;

/// Shared handle to a registered task
pub type TaskHandle<'a> = &'a RefCell<dyn Task + 'a>;

/// Index of a task in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(pub u8);

/// Scheduler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// All task slots are in use
    CapacityExceeded,
}

/// Tick scheduler
pub struct Scheduler<'a> {
    /// Registered tasks in registration order
    tasks: Vec<TaskHandle<'a>, MAX_TASKS>,
    /// Shared slow-task permission, written by the display task
    gate: SlowTaskGate,
}

impl<'a> Default for Scheduler<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Scheduler<'a> {
    /// Create an empty scheduler
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            gate: SlowTaskGate::new(),
        }
    }

    /// Add a task to the run set
    ///
    /// Call before the main loop starts.
    pub fn register(&mut self, task: TaskHandle<'a>) -> Result<TaskId, SchedulerError> {
        let id = TaskId(self.tasks.len() as u8);
        self.tasks
            .push(task)
            .map_err(|_| SchedulerError::CapacityExceeded)?;
        Ok(id)
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if no task is registered
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every ready task once
    ///
    /// Readiness is sampled for all tasks before any of them runs, so a task
    /// resumed or woken during this tick waits for the next one. A task
    /// suspended during this tick by an earlier task is skipped.
    ///
    /// Returns the number of continuations invoked.
    pub fn tick(&mut self, now: Instant) -> usize {
        let ready = self.sample_ready(now);
        let mut invoked = 0;

        for (index, cell) in self.tasks.iter().enumerate() {
            if ready & (1 << index) == 0 {
                continue;
            }

            let Ok(mut task) = cell.try_borrow_mut() else {
                log_warn!("Task {} busy, skipped", index);
                continue;
            };

            if task.is_suspended() {
                continue;
            }

            let mut ctx = TickContext::new(now, &mut self.gate);
            task.run(&mut ctx);
            invoked += 1;
        }

        invoked
    }

    /// Bitmask of tasks ready at `now`
    fn sample_ready(&self, now: Instant) -> u32 {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, cell)| {
                cell.try_borrow()
                    .map(|task| task.control().is_ready(now))
                    .unwrap_or(false)
            })
            .fold(0, |mask, (index, _)| mask | (1 << index))
    }

    /// Earliest wake time among non-suspended tasks
    ///
    /// `None` when every task is suspended. Lets the caller idle until then.
    pub fn next_wake(&self) -> Option<Instant> {
        self.tasks
            .iter()
            .filter_map(|cell| {
                let task = cell.try_borrow().ok()?;
                let control = task.control();
                (!control.is_suspended()).then(|| control.wake_at())
            })
            .min()
    }

    /// Check if the display currently permits slow work
    pub fn slow_task_permitted(&self) -> bool {
        self.gate.is_permitted()
    }

    /// Get a registered task handle
    pub fn task(&self, id: TaskId) -> Option<TaskHandle<'a>> {
        self.tasks.get(id.0 as usize).copied()
    }
}
