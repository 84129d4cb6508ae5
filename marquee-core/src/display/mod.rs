//! Message display task
//!
//! Picks the next message (priority queue first, then the regular
//! rotation), then either scrolls it across the matrix or refreshes it in
//! place for a number of cycles, yielding to the scheduler between steps.

pub mod machine;
pub mod task;

pub use machine::{Effects, Outcome, Phase, Step, SLOW_TASK_THRESHOLD};
pub use task::DisplayTask;
