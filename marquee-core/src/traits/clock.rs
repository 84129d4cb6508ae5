//! Wall clock trait

use crate::time::LocalTime;

/// Source of local civil time
pub trait WallClock {
    /// Current local time, or `None` until the clock has been synchronised
    fn local_time(&self) -> Option<LocalTime>;
}

/// Clock that is never synchronised
///
/// Useful for boards without a time source: clock and date messages are
/// then always skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClock;

impl WallClock for NoClock {
    fn local_time(&self) -> Option<LocalTime> {
        None
    }
}
