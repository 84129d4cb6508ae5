//! Status LED heartbeat
//!
//! A short flash every two seconds shows the scheduler is alive.

use embedded_hal::digital::{OutputPin, PinState};
use marquee_core::task::{Task, TaskControl, TickContext};
use marquee_core::time::Duration;

/// Flash length
const FLASH: Duration = Duration::from_millis(1);

/// Time between flashes
const PERIOD: Duration = Duration::from_secs(2);

/// Heartbeat task driving one LED
pub struct BlinkTask<P> {
    control: TaskControl,
    pin: P,
    /// LED lights when the pin is low
    active_low: bool,
    /// Next run lights the LED
    flash_next: bool,
}

impl<P: OutputPin> BlinkTask<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self {
            control: TaskControl::new(),
            pin,
            active_low,
            flash_next: true,
        }
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    fn drive(&mut self, lit: bool) {
        // Nothing useful to do if the LED pin fails
        let _ = self.pin.set_state(PinState::from(lit != self.active_low));
    }
}

impl<P: OutputPin> Task for BlinkTask<P> {
    fn name(&self) -> &str {
        "LED"
    }

    fn control(&self) -> &TaskControl {
        &self.control
    }

    fn control_mut(&mut self) -> &mut TaskControl {
        &mut self.control
    }

    fn run(&mut self, ctx: &mut TickContext<'_>) {
        let lit = self.flash_next;
        self.drive(lit);
        let hold = if lit { FLASH } else { PERIOD.saturating_sub(FLASH) };
        self.control.sleep(ctx.now(), hold);
        self.flash_next = !lit;
    }

    fn reset(&mut self) {
        self.flash_next = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use marquee_core::task::SlowTaskGate;
    use marquee_core::time::Instant;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
        writes: u32,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                writes: 0,
            }
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }
    }

    fn run_at<P: OutputPin>(task: &mut BlinkTask<P>, ms: u64) -> bool {
        let now = Instant::from_millis(ms);
        if !task.control().is_ready(now) {
            return false;
        }
        let mut gate = SlowTaskGate::new();
        task.run(&mut TickContext::new(now, &mut gate));
        true
    }

    #[test]
    fn test_flash_timing() {
        let mut task = BlinkTask::new(MockPin::new(), false);

        assert!(run_at(&mut task, 0));
        assert!(task.pin().high);

        assert!(!run_at(&mut task, 0));
        assert!(run_at(&mut task, 1));
        assert!(!task.pin().high);

        assert!(!run_at(&mut task, 1999));
        assert!(run_at(&mut task, 2000));
        assert!(task.pin().high);
        assert_eq!(task.pin().writes, 3);
    }

    #[test]
    fn test_active_low() {
        let mut task = BlinkTask::new(MockPin::new(), true);

        run_at(&mut task, 0);
        assert!(!task.pin().high);
        run_at(&mut task, 1);
        assert!(task.pin().high);
    }

    #[test]
    fn test_reset_flashes_next() {
        let mut task = BlinkTask::new(MockPin::new(), false);
        run_at(&mut task, 0);
        task.reset();
        run_at(&mut task, 1);
        assert!(task.pin().high);
    }
}
