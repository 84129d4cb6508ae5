//! Weather report task
//!
//! Fetching is slow (it goes over the network), so the task only fetches
//! while the display is holding a long static message. The formatted
//! report goes into a [`SharedText`] that a scrolling rotation entry reads.

use core::fmt::Write;

use heapless::String;
use marquee_core::message::{Content, MessageDescriptor, OwnerId, SharedText, Text};
use marquee_core::task::{Task, TaskControl, TickContext};
use marquee_core::time::Duration;

/// Maximum location name length
pub const MAX_LOCATION_LEN: usize = 24;

/// Re-check interval while slow work is not permitted
const GATE_POLL: Duration = Duration::from_millis(100);

/// Scroll step of the weather message
const SCROLL_PERIOD: Duration = Duration::from_millis(100);

/// One weather observation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherReport {
    pub location: String<MAX_LOCATION_LEN>,
    /// Tenths of a degree Celsius
    pub temperature_x10: i16,
    pub pressure_hpa: u16,
}

impl WeatherReport {
    /// Display line, e.g. `Geneva: -4.5C 1013 hPa`
    pub fn describe(&self) -> Text {
        let sign = if self.temperature_x10 < 0 { "-" } else { "" };
        let t = self.temperature_x10.unsigned_abs();
        let mut text = Text::new();
        let _ = write!(
            text,
            "{}: {}{}.{}C {} hPa",
            self.location,
            sign,
            t / 10,
            t % 10,
            self.pressure_hpa
        );
        text
    }
}

/// Weather fetch errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WeatherError {
    /// No location or service configured
    NotConfigured,
    /// No observation available yet
    Unavailable,
    /// Service answered with garbage
    InvalidResponse,
}

/// Where observations come from
pub trait WeatherSource {
    /// Get the latest observation
    ///
    /// Must not block: return `Unavailable` if nothing is ready yet.
    fn fetch(&mut self) -> Result<WeatherReport, WeatherError>;
}

/// Periodic weather fetcher
pub struct WeatherTask<'a, S> {
    control: TaskControl,
    source: S,
    text: &'a SharedText,
    report: Option<WeatherReport>,
    period: Duration,
    retry: Duration,
}

impl<'a, S: WeatherSource> WeatherTask<'a, S> {
    /// Create a weather task publishing into `text`
    ///
    /// Starts suspended; the link orchestrator resumes it once the network
    /// is up.
    pub fn new(source: S, text: &'a SharedText, period: Duration, retry: Duration) -> Self {
        Self {
            control: TaskControl::suspended(),
            source,
            text,
            report: None,
            period,
            retry,
        }
    }

    /// Scrolling rotation entry showing the latest report
    pub fn descriptor(&self, owner: OwnerId) -> MessageDescriptor<'a> {
        MessageDescriptor::regular(owner, Content::Shared(self.text), SCROLL_PERIOD, 1, true)
    }

    /// Latest successful observation
    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<'a, S: WeatherSource> Task for WeatherTask<'a, S> {
    fn name(&self) -> &str {
        "WG"
    }

    fn control(&self) -> &TaskControl {
        &self.control
    }

    fn control_mut(&mut self) -> &mut TaskControl {
        &mut self.control
    }

    fn run(&mut self, ctx: &mut TickContext<'_>) {
        if !ctx.slow_task_permitted() {
            self.control.sleep(ctx.now(), GATE_POLL);
            return;
        }

        match self.source.fetch() {
            Ok(report) => {
                let text = report.describe();
                log_info!("WG: {}", text.as_str());
                self.text.set(&text);
                self.report = Some(report);
                self.control.sleep(ctx.now(), self.period);
            }
            Err(e) => {
                log_warn!("WG: fetch failed: {}", e);
                self.control.sleep(ctx.now(), self.retry);
            }
        }
    }

    fn reset(&mut self) {
        self.report = None;
        self.text.clear();
    }
}
