//! Display task
//!
//! Owns the message queues and the renderer. Each invocation performs the
//! side effects of the current [`Phase`] and feeds the result through
//! [`Phase::step`].

use super::machine::{Outcome, Phase};
use crate::message::{
    Content, MessageDescriptor, MessageError, MessageQueues, OwnerId, SelectionSource,
};
use crate::task::{Task, TaskControl, TickContext};
use crate::time::Duration;
use crate::traits::{ScrollRenderer, WallClock};

/// Clock hold time
const CLOCK_PERIOD: Duration = Duration::from_secs(1);
/// Clock refreshes per rotation visit
const CLOCK_CYCLES: u16 = 10;
/// Date hold time
const DATE_PERIOD: Duration = Duration::from_secs(2);

/// Message display task
pub struct DisplayTask<'a, R> {
    control: TaskControl,
    phase: Phase,
    queues: MessageQueues<'a>,
    /// Working copy of the descriptor being shown; its cycle count is
    /// consumed without touching the stored one
    current: MessageDescriptor<'a>,
    /// A priority message is on screen
    priority_playing: bool,
    renderer: R,
    clock: &'a dyn WallClock,
}

impl<'a, R: ScrollRenderer> DisplayTask<'a, R> {
    /// Create a display task with empty queues
    pub fn new(renderer: R, clock: &'a dyn WallClock) -> Self {
        Self {
            control: TaskControl::new(),
            phase: Phase::NextMessage,
            queues: MessageQueues::new(),
            current: MessageDescriptor::idle(),
            priority_playing: false,
            renderer,
            clock,
        }
    }

    /// Create a display task rotating the clock and the date
    pub fn with_defaults(renderer: R, clock: &'a dyn WallClock) -> Self {
        let mut task = Self::new(renderer, clock);
        // Empty queues always have room for two entries
        let _ = task.add_clock();
        let _ = task.add_date();
        task
    }

    /// Add the clock to the regular rotation
    pub fn add_clock(&mut self) -> Result<(), MessageError> {
        self.add_regular_message(MessageDescriptor::regular(
            OwnerId::DISPLAY,
            Content::Clock,
            CLOCK_PERIOD,
            CLOCK_CYCLES,
            false,
        ))
    }

    /// Add the date to the regular rotation
    pub fn add_date(&mut self) -> Result<(), MessageError> {
        self.add_regular_message(MessageDescriptor::regular(
            OwnerId::DISPLAY,
            Content::Date,
            DATE_PERIOD,
            1,
            false,
        ))
    }

    /// Queue a one-shot message ahead of the rotation
    ///
    /// If no priority message is on screen, the current message is cut
    /// short and the task is woken so the new one shows on the next tick.
    /// Otherwise it waits its turn behind the playing one.
    pub fn push_message(
        &mut self,
        text: &str,
        hold: Duration,
        scrolling: bool,
    ) -> Result<(), MessageError> {
        self.queues
            .push_priority(MessageDescriptor::transient(text, hold, scrolling))?;

        if !self.priority_playing {
            self.phase = Phase::NextMessage;
            self.control.resume();
            self.control.wake_now();
        }
        Ok(())
    }

    /// Add a persistent message to the rotation
    pub fn add_regular_message(
        &mut self,
        descriptor: MessageDescriptor<'a>,
    ) -> Result<(), MessageError> {
        self.queues.add_regular(descriptor)
    }

    /// Drop every rotation entry registered by `owner`
    pub fn remove_regular_messages(&mut self, owner: OwnerId) -> usize {
        self.queues.remove_regular(owner)
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Descriptor being shown
    pub fn current(&self) -> &MessageDescriptor<'a> {
        &self.current
    }

    /// Check if a priority message is on screen
    pub fn priority_playing(&self) -> bool {
        self.priority_playing
    }

    /// Message queues
    pub fn queues(&self) -> &MessageQueues<'a> {
        &self.queues
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn next_message(&mut self) -> Outcome {
        let selection = self.queues.select(self.clock);
        self.priority_playing = selection.source == SelectionSource::Priority;
        self.current = selection.descriptor;
        log_debug!("New message from {}", selection.source);

        if self.current.scrolling {
            let text = self.current.content.produce(self.clock);
            self.renderer.render_string(&text);
        }

        Outcome::Loaded {
            scrolling: self.current.scrolling,
        }
    }

    fn scroll_message(&mut self) -> Outcome {
        let done = self.renderer.tick();
        if done {
            log_debug!("Scroll finished");
        }

        Outcome::Scrolled {
            done,
            period: self.current.period,
        }
    }

    fn refresh_message(&mut self) -> Outcome {
        let text = self.current.content.produce(self.clock);
        self.renderer.render_string(&text);
        self.current.cycles = self.current.cycles.saturating_sub(1);

        Outcome::Refreshed {
            cycles_left: self.current.cycles,
            period: self.current.period,
        }
    }
}

impl<'a, R: ScrollRenderer> Task for DisplayTask<'a, R> {
    fn name(&self) -> &str {
        "DT"
    }

    fn control(&self) -> &TaskControl {
        &self.control
    }

    fn control_mut(&mut self) -> &mut TaskControl {
        &mut self.control
    }

    fn run(&mut self, ctx: &mut TickContext<'_>) {
        let outcome = match self.phase {
            Phase::NextMessage => self.next_message(),
            Phase::ScrollMessage => self.scroll_message(),
            Phase::RefreshMessage => self.refresh_message(),
        };

        let step = self.phase.step(outcome);
        if let Some(duration) = step.effects.sleep {
            self.control.sleep(ctx.now(), duration);
        }
        if let Some(permitted) = step.effects.slow_tasks {
            ctx.permit_slow_tasks(permitted);
        }
        self.phase = step.next;
    }

    fn reset(&mut self) {
        self.phase = Phase::NextMessage;
        self.priority_playing = false;
        self.queues.rewind();
    }
}
