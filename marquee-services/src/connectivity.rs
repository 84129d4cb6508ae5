//! Network link supervision
//!
//! [`LinkMonitorTask`] polls the link and hands every state change to the
//! [`Orchestrator`], which decides which tasks run in which state and tells
//! the user what is going on through the display.

use core::cell::RefCell;

use heapless::Vec;
use marquee_core::display::DisplayTask;
use marquee_core::scheduler::TaskHandle;
use marquee_core::task::{Task, TaskControl, TickContext};
use marquee_core::time::Duration;
use marquee_core::traits::ScrollRenderer;

/// Maximum tasks the orchestrator manages besides the display
pub const MAX_DEPENDENTS: usize = 6;

const OFFLINE_NOTICE: &str = "Initializing...";
const OFFLINE_HOLD: Duration = Duration::from_secs(15);
const AP_NOTICE: &str = "AP mode";
const AP_HOLD: Duration = Duration::from_secs(5);
const CLIENT_NOTICE: &str = "Connected to WiFi";
const CLIENT_HOLD: Duration = Duration::from_secs(5);

/// Network link state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectivityState {
    /// Not associated and not serving an access point
    Offline,
    /// Serving a provisioning access point
    AccessPoint,
    /// Joined a network
    Client,
}

/// Source of link state
pub trait LinkStatus {
    /// Current state; may poll hardware
    fn state(&mut self) -> ConnectivityState;

    /// IPv4 address in the current state, if any
    fn address(&self) -> Option<[u8; 4]>;
}

/// When a dependent task may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunPolicy {
    /// Needs a joined network (e.g. internet services)
    ClientOnly,
    /// Also runs on the provisioning access point
    AnyLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectivityError {
    /// No free dependent slot
    TooManyDependents,
}

struct Dependent<'a> {
    task: TaskHandle<'a>,
    policy: RunPolicy,
}

/// Applies the run policy for each link state
///
/// `'a` is how long the task handles are borrowed, `'d` how long the
/// display's message content lives.
pub struct Orchestrator<'a, 'd, R> {
    display: &'a RefCell<DisplayTask<'d, R>>,
    dependents: Vec<Dependent<'a>, MAX_DEPENDENTS>,
}

impl<'a, 'd, R: ScrollRenderer> Orchestrator<'a, 'd, R> {
    pub fn new(display: &'a RefCell<DisplayTask<'d, R>>) -> Self {
        Self {
            display,
            dependents: Vec::new(),
        }
    }

    /// Put a task under link control
    pub fn add_dependent(
        &mut self,
        task: TaskHandle<'a>,
        policy: RunPolicy,
    ) -> Result<(), ConnectivityError> {
        self.dependents
            .push(Dependent { task, policy })
            .map_err(|_| ConnectivityError::TooManyDependents)
    }

    /// React to a link state change
    ///
    /// Dependents are stopped or restarted first, then the display gets a
    /// status notice. Pushing the notice wakes the display; a notice queued
    /// behind one still playing keeps the display running so it is shown
    /// when the playing one ends.
    pub fn apply(&mut self, state: ConnectivityState) {
        for dep in &self.dependents {
            let Ok(mut task) = dep.task.try_borrow_mut() else {
                log_warn!("Dependent busy, state change not applied");
                continue;
            };

            match (state, dep.policy) {
                (ConnectivityState::Offline, _)
                | (ConnectivityState::AccessPoint, RunPolicy::ClientOnly) => task.suspend(),
                (ConnectivityState::AccessPoint, RunPolicy::AnyLink)
                | (ConnectivityState::Client, _) => {
                    task.reset();
                    task.resume();
                }
            }
        }

        let Ok(mut display) = self.display.try_borrow_mut() else {
            log_warn!("Display busy, notice dropped");
            return;
        };

        let (notice, hold) = match state {
            ConnectivityState::Offline => (OFFLINE_NOTICE, OFFLINE_HOLD),
            ConnectivityState::AccessPoint => (AP_NOTICE, AP_HOLD),
            ConnectivityState::Client => (CLIENT_NOTICE, CLIENT_HOLD),
        };

        if state == ConnectivityState::Client || display.priority_playing() {
            display.resume();
        } else {
            display.suspend();
        }

        if display.push_message(notice, hold, false).is_err() {
            log_warn!("Notice queue full, '{}' dropped", notice);
        }
    }
}

/// Polls the link and reports changes
pub struct LinkMonitorTask<'a, 'd, L, R> {
    control: TaskControl,
    link: L,
    orchestrator: Orchestrator<'a, 'd, R>,
    last: Option<ConnectivityState>,
    poll: Duration,
}

impl<'a, 'd, L: LinkStatus, R: ScrollRenderer> LinkMonitorTask<'a, 'd, L, R> {
    pub fn new(link: L, orchestrator: Orchestrator<'a, 'd, R>, poll: Duration) -> Self {
        Self {
            control: TaskControl::new(),
            link,
            orchestrator,
            last: None,
            poll,
        }
    }

    /// Last observed state
    pub fn state(&self) -> Option<ConnectivityState> {
        self.last
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}

impl<'a, 'd, L: LinkStatus, R: ScrollRenderer> Task for LinkMonitorTask<'a, 'd, L, R> {
    fn name(&self) -> &str {
        "WC"
    }

    fn control(&self) -> &TaskControl {
        &self.control
    }

    fn control_mut(&mut self) -> &mut TaskControl {
        &mut self.control
    }

    fn run(&mut self, ctx: &mut TickContext<'_>) {
        let state = self.link.state();

        if self.last != Some(state) {
            log_info!("WC: link {}", state);
            if let Some([a, b, c, d]) = self.link.address() {
                log_info!("IP = {}.{}.{}.{}", a, b, c, d);
            }
            self.orchestrator.apply(state);
            self.last = Some(state);
        }

        self.control.sleep(ctx.now(), self.poll);
    }

    fn reset(&mut self) {
        self.last = None;
    }
}
