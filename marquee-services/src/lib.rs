//! Background tasks that run alongside the display
//!
//! Each task implements `marquee_core::task::Task` and is registered with
//! the scheduler at boot. Hardware and network access go through small
//! traits so the tasks can be tested on the host.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod blink;
pub mod connectivity;
pub mod weather;

pub use blink::BlinkTask;
pub use connectivity::{
    ConnectivityError, ConnectivityState, LinkMonitorTask, LinkStatus, Orchestrator, RunPolicy,
};
pub use weather::{WeatherError, WeatherReport, WeatherSource, WeatherTask};
