//! Marquee - Scrolling Message Display Firmware
//!
//! Main firmware binary for RP2040-based marquee boards. A single
//! cooperative scheduler runs the display rotation, the link monitor, the
//! weather fetcher and the heartbeat LED; Embassy tasks only shuttle bytes
//! on the two UARTs.
//!
//! - UART0 (GPIO0/1): LED matrix controller, marquee-protocol frames
//! - UART1 (GPIO4/5): network bridge (link state, time, weather)
//! - GPIO25: heartbeat LED

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use marquee_core::display::DisplayTask;
use marquee_core::message::{OwnerId, SharedText};
use marquee_core::scheduler::Scheduler;
use marquee_core::time::{Duration, Instant};
use marquee_display::{FrameBackend, Scroller};
use marquee_services::{BlinkTask, LinkMonitorTask, Orchestrator, RunPolicy, WeatherTask};

use crate::bridge::{bridge_rx_task, bridge_tx_task, BridgeClock, BridgeLink, BridgeWeather};
use crate::config::load_config;

mod bridge;
mod config;

/// Owner of the weather rotation entry
const WEATHER_OWNER: OwnerId = OwnerId(2);

/// Longest sleep when no task has a wake time
const IDLE_POLL: Duration = Duration::from_millis(50);

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static MATRIX_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static MATRIX_RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static BRIDGE_TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static BRIDGE_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Marquee firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Setup UART0 for the matrix controller
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = MATRIX_TX_BUF.init([0u8; 256]);
    let rx_buf = MATRIX_RX_BUF.init([0u8; 16]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    // The matrix controller never answers
    let (matrix_tx, _matrix_rx) = uart.split();

    let mut backend = FrameBackend::new(matrix_tx, config.display.segments);
    if let Err(e) = backend.configure(config.display.brightness) {
        warn!("Matrix configuration failed: {:?}", e);
    }
    info!("UART initialized for matrix controller");

    // Setup UART1 for the network bridge
    let tx_buf = BRIDGE_TX_BUF.init([0u8; 64]);
    let rx_buf = BRIDGE_RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (bridge_tx, bridge_rx) = uart.split();

    spawner.spawn(bridge_rx_task(bridge_rx)).unwrap();
    spawner.spawn(bridge_tx_task(bridge_tx)).unwrap();
    info!("UART initialized for network bridge");

    // Scheduler tasks; everything they borrow is declared first
    let clock = BridgeClock::new(config.clock.utc_offset_min);
    let weather_text = SharedText::new();

    let weather = RefCell::new(WeatherTask::new(
        BridgeWeather,
        &weather_text,
        config.weather.period(),
        config.weather.retry(),
    ));

    let mut display_task = DisplayTask::new(Scroller::new(backend), &clock);
    if let Err(e) = display_task.add_clock() {
        warn!("Clock message not added: {:?}", e);
    }
    if config.clock.show_date {
        if let Err(e) = display_task.add_date() {
            warn!("Date message not added: {:?}", e);
        }
    }
    for message in &config.messages {
        if let Err(e) = display_task.add_regular_message(message.descriptor()) {
            warn!("Message '{}' not added: {:?}", message.name.as_str(), e);
        }
    }
    if let Err(e) = display_task.add_regular_message(weather.borrow().descriptor(WEATHER_OWNER)) {
        warn!("Weather message not added: {:?}", e);
    }
    let display = RefCell::new(display_task);

    let mut orchestrator = Orchestrator::new(&display);
    if let Err(e) = orchestrator.add_dependent(&weather, RunPolicy::ClientOnly) {
        warn!("Weather task not under link control: {:?}", e);
    }

    let link_monitor = RefCell::new(LinkMonitorTask::new(
        BridgeLink::default(),
        orchestrator,
        Duration::from_millis(config.link.poll_ms),
    ));

    // Onboard LED, lit when high
    let blink = RefCell::new(BlinkTask::new(Output::new(p.PIN_25, Level::Low), false));

    let mut scheduler = Scheduler::new();
    let registered = scheduler
        .register(&display)
        .and_then(|_| scheduler.register(&link_monitor))
        .and_then(|_| scheduler.register(&weather))
        .and_then(|_| scheduler.register(&blink));
    if let Err(e) = registered {
        error!("Task registration failed: {:?}", e);
    }
    info!("Scheduler running {} tasks", scheduler.len());

    loop {
        let now = Instant::from_millis(embassy_time::Instant::now().as_millis());
        scheduler.tick(now);

        let wake = scheduler.next_wake().unwrap_or(now + IDLE_POLL);
        Timer::at(embassy_time::Instant::from_millis(wake.as_millis())).await;
    }
}
