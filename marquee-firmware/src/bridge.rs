//! Network bridge link
//!
//! The bridge co-processor sits on UART1. `bridge_rx_task` decodes its
//! events into [`BRIDGE`]; the scheduler tasks read that state through
//! the adapters below and never touch the UART themselves.

use core::cell::RefCell;

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;
use embedded_io_async::{Read, Write};

use marquee_core::time::LocalTime;
use marquee_core::traits::WallClock;
use marquee_protocol::{weather_request, BridgeEvent, FrameDecoder, LinkCode, WeatherPayload};
use marquee_services::{
    ConnectivityState, LinkStatus, WeatherError, WeatherReport, WeatherSource,
};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Unix time paired with the uptime it was received at
#[derive(Clone, Copy)]
struct TimeBase {
    unix_s: u32,
    at: Instant,
}

/// Latest weather answer from the bridge
enum WeatherSlot {
    Empty,
    Ready(WeatherPayload),
    Failed,
}

/// Everything the bridge has told us so far
pub struct BridgeState {
    link: LinkCode,
    time: Option<TimeBase>,
    weather: WeatherSlot,
}

impl BridgeState {
    const fn new() -> Self {
        Self {
            link: LinkCode::Offline,
            time: None,
            weather: WeatherSlot::Empty,
        }
    }

    fn apply(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::Link(link) => {
                debug!("Bridge link: {:?}", link);
                self.link = link;
            }
            BridgeEvent::Time { unix_s } => {
                debug!("Bridge time: {}", unix_s);
                self.time = Some(TimeBase {
                    unix_s,
                    at: Instant::now(),
                });
            }
            BridgeEvent::Weather(payload) => self.weather = WeatherSlot::Ready(payload),
            BridgeEvent::WeatherUnavailable => self.weather = WeatherSlot::Failed,
        }
    }
}

/// Shared bridge state, written by the RX task
pub static BRIDGE: Mutex<CriticalSectionRawMutex, RefCell<BridgeState>> =
    Mutex::new(RefCell::new(BridgeState::new()));

/// Signal that a weather request should go out
pub static WEATHER_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Bridge RX task - decodes event frames into [`BRIDGE`]
#[embassy_executor::task]
pub async fn bridge_rx_task(mut rx: BufferedUartRx) {
    info!("Bridge RX task started");

    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match decoder.push(byte) {
                        Ok(Some(frame)) => match BridgeEvent::from_frame(&frame) {
                            Ok(event) => {
                                BRIDGE.lock(|state| state.borrow_mut().apply(event));
                            }
                            Err(e) => {
                                warn!("Failed to parse bridge event: {:?}", e);
                            }
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Bridge TX task - forwards weather requests
#[embassy_executor::task]
pub async fn bridge_tx_task(mut tx: BufferedUartTx) {
    info!("Bridge TX task started");

    let mut buf = [0u8; marquee_protocol::MAX_FRAME_SIZE];

    loop {
        WEATHER_REQUEST.wait().await;

        let len = match weather_request().encode(&mut buf) {
            Ok(len) => len,
            Err(e) => {
                error!("Failed to encode weather request: {:?}", e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("UART write error: {:?}", e);
        }
    }
}

/// Link state as seen by the connectivity monitor
#[derive(Default)]
pub struct BridgeLink {
    address: Option<[u8; 4]>,
}

impl LinkStatus for BridgeLink {
    fn state(&mut self) -> ConnectivityState {
        let link = BRIDGE.lock(|state| state.borrow().link);
        match link {
            LinkCode::Offline => {
                self.address = None;
                ConnectivityState::Offline
            }
            LinkCode::AccessPoint => {
                self.address = None;
                ConnectivityState::AccessPoint
            }
            LinkCode::Client(address) => {
                self.address = Some(address);
                ConnectivityState::Client
            }
        }
    }

    fn address(&self) -> Option<[u8; 4]> {
        self.address
    }
}

/// Wall clock synchronised by the bridge
pub struct BridgeClock {
    utc_offset_min: i16,
}

impl BridgeClock {
    pub const fn new(utc_offset_min: i16) -> Self {
        Self { utc_offset_min }
    }
}

impl WallClock for BridgeClock {
    fn local_time(&self) -> Option<LocalTime> {
        let base = BRIDGE.lock(|state| state.borrow().time)?;
        let elapsed = Instant::now().saturating_duration_since(base.at).as_secs();
        let unix_s = base.unix_s.saturating_add(elapsed as u32);
        Some(LocalTime::from_unix(unix_s, self.utc_offset_min))
    }
}

/// Weather observations relayed by the bridge
///
/// Every fetch asks for the next observation, so the answer is waiting
/// by the time the weather task comes back.
#[derive(Default)]
pub struct BridgeWeather;

impl WeatherSource for BridgeWeather {
    fn fetch(&mut self) -> Result<WeatherReport, WeatherError> {
        let slot = BRIDGE.lock(|state| {
            core::mem::replace(&mut state.borrow_mut().weather, WeatherSlot::Empty)
        });
        WEATHER_REQUEST.signal(());

        match slot {
            WeatherSlot::Ready(payload) => Ok(WeatherReport {
                location: payload.location,
                temperature_x10: payload.temperature_x10,
                pressure_hpa: payload.pressure_hpa,
            }),
            WeatherSlot::Empty => Err(WeatherError::Unavailable),
            WeatherSlot::Failed => Err(WeatherError::InvalidResponse),
        }
    }
}
