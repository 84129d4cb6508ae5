//! Network bridge → controller events
//!
//! The bridge is a separate network co-processor. It reports link state
//! changes, the current Unix time once synchronised, and weather
//! observations when asked.

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::{String, Vec};

pub const KIND_LINK: u8 = 0x40;
pub const KIND_TIME: u8 = 0x41;
pub const KIND_WEATHER: u8 = 0x42;
pub const KIND_WEATHER_ERROR: u8 = 0x43;

/// Controller → bridge: request a weather observation
pub const KIND_WEATHER_REQUEST: u8 = 0x50;

/// Maximum location name length
pub const MAX_LOCATION_LEN: usize = 24;

const LINK_OFFLINE: u8 = 0;
const LINK_ACCESS_POINT: u8 = 1;
const LINK_CLIENT: u8 = 2;

/// Link state reported by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkCode {
    Offline,
    /// Serving its own access point for provisioning
    AccessPoint,
    /// Joined a network with this IPv4 address
    Client([u8; 4]),
}

/// One weather observation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherPayload {
    /// Temperature in tenths of a degree Celsius
    pub temperature_x10: i16,
    pub pressure_hpa: u16,
    pub location: String<MAX_LOCATION_LEN>,
}

/// Bridge events
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeEvent {
    Link(LinkCode),
    /// Seconds since the Unix epoch (UTC)
    Time { unix_s: u32 },
    Weather(WeatherPayload),
    /// The last weather request failed on the bridge side
    WeatherUnavailable,
}

impl BridgeEvent {
    /// Decode a frame received from the bridge
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.kind {
            KIND_LINK => match payload {
                [LINK_OFFLINE] => Ok(BridgeEvent::Link(LinkCode::Offline)),
                [LINK_ACCESS_POINT] => Ok(BridgeEvent::Link(LinkCode::AccessPoint)),
                [LINK_CLIENT, a, b, c, d] => {
                    Ok(BridgeEvent::Link(LinkCode::Client([*a, *b, *c, *d])))
                }
                _ => Err(FrameError::InvalidPayload),
            },
            KIND_TIME => {
                let bytes: [u8; 4] = payload
                    .try_into()
                    .map_err(|_| FrameError::InvalidPayload)?;
                Ok(BridgeEvent::Time {
                    unix_s: u32::from_le_bytes(bytes),
                })
            }
            KIND_WEATHER => {
                // Payload: [temp i16 LE][pressure u16 LE][location...]
                let [t0, t1, p0, p1, location @ ..] = payload else {
                    return Err(FrameError::InvalidPayload);
                };
                let location =
                    core::str::from_utf8(location).map_err(|_| FrameError::InvalidPayload)?;
                let location =
                    String::try_from(location).map_err(|_| FrameError::InvalidPayload)?;
                Ok(BridgeEvent::Weather(WeatherPayload {
                    temperature_x10: i16::from_le_bytes([*t0, *t1]),
                    pressure_hpa: u16::from_le_bytes([*p0, *p1]),
                    location,
                }))
            }
            KIND_WEATHER_ERROR => Ok(BridgeEvent::WeatherUnavailable),
            _ => Err(FrameError::UnknownKind),
        }
    }

    /// Encode into a frame (bridge side, simulation and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            BridgeEvent::Link(LinkCode::Offline) => Frame::new(KIND_LINK, &[LINK_OFFLINE]),
            BridgeEvent::Link(LinkCode::AccessPoint) => {
                Frame::new(KIND_LINK, &[LINK_ACCESS_POINT])
            }
            BridgeEvent::Link(LinkCode::Client([a, b, c, d])) => {
                Frame::new(KIND_LINK, &[LINK_CLIENT, *a, *b, *c, *d])
            }
            BridgeEvent::Time { unix_s } => Frame::new(KIND_TIME, &unix_s.to_le_bytes()),
            BridgeEvent::Weather(w) => {
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&w.temperature_x10.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(&w.pressure_hpa.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(w.location.as_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Frame::new(KIND_WEATHER, &payload)
            }
            BridgeEvent::WeatherUnavailable => Ok(Frame::empty(KIND_WEATHER_ERROR)),
        }
    }
}

/// Frame asking the bridge for a fresh weather observation
pub fn weather_request() -> Frame {
    Frame::empty(KIND_WEATHER_REQUEST)
}
