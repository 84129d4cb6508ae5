//! Marquee UART protocol
//!
//! Two serial links share one framing:
//!
//! - controller → matrix controller: draw commands ([`MatrixCommand`])
//! - network bridge → controller: link, time and weather reports
//!   ([`BridgeEvent`])
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ KIND │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–120B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The matrix controller is a dumb terminal: it draws what it is told.
//! Scrolling and message rotation stay on the main controller.

#![no_std]
#![deny(unsafe_code)]

pub mod bridge;
pub mod frame;
pub mod matrix;

pub use bridge::{weather_request, BridgeEvent, LinkCode, WeatherPayload, MAX_LOCATION_LEN};
pub use frame::{Frame, FrameDecoder, FrameError, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use matrix::MatrixCommand;
