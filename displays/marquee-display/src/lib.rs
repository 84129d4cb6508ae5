//! LED matrix output for the marquee firmware
//!
//! This crate provides:
//! - `DisplayBackend` trait for different matrix hardware
//! - `Scroller`, the `ScrollRenderer` the display task draws through
//! - `FrameBackend`, a backend that drives a remote matrix controller over
//!   a serial link using marquee-protocol
//!
//! # Architecture
//!
//! The display task only knows about `ScrollRenderer`. `Scroller` turns
//! "show this text" and "advance one step" into backend draw calls, so a
//! directly driven matrix and a remote one look the same to the core.

#![no_std]

pub mod backend;
pub mod frame_backend;
pub mod scroller;

pub use backend::{DisplayBackend, DisplayError};
pub use frame_backend::FrameBackend;
pub use scroller::Scroller;
