//! Board-agnostic core logic for the marquee display firmware
//!
//! This crate contains everything that decides *what* is shown and *when*,
//! without depending on a specific board:
//!
//! - Cooperative task abstraction and the tick scheduler
//! - Message descriptors, the priority queue and the regular rotation
//! - Display task state machine (select, scroll, refresh)
//! - Renderer and wall clock traits
//! - Device configuration types and parser

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod config;
pub mod display;
pub mod message;
pub mod scheduler;
pub mod task;
pub mod time;
pub mod traits;
