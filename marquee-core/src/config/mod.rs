//! Device configuration
//!
//! Configuration is a small TOML file baked into the firmware image and
//! parsed at boot. Every field has a default, so an empty file is valid.

mod toml;
mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
