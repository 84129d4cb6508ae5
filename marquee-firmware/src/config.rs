//! Device configuration loading
//!
//! device.toml is baked into the image and checked by build.rs, so a
//! parse failure here means the core parser and the build-time check
//! disagree. Fall back to defaults rather than refusing to boot.

use defmt::*;

use marquee_core::config::{parse_config, DeviceConfig};

/// Embedded configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

/// Parse the embedded configuration
pub fn load_config() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: {} segments, brightness {}, {} messages",
                config.display.segments,
                config.display.brightness,
                config.messages.len()
            );
            config
        }
        Err(e) => {
            warn!("Embedded config invalid ({:?}), using defaults", e);
            DeviceConfig::default()
        }
    }
}
