//! Configuration type definitions

use heapless::{String, Vec};

use crate::message::{text_from, Content, MessageDescriptor, OwnerId, Text};
use crate::time::Duration;

/// Maximum length of a `[message.<name>]` name
pub const MAX_NAME_LEN: usize = 16;

/// Maximum configured messages
pub const MAX_CONFIG_MESSAGES: usize = 4;

/// Matrix hardware settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Chained 8x8 segments (one character each)
    pub segments: u8,
    /// Intensity 0-15
    pub brightness: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            segments: 8,
            brightness: 4,
        }
    }
}

/// Clock and date rotation entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Local offset from UTC in minutes
    pub utc_offset_min: i16,
    /// Show the date after the clock
    pub show_date: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_min: 0,
            show_date: true,
        }
    }
}

/// Weather fetch timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherConfig {
    /// Seconds between successful fetches
    pub period_s: u32,
    /// Seconds before retrying a failed fetch
    pub retry_s: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            period_s: 600,
            retry_s: 60,
        }
    }
}

impl WeatherConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_s)
    }

    pub fn retry(&self) -> Duration {
        Duration::from_secs(self.retry_s)
    }
}

/// Network link supervision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Link status poll interval in milliseconds
    pub poll_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { poll_ms: 500 }
    }
}

/// A static message added to the rotation at boot
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageConfig {
    pub name: String<MAX_NAME_LEN>,
    pub text: Text,
    /// Hold time per refresh, or step time when scrolling
    pub period_ms: u32,
    pub cycles: u16,
    pub scrolling: bool,
}

impl MessageConfig {
    /// Create a message entry with default timing
    pub fn new(name: &str) -> Self {
        let mut n = String::new();
        for c in name.chars() {
            if n.push(c).is_err() {
                break;
            }
        }
        Self {
            name: n,
            text: Text::new(),
            period_ms: 1000,
            cycles: 1,
            scrolling: false,
        }
    }

    /// Rotation descriptor for this entry
    pub fn descriptor(&self) -> MessageDescriptor<'static> {
        MessageDescriptor::regular(
            OwnerId::CONFIG,
            Content::Static(text_from(&self.text)),
            Duration::from_millis(self.period_ms),
            self.cycles,
            self.scrolling,
        )
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub display: DisplayConfig,
    pub clock: ClockConfig,
    pub weather: WeatherConfig,
    pub link: LinkConfig,
    pub messages: Vec<MessageConfig, MAX_CONFIG_MESSAGES>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.display.segments, 8);
        assert_eq!(config.display.brightness, 4);
        assert!(config.clock.show_date);
        assert_eq!(config.weather.period(), Duration::from_secs(600));
        assert_eq!(config.weather.retry(), Duration::from_secs(60));
        assert_eq!(config.link.poll_ms, 500);
        assert!(config.messages.is_empty());
    }

    #[test]
    fn test_message_descriptor() {
        let mut msg = MessageConfig::new("greeting");
        msg.text = text_from("Hello");
        msg.period_ms = 150;
        msg.scrolling = true;

        let desc = msg.descriptor();
        assert_eq!(desc.owner, OwnerId::CONFIG);
        assert_eq!(desc.period, Duration::from_millis(150));
        assert!(desc.scrolling);
        assert_eq!(
            desc.content.produce(&crate::traits::NoClock).as_str(),
            "Hello"
        );
    }
}
