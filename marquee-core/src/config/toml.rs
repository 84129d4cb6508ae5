//! Simple TOML parser for device configuration
//!
//! Handles only the subset the device file needs. It does NOT support the
//! full TOML spec.
//!
//! Supported:
//! - `key = value` pairs (string, integer, boolean)
//! - `[section]` and `[message.<name>]` headers
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown sections and keys are rejected so typos do not go unnoticed.

use super::types::{DeviceConfig, MessageConfig, MAX_NAME_LEN};
use crate::message::text_from;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// More `[message.*]` sections than fit
    TooManyItems,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Clock,
    Weather,
    Link,
    /// Index into `DeviceConfig::messages`
    Message(usize),
}

/// Parse TOML configuration into a `DeviceConfig`
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1], &mut config)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

/// Drop a trailing comment, ignoring `#` inside quotes
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '#' if !quoted => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse a header; `[message.<name>]` allocates a new message entry
fn parse_section_header(header: &str, config: &mut DeviceConfig) -> Result<Section, ParseError> {
    let header = header.trim();

    if let Some(name) = header.strip_prefix("message.") {
        let name = name.trim();
        if name.is_empty() || name.len() > MAX_NAME_LEN || name.contains('.') {
            return Err(ParseError::InvalidSection);
        }
        config
            .messages
            .push(MessageConfig::new(name))
            .map_err(|_| ParseError::TooManyItems)?;
        return Ok(Section::Message(config.messages.len() - 1));
    }

    match header {
        "display" => Ok(Section::Display),
        "clock" => Ok(Section::Clock),
        "weather" => Ok(Section::Weather),
        "link" => Ok(Section::Link),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Strip surrounding quotes
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply one key to the current section
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::UnknownKey),
        Section::Display => match key {
            "segments" => {
                let segments: u8 = parse_int(value)?;
                if segments == 0 {
                    return Err(ParseError::InvalidValue);
                }
                config.display.segments = segments;
            }
            "brightness" => {
                let brightness: u8 = parse_int(value)?;
                if brightness > 15 {
                    return Err(ParseError::InvalidValue);
                }
                config.display.brightness = brightness;
            }
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Clock => match key {
            "utc_offset_min" => config.clock.utc_offset_min = parse_int(value)?,
            "show_date" => config.clock.show_date = parse_bool(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Weather => match key {
            "period_s" => config.weather.period_s = parse_int(value)?,
            "retry_s" => config.weather.retry_s = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Link => match key {
            "poll_ms" => config.link.poll_ms = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Message(index) => {
            let msg = config
                .messages
                .get_mut(index)
                .ok_or(ParseError::InvalidSection)?;
            match key {
                "text" => msg.text = text_from(parse_string(value)?),
                "period_ms" => msg.period_ms = parse_int(value)?,
                "cycles" => msg.cycles = parse_int(value)?,
                "scrolling" => msg.scrolling = parse_bool(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(parse_config("").unwrap(), DeviceConfig::default());
        assert_eq!(
            parse_config("# nothing here\n\n").unwrap(),
            DeviceConfig::default()
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Living room marquee
[display]
segments = 12
brightness = 7

[clock]
utc_offset_min = -300   # EST
show_date = false

[weather]
period_s = 900
retry_s = 30

[link]
poll_ms = 250

[message.greeting]
text = "Hello # world"
period_ms = 120
scrolling = true

[message.motd]
text = "Stay curious"
cycles = 3
"#;
        let config = parse_config(config_str).unwrap();

        assert_eq!(config.display.segments, 12);
        assert_eq!(config.display.brightness, 7);
        assert_eq!(config.clock.utc_offset_min, -300);
        assert!(!config.clock.show_date);
        assert_eq!(config.weather.period_s, 900);
        assert_eq!(config.weather.retry_s, 30);
        assert_eq!(config.link.poll_ms, 250);

        assert_eq!(config.messages.len(), 2);
        let greeting = &config.messages[0];
        assert_eq!(greeting.name.as_str(), "greeting");
        assert_eq!(greeting.text.as_str(), "Hello # world");
        assert_eq!(greeting.period_ms, 120);
        assert!(greeting.scrolling);
        assert_eq!(greeting.cycles, 1);

        let motd = &config.messages[1];
        assert_eq!(motd.text.as_str(), "Stay curious");
        assert_eq!(motd.cycles, 3);
        assert_eq!(motd.period_ms, 1000);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[stepper]\n"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(parse_config("[message.]\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[display]\ncolour = 3\n"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(parse_config("segments = 3\n"), Err(ParseError::UnknownKey));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[display]\nbrightness = 16\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[display]\nsegments = 0\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[clock]\nshow_date = yes\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[message.a]\ntext = unquoted\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_invalid_line() {
        assert_eq!(
            parse_config("[display]\nsegments\n"),
            Err(ParseError::InvalidLine)
        );
    }

    #[test]
    fn test_too_many_messages() {
        let config_str = "[message.a]\n[message.b]\n[message.c]\n[message.d]\n[message.e]\n";
        assert_eq!(parse_config(config_str), Err(ParseError::TooManyItems));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a = 1 # one"), "a = 1 ");
        assert_eq!(strip_comment(r##"t = "#1""##), r##"t = "#1""##);
    }
}
