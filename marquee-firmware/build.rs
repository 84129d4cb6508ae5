//! Build script for marquee-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time

use std::collections::BTreeMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Must match marquee-core's MAX_CONFIG_MESSAGES
const MAX_MESSAGES: usize = 4;

/// Must match marquee-core's MAX_TEXT_LEN
const MAX_TEXT_LEN: usize = 64;

/// Must match marquee-core's MAX_NAME_LEN
const MAX_NAME_LEN: usize = 16;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeviceFile {
    display: Option<DisplaySection>,
    clock: Option<ClockSection>,
    weather: Option<WeatherSection>,
    link: Option<LinkSection>,
    #[serde(default)]
    message: BTreeMap<String, MessageSection>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DisplaySection {
    segments: Option<u8>,
    brightness: Option<u8>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)] // Type-checked only
struct ClockSection {
    utc_offset_min: Option<i16>,
    show_date: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)] // Type-checked only
struct WeatherSection {
    period_s: Option<u32>,
    retry_s: Option<u32>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkSection {
    poll_ms: Option<u32>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)] // Type-checked only
struct MessageSection {
    text: String,
    period_ms: Option<u32>,
    cycles: Option<u16>,
    scrolling: Option<bool>,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read device.toml", &[e.to_string()]),
    };

    let config: DeviceFile = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail(
            "Invalid device.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let errors = check_ranges(&config);
    if !errors.is_empty() {
        fail("Invalid values in device.toml", &errors);
    }

    println!("cargo:warning=device.toml validated successfully");
}

/// Checks the types cannot express
fn check_ranges(config: &DeviceFile) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(display) = &config.display {
        if display.segments == Some(0) {
            errors.push("[display] segments must be at least 1".to_string());
        }
        if display.brightness.is_some_and(|b| b > 15) {
            errors.push("[display] brightness must be 0-15".to_string());
        }
    }

    if config.link.as_ref().and_then(|l| l.poll_ms) == Some(0) {
        errors.push("[link] poll_ms must be at least 1".to_string());
    }

    if config.message.len() > MAX_MESSAGES {
        errors.push(format!("at most {} [message.*] sections", MAX_MESSAGES));
    }

    for (name, message) in &config.message {
        if name.len() > MAX_NAME_LEN || name.contains('.') {
            errors.push(format!(
                "[message.{}] name must be at most {} characters without dots",
                name, MAX_NAME_LEN
            ));
        }
        if message.text.len() > MAX_TEXT_LEN {
            errors.push(format!(
                "[message.{}] text is truncated to {} bytes",
                name, MAX_TEXT_LEN
            ));
        }
    }

    errors
}

/// Abort the build with a boxed error listing
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| {
                let truncated = if line.len() > 62 {
                    format!("{}...", &line[..59])
                } else {
                    line.clone()
                };
                format!("║  • {:<62} ║", truncated)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}
