// src/config.rs

//! Defines the configuration structures for the virtual screen.
//!
//! Every section derives `Deserialize` with `#[serde(default)]`, so a config
//! file only needs to name the values it changes. Files are JSON:
//!
//! ```json
//! { "display": { "width": 640, "height": 480, "refresh_rate": 30 } }
//! ```

use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::resolution::Resolution;

/// Environment variable naming the config file read by [`CONFIG`].
pub const CONFIG_PATH_ENV: &str = "VSCREEN_CONFIG";

/// Global configuration, read once from `$VSCREEN_CONFIG` or defaulted.
pub static CONFIG: Lazy<Config> = Lazy::new(|| match std::env::var(CONFIG_PATH_ENV) {
    Ok(path) => Config::load(&path).unwrap_or_else(|e| {
        warn!("Failed to load config from '{}': {:#}. Using defaults.", path, e);
        Config::default()
    }),
    Err(_) => {
        info!("{} not set, using default configuration.", CONFIG_PATH_ENV);
        Config::default()
    }
});

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for a screen session.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub backend: BackendConfig,
    pub text: TextConfig,
    pub input: InputConfig,
}

impl Config {
    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parses a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw).context("Invalid config JSON")?;
        Ok(config.sanitized())
    }

    /// Clamps values that have a fixed valid range.
    fn sanitized(mut self) -> Self {
        self.display.brightness = self.display.brightness.clamp(0.0, 1.0);
        self.display.refresh_rate = self.display.refresh_rate.max(1);
        self
    }
}

// --- Display Configuration ---

/// Frame buffer size and presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// Presentation cadence in frames per second.
    pub refresh_rate: u32,
    /// Channel multiplier applied at presentation, `0.0..=1.0`.
    pub brightness: f32,
}

impl DisplayConfig {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 1280,
            height: 720,
            refresh_rate: 60,
            brightness: 1.0,
        }
    }
}

// --- Backend Configuration ---

/// Which numeric backend to try first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// Probe the accelerated device and fall back to the CPU.
    #[default]
    Auto,
    /// Skip probing and use the CPU backend.
    Cpu,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BackendConfig {
    pub preference: BackendPreference,
    /// Worker count for the accelerated backend. `None` asks the OS.
    pub threads: Option<usize>,
}

// --- Text Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TextConfig {
    /// Maximum cached glyph runs. `None` keeps every run forever.
    pub cache_capacity: Option<usize>,
    /// Extra pixels between consecutive lines.
    pub line_spacing: i32,
}

impl Default for TextConfig {
    fn default() -> Self {
        TextConfig {
            cache_capacity: Some(256),
            line_spacing: 0,
        }
    }
}

// --- Input Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    /// Keyboard queue capacity; `-1` means unbounded.
    pub capacity: i64,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig { capacity: -1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display.resolution(), Resolution::new(1280, 720));
        assert_eq!(config.display.refresh_rate, 60);
        assert_eq!(config.backend.preference, BackendPreference::Auto);
        assert_eq!(config.text.cache_capacity, Some(256));
        assert_eq!(config.input.capacity, -1);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = Config::from_json_str(
            r#"{ "display": { "width": 100, "height": 50 }, "backend": { "preference": "cpu" } }"#,
        )
        .unwrap();
        assert_eq!(config.display.resolution(), Resolution::new(100, 50));
        assert_eq!(config.display.refresh_rate, 60);
        assert_eq!(config.backend.preference, BackendPreference::Cpu);
        assert_eq!(config.text, TextConfig::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config =
            Config::from_json_str(r#"{ "display": { "brightness": 3.5, "refresh_rate": 0 } }"#)
                .unwrap();
        assert_eq!(config.display.brightness, 1.0);
        assert_eq!(config.display.refresh_rate, 1);
    }

    #[test]
    fn test_unbounded_cache_is_null() {
        let config = Config::from_json_str(r#"{ "text": { "cache_capacity": null } }"#).unwrap();
        assert_eq!(config.text.cache_capacity, None);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Config::from_json_str("{ display: ").is_err());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/vscreen.json").is_err());
    }
}
