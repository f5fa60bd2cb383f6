//! Configuration management
//!
//! Settings live in settings.json inside the data directory:
//! ```json
//! {
//!   "security": { "maxPinAttempts": 4, "pinLength": 4 },
//!   "display": { "segmentSeparator": " • " }
//! }
//! ```
//! Sections this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::pin::{DEFAULT_MAX_ATTEMPTS, DEFAULT_PIN_LENGTH};
use crate::domain::result::Error;

/// Separator between identifier segments when shown inline
pub const DEFAULT_SEGMENT_SEPARATOR: &str = " • ";

const MIN_PIN_LENGTH: usize = 4;
const MAX_PIN_LENGTH: usize = 8;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    security: SecuritySettings,
    #[serde(default)]
    display: DisplaySettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecuritySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_pin_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pin_length: Option<usize>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplaySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    segment_separator: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Payline configuration (simplified view of settings)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Consecutive failures before lockout
    pub max_pin_attempts: u32,
    /// Required PIN length in digits
    pub pin_length: usize,
    pub segment_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_pin_attempts: DEFAULT_MAX_ATTEMPTS,
            pin_length: DEFAULT_PIN_LENGTH,
            segment_separator: DEFAULT_SEGMENT_SEPARATOR.to_string(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// The attempt limit can be overridden with PAYLINE_MAX_PIN_ATTEMPTS
    /// (for CI/testing).
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {:?}", settings_path))?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let max_pin_attempts = match std::env::var("PAYLINE_MAX_PIN_ATTEMPTS") {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid PAYLINE_MAX_PIN_ATTEMPTS: {}", value)))?,
            Err(_) => raw.security.max_pin_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        };

        let config = Self {
            max_pin_attempts,
            pin_length: raw.security.pin_length.unwrap_or(DEFAULT_PIN_LENGTH),
            segment_separator: raw
                .display
                .segment_separator
                .unwrap_or_else(|| DEFAULT_SEGMENT_SEPARATOR.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to the data directory
    /// Preserves other settings this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        self.validate()?;
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.security.max_pin_attempts = Some(self.max_pin_attempts);
        settings.security.pin_length = Some(self.pin_length);
        settings.display.segment_separator = Some(self.segment_separator.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {:?}", settings_path))?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), Error> {
        if self.max_pin_attempts == 0 {
            return Err(Error::Config("maxPinAttempts must be at least 1".to_string()));
        }
        if !(MIN_PIN_LENGTH..=MAX_PIN_LENGTH).contains(&self.pin_length) {
            return Err(Error::Config(format!(
                "pinLength must be between {} and {}",
                MIN_PIN_LENGTH, MAX_PIN_LENGTH
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.pin_length, 4);
        assert_eq!(config.segment_separator, " • ");
    }

    #[test]
    fn test_save_preserves_unmanaged_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"theme":"dark","security":{"pinLength":6,"biometrics":true}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        assert_eq!(config.pin_length, 6);
        config.segment_separator = " | ".to_string();
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["security"]["biometrics"], true);
        assert_eq!(saved["display"]["segmentSeparator"], " | ");
    }

    #[test]
    fn test_rejects_invalid_pin_length() {
        let config = Config {
            pin_length: 2,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
