//! Decay intervals and stat bounds, loaded from `config.toml`.
//!
//! ```toml
//! [decay]
//! energy_interval_secs = 648
//! satiety_interval_secs = 432
//! bored_reset_interval_secs = 600
//!
//! [bounds]
//! max_energy = 1000
//! max_satiety = 1000
//! max_age_days = 10000
//! clock_skew_tolerance_secs = 60
//! ```
//!
//! A missing file means defaults. Missing keys take their defaults too.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{PetError, Result};

const DEFAULT_ENERGY_INTERVAL_SECS: u64 = 648;
const DEFAULT_SATIETY_INTERVAL_SECS: u64 = 432;
const DEFAULT_BORED_RESET_INTERVAL_SECS: u64 = 600;

const DEFAULT_MAX_ENERGY: i32 = 1000;
const DEFAULT_MAX_SATIETY: i32 = 1000;
const DEFAULT_MAX_AGE_DAYS: i32 = 10000;
const DEFAULT_CLOCK_SKEW_TOLERANCE_SECS: u64 = 60;

fn default_energy_interval_secs() -> u64 {
    DEFAULT_ENERGY_INTERVAL_SECS
}

fn default_satiety_interval_secs() -> u64 {
    DEFAULT_SATIETY_INTERVAL_SECS
}

fn default_bored_reset_interval_secs() -> u64 {
    DEFAULT_BORED_RESET_INTERVAL_SECS
}

fn default_max_energy() -> i32 {
    DEFAULT_MAX_ENERGY
}

fn default_max_satiety() -> i32 {
    DEFAULT_MAX_SATIETY
}

fn default_max_age_days() -> i32 {
    DEFAULT_MAX_AGE_DAYS
}

fn default_clock_skew_tolerance_secs() -> u64 {
    DEFAULT_CLOCK_SKEW_TOLERANCE_SECS
}

/// How fast stats decay while the game is not running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Seconds per point of energy lost.
    #[serde(default = "default_energy_interval_secs")]
    pub energy_interval_secs: u64,
    /// Seconds per point of satiety lost.
    #[serde(default = "default_satiety_interval_secs")]
    pub satiety_interval_secs: u64,
    /// Seconds after which a bored pet stops being bored.
    #[serde(default = "default_bored_reset_interval_secs")]
    pub bored_reset_interval_secs: u64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            energy_interval_secs: DEFAULT_ENERGY_INTERVAL_SECS,
            satiety_interval_secs: DEFAULT_SATIETY_INTERVAL_SECS,
            bored_reset_interval_secs: DEFAULT_BORED_RESET_INTERVAL_SECS,
        }
    }
}

impl DecayConfig {
    pub fn energy_interval(&self) -> Duration {
        secs_to_duration(self.energy_interval_secs)
    }

    pub fn satiety_interval(&self) -> Duration {
        secs_to_duration(self.satiety_interval_secs)
    }

    pub fn bored_reset_interval(&self) -> Duration {
        secs_to_duration(self.bored_reset_interval_secs)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("energy_interval_secs", self.energy_interval_secs),
            ("satiety_interval_secs", self.satiety_interval_secs),
        ] {
            if value == 0 {
                return Err(PetError::ConfigInvalid(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }
}

/// Valid ranges for stats and timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBounds {
    #[serde(default = "default_max_energy")]
    pub max_energy: i32,
    #[serde(default = "default_max_satiety")]
    pub max_satiety: i32,
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i32,
    /// How far in the future a baseline capture instant may lie before it is rejected.
    #[serde(default = "default_clock_skew_tolerance_secs")]
    pub clock_skew_tolerance_secs: u64,
}

impl Default for StatBounds {
    fn default() -> Self {
        Self {
            max_energy: DEFAULT_MAX_ENERGY,
            max_satiety: DEFAULT_MAX_SATIETY,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            clock_skew_tolerance_secs: DEFAULT_CLOCK_SKEW_TOLERANCE_SECS,
        }
    }
}

impl StatBounds {
    pub fn clock_skew_tolerance(&self) -> Duration {
        secs_to_duration(self.clock_skew_tolerance_secs)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("max_energy", self.max_energy),
            ("max_satiety", self.max_satiety),
            ("max_age_days", self.max_age_days),
        ] {
            if value < 0 {
                return Err(PetError::ConfigInvalid(format!(
                    "{} must not be negative",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Top-level widget configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub decay: DecayConfig,
    #[serde(default)]
    pub bounds: StatBounds,
}

impl WidgetConfig {
    pub fn validate(&self) -> Result<()> {
        self.decay.validate()?;
        self.bounds.validate()
    }
}

/// Loads the widget configuration, returning defaults if the file doesn't exist.
pub fn load_widget_config(path: &Path) -> Result<WidgetConfig> {
    if !path.exists() {
        return Ok(WidgetConfig::default());
    }

    let content = fs_err::read_to_string(path)
        .map_err(|e| PetError::io(format!("read {}", path.display()), e))?;
    let config: WidgetConfig =
        toml::from_str(&content).map_err(|e| PetError::ConfigMalformed {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
    config.validate()?;
    Ok(config)
}

fn secs_to_duration(secs: u64) -> Duration {
    // chrono::Duration tops out at i64::MAX milliseconds.
    let max_secs = (i64::MAX / 1000) as u64;
    Duration::seconds(secs.min(max_secs) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_returns_defaults() {
        let temp = tempdir().unwrap();
        let config = load_widget_config(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.decay.energy_interval(), Duration::seconds(648));
        assert_eq!(config.decay.satiety_interval(), Duration::seconds(432));
        assert_eq!(config.decay.bored_reset_interval(), Duration::seconds(600));
        assert_eq!(config.bounds.max_energy, 1000);
        assert_eq!(config.bounds.clock_skew_tolerance(), Duration::seconds(60));
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs_err::write(&path, "[decay]\nenergy_interval_secs = 5\n").unwrap();

        let config = load_widget_config(&path).unwrap();
        assert_eq!(config.decay.energy_interval_secs, 5);
        assert_eq!(config.decay.satiety_interval_secs, 432);
        assert_eq!(config.bounds, StatBounds::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs_err::write(&path, "[decay\nenergy_interval_secs = ").unwrap();

        let err = load_widget_config(&path).unwrap_err();
        assert!(matches!(err, PetError::ConfigMalformed { .. }));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs_err::write(&path, "[decay]\nsatiety_interval_secs = 0\n").unwrap();

        let err = load_widget_config(&path).unwrap_err();
        assert!(matches!(err, PetError::ConfigInvalid(_)));
    }

    #[test]
    fn test_zero_bored_reset_is_allowed() {
        let config = DecayConfig {
            bored_reset_interval_secs: 0,
            ..DecayConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
