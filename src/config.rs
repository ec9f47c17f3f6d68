//! Engine settings.
//!
//! Every field has a working default, so a TOML document only needs the keys
//! it wants to change:
//!
//! ```toml
//! schedule_ahead = 0.2
//! seed = 7
//! ```

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::REQUIRED_SAMPLE_RATE;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Output rate of the renderer, in Hz.
    pub sample_rate: u32,
    /// How often the host should call `tick`, in seconds.
    pub tick_interval: f64,
    /// How far past "now" each tick schedules, in seconds.
    pub schedule_ahead: f64,
    /// Gap between pressing start and the first step, in seconds.
    pub start_delay: f64,
    /// Most hits the renderer keeps sounding at once.
    pub max_hits: usize,
    /// Fixed RNG seed for reproducible grooves and probability draws.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: REQUIRED_SAMPLE_RATE,
            tick_interval: 0.025,
            schedule_ahead: 0.11,
            start_delay: 0.04,
            max_hits: 64,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(self.tick_interval)
    }

    /// Replace nonsense values (zero rates, negative windows) with defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        Self {
            sample_rate: if self.sample_rate == 0 {
                defaults.sample_rate
            } else {
                self.sample_rate
            },
            tick_interval: positive(self.tick_interval, defaults.tick_interval),
            schedule_ahead: positive(self.schedule_ahead, defaults.schedule_ahead),
            start_delay: if self.start_delay.is_finite() {
                self.start_delay.max(0.0)
            } else {
                defaults.start_delay
            },
            max_hits: self.max_hits.max(1),
            seed: self.seed,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not write engine config: {0}")]
    Write(#[from] toml::ser::Error),
}

#[cfg(feature = "serde")]
impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config.sanitized())
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_scheduler_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.tick_duration(), Duration::from_millis(25));
        assert_eq!(config.schedule_ahead, 0.11);
        assert_eq!(config.start_delay, 0.04);
    }

    #[test]
    fn sanitize_repairs_bad_values() {
        let config = EngineConfig {
            sample_rate: 0,
            tick_interval: -1.0,
            schedule_ahead: f64::NAN,
            start_delay: -0.5,
            max_hits: 0,
            seed: Some(3),
        }
        .sanitized();
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.tick_interval, 0.025);
        assert_eq!(config.schedule_ahead, 0.11);
        assert_eq!(config.start_delay, 0.0);
        assert_eq!(config.max_hits, 1);
        assert_eq!(config.seed, Some(3));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("schedule_ahead = 0.2\nseed = 7\n").unwrap();
        assert_eq!(config.schedule_ahead, 0.2);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.tick_interval, 0.025);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn toml_round_trip() {
        let config = EngineConfig::default().with_seed(11);
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("seed = 11"));
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn malformed_toml_is_an_error() {
        let err = EngineConfig::from_toml_str("sample_rate = \"fast\"").unwrap_err();
        assert!(err.to_string().starts_with("invalid engine config"));
    }
}
