use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{INTERDICTION_CHANCE_DEFAULT, LOG_CAPACITY_DEFAULT, LOG_CAPACITY_MAX};

/// Tunables for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "EngineConfig::default_log_capacity")]
    pub log_capacity: usize,
    #[serde(default = "EngineConfig::default_interdiction_chance")]
    pub interdiction_chance: f64,
    /// Roll seed; `None` draws one from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EngineConfig {
    #[must_use]
    pub const fn default_log_capacity() -> usize {
        LOG_CAPACITY_DEFAULT
    }

    #[must_use]
    pub const fn default_interdiction_chance() -> f64 {
        INTERDICTION_CHANCE_DEFAULT
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=LOG_CAPACITY_MAX).contains(&self.log_capacity) {
            return Err(ConfigError::LogCapacity {
                max: LOG_CAPACITY_MAX,
                value: self.log_capacity,
            });
        }
        if !(0.0..=1.0).contains(&self.interdiction_chance) {
            return Err(ConfigError::RangeViolation {
                field: "interdiction_chance",
                min: 0.0,
                max: 1.0,
                value: self.interdiction_chance,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_capacity: Self::default_log_capacity(),
            interdiction_chance: Self::default_interdiction_chance(),
            seed: None,
        }
    }
}

/// Errors raised when engine configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("log_capacity must be between 1 and {max} (got {value})")]
    LogCapacity { max: usize, value: usize },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.log_capacity, 40);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cfg = EngineConfig {
            interdiction_chance: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RangeViolation {
                field: "interdiction_chance",
                ..
            })
        ));
        let cfg = EngineConfig {
            log_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = EngineConfig {
            interdiction_chance: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
