//! TOML-based engine configuration.
//!
//! Every time boundary and progression parameter of the streak engine is
//! a named field here rather than a hard-coded constant, because several
//! of them (grace window extent, recovery retention, recovery exit
//! threshold) are product-tunable. Defaults reproduce the shipped
//! behavior: 24h daily window, 48h grace window, 5-minute rate limit.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::tier::MAX_TIER;

/// Streak engine configuration, shared across all users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Window (hours) within which an update counts as on-time.
    #[serde(default = "default_daily_window_hours")]
    pub daily_window_hours: i64,

    /// Outer window (hours) within which a grace transition is possible.
    /// Independent of `grace_days`; the 2x daily-window relationship is
    /// only the default.
    #[serde(default = "default_grace_window_hours")]
    pub grace_window_hours: i64,

    /// Minimum minutes between two committed updates for one user.
    #[serde(default = "default_rate_limit_minutes")]
    pub rate_limit_minutes: i64,

    /// Grace transitions available to a new record before recovery is forced.
    #[serde(default = "default_grace_days")]
    pub grace_days: u32,

    /// On-time updates required to leave recovery mode. Provisional
    /// parameter: no observed product behavior pins the exact value.
    #[serde(default = "default_recovery_exit_threshold")]
    pub recovery_exit_threshold: u32,

    /// Fraction of the streak retained on a recovery transition, in (0, 1].
    /// The retained streak never drops below 1 when it was positive.
    #[serde(default = "default_recovery_retention")]
    pub recovery_retention: f64,

    /// Floor for the bonus multiplier while degraded, in (0, 1].
    #[serde(default = "default_min_multiplier")]
    pub min_multiplier: f64,

    /// Multiplier reduction applied per grace transition.
    #[serde(default = "default_multiplier_penalty")]
    pub multiplier_penalty: f64,

    /// Tier-progress thresholds, ascending; index i is the progress
    /// needed to advance out of tier i+1. Length is MAX_TIER - 1.
    #[serde(default = "default_tier_thresholds")]
    pub tier_thresholds: Vec<u32>,

    /// Display names, one per tier. Length is MAX_TIER.
    #[serde(default = "default_tier_names")]
    pub tier_names: Vec<String>,
}

fn default_daily_window_hours() -> i64 {
    24
}

fn default_grace_window_hours() -> i64 {
    48
}

fn default_rate_limit_minutes() -> i64 {
    5
}

fn default_grace_days() -> u32 {
    2
}

fn default_recovery_exit_threshold() -> u32 {
    3
}

fn default_recovery_retention() -> f64 {
    0.5
}

fn default_min_multiplier() -> f64 {
    0.5
}

fn default_multiplier_penalty() -> f64 {
    0.1
}

fn default_tier_thresholds() -> Vec<u32> {
    vec![7, 14, 30, 60]
}

fn default_tier_names() -> Vec<String> {
    ["Spark", "Ember", "Flame", "Blaze", "Beacon"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            daily_window_hours: default_daily_window_hours(),
            grace_window_hours: default_grace_window_hours(),
            rate_limit_minutes: default_rate_limit_minutes(),
            grace_days: default_grace_days(),
            recovery_exit_threshold: default_recovery_exit_threshold(),
            recovery_retention: default_recovery_retention(),
            min_multiplier: default_min_multiplier(),
            multiplier_penalty: default_multiplier_penalty(),
            tier_thresholds: default_tier_thresholds(),
            tier_names: default_tier_names(),
        }
    }
}

impl StreakConfig {
    /// Parse a configuration from a TOML string. Missing fields fall back
    /// to their defaults; the result is validated.
    pub fn from_str(raw: &str) -> Result<Self, ConfigError> {
        let config: StreakConfig =
            toml::from_str(raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_str(&raw)
    }

    /// On-time window as a chrono duration.
    pub fn daily_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.daily_window_hours)
    }

    /// Grace window as a chrono duration.
    pub fn grace_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.grace_window_hours)
    }

    /// Rate-limit window as a chrono duration.
    pub fn rate_limit_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.rate_limit_minutes)
    }

    /// Validate parameter ranges and table shapes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.daily_window_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "daily_window_hours".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.grace_window_hours < self.daily_window_hours {
            return Err(ConfigError::InvalidValue {
                key: "grace_window_hours".to_string(),
                message: format!(
                    "must be at least daily_window_hours ({})",
                    self.daily_window_hours
                ),
            });
        }
        if self.rate_limit_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "rate_limit_minutes".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if !(self.recovery_retention > 0.0 && self.recovery_retention <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "recovery_retention".to_string(),
                message: format!("must be in (0.0, 1.0], got {}", self.recovery_retention),
            });
        }
        if !(self.min_multiplier > 0.0 && self.min_multiplier <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "min_multiplier".to_string(),
                message: format!("must be in (0.0, 1.0], got {}", self.min_multiplier),
            });
        }
        if !(self.multiplier_penalty > 0.0 && self.multiplier_penalty < 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "multiplier_penalty".to_string(),
                message: format!("must be in (0.0, 1.0), got {}", self.multiplier_penalty),
            });
        }
        if self.tier_thresholds.len() != (MAX_TIER - 1) as usize {
            return Err(ConfigError::InvalidValue {
                key: "tier_thresholds".to_string(),
                message: format!(
                    "expected {} thresholds, got {}",
                    MAX_TIER - 1,
                    self.tier_thresholds.len()
                ),
            });
        }
        if self.tier_thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::InvalidValue {
                key: "tier_thresholds".to_string(),
                message: "thresholds must be strictly ascending".to_string(),
            });
        }
        if self.tier_thresholds.iter().any(|&t| t == 0) {
            return Err(ConfigError::InvalidValue {
                key: "tier_thresholds".to_string(),
                message: "thresholds must be positive".to_string(),
            });
        }
        if self.tier_names.len() != MAX_TIER as usize {
            return Err(ConfigError::InvalidValue {
                key: "tier_names".to_string(),
                message: format!(
                    "expected {} names, got {}",
                    MAX_TIER,
                    self.tier_names.len()
                ),
            });
        }
        Ok(())
    }
}
