//! The per-user streak record.
//!
//! One `StreakRecord` exists per tracked user. It is owned by the
//! `StreakStore` and mutated only inside the coordinator's critical
//! section, so the structural invariants checked by [`StreakRecord::validate`]
//! hold after every committed update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StreakConfig;
use crate::error::ValidationError;
use crate::events::StreakEvent;
use crate::tier::MAX_TIER;

/// Per-user streak and progression state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakRecord {
    /// Opaque non-empty identifier, supplied by the upstream layer.
    pub user_id: String,
    /// Consecutive-activity streak, in days.
    pub current_streak: u32,
    /// Historical maximum streak; never below `current_streak`.
    pub max_streak: u32,
    /// Timestamp of the last committed update. Monotonically
    /// non-decreasing across successful updates.
    pub last_active: DateTime<Utc>,
    /// Engagement tier, 1..=MAX_TIER.
    pub tier: u8,
    /// Progress toward the next tier threshold.
    pub tier_progress: u32,
    /// True while the user is working back from a missed-too-long period.
    pub recovery_mode: bool,
    /// On-time updates accumulated while in recovery.
    pub recovery_progress: u32,
    /// Bonus payout dampener, in (0.0, 1.0].
    pub recovery_multiplier: f64,
    /// Grace transitions available before recovery is forced.
    pub grace_days: u32,
    /// Grace transitions consumed so far; never above `grace_days`.
    pub grace_used: u32,
    /// Accumulated reward total.
    pub bonus_points: i64,
    /// Append-only audit trail of transitions.
    pub activity_history: Vec<StreakEvent>,
}

impl StreakRecord {
    /// Create the record for a user's first tracked activity: tier 1,
    /// zeroed counters, configuration-supplied grace allowance.
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>, config: &StreakConfig) -> Self {
        Self {
            user_id: user_id.into(),
            current_streak: 0,
            max_streak: 0,
            last_active: now,
            tier: 1,
            tier_progress: 0,
            recovery_mode: false,
            recovery_progress: 0,
            recovery_multiplier: 1.0,
            grace_days: config.grace_days,
            grace_used: 0,
            bonus_points: 0,
            activity_history: vec![StreakEvent::Registered { at: now }],
        }
    }

    /// Check the structural invariants. Run against stored records before
    /// every update; a failure means the record is corrupt and the update
    /// is rejected without mutation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_user_id(&self.user_id)?;
        if self.max_streak < self.current_streak {
            return Err(ValidationError::corrupt(format!(
                "max_streak {} is below current_streak {}",
                self.max_streak, self.current_streak
            )));
        }
        if self.tier < 1 || self.tier > MAX_TIER {
            return Err(ValidationError::corrupt(format!(
                "tier {} outside [1, {}]",
                self.tier, MAX_TIER
            )));
        }
        if self.grace_used > self.grace_days {
            return Err(ValidationError::corrupt(format!(
                "grace_used {} exceeds grace_days {}",
                self.grace_used, self.grace_days
            )));
        }
        if !self.recovery_multiplier.is_finite()
            || self.recovery_multiplier <= 0.0
            || self.recovery_multiplier > 1.0
        {
            return Err(ValidationError::corrupt(format!(
                "recovery_multiplier {} outside (0.0, 1.0]",
                self.recovery_multiplier
            )));
        }
        if self.bonus_points < 0 {
            return Err(ValidationError::corrupt(format!(
                "bonus_points {} is negative",
                self.bonus_points
            )));
        }
        Ok(())
    }
}

/// Validate a caller-supplied user id: non-empty and not all whitespace.
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::invalid(
            "user ID",
            "must be a non-empty identifier",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record() -> StreakRecord {
        StreakRecord::new("user-1", Utc::now(), &StreakConfig::default())
    }

    #[test]
    fn new_record_defaults() {
        let record = make_record();
        assert_eq!(record.current_streak, 0);
        assert_eq!(record.max_streak, 0);
        assert_eq!(record.tier, 1);
        assert!(!record.recovery_mode);
        assert!((record.recovery_multiplier - 1.0).abs() < 1e-12);
        assert_eq!(record.grace_days, 2);
        assert_eq!(record.grace_used, 0);
        assert_eq!(record.bonus_points, 0);
        assert!(matches!(
            record.activity_history.as_slice(),
            [StreakEvent::Registered { .. }]
        ));
    }

    #[test]
    fn new_record_is_valid() {
        assert!(make_record().validate().is_ok());
    }

    #[test]
    fn rejects_max_streak_below_current() {
        let mut record = make_record();
        record.current_streak = 5;
        record.max_streak = 3;
        assert!(record.validate().is_err());
    }

    #[test]
    fn rejects_tier_out_of_range() {
        let mut record = make_record();
        record.tier = 0;
        assert!(record.validate().is_err());
        record.tier = MAX_TIER + 1;
        assert!(record.validate().is_err());
    }

    #[test]
    fn rejects_grace_overrun() {
        let mut record = make_record();
        record.grace_used = record.grace_days + 1;
        assert!(record.validate().is_err());
    }

    #[test]
    fn rejects_bad_multiplier() {
        let mut record = make_record();
        record.recovery_multiplier = 0.0;
        assert!(record.validate().is_err());
        record.recovery_multiplier = 1.5;
        assert!(record.validate().is_err());
        record.recovery_multiplier = f64::NAN;
        assert!(record.validate().is_err());
    }

    #[test]
    fn user_id_validation() {
        assert!(validate_user_id("alice").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("   ").is_err());
        assert!(validate_user_id("\t\n").is_err());
    }

    #[test]
    fn record_serde_round_trip() {
        let record = make_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: StreakRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_id, record.user_id);
        assert_eq!(back.tier, record.tier);
        assert_eq!(back.activity_history.len(), 1);
    }
}
