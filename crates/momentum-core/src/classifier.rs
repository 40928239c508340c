//! Grace/recovery transition classification.
//!
//! The classifier is the state-machine core of the engine. Each update
//! is classified by the time elapsed since the record's last committed
//! activity:
//!
//! ```text
//! elapsed <= daily_window                  -> OnTime
//! daily_window < elapsed <= grace_window   -> Grace (while allowance remains)
//! otherwise                                -> Recovery
//! ```
//!
//! `apply` mutates the record for the selected transition, runs the
//! tier-promotion check, and commits `last_active` as its final step.
//! Callers hold the per-user lock for the whole of `apply`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::bonus::streak_bonus_raw;
use crate::config::StreakConfig;
use crate::events::StreakEvent;
use crate::record::StreakRecord;
use crate::tier::{TierEngine, TierPromotion};

/// The three transition kinds an update can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    OnTime,
    Grace,
    Recovery,
}

/// What a single applied update did to the record.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub kind: TransitionKind,
    /// Streak bonus folded into the record (on-time only).
    pub streak_bonus: i64,
    /// Promotions awarded by the post-transition check.
    pub promotions: Vec<TierPromotion>,
    /// Whether this update cleared recovery mode.
    pub recovery_cleared: bool,
}

pub struct GraceRecoveryClassifier {
    config: StreakConfig,
    tiers: TierEngine,
}

impl GraceRecoveryClassifier {
    pub fn new(config: &StreakConfig) -> Self {
        Self {
            config: config.clone(),
            tiers: TierEngine::new(config),
        }
    }

    /// Select the transition for an elapsed time. Grace requires unused
    /// allowance; an exhausted allowance forces recovery even inside the
    /// grace window.
    pub fn classify(&self, elapsed: Duration, record: &StreakRecord) -> TransitionKind {
        if elapsed <= self.config.daily_window() {
            return TransitionKind::OnTime;
        }
        if elapsed <= self.config.grace_window() && record.grace_used < record.grace_days {
            return TransitionKind::Grace;
        }
        TransitionKind::Recovery
    }

    /// Apply one update to the record. The caller has already passed the
    /// rate-limit check, so `elapsed` is at least the rate-limit window
    /// (a non-positive elapsed never reaches this point).
    pub fn apply(&self, record: &mut StreakRecord, now: DateTime<Utc>) -> TransitionOutcome {
        let elapsed = now - record.last_active;
        let kind = self.classify(elapsed, record);

        let mut streak_bonus = 0;
        let mut recovery_cleared = false;

        match kind {
            TransitionKind::OnTime => {
                record.current_streak += 1;
                record.tier_progress += 1;
                record.max_streak = record.max_streak.max(record.current_streak);

                if record.recovery_mode {
                    record.recovery_progress += 1;
                    if record.recovery_progress >= self.config.recovery_exit_threshold {
                        record.recovery_mode = false;
                        record.recovery_progress = 0;
                        record.recovery_multiplier = 1.0;
                        recovery_cleared = true;
                    }
                }

                streak_bonus = streak_bonus_raw(
                    record.tier as i64,
                    record.current_streak as i64,
                    record.recovery_multiplier,
                );
                record.bonus_points += streak_bonus;
                record.activity_history.push(StreakEvent::OnTime {
                    streak: record.current_streak,
                    bonus_awarded: streak_bonus,
                    at: now,
                });
                if recovery_cleared {
                    record
                        .activity_history
                        .push(StreakEvent::RecoveryCleared { at: now });
                }
            }
            TransitionKind::Grace => {
                // Streak and tier progress are preserved; the payout
                // multiplier is what takes the hit.
                record.grace_used += 1;
                record.recovery_multiplier = (record.recovery_multiplier
                    - self.config.multiplier_penalty)
                    .max(self.config.min_multiplier);
                record.activity_history.push(StreakEvent::Grace {
                    grace_used: record.grace_used,
                    multiplier: record.recovery_multiplier,
                    at: now,
                });
            }
            TransitionKind::Recovery => {
                record.recovery_mode = true;
                record.recovery_progress = 0;
                self.tiers.demote(record);
                if record.current_streak > 0 {
                    let retained = (record.current_streak as f64
                        * self.config.recovery_retention)
                        .floor() as u32;
                    record.current_streak = retained.max(1);
                }
                record.recovery_multiplier = self.config.min_multiplier;
                record.activity_history.push(StreakEvent::Recovery {
                    retained_streak: record.current_streak,
                    tier: record.tier,
                    at: now,
                });
            }
        }

        let promotions = self.tiers.check_promotion(record, now);

        // Committed last: every mutation above is relative to the old
        // last_active.
        record.last_active = now;

        TransitionOutcome {
            kind,
            streak_bonus,
            promotions,
            recovery_cleared,
        }
    }
}
