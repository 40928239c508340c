//! Tier thresholds, promotion, and demotion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bonus::tier_bonus_raw;
use crate::config::StreakConfig;
use crate::events::StreakEvent;
use crate::record::StreakRecord;

/// Highest reachable tier.
pub const MAX_TIER: u8 = 5;

/// A single promotion awarded by [`TierEngine::check_promotion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPromotion {
    /// Tier reached.
    pub tier: u8,
    /// Bonus folded into the record for this promotion.
    pub bonus: i64,
}

/// Tier thresholds and display names, shared across all users.
#[derive(Debug, Clone)]
pub struct TierEngine {
    thresholds: Vec<u32>,
    names: Vec<String>,
}

impl TierEngine {
    pub fn new(config: &StreakConfig) -> Self {
        Self {
            thresholds: config.tier_thresholds.clone(),
            names: config.tier_names.clone(),
        }
    }

    /// Display name for a tier, if in range.
    pub fn tier_name(&self, tier: u8) -> Option<&str> {
        if tier < 1 {
            return None;
        }
        self.names.get((tier - 1) as usize).map(String::as_str)
    }

    /// Progress required to advance out of `tier`. `None` at the top tier.
    pub fn threshold_for(&self, tier: u8) -> Option<u32> {
        if tier < 1 {
            return None;
        }
        self.thresholds.get((tier - 1) as usize).copied()
    }

    /// Run the promotion check: while the record's progress has crossed
    /// the threshold for its tier, promote, zero progress, and fold the
    /// tier bonus into `bonus_points`. Multiple promotions from a single
    /// update are possible only with pathological threshold tables, but
    /// the loop handles them uniformly.
    pub fn check_promotion(
        &self,
        record: &mut StreakRecord,
        at: DateTime<Utc>,
    ) -> Vec<TierPromotion> {
        let mut promotions = Vec::new();
        while record.tier < MAX_TIER {
            let Some(threshold) = self.threshold_for(record.tier) else {
                break;
            };
            if record.tier_progress < threshold {
                break;
            }
            record.tier += 1;
            record.tier_progress = 0;
            let bonus = tier_bonus_raw(record.tier as i64);
            record.bonus_points += bonus;
            record.activity_history.push(StreakEvent::TierPromoted {
                tier: record.tier,
                bonus_awarded: bonus,
                at,
            });
            promotions.push(TierPromotion {
                tier: record.tier,
                bonus,
            });
        }
        promotions
    }

    /// Demote one tier (floor 1) and zero progress. Recovery entry path.
    pub fn demote(&self, record: &mut StreakRecord) {
        record.tier = record.tier.saturating_sub(1).max(1);
        record.tier_progress = 0;
    }
}
