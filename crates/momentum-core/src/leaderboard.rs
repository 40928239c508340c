//! Ranked leaderboard over composite engagement scores.
//!
//! Each `update_leaderboard` call composes a single score from the
//! caller-supplied metrics via a fixed weighted sum and upserts the
//! user's entry (latest write wins). Reads return a consistent
//! point-in-time snapshot; writers from different users only contend on
//! the map itself, never on each other's entries.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StreakError, ValidationError};
use crate::record::validate_user_id;

/// Engagement-time value (seconds) at which the normalized engagement
/// term reaches 0.5.
const ENGAGEMENT_HALF_POINT_SECS: f64 = 3600.0;

/// Streak-bonus value at which the normalized streak term reaches 0.5.
const STREAK_BONUS_HALF_POINT: f64 = 1000.0;

/// Per-update performance metrics supplied by the caller. Callers that
/// want accumulation supply cumulative values; the service itself does
/// not accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Answer accuracy in [0.0, 1.0].
    pub accuracy: f64,
    /// Engagement time in seconds.
    pub engagement_time: f64,
    /// Mastery improvement in [0.0, 1.0].
    pub mastery_improvement: f64,
    /// Streak bonus points (BonusCalculator output).
    pub streak_bonus: i64,
}

/// Weights for the composite score. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub accuracy: f64,
    pub engagement: f64,
    pub mastery: f64,
    pub streak: f64,
}

impl ScoreWeights {
    /// Default product weighting.
    pub fn balanced() -> Self {
        Self {
            accuracy: 0.4,
            engagement: 0.2,
            mastery: 0.3,
            streak: 0.1,
        }
    }

    /// Normalize weights to sum to 1.0.
    pub fn normalize(&mut self) {
        let sum = self.accuracy + self.engagement + self.mastery + self.streak;
        if sum > 0.0 {
            self.accuracy /= sum;
            self.engagement /= sum;
            self.mastery /= sum;
            self.streak /= sum;
        }
    }

    /// Validate that all weights are in [0.0, 1.0] and sum to 1.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let weights = [
            ("accuracy", self.accuracy),
            ("engagement", self.engagement),
            ("mastery", self.mastery),
            ("streak", self.streak),
        ];
        for (name, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ValidationError::invalid(
                    format!("weight '{name}'"),
                    format!("must be in [0.0, 1.0], got {weight}"),
                ));
            }
        }
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ValidationError::invalid(
                "weights",
                format!("must sum to 1.0, got {sum}"),
            ));
        }
        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::balanced()
    }
}

/// One ranked entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub score: f64,
    pub updated_at: DateTime<Utc>,
}

pub struct LeaderboardService {
    entries: RwLock<HashMap<String, LeaderboardEntry>>,
    weights: ScoreWeights,
}

impl LeaderboardService {
    pub fn new() -> Self {
        Self::with_weights(ScoreWeights::default())
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            weights,
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Compose the score for the metrics and upsert the user's entry.
    pub fn update_leaderboard(&self, user_id: &str, metrics: &PerformanceMetrics) -> Result<()> {
        validate_user_id(user_id)?;
        validate_metrics(metrics)?;

        let score = self.compose_score(metrics);
        let entry = LeaderboardEntry {
            user_id: user_id.to_string(),
            score,
            updated_at: Utc::now(),
        };

        let mut entries = self
            .entries
            .write()
            .map_err(|e| StreakError::Internal(format!("leaderboard lock poisoned: {e}")))?;
        entries.insert(user_id.to_string(), entry);
        Ok(())
    }

    /// Top entries by score, descending; ties broken by ascending
    /// `user_id`. Returns at most `limit` entries from a point-in-time
    /// snapshot.
    pub fn get_leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let snapshot: Vec<LeaderboardEntry> = match self.entries.read() {
            Ok(entries) => entries.values().cloned().collect(),
            Err(_) => return Vec::new(),
        };

        let mut ranked = snapshot;
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        ranked.truncate(limit);
        ranked
    }

    /// Number of ranked users.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn compose_score(&self, metrics: &PerformanceMetrics) -> f64 {
        let w = &self.weights;
        w.accuracy * metrics.accuracy.clamp(0.0, 1.0)
            + w.engagement * saturating_norm(metrics.engagement_time, ENGAGEMENT_HALF_POINT_SECS)
            + w.mastery * metrics.mastery_improvement.clamp(0.0, 1.0)
            + w.streak * saturating_norm(metrics.streak_bonus as f64, STREAK_BONUS_HALF_POINT)
    }
}

impl Default for LeaderboardService {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an unbounded non-negative value into [0.0, 1.0); reaches 0.5 at
/// `half_point`.
fn saturating_norm(value: f64, half_point: f64) -> f64 {
    let value = value.max(0.0);
    value / (value + half_point)
}

fn validate_metrics(metrics: &PerformanceMetrics) -> Result<(), ValidationError> {
    if !metrics.accuracy.is_finite() || !(0.0..=1.0).contains(&metrics.accuracy) {
        return Err(ValidationError::invalid(
            "accuracy",
            format!("must be in [0.0, 1.0], got {}", metrics.accuracy),
        ));
    }
    if !metrics.engagement_time.is_finite() || metrics.engagement_time < 0.0 {
        return Err(ValidationError::invalid(
            "engagement_time",
            format!("must be non-negative, got {}", metrics.engagement_time),
        ));
    }
    if !metrics.mastery_improvement.is_finite()
        || !(0.0..=1.0).contains(&metrics.mastery_improvement)
    {
        return Err(ValidationError::invalid(
            "mastery_improvement",
            format!("must be in [0.0, 1.0], got {}", metrics.mastery_improvement),
        ));
    }
    if metrics.streak_bonus < 0 {
        return Err(ValidationError::invalid(
            "streak_bonus",
            format!("must be non-negative, got {}", metrics.streak_bonus),
        ));
    }
    Ok(())
}
