use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every committed transition appends an event to the record's activity
/// history. The history is an append-only audit trail; nothing in the
/// engine reads it back to decide the next update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreakEvent {
    /// Record created on the user's first tracked activity.
    Registered { at: DateTime<Utc> },
    /// On-time update: streak extended.
    OnTime {
        streak: u32,
        bonus_awarded: i64,
        at: DateTime<Utc>,
    },
    /// Grace transition: streak preserved, multiplier reduced.
    Grace {
        grace_used: u32,
        multiplier: f64,
        at: DateTime<Utc>,
    },
    /// Recovery transition: tier demoted, partial streak retained.
    Recovery {
        retained_streak: u32,
        tier: u8,
        at: DateTime<Utc>,
    },
    /// Tier promotion awarded during the post-transition check.
    TierPromoted {
        tier: u8,
        bonus_awarded: i64,
        at: DateTime<Utc>,
    },
    /// Recovery mode cleared after enough on-time updates.
    RecoveryCleared { at: DateTime<Utc> },
}

impl StreakEvent {
    /// Timestamp of the event.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            StreakEvent::Registered { at }
            | StreakEvent::OnTime { at, .. }
            | StreakEvent::Grace { at, .. }
            | StreakEvent::Recovery { at, .. }
            | StreakEvent::TierPromoted { at, .. }
            | StreakEvent::RecoveryCleared { at } => *at,
        }
    }
}
