//! # Momentum Core Library
//!
//! This library implements the engagement streak and progression engine
//! for Momentum: daily-activity streak tracking, grace/recovery
//! transitions, tier progression with bonuses, and a ranked leaderboard.
//! The surrounding platform (routing, auth, durable storage) is a thin
//! layer over this crate; everything here is CPU-only and safe under
//! true thread-level parallelism.
//!
//! ## Architecture
//!
//! - **Classifier**: A wall-clock state machine that maps the time since
//!   a user's last activity onto on-time / grace / recovery transitions
//! - **Store**: Keyed record storage with per-user mutual exclusion and
//!   all-or-nothing commits
//! - **Coordinator**: Orchestrates validation, rate limiting,
//!   classification, and commit under the per-user lock
//! - **Leaderboard**: Weighted composite scores with snapshot reads
//!
//! ## Key Components
//!
//! - [`StreakUpdateCoordinator`]: Primary entry point (`update_user_streak`)
//! - [`StreakStore`] / [`InMemoryStreakStore`]: Record storage seam
//! - [`calculate_streak_bonus`] / [`calculate_tier_bonus`]: Pure bonus math
//! - [`LeaderboardService`]: Ranked queries over composite scores

pub mod bonus;
pub mod classifier;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod leaderboard;
pub mod rate_limit;
pub mod record;
pub mod simulation;
pub mod store;
pub mod tier;

pub use bonus::{calculate_streak_bonus, calculate_tier_bonus};
pub use classifier::{GraceRecoveryClassifier, TransitionKind, TransitionOutcome};
pub use config::StreakConfig;
pub use coordinator::StreakUpdateCoordinator;
pub use error::{ConfigError, Result, StreakError, ValidationError};
pub use events::StreakEvent;
pub use leaderboard::{LeaderboardEntry, LeaderboardService, PerformanceMetrics, ScoreWeights};
pub use rate_limit::RateLimiter;
pub use record::StreakRecord;
pub use simulation::{run_simulation, SimulationConfig, SimulationReport, SimulationSeed};
pub use store::{InMemoryStreakStore, StreakStore};
pub use tier::{TierEngine, TierPromotion, MAX_TIER};
