//! Update orchestration.
//!
//! `StreakUpdateCoordinator` is the primary entry point of the engine.
//! One call to [`StreakUpdateCoordinator::update_user_streak`] runs the
//! full pipeline under the user's lock:
//!
//! 1. user-id validation (before any lock is taken)
//! 2. record lookup (not-found short-circuits)
//! 3. per-user lock acquisition
//! 4. structural re-validation of the stored record
//! 5. rate-limit check (rejection commits nothing)
//! 6. grace/recovery classification and mutation
//! 7. atomic commit
//!
//! For a single user, updates observe a total order. When several
//! callers race inside the rate-limit window, whichever acquires the
//! lock first commits and refreshes `last_active`; every later contender
//! sees the refreshed timestamp and is rejected by the limiter. First
//! writer wins, the rest fail fast, with no separate conflict detection.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::classifier::GraceRecoveryClassifier;
use crate::config::StreakConfig;
use crate::error::Result;
use crate::rate_limit::RateLimiter;
use crate::record::{validate_user_id, StreakRecord};
use crate::store::StreakStore;

pub struct StreakUpdateCoordinator {
    store: Arc<dyn StreakStore>,
    classifier: GraceRecoveryClassifier,
    rate_limiter: RateLimiter,
    config: StreakConfig,
}

impl StreakUpdateCoordinator {
    /// Coordinator over the given store with default configuration.
    pub fn new(store: Arc<dyn StreakStore>) -> Self {
        Self::with_config(store, StreakConfig::default())
    }

    pub fn with_config(store: Arc<dyn StreakStore>, config: StreakConfig) -> Self {
        Self {
            classifier: GraceRecoveryClassifier::new(&config),
            rate_limiter: RateLimiter::from_config(&config),
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn StreakStore> {
        &self.store
    }

    pub fn config(&self) -> &StreakConfig {
        &self.config
    }

    /// Create the streak record for a user's first tracked activity.
    /// Idempotent: if the user is already tracked, the existing record is
    /// returned unchanged.
    pub fn register_user(&self, user_id: &str) -> Result<StreakRecord> {
        self.register_user_at(user_id, Utc::now())
    }

    /// Clock-injected variant of [`Self::register_user`], used by the
    /// simulation harness and tests.
    pub fn register_user_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<StreakRecord> {
        validate_user_id(user_id)?;
        let record = StreakRecord::new(user_id, now, &self.config);
        self.store.create_if_absent(record.clone())?;
        // Lost creation races return the winner's record.
        Ok(self.store.snapshot(user_id).unwrap_or(record))
    }

    /// Apply one activity update for the user and return the committed
    /// record. See the module docs for the pipeline and its ordering
    /// guarantees.
    pub fn update_user_streak(&self, user_id: &str) -> Result<StreakRecord> {
        self.update_user_streak_at(user_id, Utc::now())
    }

    /// Clock-injected variant of [`Self::update_user_streak`], used by
    /// the simulation harness and tests.
    pub fn update_user_streak_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<StreakRecord> {
        validate_user_id(user_id)?;
        self.store.update(user_id, &mut |record| {
            record.validate()?;
            self.rate_limiter.check(now, record.last_active)?;
            self.classifier.apply(record, now);
            Ok(())
        })
    }
}
