//! Keyed streak-record storage with per-user mutual exclusion.
//!
//! The store is the only owner of `StreakRecord` values. Mutation goes
//! through [`StreakStore::update`], which serializes all writers of one
//! user behind that user's lock while leaving unrelated users fully
//! parallel. The closure mutates a scratch clone; the store writes it
//! back only when the closure succeeds, so a failed update (rate limit,
//! validation, anything else) leaves the stored record untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{Result, StreakError};
use crate::record::StreakRecord;

/// Mutation closure run under the per-user lock.
pub type UpdateFn<'a> = &'a mut dyn FnMut(&mut StreakRecord) -> Result<()>;

/// Storage seam for streak records. Implementations must provide
/// per-user mutual exclusion for `update` and safe concurrent key
/// insertion/lookup.
pub trait StreakStore: Send + Sync {
    /// Insert a record if the user has none yet. Returns `false` when a
    /// record already existed (the stored record is left untouched).
    fn create_if_absent(&self, record: StreakRecord) -> Result<bool>;

    /// Whether a record exists for the user.
    fn contains(&self, user_id: &str) -> bool;

    /// Point-in-time copy of a user's record.
    fn snapshot(&self, user_id: &str) -> Option<StreakRecord>;

    /// Apply a mutation under the user's lock and commit it atomically.
    /// Returns the committed record. The stored record is unchanged when
    /// the closure fails.
    fn update(&self, user_id: &str, apply: UpdateFn<'_>) -> Result<StreakRecord>;

    /// Number of tracked users.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store: a concurrent map of independently locked records.
#[derive(Default)]
pub struct InMemoryStreakStore {
    records: RwLock<HashMap<String, Arc<Mutex<StreakRecord>>>>,
}

impl InMemoryStreakStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, user_id: &str) -> Result<Option<Arc<Mutex<StreakRecord>>>> {
        let map = self
            .records
            .read()
            .map_err(|e| StreakError::Internal(format!("store lock poisoned: {e}")))?;
        Ok(map.get(user_id).cloned())
    }
}

impl StreakStore for InMemoryStreakStore {
    fn create_if_absent(&self, record: StreakRecord) -> Result<bool> {
        let mut map = self
            .records
            .write()
            .map_err(|e| StreakError::Internal(format!("store lock poisoned: {e}")))?;
        if map.contains_key(&record.user_id) {
            return Ok(false);
        }
        map.insert(record.user_id.clone(), Arc::new(Mutex::new(record)));
        Ok(true)
    }

    fn contains(&self, user_id: &str) -> bool {
        self.records
            .read()
            .map(|map| map.contains_key(user_id))
            .unwrap_or(false)
    }

    fn snapshot(&self, user_id: &str) -> Option<StreakRecord> {
        let entry = self.entry(user_id).ok()??;
        let guard = entry.lock().ok()?;
        Some(guard.clone())
    }

    fn update(&self, user_id: &str, apply: UpdateFn<'_>) -> Result<StreakRecord> {
        // The map lock is released before the record lock is taken, so a
        // slow update on one user never blocks lookups or other users.
        let entry = self.entry(user_id)?.ok_or_else(|| StreakError::NotFound {
            user_id: user_id.to_string(),
        })?;

        let mut guard = entry
            .lock()
            .map_err(|e| StreakError::Internal(format!("record lock poisoned: {e}")))?;

        let mut scratch = guard.clone();
        apply(&mut scratch)?;
        *guard = scratch.clone();
        Ok(scratch)
    }

    fn len(&self) -> usize {
        self.records.read().map(|map| map.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreakConfig;
    use chrono::Utc;

    fn make_record(user_id: &str) -> StreakRecord {
        StreakRecord::new(user_id, Utc::now(), &StreakConfig::default())
    }

    #[test]
    fn create_and_lookup() {
        let store = InMemoryStreakStore::new();
        assert!(store.is_empty());
        assert!(store.create_if_absent(make_record("alice")).unwrap());
        assert!(store.contains("alice"));
        assert!(!store.contains("bob"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_if_absent_keeps_existing() {
        let store = InMemoryStreakStore::new();
        let mut first = make_record("alice");
        first.current_streak = 7;
        first.max_streak = 7;
        assert!(store.create_if_absent(first).unwrap());
        assert!(!store.create_if_absent(make_record("alice")).unwrap());
        assert_eq!(store.snapshot("alice").unwrap().current_streak, 7);
    }

    #[test]
    fn update_commits_on_success() {
        let store = InMemoryStreakStore::new();
        store.create_if_absent(make_record("alice")).unwrap();

        let committed = store
            .update("alice", &mut |record| {
                record.current_streak = 3;
                record.max_streak = 3;
                Ok(())
            })
            .unwrap();

        assert_eq!(committed.current_streak, 3);
        assert_eq!(store.snapshot("alice").unwrap().current_streak, 3);
    }

    #[test]
    fn update_rolls_back_on_failure() {
        let store = InMemoryStreakStore::new();
        store.create_if_absent(make_record("alice")).unwrap();

        let result = store.update("alice", &mut |record| {
            record.current_streak = 99;
            Err(StreakError::Internal("boom".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.snapshot("alice").unwrap().current_streak, 0);
    }

    #[test]
    fn update_unknown_user_is_not_found() {
        let store = InMemoryStreakStore::new();
        let result = store.update("ghost", &mut |_| Ok(()));
        assert!(matches!(result, Err(StreakError::NotFound { .. })));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let store = InMemoryStreakStore::new();
        store.create_if_absent(make_record("alice")).unwrap();

        let mut snap = store.snapshot("alice").unwrap();
        snap.current_streak = 42;

        assert_eq!(store.snapshot("alice").unwrap().current_streak, 0);
    }
}
