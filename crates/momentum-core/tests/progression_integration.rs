//! End-to-end progression walkthrough.
//!
//! Drives one user through the full transition lifecycle against the
//! public API: registration, on-time streaking into a tier promotion,
//! grace slips, a long absence into recovery, and the climb back out.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use momentum_core::{
    InMemoryStreakStore, StreakConfig, StreakEvent, StreakStore, StreakUpdateCoordinator, MAX_TIER,
};

fn make_coordinator() -> StreakUpdateCoordinator {
    StreakUpdateCoordinator::new(Arc::new(InMemoryStreakStore::new()))
}

#[test]
fn full_lifecycle_walkthrough() {
    let coordinator = make_coordinator();
    let start = Utc::now() - Duration::days(40);
    coordinator.register_user_at("alice", start).unwrap();

    let mut now = start;

    // Seven on-time days: crosses the tier-1 threshold (7) exactly.
    for day in 1..=7u32 {
        now += Duration::hours(23);
        let record = coordinator.update_user_streak_at("alice", now).unwrap();
        assert_eq!(record.current_streak, day);
    }

    let record = coordinator.store().snapshot("alice").unwrap();
    assert_eq!(record.tier, 2);
    assert_eq!(record.tier_progress, 0);
    assert!(record
        .activity_history
        .iter()
        .any(|e| matches!(e, StreakEvent::TierPromoted { tier: 2, .. })));
    // Tier-2 promotion bonus is folded in on top of the daily streak bonuses.
    assert!(record.bonus_points >= 1000);

    // A 30-hour slip lands in the grace window: streak preserved.
    now += Duration::hours(30);
    let record = coordinator.update_user_streak_at("alice", now).unwrap();
    assert_eq!(record.current_streak, 7);
    assert_eq!(record.grace_used, 1);
    assert!((record.recovery_multiplier - 0.9).abs() < 1e-9);
    assert_eq!(record.tier, 2);

    // Three days of silence force recovery: demotion, partial streak.
    now += Duration::days(3);
    let record = coordinator.update_user_streak_at("alice", now).unwrap();
    assert!(record.recovery_mode);
    assert_eq!(record.tier, 1);
    assert_eq!(record.current_streak, 3); // floor(7 * 0.5)
    assert!(record.current_streak > 0);
    assert_eq!(record.max_streak, 7);

    // Three on-time updates climb back out of recovery.
    for _ in 0..3 {
        now += Duration::hours(23);
        coordinator.update_user_streak_at("alice", now).unwrap();
    }
    let record = coordinator.store().snapshot("alice").unwrap();
    assert!(!record.recovery_mode);
    assert_eq!(record.recovery_progress, 0);
    assert!((record.recovery_multiplier - 1.0).abs() < 1e-9);
    assert_eq!(record.current_streak, 6);
    assert!(record
        .activity_history
        .iter()
        .any(|e| matches!(e, StreakEvent::RecoveryCleared { .. })));
}

#[test]
fn grace_exhaustion_forces_recovery_inside_grace_window() {
    let coordinator = make_coordinator();
    let start = Utc::now() - Duration::days(20);
    coordinator.register_user_at("bob", start).unwrap();

    let mut now = start;

    // Build a small streak first.
    for _ in 0..4 {
        now += Duration::hours(23);
        coordinator.update_user_streak_at("bob", now).unwrap();
    }

    // Default allowance is two grace transitions.
    for used in 1..=2u32 {
        now += Duration::hours(30);
        let record = coordinator.update_user_streak_at("bob", now).unwrap();
        assert_eq!(record.grace_used, used);
        assert!(!record.recovery_mode);
    }

    // Third slip is inside the grace window but the allowance is gone.
    now += Duration::hours(30);
    let record = coordinator.update_user_streak_at("bob", now).unwrap();
    assert!(record.recovery_mode);
    assert_eq!(record.grace_used, 2);
    assert_eq!(record.tier, 1);
}

#[test]
fn max_tier_progression_with_custom_thresholds() {
    // Tight thresholds so the walk to the top tier stays short.
    let config = StreakConfig {
        tier_thresholds: vec![2, 3, 4, 5],
        ..Default::default()
    };
    let coordinator = StreakUpdateCoordinator::with_config(
        Arc::new(InMemoryStreakStore::new()),
        config,
    );
    let start = Utc::now() - Duration::days(30);
    coordinator.register_user_at("carol", start).unwrap();

    let mut now = start;
    // 2 + 3 + 4 + 5 = 14 on-time days reach the top tier.
    for _ in 0..14 {
        now += Duration::hours(23);
        coordinator.update_user_streak_at("carol", now).unwrap();
    }

    let record = coordinator.store().snapshot("carol").unwrap();
    assert_eq!(record.tier, MAX_TIER);
    assert_eq!(record.current_streak, 14);

    // Further progress never leaves the tier range.
    for _ in 0..5 {
        now += Duration::hours(23);
        let record = coordinator.update_user_streak_at("carol", now).unwrap();
        assert_eq!(record.tier, MAX_TIER);
    }
}

#[test]
fn last_active_is_monotonic_across_commits() {
    let coordinator = make_coordinator();
    let start = Utc::now() - Duration::days(10);
    coordinator.register_user_at("dave", start).unwrap();

    let mut now = start;
    let mut previous: DateTime<Utc> = start;
    for _ in 0..6 {
        now += Duration::hours(26);
        let record = coordinator.update_user_streak_at("dave", now).unwrap();
        assert!(record.last_active >= previous);
        previous = record.last_active;
    }
}
