//! Streak and tier bonus calculators.
//!
//! Pure functions over validated integer arguments. Safe to call from
//! any thread without a lock; the coordinator folds results into
//! `bonus_points` inside its critical section.

use crate::error::ValidationError;
use crate::tier::MAX_TIER;

/// Base bonus unit per tier level.
pub const TIER_BASE_UNIT: i64 = 100;

/// Multiplier applied to the tier base on promotion.
pub const TIER_PROMOTION_FACTOR: i64 = 5;

/// Streak length, in days, that earns one tier base of streak bonus.
pub const STREAK_UNIT_DAYS: i64 = 10;

/// Streak bonus cap, as a multiple of the tier base.
pub const STREAK_BONUS_CAP_FACTOR: i64 = 10;

/// Compute the streak bonus for a tier, streak length, and payout
/// multiplier.
///
/// The bonus grows linearly with streak length in units of
/// [`STREAK_UNIT_DAYS`] and is capped at [`STREAK_BONUS_CAP_FACTOR`]
/// times the tier base:
///
/// ```text
/// base  = TIER_BASE_UNIT * tier
/// bonus = floor(min(base * multiplier * streak / 10, base * 10))
/// ```
///
/// Rejects tiers outside `[1, MAX_TIER]`, negative streaks, and
/// non-finite or negative multipliers, naming the offending argument.
pub fn calculate_streak_bonus(
    tier: i64,
    streak: i64,
    multiplier: f64,
) -> Result<i64, ValidationError> {
    validate_tier(tier)?;
    if streak < 0 {
        return Err(ValidationError::invalid(
            "streak",
            format!("must be non-negative, got {streak}"),
        ));
    }
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(ValidationError::invalid(
            "multiplier",
            format!("must be a non-negative number, got {multiplier}"),
        ));
    }
    Ok(streak_bonus_raw(tier, streak, multiplier))
}

/// Compute the one-time bonus awarded on promotion into `tier`.
///
/// Rejects tiers outside `[1, MAX_TIER]`.
pub fn calculate_tier_bonus(tier: i64) -> Result<i64, ValidationError> {
    validate_tier(tier)?;
    Ok(tier_bonus_raw(tier))
}

fn validate_tier(tier: i64) -> Result<(), ValidationError> {
    if tier < 1 || tier > MAX_TIER as i64 {
        return Err(ValidationError::invalid(
            "tier",
            format!("must be within [1, {}], got {tier}", MAX_TIER),
        ));
    }
    Ok(())
}

/// Unvalidated streak bonus. Callers inside the crate operate on records
/// that already passed structural validation.
pub(crate) fn streak_bonus_raw(tier: i64, streak: i64, multiplier: f64) -> i64 {
    let base = (TIER_BASE_UNIT * tier) as f64;
    let raw = base * multiplier * (streak as f64 / STREAK_UNIT_DAYS as f64);
    let cap = base * STREAK_BONUS_CAP_FACTOR as f64;
    raw.min(cap).floor() as i64
}

/// Unvalidated tier promotion bonus.
pub(crate) fn tier_bonus_raw(tier: i64) -> i64 {
    TIER_BASE_UNIT * tier * TIER_PROMOTION_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streak_bonus_reference_values() {
        assert_eq!(calculate_streak_bonus(2, 10, 1.0).unwrap(), 200);
        assert_eq!(calculate_streak_bonus(1, 10, 1.0).unwrap(), 100);
        assert_eq!(calculate_streak_bonus(1, 5, 1.0).unwrap(), 50);
    }

    #[test]
    fn streak_bonus_cap_boundary() {
        // tier 4, streak 100: 400 * 1.0 * 10 == 4000, exactly the cap.
        assert_eq!(calculate_streak_bonus(4, 100, 1.0).unwrap(), 4000);
        // Past the cap the bonus stays flat.
        assert_eq!(calculate_streak_bonus(4, 500, 1.0).unwrap(), 4000);
        assert_eq!(calculate_streak_bonus(1, 10_000, 1.0).unwrap(), 1000);
    }

    #[test]
    fn streak_bonus_applies_multiplier() {
        assert_eq!(calculate_streak_bonus(2, 10, 0.9).unwrap(), 180);
        assert_eq!(calculate_streak_bonus(2, 10, 0.5).unwrap(), 100);
        assert_eq!(calculate_streak_bonus(2, 10, 0.0).unwrap(), 0);
    }

    #[test]
    fn streak_bonus_floors_fractional_results() {
        // 100 * 1.0 * 3 / 10 = 30; 100 * 0.9 * 1 / 10 = 9
        assert_eq!(calculate_streak_bonus(1, 3, 1.0).unwrap(), 30);
        assert_eq!(calculate_streak_bonus(1, 1, 0.9).unwrap(), 9);
        // 100 * 0.75 * 5 / 10 = 37.5 -> 37
        assert_eq!(calculate_streak_bonus(1, 5, 0.75).unwrap(), 37);
    }

    #[test]
    fn streak_bonus_rejects_bad_tier() {
        assert!(calculate_streak_bonus(0, 10, 1.0).is_err());
        assert!(calculate_streak_bonus(6, 10, 1.0).is_err());
        assert!(calculate_streak_bonus(-1, 10, 1.0).is_err());
        let err = calculate_streak_bonus(0, 10, 1.0).unwrap_err();
        assert!(err.to_string().starts_with("Invalid tier"));
    }

    #[test]
    fn streak_bonus_rejects_bad_streak() {
        let err = calculate_streak_bonus(1, -5, 1.0).unwrap_err();
        assert!(err.to_string().starts_with("Invalid streak"));
    }

    #[test]
    fn streak_bonus_rejects_bad_multiplier() {
        assert!(calculate_streak_bonus(1, 10, -0.5).is_err());
        assert!(calculate_streak_bonus(1, 10, f64::NAN).is_err());
        assert!(calculate_streak_bonus(1, 10, f64::INFINITY).is_err());
        let err = calculate_streak_bonus(1, 10, -0.5).unwrap_err();
        assert!(err.to_string().starts_with("Invalid multiplier"));
    }

    #[test]
    fn tier_bonus_values() {
        assert_eq!(calculate_tier_bonus(1).unwrap(), 500);
        assert_eq!(calculate_tier_bonus(2).unwrap(), 1000);
        assert_eq!(calculate_tier_bonus(5).unwrap(), 2500);
    }

    #[test]
    fn tier_bonus_rejects_bad_tier() {
        assert!(calculate_tier_bonus(0).is_err());
        assert!(calculate_tier_bonus(6).is_err());
        let err = calculate_tier_bonus(0).unwrap_err();
        assert!(err.to_string().starts_with("Invalid tier"));
    }

    #[test]
    fn calculators_are_deterministic() {
        let a = calculate_streak_bonus(3, 42, 0.8).unwrap();
        let b = calculate_streak_bonus(3, 42, 0.8).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            calculate_tier_bonus(3).unwrap(),
            calculate_tier_bonus(3).unwrap()
        );
    }
}
