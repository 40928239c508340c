use clap::Subcommand;
use momentum_core::{calculate_streak_bonus, calculate_tier_bonus};

#[derive(Subcommand)]
pub enum BonusAction {
    /// Streak bonus for a tier, streak length, and payout multiplier
    Streak {
        #[arg(long)]
        tier: i64,
        #[arg(long)]
        streak: i64,
        #[arg(long, default_value_t = 1.0)]
        multiplier: f64,
    },
    /// One-time bonus awarded on promotion into a tier
    Tier {
        #[arg(long)]
        tier: i64,
    },
}

pub fn run(action: BonusAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BonusAction::Streak {
            tier,
            streak,
            multiplier,
        } => {
            let bonus = calculate_streak_bonus(tier, streak, multiplier)?;
            let out = serde_json::json!({
                "tier": tier,
                "streak": streak,
                "multiplier": multiplier,
                "bonus": bonus,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        BonusAction::Tier { tier } => {
            let bonus = calculate_tier_bonus(tier)?;
            let out = serde_json::json!({
                "tier": tier,
                "bonus": bonus,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
