use std::path::PathBuf;

use clap::Args;
use momentum_core::{calculate_tier_bonus, StreakConfig, TierEngine, MAX_TIER};

#[derive(Args)]
pub struct TiersArgs {
    /// Engine configuration file (TOML); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

pub fn run(args: TiersArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match args.config {
        Some(path) => StreakConfig::from_path(&path)?,
        None => StreakConfig::default(),
    };
    let engine = TierEngine::new(&config);

    let mut rows = Vec::new();
    for tier in 1..=MAX_TIER {
        rows.push(serde_json::json!({
            "tier": tier,
            "name": engine.tier_name(tier),
            "threshold": engine.threshold_for(tier),
            "promotion_bonus": calculate_tier_bonus(tier as i64)?,
        }));
    }

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
