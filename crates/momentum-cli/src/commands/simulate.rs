use std::path::PathBuf;

use clap::Args;
use momentum_core::{run_simulation, SimulationConfig, SimulationSeed, StreakConfig};

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of simulated users
    #[arg(long, default_value_t = 5)]
    users: usize,

    /// Simulated activity rounds per user
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// RNG seed; identical seeds reproduce identical reports
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Engine configuration file (TOML); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let streak_config = match args.config {
        Some(path) => StreakConfig::from_path(&path)?,
        None => StreakConfig::default(),
    };
    let sim_config = SimulationConfig {
        users: args.users,
        days: args.days,
        seed: SimulationSeed::new(args.seed),
        ..Default::default()
    };

    let report = run_simulation(&streak_config, &sim_config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
