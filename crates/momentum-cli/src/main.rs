use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "momentum-cli", version, about = "Momentum streak engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bonus calculators
    Bonus {
        #[command(subcommand)]
        action: commands::bonus::BonusAction,
    },
    /// Tier table with thresholds and promotion bonuses
    Tiers(commands::tiers::TiersArgs),
    /// Deterministic engagement simulation
    Simulate(commands::simulate::SimulateArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Bonus { action } => commands::bonus::run(action),
        Commands::Tiers(args) => commands::tiers::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
