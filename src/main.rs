use clap::Parser;
use parlay_edge::cli::{Cli, Commands};
use parlay_edge::config::Config;
use parlay_edge::parlay::GenerationConfig;
use parlay_edge::risk::KellyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    let _telemetry = parlay_edge::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Generate(args) => {
            tracing::info!("Generating parlays");
            args.execute(&config).await?;
        }
        Commands::Kelly(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            let engine = GenerationConfig::resolve(&config.engine)?;
            let kelly = KellyConfig::resolve(&config.kelly)?;

            println!("Current configuration:");
            println!(
                "  Catalog: {:?} ({})",
                config.catalog.source,
                config
                    .catalog
                    .url
                    .clone()
                    .unwrap_or_else(|| config.catalog.path.display().to_string())
            );
            println!(
                "  Engine: mode={:?}, max_legs={}, max_results={}, top_k={}, budget={}",
                engine.parlay_type,
                engine.max_leg_count,
                engine.max_results,
                engine.multi_game_top_k,
                engine.max_combinations
            );
            println!(
                "  Thresholds: leg_edge={}, parlay_edge={}, combined_prob={}",
                engine.min_leg_edge, engine.min_parlay_edge, engine.min_combined_prob
            );
            println!(
                "  Penalties: single_game={}, multi_game={}",
                engine.single_game_penalty, engine.multi_game_penalty
            );
            for tier in engine.tiers.thresholds() {
                println!(
                    "  Tier {}: edge>={}, prob>={}",
                    tier.tier.as_str(),
                    tier.min_parlay_edge,
                    tier.min_adjusted_prob
                );
            }
            println!(
                "  Kelly: fraction={}, max_stake={}%",
                kelly.kelly_fraction,
                kelly.max_stake_pct * rust_decimal_macros::dec!(100)
            );
        }
    }

    Ok(())
}
