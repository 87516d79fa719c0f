//! CLI interface for parlay-edge
//!
//! Provides subcommands for:
//! - `generate`: Build and rank parlays from the leg catalog
//! - `kelly`: Stake sizing and closing line value for one leg
//! - `config`: Show resolved configuration

mod generate;
mod kelly;

pub use generate::GenerateArgs;
pub use kelly::KellyArgs;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "parlay-edge")]
#[command(about = "Correlation-adjusted parlay search and Kelly sizing for football markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and rank parlays
    Generate(GenerateArgs),
    /// Size a single bet
    Kelly(KellyArgs),
    /// Show resolved configuration
    Config,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
