//! Generate command implementation

use super::OutputFormat;
use crate::config::{CatalogSource, Config};
use crate::data::{ParlaySink, ParquetParlayExporter};
use crate::market::{FileLegCatalog, HttpCatalogConfig, HttpLegCatalog, LegCatalog};
use crate::parlay::{
    GenerationOptions, GenerationReport, ParlayCombination, ParlayEngine, ParlayMode,
};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Catalog JSON file (overrides config, forces the file source)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Parlay mode: single_game, multi_game or both
    #[arg(long, value_parser = parse_mode)]
    pub parlay_type: Option<ParlayMode>,

    /// Maximum legs per parlay
    #[arg(long)]
    pub max_legs: Option<usize>,

    /// Maximum parlays returned
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Minimum per-leg edge
    #[arg(long)]
    pub min_leg_edge: Option<Decimal>,

    /// Minimum parlay edge
    #[arg(long)]
    pub min_parlay_edge: Option<Decimal>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also export results to Parquet in this directory
    #[arg(long)]
    pub export: Option<PathBuf>,
}

fn parse_mode(value: &str) -> Result<ParlayMode, String> {
    match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "single_game" | "single" => Ok(ParlayMode::SingleGame),
        "multi_game" | "multi" => Ok(ParlayMode::MultiGame),
        "both" => Ok(ParlayMode::Both),
        other => Err(format!("unknown parlay type: {other}")),
    }
}

impl GenerateArgs {
    /// Config-file options with command-line overrides applied
    pub fn options(&self, base: &GenerationOptions) -> GenerationOptions {
        GenerationOptions {
            parlay_type: self.parlay_type.or(base.parlay_type),
            max_leg_count: self.max_legs.or(base.max_leg_count),
            max_results: self.max_results.or(base.max_results),
            min_leg_edge: self.min_leg_edge.or(base.min_leg_edge),
            min_parlay_edge: self.min_parlay_edge.or(base.min_parlay_edge),
            ..base.clone()
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let options = self.options(&config.engine);

        let report = match (&self.catalog, config.catalog.source) {
            (Some(path), _) => run(FileLegCatalog::new(path), &options).await?,
            (None, CatalogSource::File) => {
                run(FileLegCatalog::new(&config.catalog.path), &options).await?
            }
            (None, CatalogSource::Http) => {
                let url = config
                    .catalog
                    .url
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("catalog.url is required for the http source"))?;
                let catalog = HttpLegCatalog::with_config(
                    HttpCatalogConfig::new(url)
                        .with_timeout(Duration::from_secs(config.catalog.timeout_secs)),
                )?;
                run(catalog, &options).await?
            }
        };

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report.combinations)?)
            }
            OutputFormat::Table => print_table(&report),
        }

        if let Some(dir) = &self.export {
            let exporter = ParquetParlayExporter::new(dir);
            let ids = exporter.store(&report.combinations).await?;
            tracing::info!(dir = ?dir, parlays = ids.len(), "Export complete");
        }

        Ok(())
    }
}

async fn run<C: LegCatalog>(
    catalog: C,
    options: &GenerationOptions,
) -> anyhow::Result<GenerationReport> {
    let engine = ParlayEngine::new(catalog);
    Ok(engine.generate_report(options).await?)
}

fn print_table(report: &GenerationReport) {
    println!(
        "{:>3}  {:<11}  {:<9}  {:>4}  {:>9}  {:>8}  {:>8}",
        "#", "TYPE", "TIER", "LEGS", "ADJ PROB", "ODDS", "EDGE"
    );
    for (rank, combo) in report.combinations.iter().enumerate() {
        print_parlay(rank + 1, combo);
    }

    println!();
    println!(
        "{} parlays from {} legs ({} eligible, {} skipped), {} candidates evaluated{}",
        report.combinations.len(),
        report.legs_received,
        report.legs_eligible,
        report.legs_skipped,
        report.candidates_evaluated,
        if report.truncated { ", search truncated" } else { "" }
    );
}

fn print_parlay(rank: usize, combo: &ParlayCombination) {
    println!(
        "{:>3}  {:<11}  {:<9}  {:>4}  {:>8.2}%  {:>8.2}  {:>7.2}%",
        rank,
        combo.parlay_type.as_str(),
        combo.confidence_tier.as_str(),
        combo.leg_count,
        combo.adjusted_prob * Decimal::ONE_HUNDRED,
        combo.combined_odds,
        combo.parlay_edge * Decimal::ONE_HUNDRED,
    );
    for leg in &combo.legs {
        println!(
            "       {:<10} {:<20} p={:.3} @ {:.2} edge {:+.3}",
            leg.match_id().as_str(),
            leg.leg.market.to_string(),
            leg.consensus_prob(),
            leg.decimal_odds(),
            leg.edge,
        );
    }
}
