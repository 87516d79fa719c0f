//! Parlay generation entry point
//!
//! Pipeline: catalog → edge scoring → combination search → ranking.
//! The engine keeps no state between runs; every call works on its own
//! snapshot of the catalog.

use super::config::{GenerationConfig, GenerationOptions};
use super::ranking::ParlayRanker;
use super::search::{CombinationSearch, InsufficientData};
use super::types::ParlayCombination;
use crate::config::ConfigError;
use crate::edge::EdgeScorer;
use crate::market::{CatalogError, LegCatalog, MarketLeg};
use crate::telemetry::{self, CounterMetric, LatencyMetric};
use std::time::Instant;
use thiserror::Error;

/// Errors surfaced to callers of the engine
///
/// Bad legs and thin catalogs are never errors; they only shrink the result.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Full result of one generation run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Final ranked combinations
    pub combinations: Vec<ParlayCombination>,
    pub legs_received: usize,
    pub legs_eligible: usize,
    pub legs_skipped: usize,
    pub candidates_evaluated: usize,
    pub candidates_built: usize,
    /// The work cap cut the search short
    pub truncated: bool,
    pub insufficient: Vec<InsufficientData>,
}

/// Run the pure pipeline over a leg snapshot
pub fn generate_from_legs(legs: Vec<MarketLeg>, config: &GenerationConfig) -> GenerationReport {
    let started = Instant::now();
    let legs_received = legs.len();

    let catalog = EdgeScorer::new(config.min_leg_edge).score(legs);
    let search = CombinationSearch::new(config).run(&catalog);
    let candidates_built = search.candidates.len();
    let combinations = ParlayRanker::new(config).select(search.candidates);

    let report = GenerationReport {
        legs_received,
        legs_eligible: catalog.eligible_count(),
        legs_skipped: catalog.skipped.len(),
        candidates_evaluated: search.evaluated,
        candidates_built,
        truncated: search.truncated,
        insufficient: search.insufficient,
        combinations,
    };

    telemetry::increment(CounterMetric::LegsScored, report.legs_eligible as u64);
    telemetry::increment(CounterMetric::LegsSkipped, report.legs_skipped as u64);
    telemetry::increment(CounterMetric::CandidatesEvaluated, report.candidates_evaluated as u64);
    telemetry::increment(CounterMetric::SearchTruncated, u64::from(report.truncated));
    telemetry::increment(CounterMetric::ParlaysEmitted, report.combinations.len() as u64);
    telemetry::record_latency(LatencyMetric::Generation, started.elapsed());

    tracing::info!(
        legs = report.legs_received,
        eligible = report.legs_eligible,
        evaluated = report.candidates_evaluated,
        selected = report.combinations.len(),
        truncated = report.truncated,
        "Parlay generation complete"
    );

    report
}

/// Parlay engine bound to a leg catalog
pub struct ParlayEngine<C> {
    catalog: C,
}

impl<C: LegCatalog> ParlayEngine<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Best parlays for the current catalog
    pub async fn generate_best_parlays(
        &self,
        options: &GenerationOptions,
    ) -> Result<Vec<ParlayCombination>, EngineError> {
        Ok(self.generate_report(options).await?.combinations)
    }

    /// Like [`generate_best_parlays`](Self::generate_best_parlays) with run diagnostics
    pub async fn generate_report(
        &self,
        options: &GenerationOptions,
    ) -> Result<GenerationReport, EngineError> {
        let config = GenerationConfig::resolve(options)?;

        let started = Instant::now();
        let legs = self.catalog.fetch_legs().await?;
        telemetry::record_latency(LatencyMetric::CatalogFetch, started.elapsed());

        Ok(generate_from_legs(legs, &config))
    }
}
