//! Combination search
//!
//! Enumerates leg subsets that form legal parlays:
//!
//! 1. Single-game: subsets of one match's legs, never two legs of the same
//!    market type (an outcome is exclusive with its own market's siblings).
//! 2. Multi-game: the best-edge leg of each of the top-K matches, combined
//!    across distinct matches.
//!
//! Each mode stops after `max_combinations` candidates so a huge catalog
//! truncates the pool instead of blowing up.

use super::config::GenerationConfig;
use super::correlation::CorrelationModel;
use super::types::{ParlayCombination, ParlayType};
use crate::edge::{ScoredCatalog, ScoredLeg};
use crate::market::{MarketType, MatchId};
use std::collections::BTreeSet;

/// Lexicographic k-of-n index combinations
///
/// Yields `[0, 1, .., k-1]` first and `[n-k, .., n-1]` last.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done: k == 0 || k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        let k = self.indices.len();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.indices[i] != i + self.n - k {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return Some(self.indices.clone());
            }
        }

        self.done = true;
        None
    }
}

/// Why a mode produced nothing for part of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsufficientData {
    /// Match has fewer than two eligible legs for single-game parlays
    TooFewLegs { match_id: MatchId, eligible: usize },
    /// Fewer than two eligible matches for multi-game parlays
    TooFewMatches { eligible: usize },
}

/// Output of one search run
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    pub candidates: Vec<ParlayCombination>,
    /// Leg sets examined, including those rejected for repeated market types
    pub evaluated: usize,
    /// Whether any mode hit the work cap
    pub truncated: bool,
    pub insufficient: Vec<InsufficientData>,
}

/// Per-mode work counter
struct Budget {
    limit: usize,
    used: usize,
}

impl Budget {
    fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Claim one unit of work; false once the cap is reached
    fn take(&mut self) -> bool {
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }
}

/// Enumerates candidate parlays from a scored catalog
pub struct CombinationSearch<'a> {
    config: &'a GenerationConfig,
    correlation: CorrelationModel,
}

impl<'a> CombinationSearch<'a> {
    pub fn new(config: &'a GenerationConfig) -> Self {
        Self {
            config,
            correlation: CorrelationModel::new(
                config.single_game_penalty,
                config.multi_game_penalty,
            ),
        }
    }

    /// Run every mode enabled in the config
    pub fn run(&self, catalog: &ScoredCatalog) -> SearchReport {
        let mut report = SearchReport::default();

        if self.config.parlay_type.includes_single_game() {
            self.single_game(catalog, &mut report);
        }
        if self.config.parlay_type.includes_multi_game() {
            self.multi_game(catalog, &mut report);
        }

        if report.truncated {
            tracing::warn!(
                evaluated = report.evaluated,
                max_combinations = self.config.max_combinations,
                "Combination budget exhausted, candidate pool truncated"
            );
        }

        report
    }

    fn single_game(&self, catalog: &ScoredCatalog, report: &mut SearchReport) {
        let mut budget = Budget::new(self.config.max_combinations);

        'matches: for (match_id, legs) in catalog.iter() {
            if legs.len() < 2 {
                tracing::debug!(%match_id, eligible = legs.len(), "Too few legs for single-game parlay");
                report.insufficient.push(InsufficientData::TooFewLegs {
                    match_id: match_id.clone(),
                    eligible: legs.len(),
                });
                continue;
            }

            let max_size = self.config.max_leg_count.min(legs.len());
            for size in 2..=max_size {
                for indices in Combinations::new(legs.len(), size) {
                    if !budget.take() {
                        report.truncated = true;
                        break 'matches;
                    }
                    report.evaluated += 1;

                    if has_repeated_market_type(legs, &indices) {
                        continue;
                    }

                    let chosen: Vec<ScoredLeg> = indices.iter().map(|&i| legs[i].clone()).collect();
                    self.push_candidate(chosen, ParlayType::SingleGame, report);
                }
            }
        }
    }

    fn multi_game(&self, catalog: &ScoredCatalog, report: &mut SearchReport) {
        // Groups are sorted by descending edge, so the first leg is the best
        let mut best: Vec<&ScoredLeg> = catalog.iter().filter_map(|(_, legs)| legs.first()).collect();

        if best.len() < 2 {
            tracing::debug!(eligible = best.len(), "Too few matches for multi-game parlay");
            report.insufficient.push(InsufficientData::TooFewMatches {
                eligible: best.len(),
            });
            return;
        }

        best.sort_by(|a, b| {
            b.edge
                .cmp(&a.edge)
                .then_with(|| a.match_id().cmp(b.match_id()))
        });
        best.truncate(self.config.multi_game_top_k);

        let mut budget = Budget::new(self.config.max_combinations);
        let max_size = self.config.max_leg_count.min(best.len());

        'sizes: for size in 2..=max_size {
            for indices in Combinations::new(best.len(), size) {
                if !budget.take() {
                    report.truncated = true;
                    break 'sizes;
                }
                report.evaluated += 1;

                let chosen: Vec<ScoredLeg> = indices.iter().map(|&i| best[i].clone()).collect();
                self.push_candidate(chosen, ParlayType::MultiGame, report);
            }
        }
    }

    fn push_candidate(&self, legs: Vec<ScoredLeg>, parlay_type: ParlayType, report: &mut SearchReport) {
        if let Some(combo) =
            ParlayCombination::build(legs, parlay_type, &self.correlation, &self.config.tiers)
        {
            report.candidates.push(combo);
        }
    }
}

fn has_repeated_market_type(legs: &[ScoredLeg], indices: &[usize]) -> bool {
    let mut seen: BTreeSet<MarketType> = BTreeSet::new();
    indices.iter().any(|&i| !seen.insert(legs[i].leg.market_type()))
}
