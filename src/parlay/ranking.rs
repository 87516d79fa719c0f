//! Ranking and selection
//!
//! Turns the raw candidate pool into the final list: threshold filter,
//! logical dedup, ranking, truncation. The ordering is total so identical
//! inputs always produce identical output.

use super::config::GenerationConfig;
use super::types::ParlayCombination;
use crate::market::LegKey;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Why a candidate was filtered out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Adjusted probability below `min_combined_prob`
    ProbabilityTooLow,
    /// Parlay edge below `min_parlay_edge`
    EdgeTooSmall,
}

/// Result of applying the thresholds to one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum FilterResult {
    Pass,
    Reject(RejectReason),
}

/// Selects the final ranked parlays
pub struct ParlayRanker<'a> {
    config: &'a GenerationConfig,
}

impl<'a> ParlayRanker<'a> {
    pub fn new(config: &'a GenerationConfig) -> Self {
        Self { config }
    }

    /// Apply the probability and edge floors
    pub fn check(&self, combo: &ParlayCombination) -> FilterResult {
        if combo.adjusted_prob < self.config.min_combined_prob {
            return FilterResult::Reject(RejectReason::ProbabilityTooLow);
        }
        if combo.parlay_edge < self.config.min_parlay_edge {
            return FilterResult::Reject(RejectReason::EdgeTooSmall);
        }
        FilterResult::Pass
    }

    /// Filter, dedup, rank and truncate
    pub fn select(&self, candidates: Vec<ParlayCombination>) -> Vec<ParlayCombination> {
        let total = candidates.len();

        let mut keyed: Vec<(Vec<LegKey>, ParlayCombination)> = candidates
            .into_iter()
            .filter(|combo| match self.check(combo) {
                FilterResult::Pass => true,
                FilterResult::Reject(reason) => {
                    tracing::trace!(
                        legs = combo.leg_count,
                        parlay_edge = %combo.parlay_edge,
                        adjusted_prob = %combo.adjusted_prob,
                        ?reason,
                        "Candidate rejected"
                    );
                    false
                }
            })
            .map(|combo| (combo.dedup_key(), combo))
            .collect();
        let passed = keyed.len();

        keyed.sort_by(|(ka, a), (kb, b)| rank_order(a, b).then_with(|| ka.cmp(kb)));

        // Best-ranked copy of each leg set comes first, so keeping the first
        // occurrence keeps the higher-edge duplicate.
        let mut seen: HashSet<Vec<LegKey>> = HashSet::new();
        let mut selected: Vec<ParlayCombination> = keyed
            .into_iter()
            .filter_map(|(key, combo)| seen.insert(key).then_some(combo))
            .collect();
        let unique = selected.len();

        selected.truncate(self.config.max_results);

        tracing::debug!(
            candidates = total,
            passed,
            unique,
            selected = selected.len(),
            "Ranking complete"
        );

        selected
    }
}

/// Edge descending, adjusted probability descending, fewer legs first
pub fn rank_order(a: &ParlayCombination, b: &ParlayCombination) -> Ordering {
    b.parlay_edge
        .cmp(&a.parlay_edge)
        .then_with(|| b.adjusted_prob.cmp(&a.adjusted_prob))
        .then_with(|| a.leg_count.cmp(&b.leg_count))
}
