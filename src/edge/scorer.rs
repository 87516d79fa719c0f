//! Per-leg edge scoring

use super::types::{ScoredCatalog, ScoredLeg, SkipReason, SkippedLeg};
use crate::market::MarketLeg;
use rust_decimal::Decimal;

/// Scores legs against the consensus model and applies the edge floor
#[derive(Debug, Clone)]
pub struct EdgeScorer {
    min_leg_edge: Decimal,
}

impl EdgeScorer {
    pub fn new(min_leg_edge: Decimal) -> Self {
        Self { min_leg_edge }
    }

    pub fn min_leg_edge(&self) -> Decimal {
        self.min_leg_edge
    }

    /// Recompute edge for every leg and group survivors by match
    ///
    /// Malformed legs are skipped with a warning, never fatal.
    pub fn score(&self, legs: Vec<MarketLeg>) -> ScoredCatalog {
        let mut catalog = ScoredCatalog::default();

        for leg in legs {
            let scored = match ScoredLeg::score(leg.clone()) {
                Ok(scored) => scored,
                Err(e) => {
                    tracing::warn!(
                        match_id = %leg.match_id,
                        market = %leg.market,
                        error = %e,
                        "Skipping invalid leg"
                    );
                    catalog.skipped.push(SkippedLeg {
                        leg,
                        reason: SkipReason::Invalid(e),
                    });
                    continue;
                }
            };

            if scored.edge < self.min_leg_edge {
                tracing::debug!(
                    match_id = %scored.leg.match_id,
                    market = %scored.leg.market,
                    edge = %scored.edge,
                    min_edge = %self.min_leg_edge,
                    "Leg edge below minimum"
                );
                catalog.skipped.push(SkippedLeg {
                    reason: SkipReason::EdgeBelowMinimum(scored.edge),
                    leg: scored.leg,
                });
                continue;
            }

            catalog
                .by_match
                .entry(scored.leg.match_id.clone())
                .or_default()
                .push(scored);
        }

        for legs in catalog.by_match.values_mut() {
            legs.sort_by(|a, b| b.edge.cmp(&a.edge).then_with(|| a.key().cmp(&b.key())));
        }

        tracing::debug!(
            eligible = catalog.eligible_count(),
            matches = catalog.match_count(),
            skipped = catalog.skipped.len(),
            "Edge scoring complete"
        );

        catalog
    }
}
