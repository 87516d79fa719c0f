//! Parlay types

use super::config::TierTable;
use super::correlation::CorrelationModel;
use crate::edge::ScoredLeg;
use crate::market::{LegKey, MatchId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parlay family of a single combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParlayType {
    /// Every leg from one match
    SingleGame,
    /// Every leg from a different match
    MultiGame,
}

impl ParlayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParlayType::SingleGame => "single_game",
            ParlayType::MultiGame => "multi_game",
        }
    }
}

impl fmt::Display for ParlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal confidence bucket, `Low` < `VeryHigh`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
            ConfidenceTier::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of legs proposed as one bet
///
/// Only ever built fully computed via [`ParlayCombination::build`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParlayCombination {
    /// Distinct matches touched, in first-appearance order
    pub match_ids: Vec<MatchId>,
    pub legs: Vec<ScoredLeg>,
    pub leg_count: usize,
    /// Naive product of consensus probabilities
    pub combined_prob: Decimal,
    /// Multiplicative discount in (0, 1]
    pub correlation_penalty: Decimal,
    /// `combined_prob * correlation_penalty`
    pub adjusted_prob: Decimal,
    /// `1 / adjusted_prob`
    pub implied_odds: Decimal,
    /// Product of decimal odds, the parlay payout
    pub combined_odds: Decimal,
    /// Product of per-leg market-implied probabilities
    pub market_implied_prob: Decimal,
    /// `adjusted_prob * combined_odds - 1`
    pub parlay_edge: Decimal,
    pub confidence_tier: ConfidenceTier,
    pub parlay_type: ParlayType,
    pub is_multi_game: bool,
}

impl ParlayCombination {
    /// Compute every derived figure for a candidate leg set
    ///
    /// Returns `None` for an empty set or if any figure cannot be computed.
    pub fn build(
        legs: Vec<ScoredLeg>,
        parlay_type: ParlayType,
        correlation: &CorrelationModel,
        tiers: &TierTable,
    ) -> Option<Self> {
        if legs.is_empty() {
            return None;
        }

        let leg_count = legs.len();
        let mut match_ids: Vec<MatchId> = Vec::new();
        let mut combined_prob = Decimal::ONE;
        let mut combined_odds = Decimal::ONE;
        let mut market_implied_prob = Decimal::ONE;

        for leg in &legs {
            if !match_ids.contains(leg.match_id()) {
                match_ids.push(leg.match_id().clone());
            }
            combined_prob = combined_prob.checked_mul(leg.consensus_prob())?;
            combined_odds = combined_odds.checked_mul(leg.decimal_odds())?;
            market_implied_prob = market_implied_prob.checked_mul(leg.market_implied_prob)?;
        }

        let correlation_penalty = correlation.penalty(parlay_type, leg_count);
        let adjusted_prob = combined_prob.checked_mul(correlation_penalty)?;
        let implied_odds = Decimal::ONE.checked_div(adjusted_prob)?;
        let parlay_edge = adjusted_prob.checked_mul(combined_odds)? - Decimal::ONE;
        let confidence_tier = tiers.classify(parlay_edge, adjusted_prob);

        Some(Self {
            is_multi_game: match_ids.len() > 1,
            match_ids,
            legs,
            leg_count,
            combined_prob,
            correlation_penalty,
            adjusted_prob,
            implied_odds,
            combined_odds,
            market_implied_prob,
            parlay_edge,
            confidence_tier,
            parlay_type,
        })
    }

    /// Order-independent identity of the leg set
    ///
    /// Two combinations with equal keys are the same bet.
    pub fn dedup_key(&self) -> Vec<LegKey> {
        let mut keys: Vec<LegKey> = self.legs.iter().map(ScoredLeg::key).collect();
        keys.sort();
        keys
    }
}
