//! Edge scoring types

use crate::market::{InvalidLegError, LegKey, MarketLeg, MatchId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Market-implied probability and edge for a price/probability pair
///
/// Returns `(1 / decimal_odds, consensus_prob - 1 / decimal_odds)`.
pub fn leg_edge(
    consensus_prob: Decimal,
    decimal_odds: Decimal,
) -> Result<(Decimal, Decimal), InvalidLegError> {
    if decimal_odds <= Decimal::ONE {
        return Err(InvalidLegError::OddsNotAboveOne(decimal_odds));
    }
    if consensus_prob <= Decimal::ZERO || consensus_prob >= Decimal::ONE {
        return Err(InvalidLegError::ProbabilityOutOfRange(consensus_prob));
    }

    let implied = Decimal::ONE / decimal_odds;
    Ok((implied, consensus_prob - implied))
}

/// A leg annotated with freshly computed edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLeg {
    #[serde(flatten)]
    pub leg: MarketLeg,
    /// `1 / decimal_odds`
    pub market_implied_prob: Decimal,
    /// `consensus_prob - market_implied_prob`
    pub edge: Decimal,
}

impl ScoredLeg {
    /// Validate a leg and compute its edge
    pub fn score(leg: MarketLeg) -> Result<Self, InvalidLegError> {
        let (market_implied_prob, edge) = leg_edge(leg.consensus_prob, leg.decimal_odds)?;
        Ok(Self {
            leg,
            market_implied_prob,
            edge,
        })
    }

    pub fn match_id(&self) -> &MatchId {
        &self.leg.match_id
    }

    pub fn consensus_prob(&self) -> Decimal {
        self.leg.consensus_prob
    }

    pub fn decimal_odds(&self) -> Decimal {
        self.leg.decimal_odds
    }

    pub fn key(&self) -> LegKey {
        self.leg.key()
    }
}

/// Why a leg did not make it into the scored catalog
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Malformed price or probability
    Invalid(InvalidLegError),
    /// Edge below the configured floor
    EdgeBelowMinimum(Decimal),
}

/// A leg left out of scoring, kept for diagnostics
#[derive(Debug, Clone)]
pub struct SkippedLeg {
    pub leg: MarketLeg,
    pub reason: SkipReason,
}

/// Edge-filtered legs grouped by match
///
/// Groups iterate in match-id order; within a group legs are ordered by
/// descending edge, ties broken by leg key.
#[derive(Debug, Clone, Default)]
pub struct ScoredCatalog {
    pub by_match: BTreeMap<MatchId, Vec<ScoredLeg>>,
    pub skipped: Vec<SkippedLeg>,
}

impl ScoredCatalog {
    /// Total number of eligible legs across all matches
    pub fn eligible_count(&self) -> usize {
        self.by_match.values().map(Vec::len).sum()
    }

    pub fn match_count(&self) -> usize {
        self.by_match.len()
    }

    pub fn legs_for(&self, match_id: &MatchId) -> &[ScoredLeg] {
        self.by_match
            .get(match_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MatchId, &Vec<ScoredLeg>)> {
        self.by_match.iter()
    }
}
