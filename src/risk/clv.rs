//! Closing line value
//!
//! Compares the model's three-way probabilities with the market's closing
//! prices. Positive CLV over many bets is the long-run skill signal.

use crate::market::ThreeWay;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Model probabilities for a 1X2 market
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreeWayProbs {
    pub home: Decimal,
    pub draw: Decimal,
    pub away: Decimal,
}

/// Closing decimal prices for a 1X2 market
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreeWayOdds {
    pub home: Decimal,
    pub draw: Decimal,
    pub away: Decimal,
}

/// CLV for one outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeClv {
    pub outcome: ThreeWay,
    pub consensus_prob: Decimal,
    /// `1 / closing_odds`
    pub closing_implied_prob: Decimal,
    /// `consensus_prob - closing_implied_prob`, signed
    pub clv: Decimal,
    /// Closing implied probability with the overround removed
    pub fair_closing_prob: Decimal,
    /// `consensus_prob - fair_closing_prob`, signed
    pub fair_clv: Decimal,
}

/// Per-outcome CLV in home, draw, away order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClvReport {
    pub outcomes: Vec<OutcomeClv>,
    /// Book overround: sum of raw implied probabilities minus one
    pub margin: Decimal,
}

impl ClvReport {
    pub fn outcome(&self, outcome: ThreeWay) -> Option<&OutcomeClv> {
        self.outcomes.iter().find(|o| o.outcome == outcome)
    }
}

/// Closing line value against a three-way closing market
///
/// `None` when any closing price is not above 1.0 or a probability lies
/// outside [0, 1].
pub fn closing_line_value(consensus: ThreeWayProbs, closing: ThreeWayOdds) -> Option<ClvReport> {
    let pairs = [
        (ThreeWay::Home, consensus.home, closing.home),
        (ThreeWay::Draw, consensus.draw, closing.draw),
        (ThreeWay::Away, consensus.away, closing.away),
    ];

    if pairs
        .iter()
        .any(|&(_, p, o)| o <= Decimal::ONE || p < Decimal::ZERO || p > Decimal::ONE)
    {
        return None;
    }

    let raw: Vec<Decimal> = pairs.iter().map(|&(_, _, o)| Decimal::ONE / o).collect();
    let book: Decimal = raw.iter().sum();

    let outcomes = pairs
        .iter()
        .zip(&raw)
        .map(|(&(outcome, consensus_prob, _), &implied)| {
            let fair_closing_prob = implied / book;
            OutcomeClv {
                outcome,
                consensus_prob,
                closing_implied_prob: implied,
                clv: consensus_prob - implied,
                fair_closing_prob,
                fair_clv: consensus_prob - fair_closing_prob,
            }
        })
        .collect();

    Some(ClvReport {
        outcomes,
        margin: book - Decimal::ONE,
    })
}
