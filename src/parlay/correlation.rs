//! Correlation penalty
//!
//! Legs on the same match describe one underlying event (a home win and
//! over 2.5 goals both favour a high-scoring home side), so the naive
//! product of their probabilities overstates the joint probability. Legs
//! on different matches are treated as close to independent.
//!
//! The penalty is `base^(leg_count - 1)` with a per-mode base. The bases
//! encode a chosen safety margin rather than a measured covariance and are
//! set through [`GenerationConfig`](super::GenerationConfig).

use super::types::ParlayType;
use rust_decimal::Decimal;

/// Per-mode penalty bases
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationModel {
    single_game_base: Decimal,
    multi_game_base: Decimal,
}

impl CorrelationModel {
    pub fn new(single_game_base: Decimal, multi_game_base: Decimal) -> Self {
        Self {
            single_game_base,
            multi_game_base,
        }
    }

    pub fn base(&self, parlay_type: ParlayType) -> Decimal {
        match parlay_type {
            ParlayType::SingleGame => self.single_game_base,
            ParlayType::MultiGame => self.multi_game_base,
        }
    }

    /// Multiplicative discount for a leg set of the given size
    pub fn penalty(&self, parlay_type: ParlayType, leg_count: usize) -> Decimal {
        let exponent = leg_count.saturating_sub(1);
        let base = self.base(parlay_type);
        (0..exponent).fold(Decimal::ONE, |acc, _| acc * base)
    }
}
