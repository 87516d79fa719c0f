//! Kelly criterion position sizing

use super::types::{
    BettingIntelligence, KellyConfig, KellyOptions, StakeRecommendation, UnavailableReason,
};
use crate::config::ConfigError;
use crate::edge::leg_edge;
use crate::market::MarketLeg;
use rust_decimal::Decimal;

/// Kelly criterion calculator for fixed-odds bets
#[derive(Debug, Clone, Default)]
pub struct KellyCalculator {
    config: KellyConfig,
}

impl KellyCalculator {
    pub fn new(config: KellyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KellyConfig {
        &self.config
    }

    /// Full Kelly fraction of bankroll
    ///
    /// For decimal odds `o` the net payout is `b = o - 1`, so
    /// `f* = (p*b - q) / b = (p*o - 1) / (o - 1)`, floored at zero.
    pub fn full_kelly(consensus_prob: Decimal, decimal_odds: Decimal) -> Decimal {
        let net = decimal_odds - Decimal::ONE;
        if net <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        ((consensus_prob * decimal_odds - Decimal::ONE) / net).max(Decimal::ZERO)
    }

    /// Size a stake for one leg
    pub fn evaluate(&self, leg: &MarketLeg, bankroll: Decimal) -> BettingIntelligence {
        match self.stake(leg.consensus_prob, leg.decimal_odds, bankroll) {
            Ok(stake) => BettingIntelligence::Available(stake),
            Err(reason) => {
                tracing::debug!(
                    match_id = %leg.match_id,
                    market = %leg.market,
                    %reason,
                    "Betting intelligence not available"
                );
                BettingIntelligence::NotAvailable { reason }
            }
        }
    }

    fn stake(
        &self,
        consensus_prob: Decimal,
        decimal_odds: Decimal,
        bankroll: Decimal,
    ) -> Result<StakeRecommendation, UnavailableReason> {
        let (_, edge) = leg_edge(consensus_prob, decimal_odds)?;
        if bankroll <= Decimal::ZERO {
            return Err(UnavailableReason::NonPositiveBankroll(bankroll));
        }

        let full_kelly = Self::full_kelly(consensus_prob, decimal_odds);
        let fractional_kelly = full_kelly
            .checked_mul(self.config.kelly_fraction)
            .ok_or(UnavailableReason::Overflow)?;

        // The ceiling holds no matter what the Kelly maths says
        let capped = fractional_kelly > self.config.max_stake_pct;
        let recommended_stake_pct = fractional_kelly.min(self.config.max_stake_pct);

        let bankroll_stake = bankroll
            .checked_mul(recommended_stake_pct)
            .ok_or(UnavailableReason::Overflow)?;
        let expected_value = consensus_prob
            .checked_mul(decimal_odds)
            .and_then(|payout| bankroll_stake.checked_mul(payout - Decimal::ONE))
            .ok_or(UnavailableReason::Overflow)?;

        Ok(StakeRecommendation {
            consensus_prob,
            decimal_odds,
            edge,
            full_kelly,
            fractional_kelly,
            recommended_stake_pct,
            bankroll_stake,
            expected_value,
            capped,
            recommendation: self.config.recommend(edge),
        })
    }
}

/// Stake guidance for one leg with optional Kelly overrides
///
/// Only misconfigured options are an error; a leg that cannot be sized
/// yields [`BettingIntelligence::NotAvailable`].
pub fn compute_betting_intelligence(
    leg: &MarketLeg,
    bankroll: Decimal,
    options: &KellyOptions,
) -> Result<BettingIntelligence, ConfigError> {
    let config = KellyConfig::resolve(options)?;
    Ok(KellyCalculator::new(config).evaluate(leg, bankroll))
}
