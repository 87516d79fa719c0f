//! Bankroll sizing types

use crate::config::ConfigError;
use crate::market::InvalidLegError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Partial Kelly settings; absent fields take defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KellyOptions {
    pub kelly_fraction: Option<Decimal>,
    pub max_stake_pct: Option<Decimal>,
    pub strong_edge: Option<Decimal>,
    pub value_edge: Option<Decimal>,
}

/// Resolved Kelly settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KellyConfig {
    /// Multiplier on full Kelly (0.5 = half Kelly)
    pub kelly_fraction: Decimal,
    /// Hard ceiling on the stake as a share of bankroll
    pub max_stake_pct: Decimal,
    /// Leg edge at or above which a bet is labelled strong
    pub strong_edge: Decimal,
    /// Leg edge at or above which a bet is labelled value
    pub value_edge: Decimal,
}

impl Default for KellyConfig {
    fn default() -> Self {
        Self {
            kelly_fraction: dec!(0.5),
            max_stake_pct: dec!(0.05),
            strong_edge: dec!(0.05),
            value_edge: dec!(0.02),
        }
    }
}

impl KellyConfig {
    /// Merge options over defaults and validate
    pub fn resolve(options: &KellyOptions) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            kelly_fraction: options.kelly_fraction.unwrap_or(defaults.kelly_fraction),
            max_stake_pct: options.max_stake_pct.unwrap_or(defaults.max_stake_pct),
            strong_edge: options.strong_edge.unwrap_or(defaults.strong_edge),
            value_edge: options.value_edge.unwrap_or(defaults.value_edge),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kelly_fraction <= Decimal::ZERO || self.kelly_fraction > Decimal::ONE {
            return Err(ConfigError::KellyFractionOutOfRange(self.kelly_fraction));
        }
        if self.max_stake_pct <= Decimal::ZERO || self.max_stake_pct > Decimal::ONE {
            return Err(ConfigError::MaxStakeOutOfRange(self.max_stake_pct));
        }
        if self.strong_edge < self.value_edge {
            return Err(ConfigError::RecommendationThresholdsInverted {
                strong: self.strong_edge,
                value: self.value_edge,
            });
        }
        Ok(())
    }

    /// Label for a leg edge
    pub fn recommend(&self, edge: Decimal) -> Recommendation {
        if edge >= self.strong_edge {
            Recommendation::StrongBet
        } else if edge >= self.value_edge {
            Recommendation::ValueBet
        } else {
            Recommendation::Pass
        }
    }
}

/// Display label for a sized bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "VALUE BET")]
    ValueBet,
    #[serde(rename = "STRONG BET")]
    StrongBet,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Pass => "PASS",
            Recommendation::ValueBet => "VALUE BET",
            Recommendation::StrongBet => "STRONG BET",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kelly sizing for one leg
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeRecommendation {
    pub consensus_prob: Decimal,
    pub decimal_odds: Decimal,
    /// `consensus_prob - 1 / decimal_odds`
    pub edge: Decimal,
    /// Full Kelly fraction, floored at zero
    pub full_kelly: Decimal,
    pub fractional_kelly: Decimal,
    /// `min(fractional_kelly, max_stake_pct)`
    pub recommended_stake_pct: Decimal,
    pub bankroll_stake: Decimal,
    pub expected_value: Decimal,
    /// The stake ceiling bound the recommendation
    pub capped: bool,
    pub recommendation: Recommendation,
}

/// Why sizing was not possible
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnavailableReason {
    #[error(transparent)]
    InvalidLeg(#[from] InvalidLegError),
    #[error("bankroll must be positive, got {0}")]
    NonPositiveBankroll(Decimal),
    #[error("stake arithmetic overflowed")]
    Overflow,
}

/// Sizing result for display; never an error
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BettingIntelligence {
    Available(StakeRecommendation),
    NotAvailable {
        #[serde(serialize_with = "serialize_reason")]
        reason: UnavailableReason,
    },
}

impl BettingIntelligence {
    pub fn stake(&self) -> Option<&StakeRecommendation> {
        match self {
            BettingIntelligence::Available(stake) => Some(stake),
            BettingIntelligence::NotAvailable { .. } => None,
        }
    }
}

fn serialize_reason<S: Serializer>(reason: &UnavailableReason, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(reason)
}
