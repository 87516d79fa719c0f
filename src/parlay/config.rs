//! Generation run configuration
//!
//! Callers hand in [`GenerationOptions`] with any subset of fields set.
//! [`GenerationConfig::resolve`] merges defaults and validates exactly once
//! at the entry point; the pipeline only ever sees the resolved config.

use super::types::ConfidenceTier;
use crate::config::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Which parlay families a run should build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParlayMode {
    SingleGame,
    MultiGame,
    #[default]
    Both,
}

impl ParlayMode {
    pub fn includes_single_game(&self) -> bool {
        matches!(self, ParlayMode::SingleGame | ParlayMode::Both)
    }

    pub fn includes_multi_game(&self) -> bool {
        matches!(self, ParlayMode::MultiGame | ParlayMode::Both)
    }
}

/// Lower bounds a combination must meet to earn a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThreshold {
    pub tier: ConfidenceTier,
    pub min_parlay_edge: Decimal,
    pub min_adjusted_prob: Decimal,
}

/// Ordered confidence tier table
///
/// Thresholds are checked from the most to the least demanding tier;
/// anything matching none of them is `Low`, so every combination gets
/// exactly one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable {
    thresholds: Vec<TierThreshold>,
}

impl TierTable {
    pub fn new(mut thresholds: Vec<TierThreshold>) -> Self {
        thresholds.sort_by(|a, b| b.tier.cmp(&a.tier));
        Self { thresholds }
    }

    /// Tier for a combination's edge and adjusted probability
    pub fn classify(&self, parlay_edge: Decimal, adjusted_prob: Decimal) -> ConfidenceTier {
        self.thresholds
            .iter()
            .find(|t| parlay_edge >= t.min_parlay_edge && adjusted_prob >= t.min_adjusted_prob)
            .map(|t| t.tier)
            .unwrap_or(ConfidenceTier::Low)
    }

    pub fn thresholds(&self) -> &[TierThreshold] {
        &self.thresholds
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for t in &self.thresholds {
            if t.min_adjusted_prob < Decimal::ZERO {
                return Err(ConfigError::NegativeTierProbability {
                    tier: t.tier.to_string(),
                    value: t.min_adjusted_prob,
                });
            }
        }
        Ok(())
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new(vec![
            TierThreshold {
                tier: ConfidenceTier::VeryHigh,
                min_parlay_edge: dec!(0.20),
                min_adjusted_prob: dec!(0.20),
            },
            TierThreshold {
                tier: ConfidenceTier::High,
                min_parlay_edge: dec!(0.12),
                min_adjusted_prob: dec!(0.12),
            },
            TierThreshold {
                tier: ConfidenceTier::Medium,
                min_parlay_edge: dec!(0.06),
                min_adjusted_prob: dec!(0.06),
            },
        ])
    }
}

/// Partial generation settings; absent fields take defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub min_leg_edge: Option<Decimal>,
    pub min_parlay_edge: Option<Decimal>,
    pub min_combined_prob: Option<Decimal>,
    pub max_leg_count: Option<usize>,
    pub max_results: Option<usize>,
    pub parlay_type: Option<ParlayMode>,
    pub single_game_penalty: Option<Decimal>,
    pub multi_game_penalty: Option<Decimal>,
    pub multi_game_top_k: Option<usize>,
    pub max_combinations: Option<usize>,
    pub tiers: Option<Vec<TierThreshold>>,
}

/// Resolved, validated settings for one generation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    /// Legs below this edge never enter the search
    pub min_leg_edge: Decimal,
    /// Combinations below this edge are dropped
    pub min_parlay_edge: Decimal,
    /// Combinations below this adjusted probability are dropped
    pub min_combined_prob: Decimal,
    pub max_leg_count: usize,
    pub max_results: usize,
    pub parlay_type: ParlayMode,
    /// Per-extra-leg penalty base for legs sharing a match.
    /// Business calibration, not a measured correlation.
    pub single_game_penalty: Decimal,
    /// Per-extra-leg penalty base for legs on distinct matches
    pub multi_game_penalty: Decimal,
    /// Matches (by best single-leg edge) admitted to multi-game search
    pub multi_game_top_k: usize,
    /// Candidates examined per search mode before truncating
    pub max_combinations: usize,
    pub tiers: TierTable,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_leg_edge: dec!(0.02),
            min_parlay_edge: dec!(0.05),
            min_combined_prob: dec!(0.05),
            max_leg_count: 4,
            max_results: 20,
            parlay_type: ParlayMode::Both,
            single_game_penalty: dec!(0.90),
            multi_game_penalty: dec!(0.97),
            multi_game_top_k: 10,
            max_combinations: 100_000,
            tiers: TierTable::default(),
        }
    }
}

impl GenerationConfig {
    /// Merge options over defaults and validate
    pub fn resolve(options: &GenerationOptions) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            min_leg_edge: options.min_leg_edge.unwrap_or(defaults.min_leg_edge),
            min_parlay_edge: options.min_parlay_edge.unwrap_or(defaults.min_parlay_edge),
            min_combined_prob: options.min_combined_prob.unwrap_or(defaults.min_combined_prob),
            max_leg_count: options.max_leg_count.unwrap_or(defaults.max_leg_count),
            max_results: options.max_results.unwrap_or(defaults.max_results),
            parlay_type: options.parlay_type.unwrap_or(defaults.parlay_type),
            single_game_penalty: options
                .single_game_penalty
                .unwrap_or(defaults.single_game_penalty),
            multi_game_penalty: options
                .multi_game_penalty
                .unwrap_or(defaults.multi_game_penalty),
            multi_game_top_k: options.multi_game_top_k.unwrap_or(defaults.multi_game_top_k),
            max_combinations: options.max_combinations.unwrap_or(defaults.max_combinations),
            tiers: options
                .tiers
                .clone()
                .map(TierTable::new)
                .unwrap_or(defaults.tiers),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check ranges and cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_leg_count < 2 {
            return Err(ConfigError::MaxLegCountTooSmall(self.max_leg_count));
        }
        if self.max_results == 0 {
            return Err(ConfigError::ZeroMaxResults);
        }
        check_penalty("single_game_penalty", self.single_game_penalty)?;
        check_penalty("multi_game_penalty", self.multi_game_penalty)?;
        if self.min_combined_prob < Decimal::ZERO || self.min_combined_prob > Decimal::ONE {
            return Err(ConfigError::MinCombinedProbOutOfRange(self.min_combined_prob));
        }
        if self.multi_game_top_k < 2 {
            return Err(ConfigError::TopKTooSmall(self.multi_game_top_k));
        }
        if self.max_combinations == 0 {
            return Err(ConfigError::ZeroWorkBudget);
        }
        self.tiers.validate()
    }
}

fn check_penalty(name: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value <= Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::PenaltyOutOfRange { name, value });
    }
    Ok(())
}
