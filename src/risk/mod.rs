//! Bankroll management module
//!
//! Kelly stake sizing and closing-line-value diagnostics for single legs

mod clv;
mod kelly;
mod types;

pub use clv::{closing_line_value, ClvReport, OutcomeClv, ThreeWayOdds, ThreeWayProbs};
pub use kelly::{compute_betting_intelligence, KellyCalculator};
pub use types::{
    BettingIntelligence, KellyConfig, KellyOptions, Recommendation, StakeRecommendation,
    UnavailableReason,
};
