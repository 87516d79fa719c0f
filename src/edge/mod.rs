//! Edge scoring module
//!
//! Compares consensus probabilities with market-implied probabilities

mod scorer;
mod types;

pub use scorer::EdgeScorer;
pub use types::{leg_edge, ScoredCatalog, ScoredLeg, SkipReason, SkippedLeg};
