//! Parlay construction module
//!
//! Correlation-adjusted combination search over edge-scored legs, followed
//! by threshold filtering, dedup and ranking.

mod config;
mod correlation;
mod engine;
mod ranking;
mod search;
mod types;

pub use config::{GenerationConfig, GenerationOptions, ParlayMode, TierTable, TierThreshold};
pub use correlation::CorrelationModel;
pub use engine::{generate_from_legs, EngineError, GenerationReport, ParlayEngine};
pub use ranking::{rank_order, FilterResult, ParlayRanker, RejectReason};
pub use search::{CombinationSearch, Combinations, InsufficientData, SearchReport};
pub use types::{ConfidenceTier, ParlayCombination, ParlayType};
