//! parlay-edge: Parlay combination and edge engine for football markets
//!
//! This library provides the core components for:
//! - Leg catalogs from files or HTTP endpoints
//! - Per-leg edge scoring against consensus probabilities
//! - Correlation-adjusted single-game and multi-game parlay search
//! - Ranking, dedup and confidence tiers
//! - Kelly stake sizing and closing line value
//! - Parquet export of ranked parlays
//! - Logging and metrics

pub mod cli;
pub mod config;
pub mod data;
pub mod edge;
pub mod market;
pub mod parlay;
pub mod risk;
pub mod telemetry;
