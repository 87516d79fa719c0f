//! Configuration types for parlay-edge

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::parlay::GenerationOptions;
use crate::risk::KellyOptions;

/// Caller-side configuration mistakes
///
/// These are programming errors rather than data conditions, so they are
/// surfaced immediately instead of being absorbed like bad legs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Parlays need at least two legs
    #[error("max_leg_count must be at least 2, got {0}")]
    MaxLegCountTooSmall(usize),
    /// Nothing could ever be returned
    #[error("max_results must be at least 1")]
    ZeroMaxResults,
    /// Correlation penalty base outside (0, 1]
    #[error("{name} must be in (0, 1], got {value}")]
    PenaltyOutOfRange { name: &'static str, value: Decimal },
    /// Probability floor outside [0, 1]
    #[error("min_combined_prob must be in [0, 1], got {0}")]
    MinCombinedProbOutOfRange(Decimal),
    /// Multi-game search needs at least two candidate matches
    #[error("multi_game_top_k must be at least 2, got {0}")]
    TopKTooSmall(usize),
    /// Work cap of zero would never evaluate anything
    #[error("max_combinations must be at least 1")]
    ZeroWorkBudget,
    /// Tier threshold with a negative probability floor
    #[error("confidence tier {tier} has negative min_adjusted_prob {value}")]
    NegativeTierProbability { tier: String, value: Decimal },
    /// Kelly multiplier outside (0, 1]
    #[error("kelly_fraction must be in (0, 1], got {0}")]
    KellyFractionOutOfRange(Decimal),
    /// Stake ceiling outside (0, 1]
    #[error("max_stake_pct must be in (0, 1], got {0}")]
    MaxStakeOutOfRange(Decimal),
    /// Recommendation thresholds out of order
    #[error("strong_edge ({strong}) must not be below value_edge ({value})")]
    RecommendationThresholdsInverted { strong: Decimal, value: Decimal },
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: GenerationOptions,
    #[serde(default)]
    pub kelly: KellyOptions,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Where the leg catalog is read from
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    #[default]
    File,
    Http,
}

/// Leg catalog configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSource,
    /// JSON catalog document for the file source
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// Endpoint serving the same document for the http source
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.json")
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::File,
            path: default_catalog_path(),
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus scrape port; metrics stay in-process when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parlay::ParlayMode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [engine]
            min_leg_edge = 0.03
            max_leg_count = 3
            parlay_type = "multi_game"

            [kelly]
            kelly_fraction = 0.25
            max_stake_pct = 0.02

            [catalog]
            source = "http"
            url = "http://localhost:8080/catalog"

            [telemetry]
            log_level = "debug"
            log_format = "json"
            metrics_port = 9090
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.min_leg_edge, Some(dec!(0.03)));
        assert_eq!(config.engine.max_leg_count, Some(3));
        assert_eq!(config.engine.parlay_type, Some(ParlayMode::MultiGame));
        assert_eq!(config.kelly.kelly_fraction, Some(dec!(0.25)));
        assert_eq!(config.catalog.source, CatalogSource::Http);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.telemetry.metrics_port, Some(9090));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.engine.min_leg_edge.is_none());
        assert_eq!(config.catalog.source, CatalogSource::File);
        assert_eq!(config.catalog.path, PathBuf::from("catalog.json"));
        assert_eq!(config.catalog.timeout_secs, 10);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.telemetry.metrics_port.is_none());
    }

    #[test]
    fn test_unknown_parlay_type_rejected() {
        let toml = r#"
            [engine]
            parlay_type = "round_robin"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::MaxLegCountTooSmall(1);
        assert_eq!(err.to_string(), "max_leg_count must be at least 2, got 1");

        let err = ConfigError::PenaltyOutOfRange {
            name: "single_game_penalty",
            value: dec!(1.2),
        };
        assert!(err.to_string().contains("single_game_penalty"));
    }
}
