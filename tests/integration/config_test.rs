//! Configuration file tests

use parlay_edge::config::{CatalogSource, Config, LogFormat};
use parlay_edge::parlay::GenerationConfig;
use parlay_edge::risk::KellyConfig;

#[test]
fn test_example_config_matches_defaults() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example")).unwrap();

    assert_eq!(
        GenerationConfig::resolve(&config.engine).unwrap(),
        GenerationConfig::default()
    );
    assert_eq!(
        KellyConfig::resolve(&config.kelly).unwrap(),
        KellyConfig::default()
    );
    assert_eq!(config.catalog.source, CatalogSource::File);
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    assert!(config.telemetry.metrics_port.is_none());
}

#[test]
fn test_missing_config_file_errors() {
    assert!(Config::load("/nonexistent/config.toml").is_err());
}
