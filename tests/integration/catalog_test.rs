//! Integration tests for leg catalogs

use chrono::{Duration, Utc};
use parlay_edge::market::{FileLegCatalog, LegCatalog, Market, OverUnder};
use parlay_edge::parlay::{GenerationOptions, ParlayEngine};
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

fn example_catalog() -> FileLegCatalog {
    FileLegCatalog::new(concat!(env!("CARGO_MANIFEST_DIR"), "/catalog.example.json"))
}

#[tokio::test]
async fn test_example_catalog_loads() {
    let legs = example_catalog().fetch_legs().await.unwrap();
    assert_eq!(legs.len(), 9);

    let over = legs
        .iter()
        .find(|l| {
            l.market
                == Market::Totals {
                    side: OverUnder::Over,
                    line: dec!(2.5),
                }
        })
        .unwrap();
    // Best book price when no headline price is given
    assert_eq!(over.decimal_odds, dec!(2.00));
    assert_eq!(over.match_id.as_str(), "ars-che-2026-10-18");
}

#[tokio::test]
async fn test_started_matches_and_bad_legs_skipped() {
    let past = (Utc::now() - Duration::hours(2)).to_rfc3339();
    let future = (Utc::now() + Duration::days(1)).to_rfc3339();
    let document = format!(
        r#"{{
            "matches": [
                {{
                    "match_id": "LIVE",
                    "kickoff": "{past}",
                    "legs": [
                        {{ "market_type": "1X2", "market_subtype": "HOME", "consensus_prob": 0.55, "decimal_odds": 2.0 }}
                    ]
                }},
                {{
                    "match_id": "NEXT",
                    "kickoff": "{future}",
                    "legs": [
                        {{ "market_type": "1X2", "market_subtype": "HOME", "consensus_prob": 0.55, "decimal_odds": 2.0 }},
                        {{ "market_type": "TOTALS", "market_subtype": "HOME", "line": 2.5, "consensus_prob": 0.5, "decimal_odds": 2.0 }},
                        {{ "market_type": "BTTS", "market_subtype": "YES", "consensus_prob": 0.6, "decimal_odds": 1.8 }}
                    ]
                }}
            ]
        }}"#
    );
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(document.as_bytes()).unwrap();

    let legs = FileLegCatalog::new(file.path()).fetch_legs().await.unwrap();
    assert_eq!(legs.len(), 2);
    assert!(legs.iter().all(|l| l.match_id.as_str() == "NEXT"));
}

#[tokio::test]
async fn test_engine_over_example_catalog() {
    let engine = ParlayEngine::new(example_catalog());
    let report = engine
        .generate_report(&GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(report.legs_received, 9);
    assert!(!report.combinations.is_empty());
    assert!(!report.truncated);
}
