//! Parquet export tests

use parlay_edge::data::{ParlaySink, ParquetParlayExporter, ParquetReader};
use parlay_edge::market::FileLegCatalog;
use parlay_edge::parlay::{GenerationOptions, ParlayEngine};
use std::collections::HashSet;
use tempfile::TempDir;

#[tokio::test]
async fn test_export_ranked_parlays() {
    let engine = ParlayEngine::new(FileLegCatalog::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/catalog.example.json"
    )));
    let parlays = engine
        .generate_best_parlays(&GenerationOptions::default())
        .await
        .unwrap();
    assert!(!parlays.is_empty());

    let temp_dir = TempDir::new().unwrap();
    let exporter = ParquetParlayExporter::new(temp_dir.path());
    let ids = exporter.store(&parlays).await.unwrap();

    assert_eq!(ids.len(), parlays.len());
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());

    let path = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let records = ParquetReader::new(path).read_parlay_legs().unwrap();

    let total_legs: usize = parlays.iter().map(|p| p.leg_count).sum();
    assert_eq!(records.len(), total_legs);

    for (parlay, id) in parlays.iter().zip(&ids) {
        let rows: Vec<_> = records.iter().filter(|r| r.parlay_id == *id).collect();
        assert_eq!(rows.len(), parlay.leg_count);
        assert!(rows.iter().all(|r| r.parlay_edge == parlay.parlay_edge));
    }
}
