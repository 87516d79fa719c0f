//! Parquet export of ranked parlays
//!
//! One row per leg; parlay-level figures are repeated on every row of the
//! same parlay so each file is a flat table.

use super::ParlaySink;
use crate::parlay::ParlayCombination;
use arrow::array::{Array, ArrayRef, StringArray, TimestampMicrosecondArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_decimal::Decimal;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Parlay leg schema fields
pub fn parlay_leg_schema() -> Schema {
    Schema::new(vec![
        Field::new(
            "exported_at",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        ),
        Field::new("parlay_id", DataType::Utf8, false),
        Field::new("rank", DataType::UInt32, false),
        Field::new("parlay_type", DataType::Utf8, false),
        Field::new("confidence_tier", DataType::Utf8, false),
        Field::new("leg_index", DataType::UInt32, false),
        Field::new("match_id", DataType::Utf8, false),
        Field::new("market_type", DataType::Utf8, false),
        Field::new("market_subtype", DataType::Utf8, false),
        Field::new("line", DataType::Utf8, true),
        // Decimals as strings to keep full precision
        Field::new("consensus_prob", DataType::Utf8, false),
        Field::new("decimal_odds", DataType::Utf8, false),
        Field::new("leg_edge", DataType::Utf8, false),
        Field::new("adjusted_prob", DataType::Utf8, false),
        Field::new("combined_odds", DataType::Utf8, false),
        Field::new("parlay_edge", DataType::Utf8, false),
    ])
}

/// Flat row for one leg of an exported parlay
#[derive(Debug, Clone, PartialEq)]
pub struct ParlayLegRecord {
    pub exported_at: DateTime<Utc>,
    pub parlay_id: Uuid,
    /// 1-based position in the ranked list
    pub rank: u32,
    pub parlay_type: String,
    pub confidence_tier: String,
    pub leg_index: u32,
    pub match_id: String,
    pub market_type: String,
    pub market_subtype: String,
    pub line: Option<Decimal>,
    pub consensus_prob: Decimal,
    pub decimal_odds: Decimal,
    pub leg_edge: Decimal,
    pub adjusted_prob: Decimal,
    pub combined_odds: Decimal,
    pub parlay_edge: Decimal,
}

impl ParlayLegRecord {
    /// Rows for one ranked parlay
    pub fn from_combination(
        parlay_id: Uuid,
        rank: u32,
        exported_at: DateTime<Utc>,
        combo: &ParlayCombination,
    ) -> Vec<Self> {
        combo
            .legs
            .iter()
            .zip(0u32..)
            .map(|(leg, leg_index)| Self {
                exported_at,
                parlay_id,
                rank,
                parlay_type: combo.parlay_type.as_str().to_string(),
                confidence_tier: combo.confidence_tier.as_str().to_string(),
                leg_index,
                match_id: leg.match_id().to_string(),
                market_type: leg.leg.market_type().as_str().to_string(),
                market_subtype: leg.leg.market.subtype().to_string(),
                line: leg.leg.market.line(),
                consensus_prob: leg.consensus_prob(),
                decimal_odds: leg.decimal_odds(),
                leg_edge: leg.edge,
                adjusted_prob: combo.adjusted_prob,
                combined_odds: combo.combined_odds,
                parlay_edge: combo.parlay_edge,
            })
            .collect()
    }
}

/// Writes ranked parlays to timestamped Parquet files
///
/// Every call assigns fresh identifiers; this is an export, not an upsert
/// store, so repeated runs produce repeated rows.
#[derive(Debug, Clone)]
pub struct ParquetParlayExporter {
    output_dir: PathBuf,
}

impl ParquetParlayExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Ensure output directory exists
    pub fn ensure_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// File path for export `export_id` taken at `timestamp`
    pub fn file_path(&self, timestamp: DateTime<Utc>, export_id: Uuid) -> PathBuf {
        let filename = format!(
            "parlays_{}_{}.parquet",
            timestamp.format("%Y%m%d_%H%M%S"),
            export_id.simple()
        );
        self.output_dir.join(filename)
    }

    /// Assign identifiers and flatten parlays into rows
    pub fn to_records(
        parlays: &[ParlayCombination],
        exported_at: DateTime<Utc>,
    ) -> (Vec<Uuid>, Vec<ParlayLegRecord>) {
        let mut ids = Vec::with_capacity(parlays.len());
        let mut records = Vec::new();

        for (combo, rank) in parlays.iter().zip(1u32..) {
            let id = Uuid::new_v4();
            ids.push(id);
            records.extend(ParlayLegRecord::from_combination(id, rank, exported_at, combo));
        }

        (ids, records)
    }

    /// Write leg rows to a Parquet file
    pub fn write_records(&self, path: &Path, records: &[ParlayLegRecord]) -> anyhow::Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        self.ensure_dir()?;

        let schema = Arc::new(parlay_leg_schema());
        // Never replace an earlier export
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        let exported_at: Vec<i64> = records
            .iter()
            .map(|r| r.exported_at.timestamp_micros())
            .collect();
        let text = |f: fn(&ParlayLegRecord) -> String| -> ArrayRef {
            Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
        };
        let lines: Vec<Option<String>> = records
            .iter()
            .map(|r| r.line.map(|l| l.to_string()))
            .collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(TimestampMicrosecondArray::from(exported_at).with_timezone("UTC")),
            text(|r| r.parlay_id.to_string()),
            Arc::new(UInt32Array::from(records.iter().map(|r| r.rank).collect::<Vec<_>>())),
            text(|r| r.parlay_type.clone()),
            text(|r| r.confidence_tier.clone()),
            Arc::new(UInt32Array::from(
                records.iter().map(|r| r.leg_index).collect::<Vec<_>>(),
            )),
            text(|r| r.match_id.clone()),
            text(|r| r.market_type.clone()),
            text(|r| r.market_subtype.clone()),
            Arc::new(StringArray::from(lines)),
            text(|r| r.consensus_prob.to_string()),
            text(|r| r.decimal_odds.to_string()),
            text(|r| r.leg_edge.to_string()),
            text(|r| r.adjusted_prob.to_string()),
            text(|r| r.combined_odds.to_string()),
            text(|r| r.parlay_edge.to_string()),
        ];

        let batch = RecordBatch::try_new(schema, columns)?;

        writer.write(&batch)?;
        writer.close()?;

        tracing::debug!(path = ?path, count = records.len(), "Wrote parlay legs to Parquet");

        Ok(())
    }

    /// Export parlays to a new file, returning the path and assigned ids
    pub fn export(&self, parlays: &[ParlayCombination]) -> anyhow::Result<(PathBuf, Vec<Uuid>)> {
        let now = Utc::now();
        let path = self.file_path(now, Uuid::new_v4());
        let (ids, records) = Self::to_records(parlays, now);
        self.write_records(&path, &records)?;

        tracing::info!(path = ?path, parlays = ids.len(), rows = records.len(), "Exported parlays");

        Ok((path, ids))
    }
}

#[async_trait]
impl ParlaySink for ParquetParlayExporter {
    async fn store(&self, parlays: &[ParlayCombination]) -> anyhow::Result<Vec<Uuid>> {
        let exporter = self.clone();
        let parlays = parlays.to_vec();
        let (_, ids) = tokio::task::spawn_blocking(move || exporter.export(&parlays)).await??;
        Ok(ids)
    }
}

/// Reader for exported parlay files
pub struct ParquetReader {
    path: PathBuf,
}

impl ParquetReader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read leg rows back from a Parquet file
    pub fn read_parlay_legs(&self) -> anyhow::Result<Vec<ParlayLegRecord>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = File::open(&self.path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let reader = builder.build()?;

        let mut records = Vec::new();

        for batch_result in reader {
            let batch = batch_result?;

            let exported_at = column::<TimestampMicrosecondArray>(&batch, 0, "exported_at")?;
            let parlay_ids = column::<StringArray>(&batch, 1, "parlay_id")?;
            let ranks = column::<UInt32Array>(&batch, 2, "rank")?;
            let parlay_types = column::<StringArray>(&batch, 3, "parlay_type")?;
            let tiers = column::<StringArray>(&batch, 4, "confidence_tier")?;
            let leg_indices = column::<UInt32Array>(&batch, 5, "leg_index")?;
            let match_ids = column::<StringArray>(&batch, 6, "match_id")?;
            let market_types = column::<StringArray>(&batch, 7, "market_type")?;
            let subtypes = column::<StringArray>(&batch, 8, "market_subtype")?;
            let lines = column::<StringArray>(&batch, 9, "line")?;
            let probs = column::<StringArray>(&batch, 10, "consensus_prob")?;
            let odds = column::<StringArray>(&batch, 11, "decimal_odds")?;
            let leg_edges = column::<StringArray>(&batch, 12, "leg_edge")?;
            let adjusted = column::<StringArray>(&batch, 13, "adjusted_prob")?;
            let combined_odds = column::<StringArray>(&batch, 14, "combined_odds")?;
            let parlay_edges = column::<StringArray>(&batch, 15, "parlay_edge")?;

            for i in 0..batch.num_rows() {
                let line = if lines.is_null(i) {
                    None
                } else {
                    Some(Decimal::from_str(lines.value(i))?)
                };

                records.push(ParlayLegRecord {
                    exported_at: DateTime::from_timestamp_micros(exported_at.value(i))
                        .ok_or_else(|| anyhow::anyhow!("Invalid exported_at"))?,
                    parlay_id: Uuid::parse_str(parlay_ids.value(i))?,
                    rank: ranks.value(i),
                    parlay_type: parlay_types.value(i).to_string(),
                    confidence_tier: tiers.value(i).to_string(),
                    leg_index: leg_indices.value(i),
                    match_id: match_ids.value(i).to_string(),
                    market_type: market_types.value(i).to_string(),
                    market_subtype: subtypes.value(i).to_string(),
                    line,
                    consensus_prob: Decimal::from_str(probs.value(i))?,
                    decimal_odds: Decimal::from_str(odds.value(i))?,
                    leg_edge: Decimal::from_str(leg_edges.value(i))?,
                    adjusted_prob: Decimal::from_str(adjusted.value(i))?,
                    combined_odds: Decimal::from_str(combined_odds.value(i))?,
                    parlay_edge: Decimal::from_str(parlay_edges.value(i))?,
                });
            }
        }

        Ok(records)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

fn column<'a, T: 'static>(
    batch: &'a RecordBatch,
    index: usize,
    name: &str,
) -> anyhow::Result<&'a T> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| anyhow::anyhow!("Invalid {} column", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::ScoredLeg;
    use crate::market::{Market, MarketLeg, OverUnder, ThreeWay};
    use crate::parlay::{CorrelationModel, ParlayType, TierTable};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn sample_parlay() -> ParlayCombination {
        let legs = vec![
            ScoredLeg::score(MarketLeg::new(
                "M1",
                Market::MatchResult(ThreeWay::Home),
                dec!(0.55),
                dec!(2.00),
            ))
            .unwrap(),
            ScoredLeg::score(MarketLeg::new(
                "M1",
                Market::Totals {
                    side: OverUnder::Over,
                    line: dec!(2.5),
                },
                dec!(0.54),
                dec!(2.00),
            ))
            .unwrap(),
        ];
        ParlayCombination::build(
            legs,
            ParlayType::SingleGame,
            &CorrelationModel::new(dec!(0.90), dec!(0.97)),
            &TierTable::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_parlay_leg_schema() {
        let schema = parlay_leg_schema();
        assert_eq!(schema.fields().len(), 16);
        assert_eq!(schema.field(0).name(), "exported_at");
        assert_eq!(schema.field(1).name(), "parlay_id");
        assert!(schema.field(9).is_nullable());
    }

    #[test]
    fn test_file_path() {
        let exporter = ParquetParlayExporter::new("/data");
        let timestamp = DateTime::parse_from_rfc3339("2025-01-04T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let export_id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();

        assert_eq!(
            exporter.file_path(timestamp, export_id),
            PathBuf::from("/data/parlays_20250104_123000_67e5504410b1426f9247bb680e5fe0c8.parquet")
        );
    }

    #[test]
    fn test_one_row_per_leg() {
        let parlays = vec![sample_parlay(), sample_parlay()];
        let (ids, records) = ParquetParlayExporter::to_records(&parlays, Utc::now());

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].rank, 1);
        assert_eq!(records[2].rank, 2);
        assert_eq!(records[1].leg_index, 1);
        assert_eq!(records[1].line, Some(dec!(2.5)));
        assert_eq!(records[0].line, None);
    }

    #[test]
    fn test_export_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = ParquetParlayExporter::new(temp_dir.path());
        let parlay = sample_parlay();

        let (path, ids) = exporter.export(std::slice::from_ref(&parlay)).unwrap();
        let records = ParquetReader::new(path).read_parlay_legs().unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.parlay_id == ids[0]));
        assert_eq!(records[0].match_id, "M1");
        assert_eq!(records[0].market_type, "1X2");
        assert_eq!(records[0].market_subtype, "HOME");
        assert_eq!(records[1].market_type, "TOTALS");
        assert_eq!(records[1].line, Some(dec!(2.5)));
        assert_eq!(records[0].parlay_edge, parlay.parlay_edge);
        assert_eq!(records[0].confidence_tier, "medium");
        assert_eq!(records[0].parlay_type, "single_game");
    }

    #[test]
    fn test_export_empty_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = ParquetParlayExporter::new(temp_dir.path());

        let (path, ids) = exporter.export(&[]).unwrap();
        assert!(ids.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_sink_assigns_ids() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = ParquetParlayExporter::new(temp_dir.path().join("out"));

        let ids = exporter.store(&[sample_parlay()]).await.unwrap();
        assert_eq!(ids.len(), 1);
        assert!(exporter.output_dir().exists());
    }

    #[tokio::test]
    async fn test_back_to_back_exports_keep_both() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = ParquetParlayExporter::new(temp_dir.path());

        let first = exporter.store(&[sample_parlay()]).await.unwrap();
        let second = exporter.store(&[sample_parlay()]).await.unwrap();

        let mut stored = Vec::new();
        for entry in fs::read_dir(temp_dir.path()).unwrap() {
            let path = entry.unwrap().path();
            let records = ParquetReader::new(path).read_parlay_legs().unwrap();
            stored.extend(records.into_iter().map(|r| r.parlay_id));
        }

        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
        assert!(stored.contains(&first[0]));
        assert!(stored.contains(&second[0]));
    }
}
