//! Output module
//!
//! Hands ranked parlays to downstream consumers

mod parquet;

pub use self::parquet::{parlay_leg_schema, ParlayLegRecord, ParquetParlayExporter, ParquetReader};

use crate::parlay::ParlayCombination;
use async_trait::async_trait;
use uuid::Uuid;

/// Consumer of ranked parlays
///
/// Implementations assign identifiers and own any dedup against
/// previously stored combinations.
#[async_trait]
pub trait ParlaySink: Send + Sync {
    /// Store parlays, returning one identifier per combination in order
    async fn store(&self, parlays: &[ParlayCombination]) -> anyhow::Result<Vec<Uuid>>;
}
