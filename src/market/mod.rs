//! Market data module
//!
//! Leg types and the catalog sources that supply candidate legs per match

mod catalog;
mod http;
mod types;

pub use catalog::{CatalogDocument, FileLegCatalog, MatchRecord, StaticLegCatalog};
pub use http::{HttpCatalogConfig, HttpLegCatalog};
pub use types::{
    BookOdds, HomeAway, InvalidLegError, LegKey, LegRecord, Market, MarketLeg, MarketType,
    MatchId, OverUnder, ThreeWay, YesNo,
};

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Catalog document is not valid JSON
    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),
    /// Transport failure talking to the catalog service
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Catalog service answered with an error status
    #[error("catalog service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Source of candidate legs for eligible matches
#[async_trait]
pub trait LegCatalog: Send + Sync {
    /// Snapshot of legs for every match still open for betting
    async fn fetch_legs(&self) -> Result<Vec<MarketLeg>, CatalogError>;
}
