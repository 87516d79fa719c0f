//! Leg catalog sources
//!
//! The catalog is owned by the market-data collaborator. It decides which
//! matches are eligible (not yet kicked off) and hands the engine a flat
//! list of candidate legs.

use super::types::{InvalidLegError, LegRecord, MarketLeg};
use super::{CatalogError, LegCatalog};
use crate::telemetry::{self, CounterMetric};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One match and its quoted markets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    /// Scheduled kick-off; matches without one are treated as upcoming
    #[serde(default)]
    pub kickoff: Option<DateTime<Utc>>,
    /// Raw leg records, read one by one so a bad leg only costs itself
    #[serde(default)]
    pub legs: Vec<serde_json::Value>,
}

impl MatchRecord {
    fn parse_leg(&self, value: serde_json::Value) -> Result<MarketLeg, InvalidLegError> {
        let mut record: LegRecord = serde_json::from_value(value)
            .map_err(|e| InvalidLegError::Malformed(e.to_string()))?;
        if record.match_id.is_empty() {
            record.match_id = self.match_id.clone();
        }
        MarketLeg::try_from(record)
    }
}

/// Catalog document shared by the file and HTTP sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

impl CatalogDocument {
    /// Flatten into legs for matches that have not kicked off at `now`
    ///
    /// Records that cannot be turned into a leg are logged and skipped.
    pub fn into_eligible_legs(self, now: DateTime<Utc>) -> Vec<MarketLeg> {
        let mut legs = Vec::new();

        for mut record in self.matches {
            if let Some(kickoff) = record.kickoff {
                if kickoff <= now {
                    tracing::debug!(
                        match_id = %record.match_id,
                        %kickoff,
                        "Match already started, skipping"
                    );
                    continue;
                }
            }

            for value in std::mem::take(&mut record.legs) {
                let market_type = field(&value, "market_type");
                let subtype = field(&value, "market_subtype");
                match record.parse_leg(value) {
                    Ok(leg) => legs.push(leg),
                    Err(e) => {
                        telemetry::increment(CounterMetric::LegsRejected, 1);
                        tracing::warn!(
                            match_id = %record.match_id,
                            market_type = %market_type,
                            subtype = %subtype,
                            error = %e,
                            "Skipping malformed catalog leg"
                        );
                    }
                }
            }
        }

        legs
    }
}

fn field(value: &serde_json::Value, name: &str) -> String {
    value
        .get(name)
        .and_then(serde_json::Value::as_str)
        .unwrap_or("?")
        .to_string()
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticLegCatalog {
    legs: Vec<MarketLeg>,
}

impl StaticLegCatalog {
    pub fn new(legs: Vec<MarketLeg>) -> Self {
        Self { legs }
    }
}

#[async_trait]
impl LegCatalog for StaticLegCatalog {
    async fn fetch_legs(&self) -> Result<Vec<MarketLeg>, CatalogError> {
        Ok(self.legs.clone())
    }
}

/// Catalog read from a JSON document on disk
#[derive(Debug, Clone)]
pub struct FileLegCatalog {
    path: PathBuf,
}

impl FileLegCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl LegCatalog for FileLegCatalog {
    async fn fetch_legs(&self) -> Result<Vec<MarketLeg>, CatalogError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;
        let document: CatalogDocument = serde_json::from_str(&content)?;

        tracing::debug!(
            path = ?self.path,
            matches = document.matches.len(),
            "Loaded catalog document"
        );

        Ok(document.into_eligible_legs(Utc::now()))
    }
}
