//! HTTP catalog client
//!
//! Fetches the catalog document from the market-data service. The service
//! serves the same JSON shape as the file catalog.

use super::catalog::CatalogDocument;
use super::types::MarketLeg;
use super::{CatalogError, LegCatalog};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;

/// Configuration for the HTTP catalog
#[derive(Debug, Clone)]
pub struct HttpCatalogConfig {
    /// Endpoint returning a catalog document
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl HttpCatalogConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Catalog fetched over HTTP
pub struct HttpLegCatalog {
    config: HttpCatalogConfig,
    client: Client,
}

impl HttpLegCatalog {
    /// Create a new client with custom configuration
    pub fn with_config(config: HttpCatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl LegCatalog for HttpLegCatalog {
    async fn fetch_legs(&self) -> Result<Vec<MarketLeg>, CatalogError> {
        tracing::debug!(url = %self.config.url, "Fetching leg catalog");

        let response = self.client.get(&self.config.url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status { status, body });
        }

        let document: CatalogDocument = response.json().await?;

        tracing::info!(
            matches = document.matches.len(),
            "Fetched leg catalog"
        );

        Ok(document.into_eligible_legs(Utc::now()))
    }
}
