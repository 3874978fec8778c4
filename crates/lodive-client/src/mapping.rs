//! Program mapping listing via the indexer

use std::time::Duration;

use async_trait::async_trait;
use lodive_core::MappingEntry;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Name of the events mapping
pub const EVENTS_MAPPING: &str = "events";

/// Name of the venues mapping
pub const VENUES_MAPPING: &str = "venues";

/// Source of whole-mapping listings
#[async_trait]
pub trait MappingSource: Send + Sync {
    /// Every key/value pair currently stored in `mapping` of `program_id`
    async fn fetch_mapping(
        &self,
        program_id: &str,
        mapping: &str,
    ) -> ClientResult<Vec<MappingEntry>>;
}

#[derive(Debug, Deserialize)]
struct ListMappingResponse {
    result: Vec<MappingEntry>,
}

/// HTTP client for the indexer's mapping listing endpoint
#[derive(Debug, Clone)]
pub struct IndexerClient {
    base_url: String,
    client: Client,
}

impl IndexerClient {
    /// Create a client against `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a client for the configured network or indexer override
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(config.indexer_base(), Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Listing URL for a mapping
    pub fn mapping_url(&self, program_id: &str, mapping: &str) -> String {
        format!(
            "{}/v2/mapping/list_program_mapping_values/{}/{}",
            self.base_url, program_id, mapping
        )
    }

    async fn handle_response(&self, response: reqwest::Response) -> ClientResult<Vec<MappingEntry>> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Indexer { status, message });
        }

        let body = response.bytes().await?;
        let parsed: ListMappingResponse = serde_json::from_slice(&body)?;
        Ok(parsed.result)
    }
}

#[async_trait]
impl MappingSource for IndexerClient {
    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn fetch_mapping(
        &self,
        program_id: &str,
        mapping: &str,
    ) -> ClientResult<Vec<MappingEntry>> {
        let url = self.mapping_url(program_id, mapping);
        debug!(%url, "Fetching mapping");

        let response = self.client.get(&url).send().await?;
        let entries = self.handle_response(response).await?;

        debug!(count = entries.len(), "Fetched mapping entries");
        Ok(entries)
    }
}
