//! Single-key mapping lookups against the network RPC

use std::time::Duration;

use async_trait::async_trait;
use lodive_core::{Balance, Network, WalletIdentity};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Program holding public credit balances
pub const CREDITS_PROGRAM: &str = "credits.aleo";

/// Mapping from address to public balance
pub const ACCOUNT_MAPPING: &str = "account";

#[async_trait]
pub trait NetworkRpc: Send + Sync {
    /// Value stored under `key`, or `None` when the key is absent
    async fn get_program_mapping_value(
        &self,
        program_id: &str,
        mapping: &str,
        key: &str,
    ) -> ClientResult<Option<String>>;

    /// Public credit balance of `wallet`; an account never funded has zero
    async fn fetch_balance(&self, wallet: &WalletIdentity) -> ClientResult<Balance> {
        let value = self
            .get_program_mapping_value(CREDITS_PROGRAM, ACCOUNT_MAPPING, wallet.as_str())
            .await?;
        match value {
            Some(raw) => Ok(Balance::parse(&raw)?),
            None => Ok(Balance::ZERO),
        }
    }
}

/// HTTP client for the explorer RPC
#[derive(Debug, Clone)]
pub struct RpcClient {
    base_url: String,
    network: Network,
    client: Client,
}

impl RpcClient {
    pub fn new(base_url: impl Into<String>, network: Network, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            network,
            client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(
            config.rpc_url.clone(),
            config.network,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn value_url(&self, program_id: &str, mapping: &str, key: &str) -> String {
        format!(
            "{}/{}/program/{}/mapping/{}/{}",
            self.base_url,
            self.network.path_segment(),
            program_id,
            mapping,
            key
        )
    }
}

#[async_trait]
impl NetworkRpc for RpcClient {
    #[instrument(skip(self), fields(network = %self.network))]
    async fn get_program_mapping_value(
        &self,
        program_id: &str,
        mapping: &str,
        key: &str,
    ) -> ClientResult<Option<String>> {
        let url = self.value_url(program_id, mapping, key);
        debug!(%url, "Fetching mapping value");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Rpc { status, message });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
