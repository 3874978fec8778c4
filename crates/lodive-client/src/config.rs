//! Client configuration
//!
//! Deployment settings (network, program id, endpoints, fee) are read from a
//! TOML file with per-field defaults, then overridden by `LODIVE_*`
//! environment variables.
//!
//! ```toml
//! network = "mainnetbeta"
//! program_id = "lodive_v0_1_1.aleo"
//! fee = 50000
//! ```

use std::path::Path;

use lodive_core::Network;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Program deployed for the marketplace
pub const DEFAULT_PROGRAM_ID: &str = "lodive_v0_1_0.aleo";

/// Fee attached to every transaction, in microcredits
pub const DEFAULT_FEE: u64 = 42_150;

/// Explorer RPC endpoint for single-key mapping lookups
pub const DEFAULT_RPC_URL: &str = "https://api.explorer.provable.com/v1";

/// Request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for talking to the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Network to query and submit to
    pub network: Network,
    /// Deployed program id
    pub program_id: String,
    /// Indexer base URL; the network's hosted indexer when unset
    pub indexer_url: Option<String>,
    /// RPC base URL
    pub rpc_url: String,
    /// Transaction fee in microcredits
    pub fee: u64,
    /// Pay the fee from a private record
    pub fee_private: bool,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            program_id: DEFAULT_PROGRAM_ID.to_string(),
            indexer_url: None,
            rpc_url: DEFAULT_RPC_URL.to_string(),
            fee: DEFAULT_FEE,
            fee_private: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document; missing fields take their defaults
    pub fn from_toml_str(s: &str) -> ClientResult<Self> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Apply `LODIVE_*` overrides from the process environment
    pub fn with_env_overrides(self) -> ClientResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        if let Some(network) = lookup("LODIVE_NETWORK") {
            self.network = network.parse()?;
        }
        if let Some(program_id) = lookup("LODIVE_PROGRAM_ID") {
            self.program_id = program_id;
        }
        if let Some(indexer_url) = lookup("LODIVE_INDEXER_URL") {
            self.indexer_url = Some(indexer_url);
        }
        if let Some(rpc_url) = lookup("LODIVE_RPC_URL") {
            self.rpc_url = rpc_url;
        }
        if let Some(fee) = lookup("LODIVE_FEE") {
            self.fee = fee
                .trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("LODIVE_FEE is not a number: {}", fee)))?;
        }
        Ok(self)
    }

    /// Set the network
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Set the program id
    pub fn with_program_id(mut self, program_id: impl Into<String>) -> Self {
        self.program_id = program_id.into();
        self
    }

    /// Point the indexer client at a specific base URL
    pub fn with_indexer_url(mut self, url: impl Into<String>) -> Self {
        self.indexer_url = Some(url.into());
        self
    }

    /// Point the RPC client at a specific base URL
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    /// Effective indexer base URL
    pub fn indexer_base(&self) -> &str {
        self.indexer_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_indexer_url())
    }
}
