//! Wallet identity and network selection
//!
//! A [`WalletIdentity`] is the public address reported by the connected
//! wallet. It is kept as an opaque string here; only the hasher in
//! `lodive-crypto` looks inside it.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The connected wallet's public address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletIdentity(String);

impl WalletIdentity {
    /// Wrap an address string as reported by the wallet
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The raw address string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for logging (`aleo1abc…wxyz`)
    pub fn short_id(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 14 {
            return self.0.clone();
        }
        let head: String = chars[..9].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl Display for WalletIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletIdentity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Chain network the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Public test network
    #[default]
    #[serde(alias = "testnet")]
    TestnetBeta,
    /// Production network
    #[serde(alias = "mainnet")]
    MainnetBeta,
}

impl Network {
    /// Path segment used by explorer and RPC endpoints
    pub fn path_segment(&self) -> &'static str {
        match self {
            Network::TestnetBeta => "testnet",
            Network::MainnetBeta => "mainnet",
        }
    }

    /// Chain identifier expected by wallet adapters
    pub fn chain_id(&self) -> &'static str {
        match self {
            Network::TestnetBeta => "testnetbeta",
            Network::MainnetBeta => "mainnetbeta",
        }
    }

    /// Base URL of the hosted mapping indexer for this network
    pub fn default_indexer_url(&self) -> &'static str {
        match self {
            Network::TestnetBeta => "https://api.testnet.aleoscan.io",
            Network::MainnetBeta => "https://api.aleoscan.io",
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.chain_id())
    }
}

impl FromStr for Network {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" | "testnetbeta" => Ok(Network::TestnetBeta),
            "mainnet" | "mainnetbeta" => Ok(Network::MainnetBeta),
            other => Err(CoreError::InvalidNetwork(other.to_string())),
        }
    }
}
