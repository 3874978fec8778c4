//! Error types for lodive-client

use lodive_core::CoreError;
use lodive_crypto::CryptoError;
use thiserror::Error;

use crate::transaction::WalletError;

/// Errors that can occur in the client layer
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Indexer returned a non-success status
    #[error("Indexer error {status}: {message}")]
    Indexer { status: u16, message: String },

    /// Network RPC returned a non-success status
    #[error("RPC error {status}: {message}")]
    Rpc { status: u16, message: String },

    /// Chain data could not be interpreted
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Identity could not be hashed
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// A transaction input has the wrong type
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Commission outside 0..=100
    #[error("Commission must be between 0 and 100, got {0}")]
    InvalidCommission(u8),

    /// Transaction has no function name
    #[error("Transaction function name is required")]
    MissingFunction,

    /// Operation needs a connected wallet
    #[error("No wallet connected")]
    NoWallet,

    /// The wallet did not accept the transaction
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Wallet adapter error outside of submission
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
