//! Chain access and session state for the Lodive ticketing client
//!
//! This crate turns on-chain program state into a session view for the
//! connected wallet and sends transactions back through the wallet.
//!
//! - [`mapping`] lists the `events` and `venues` mappings from the indexer
//! - [`rpc`] reads single mapping values, such as the credit balance
//! - [`ownership`] keeps the records whose owner hash matches the wallet
//! - [`transaction`] builds typed transaction descriptors
//! - [`state`] and [`store`] hold the session state behind a pure reducer
//! - [`sync`] ties them together
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lodive_client::{ClientConfig, SessionStore, Synchronizer, WalletAdapter};
//! use lodive_core::WalletIdentity;
//!
//! # async fn example(wallet: Arc<dyn WalletAdapter>) -> lodive_client::ClientResult<()> {
//! let config = ClientConfig::default().with_env_overrides()?;
//! let store = Arc::new(SessionStore::new());
//! let sync = Synchronizer::from_config(config, store.clone(), wallet)?;
//!
//! sync.connect_wallet(WalletIdentity::new("aleo1...")).await?;
//! println!("{} events owned", store.snapshot().owned_events.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod mapping;
pub mod ownership;
pub mod rpc;
pub mod state;
pub mod store;
pub mod sync;
pub mod transaction;

pub use config::{ClientConfig, DEFAULT_FEE, DEFAULT_PROGRAM_ID, DEFAULT_RPC_URL};
pub use error::{ClientError, ClientResult};
pub use mapping::{EVENTS_MAPPING, IndexerClient, MappingSource, VENUES_MAPPING};
pub use ownership::{filter_owned, filter_owned_records, is_owned_by};
pub use rpc::{ACCOUNT_MAPPING, CREDITS_PROGRAM, NetworkRpc, RpcClient};
pub use state::{AppSessionState, StateAction, TxStatus};
pub use store::SessionStore;
pub use sync::{Synchronizer, TRANSACTION_FAILED_MESSAGE};
pub use transaction::{
    EventToggle, MAX_COMMISSION, ProgramCall, TransactionBuilder, TransactionDescriptor, Transition,
    WalletAdapter, WalletError, WalletRequest, build_transaction,
};
