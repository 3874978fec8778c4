//! Wallet-driven synchronisation
//!
//! [`Synchronizer`] wires the mapping source, RPC, hasher and wallet adapter
//! to a [`SessionStore`]. Refreshes are best effort: a failure is returned to
//! the caller and logged, and the store keeps its previous contents.

use std::sync::Arc;

use chrono::Utc;
use lodive_core::{
    DecodeOutcome, EventRecord, FromRecord, InputValue, VenueRecord, WalletIdentity, decode_entries,
};
use lodive_crypto::{BitHasher, Blake3BitHasher};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::mapping::{EVENTS_MAPPING, IndexerClient, MappingSource, VENUES_MAPPING};
use crate::rpc::{NetworkRpc, RpcClient};
use crate::state::{StateAction, TxStatus};
use crate::store::SessionStore;
use crate::transaction::{EventToggle, ProgramCall, TransactionBuilder, WalletAdapter};

/// Message recorded for every failed submission
pub const TRANSACTION_FAILED_MESSAGE: &str = "Transaction failed";

pub struct Synchronizer {
    config: ClientConfig,
    store: Arc<SessionStore>,
    mappings: Arc<dyn MappingSource>,
    rpc: Arc<dyn NetworkRpc>,
    hasher: Arc<dyn BitHasher>,
    wallet: Arc<dyn WalletAdapter>,
}

impl Synchronizer {
    pub fn new(
        config: ClientConfig,
        store: Arc<SessionStore>,
        mappings: Arc<dyn MappingSource>,
        rpc: Arc<dyn NetworkRpc>,
        hasher: Arc<dyn BitHasher>,
        wallet: Arc<dyn WalletAdapter>,
    ) -> Self {
        Self {
            config,
            store,
            mappings,
            rpc,
            hasher,
            wallet,
        }
    }

    /// HTTP-backed synchronizer for a deployment
    pub fn from_config(
        config: ClientConfig,
        store: Arc<SessionStore>,
        wallet: Arc<dyn WalletAdapter>,
    ) -> ClientResult<Self> {
        let mappings = Arc::new(IndexerClient::from_config(&config)?);
        let rpc = Arc::new(RpcClient::from_config(&config)?);
        Ok(Self::new(
            config,
            store,
            mappings,
            rpc,
            Arc::new(Blake3BitHasher::new()),
            wallet,
        ))
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Record the connected wallet and load everything for it
    ///
    /// Fails without touching the store when the address cannot be hashed.
    /// The balance is fetched alongside the mappings; a balance failure is
    /// logged and left in the store but does not fail the connect.
    #[instrument(skip(self, wallet), fields(wallet = %wallet.short_id()))]
    pub async fn connect_wallet(&self, wallet: WalletIdentity) -> ClientResult<()> {
        let owner_hash = self.hasher.hash_address(&wallet).inspect_err(|e| {
            warn!(error = %e, "Cannot hash wallet address");
        })?;

        self.store.dispatch(StateAction::WalletConnected { wallet, owner_hash });
        info!(generation = self.store.snapshot().generation, "Wallet connected");

        let (records, _balance) = tokio::join!(self.refresh_all(), self.refresh_balance());
        records
    }

    #[instrument(skip(self))]
    pub fn disconnect_wallet(&self) {
        self.store.dispatch(StateAction::WalletDisconnected);
        info!(generation = self.store.snapshot().generation, "Wallet disconnected");
    }

    /// Set the upstream loading flag that gates the balance fetch
    pub fn set_loading(&self, loading: bool) {
        self.store.dispatch(StateAction::SetLoading(loading));
    }

    async fn fetch_records<R: FromRecord>(&self, mapping: &str) -> ClientResult<Vec<R>> {
        let entries = self
            .mappings
            .fetch_mapping(&self.config.program_id, mapping)
            .await
            .inspect_err(|e| warn!(mapping, error = %e, "Mapping refresh failed"))?;

        let DecodeOutcome { records, skipped } = decode_entries::<R>(&entries);
        if skipped > 0 {
            warn!(mapping, skipped, kept = records.len(), "Some mapping entries were skipped");
        }
        Ok(records)
    }

    #[instrument(skip(self), fields(program = %self.config.program_id))]
    pub async fn refresh_events(&self) -> ClientResult<()> {
        let generation = self.store.snapshot().generation;
        debug!(generation, "Refreshing events");

        let events: Vec<EventRecord> = self.fetch_records(EVENTS_MAPPING).await?;
        let count = events.len();
        let applied = self.store.dispatch(StateAction::EventsFetched {
            generation,
            events,
            fetched_at: Utc::now(),
        });
        info!(count, applied, "Events refreshed");
        Ok(())
    }

    #[instrument(skip(self), fields(program = %self.config.program_id))]
    pub async fn refresh_venues(&self) -> ClientResult<()> {
        let generation = self.store.snapshot().generation;
        debug!(generation, "Refreshing venues");

        let venues: Vec<VenueRecord> = self.fetch_records(VENUES_MAPPING).await?;
        let count = venues.len();
        let applied = self.store.dispatch(StateAction::VenuesFetched {
            generation,
            venues,
            fetched_at: Utc::now(),
        });
        info!(count, applied, "Venues refreshed");
        Ok(())
    }

    /// Refresh events and venues concurrently; both run even if one fails
    pub async fn refresh_all(&self) -> ClientResult<()> {
        let (events, venues) = tokio::join!(self.refresh_events(), self.refresh_venues());
        events.and(venues)
    }

    /// Fetch the connected wallet's public balance
    ///
    /// Skipped while upstream context is loading or no wallet is connected.
    /// `balance_loading` is cleared whatever the outcome.
    #[instrument(skip(self))]
    pub async fn refresh_balance(&self) -> ClientResult<()> {
        let state = self.store.snapshot();
        if state.loading {
            debug!("Context still loading, balance fetch deferred");
            return Ok(());
        }
        let Some(wallet) = state.wallet.clone() else {
            return Ok(());
        };
        let generation = state.generation;

        self.store.dispatch(StateAction::BalanceRequested);
        match self.rpc.fetch_balance(&wallet).await {
            Ok(balance) => {
                self.store.dispatch(StateAction::BalanceFetched { generation, balance });
                info!(%balance, "Balance refreshed");
                Ok(())
            }
            Err(e) => {
                self.store.dispatch(StateAction::BalanceFailed { generation });
                warn!(error = %e, "Balance refresh failed");
                Err(e)
            }
        }
    }

    /// Build a transaction for `call` and hand it to the wallet
    ///
    /// Every wallet failure is reported the same way, whatever its cause.
    #[instrument(skip(self, call), fields(function = call.function_name()))]
    pub async fn submit(&self, call: ProgramCall) -> ClientResult<String> {
        let Some(caller) = self.store.snapshot().wallet.clone() else {
            return Err(ClientError::NoWallet);
        };

        let descriptor = TransactionBuilder::new(caller, self.config.network, &self.config.program_id)
            .call(&call)
            .fee(self.config.fee)
            .fee_private(self.config.fee_private)
            .build()?;

        self.store.dispatch(StateAction::SetTxStatus(TxStatus::Pending));
        self.store.dispatch(StateAction::SetTransactionId(None));

        match self.wallet.request_transaction(&descriptor).await {
            Ok(transaction_id) => {
                self.store.dispatch(StateAction::SetTransactionId(Some(transaction_id.clone())));
                self.store.dispatch(StateAction::SetTxStatus(TxStatus::Submitted));
                info!(%transaction_id, "Transaction submitted");
                Ok(transaction_id)
            }
            Err(e) => {
                warn!(error = %e, "Wallet did not accept transaction");
                self.store.dispatch(StateAction::SetTxStatus(TxStatus::Failed {
                    reason: TRANSACTION_FAILED_MESSAGE.to_string(),
                }));
                Err(ClientError::TransactionFailed(TRANSACTION_FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// Poll the wallet for the status of the last submitted transaction
    pub async fn refresh_transaction_status(&self) -> ClientResult<Option<String>> {
        let Some(transaction_id) = self.store.snapshot().transaction_id.clone() else {
            return Ok(None);
        };

        let status = self.wallet.transaction_status(&transaction_id).await?;
        debug!(%transaction_id, %status, "Transaction status");
        self.store.dispatch(StateAction::SetAdapterTxStatus(Some(status.clone())));
        Ok(Some(status))
    }

    /// Register an event owned by the connected wallet
    pub async fn register_event_named(
        &self,
        event_name: &str,
        ticket_supply: u32,
        ticket_price: u64,
        venue_name: &str,
    ) -> ClientResult<String> {
        let Some(owner) = self.store.snapshot().wallet.clone() else {
            return Err(ClientError::NoWallet);
        };
        let call = ProgramCall::register_event_named(
            self.hasher.as_ref(),
            event_name,
            ticket_supply,
            ticket_price,
            venue_name,
            &owner,
        )?;
        self.submit(call).await
    }

    pub async fn register_venue_named(&self, venue_name: &str, commission: u8) -> ClientResult<String> {
        let call = ProgramCall::register_venue_named(self.hasher.as_ref(), venue_name, commission)?;
        self.submit(call).await
    }

    /// Start or end an event
    pub async fn set_event_state(&self, event_id: &str, toggle: EventToggle) -> ClientResult<String> {
        let call = toggle.for_event(InputValue::field(event_id)?)?;
        self.submit(call).await
    }
}
