//! Session state and its reducer
//!
//! [`AppSessionState`] is a plain serializable value. Every change goes
//! through [`AppSessionState::apply`], which returns a new state and never
//! mutates the old one. Owned lists are always re-derived from the full lists
//! and the current owner hash, so `owned_events ⊆ events` and
//! `owned_venues ⊆ venues` hold after every action.
//!
//! Fetch results carry the generation they were issued under. A wallet
//! change bumps the generation, and results from an older generation are
//! dropped.

use chrono::{DateTime, Utc};
use lodive_core::{Balance, EventRecord, VenueRecord, WalletIdentity};
use lodive_crypto::IdentityHash;
use serde::{Deserialize, Serialize};

use crate::ownership::filter_owned_records;

/// Progress of the last submitted transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxStatus {
    #[default]
    Idle,
    /// Waiting for the wallet to sign
    Pending,
    /// Accepted by the wallet
    Submitted,
    Failed {
        reason: String,
    },
}

impl TxStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, TxStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSessionState {
    pub wallet: Option<WalletIdentity>,
    /// Hash of `wallet` under the address encoding
    pub owner_hash: Option<IdentityHash>,
    /// Bumped on every wallet change
    pub generation: u64,
    /// Upstream context still loading; gates the balance fetch
    pub loading: bool,

    pub events: Vec<EventRecord>,
    pub venues: Vec<VenueRecord>,
    pub owned_events: Vec<EventRecord>,
    pub owned_venues: Vec<VenueRecord>,
    pub events_refreshed_at: Option<DateTime<Utc>>,
    pub venues_refreshed_at: Option<DateTime<Utc>>,

    pub balance: Option<Balance>,
    pub balance_loading: bool,

    /// Raw status string reported by the wallet adapter
    pub adapter_tx_status: Option<String>,
    pub tx_status: TxStatus,
    pub transaction_id: Option<String>,
}

/// A single state transition
#[derive(Debug, Clone, PartialEq)]
pub enum StateAction {
    WalletConnected {
        wallet: WalletIdentity,
        owner_hash: IdentityHash,
    },
    WalletDisconnected,
    SetLoading(bool),
    EventsFetched {
        generation: u64,
        events: Vec<EventRecord>,
        fetched_at: DateTime<Utc>,
    },
    VenuesFetched {
        generation: u64,
        venues: Vec<VenueRecord>,
        fetched_at: DateTime<Utc>,
    },
    BalanceRequested,
    BalanceFetched {
        generation: u64,
        balance: Balance,
    },
    BalanceFailed {
        generation: u64,
    },
    SetAdapterTxStatus(Option<String>),
    SetTxStatus(TxStatus),
    SetTransactionId(Option<String>),
}

impl StateAction {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            StateAction::WalletConnected { .. } => "wallet_connected",
            StateAction::WalletDisconnected => "wallet_disconnected",
            StateAction::SetLoading(_) => "set_loading",
            StateAction::EventsFetched { .. } => "events_fetched",
            StateAction::VenuesFetched { .. } => "venues_fetched",
            StateAction::BalanceRequested => "balance_requested",
            StateAction::BalanceFetched { .. } => "balance_fetched",
            StateAction::BalanceFailed { .. } => "balance_failed",
            StateAction::SetAdapterTxStatus(_) => "set_adapter_tx_status",
            StateAction::SetTxStatus(_) => "set_tx_status",
            StateAction::SetTransactionId(_) => "set_transaction_id",
        }
    }

    /// Generation a fetch result was issued under, if this is one
    pub fn generation(&self) -> Option<u64> {
        match self {
            StateAction::EventsFetched { generation, .. }
            | StateAction::VenuesFetched { generation, .. }
            | StateAction::BalanceFetched { generation, .. }
            | StateAction::BalanceFailed { generation } => Some(*generation),
            _ => None,
        }
    }
}

impl AppSessionState {
    /// Whether `action` is a fetch result from an earlier wallet generation
    pub fn is_stale(&self, action: &StateAction) -> bool {
        action
            .generation()
            .is_some_and(|generation| generation != self.generation)
    }

    /// Produce the state after `action`
    pub fn apply(&self, action: StateAction) -> Self {
        if self.is_stale(&action) {
            return self.clone();
        }

        let mut next = self.clone();
        match action {
            StateAction::WalletConnected { wallet, owner_hash } => {
                next.wallet = Some(wallet);
                next.owner_hash = Some(owner_hash);
                next.generation += 1;
                next.balance = None;
                next.balance_loading = false;
                next.rederive_owned();
            }
            StateAction::WalletDisconnected => {
                next.wallet = None;
                next.owner_hash = None;
                next.generation += 1;
                next.balance = None;
                next.balance_loading = false;
                next.rederive_owned();
            }
            StateAction::SetLoading(loading) => next.loading = loading,
            StateAction::EventsFetched {
                events, fetched_at, ..
            } => {
                next.owned_events = filter_owned_records(&events, next.owner_hash.as_ref());
                next.events = events;
                next.events_refreshed_at = Some(fetched_at);
            }
            StateAction::VenuesFetched {
                venues, fetched_at, ..
            } => {
                next.owned_venues = filter_owned_records(&venues, next.owner_hash.as_ref());
                next.venues = venues;
                next.venues_refreshed_at = Some(fetched_at);
            }
            StateAction::BalanceRequested => next.balance_loading = true,
            StateAction::BalanceFetched { balance, .. } => {
                next.balance = Some(balance);
                next.balance_loading = false;
            }
            StateAction::BalanceFailed { .. } => next.balance_loading = false,
            StateAction::SetAdapterTxStatus(status) => next.adapter_tx_status = status,
            StateAction::SetTxStatus(status) => next.tx_status = status,
            StateAction::SetTransactionId(id) => next.transaction_id = id,
        }
        next
    }

    fn rederive_owned(&mut self) {
        self.owned_events = filter_owned_records(&self.events, self.owner_hash.as_ref());
        self.owned_venues = filter_owned_records(&self.venues, self.owner_hash.as_ref());
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.is_some()
    }
}
