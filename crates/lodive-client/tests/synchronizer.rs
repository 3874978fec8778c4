//! End-to-end session flows with in-memory chain and wallet

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bech32::{Bech32m, Hrp};
use lodive_client::{
    ClientConfig, ClientError, ClientResult, EventToggle, MappingSource, NetworkRpc, SessionStore,
    Synchronizer, TRANSACTION_FAILED_MESSAGE, TransactionDescriptor, TxStatus, WalletAdapter,
    WalletError,
};
use lodive_core::{Balance, MappingEntry, WalletIdentity};
use lodive_crypto::{ALEO_HRP, BitHasher, Blake3BitHasher, IdentityHash};
use tokio::sync::Notify;

fn address(seed: u8) -> WalletIdentity {
    let mut payload: Vec<u8> = (0..32u8).map(|i| seed.wrapping_mul(17).wrapping_add(i)).collect();
    // Top three bits of the last byte lie outside the field
    payload[31] &= 0x1F;
    let hrp = Hrp::parse(ALEO_HRP).unwrap();
    WalletIdentity::new(bech32::encode::<Bech32m>(hrp, &payload).unwrap())
}

fn owner_hash(wallet: &WalletIdentity) -> IdentityHash {
    Blake3BitHasher::new().hash_address(wallet).unwrap()
}

fn event_entry(id: u32, owner: &IdentityHash) -> MappingEntry {
    MappingEntry::new(
        format!("{}field", id),
        format!(
            "{{ event_id: {}field, ticket_supply: 100u32, ticket_price: 50u64, venue_id: 3field, event_owner: {}, is_started: false, is_ended: false }}",
            id, owner
        ),
    )
}

fn venue_entry(id: u32, owner: &IdentityHash) -> MappingEntry {
    MappingEntry::new(
        format!("{}field", id),
        format!(
            "{{ venue_id: {}field, commission: 5u8, venue_owner: {} }}",
            id, owner
        ),
    )
}

/// Mapping source serving fixed entries, optionally failing or held open
#[derive(Default)]
struct MemoryMappings {
    entries: Mutex<HashMap<String, Vec<MappingEntry>>>,
    fail: AtomicBool,
    hold: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl MemoryMappings {
    fn set(&self, mapping: &str, entries: Vec<MappingEntry>) {
        self.entries.lock().unwrap().insert(mapping.to_string(), entries);
    }
}

#[async_trait]
impl MappingSource for MemoryMappings {
    async fn fetch_mapping(&self, _program_id: &str, mapping: &str) -> ClientResult<Vec<MappingEntry>> {
        if self.hold.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::Indexer {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(mapping)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
struct MemoryRpc {
    balances: Mutex<HashMap<String, String>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

#[async_trait]
impl NetworkRpc for MemoryRpc {
    async fn get_program_mapping_value(
        &self,
        _program_id: &str,
        _mapping: &str,
        key: &str,
    ) -> ClientResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::Rpc {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(self.balances.lock().unwrap().get(key).cloned())
    }
}

/// Wallet that records requests and answers with a fixed outcome
struct RecordingWallet {
    outcome: Mutex<Result<String, WalletError>>,
    requests: Mutex<Vec<TransactionDescriptor>>,
}

impl RecordingWallet {
    fn accepting(id: &str) -> Self {
        Self {
            outcome: Mutex::new(Ok(id.to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WalletAdapter for RecordingWallet {
    async fn request_transaction(
        &self,
        descriptor: &TransactionDescriptor,
    ) -> Result<String, WalletError> {
        self.requests.lock().unwrap().push(descriptor.clone());
        self.outcome.lock().unwrap().clone()
    }

    async fn transaction_status(&self, _transaction_id: &str) -> Result<String, WalletError> {
        Ok("Finalized".to_string())
    }
}

struct Harness {
    sync: Arc<Synchronizer>,
    store: Arc<SessionStore>,
    mappings: Arc<MemoryMappings>,
    rpc: Arc<MemoryRpc>,
    wallet: Arc<RecordingWallet>,
}

fn harness() -> Harness {
    lodive_logging::init_testing();

    let store = Arc::new(SessionStore::new());
    let mappings = Arc::new(MemoryMappings::default());
    let rpc = Arc::new(MemoryRpc::default());
    let wallet = Arc::new(RecordingWallet::accepting("at1accepted"));
    let sync = Arc::new(Synchronizer::new(
        ClientConfig::default(),
        store.clone(),
        mappings.clone(),
        rpc.clone(),
        Arc::new(Blake3BitHasher::new()),
        wallet.clone(),
    ));

    Harness {
        sync,
        store,
        mappings,
        rpc,
        wallet,
    }
}

#[tokio::test]
async fn test_owned_events_follow_owner_hash() {
    let h = harness();
    let (alice, bob) = (address(1), address(2));
    let (h1, h2) = (owner_hash(&alice), owner_hash(&bob));
    h.mappings.set("events", vec![event_entry(1, &h1), event_entry(2, &h2)]);
    h.mappings.set("venues", vec![venue_entry(3, &h2)]);

    h.sync.connect_wallet(alice).await.unwrap();

    let state = h.store.snapshot();
    assert_eq!(state.events.len(), 2);
    assert_eq!(state.owned_events.len(), 1);
    assert_eq!(state.owned_events[0].event_owner, h1.to_string());
    assert_eq!(state.venues.len(), 1);
    assert!(state.owned_venues.is_empty());
    assert_eq!(state.owner_hash, Some(h1));
}

#[tokio::test]
async fn test_disconnect_clears_ownership() {
    let h = harness();
    let alice = address(1);
    h.mappings.set("events", vec![event_entry(1, &owner_hash(&alice))]);

    h.sync.connect_wallet(alice).await.unwrap();
    assert_eq!(h.store.snapshot().owned_events.len(), 1);

    h.sync.disconnect_wallet();
    let state = h.store.snapshot();
    assert!(state.wallet.is_none());
    assert!(state.owned_events.is_empty());
    assert_eq!(state.events.len(), 1);
}

#[tokio::test]
async fn test_invalid_wallet_address_rejected() {
    let h = harness();
    let err = h
        .sync
        .connect_wallet(WalletIdentity::new("aleo1notreal"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Crypto(_)));
    assert!(h.store.snapshot().wallet.is_none());
}

#[tokio::test]
async fn test_malformed_entry_is_skipped() {
    let h = harness();
    let alice = address(1);
    let h1 = owner_hash(&alice);
    h.mappings.set(
        "events",
        vec![
            event_entry(1, &h1),
            MappingEntry::new("2field", "{ event_id: 2field, ticket_supply: lots }"),
            event_entry(3, &h1),
        ],
    );

    h.sync.connect_wallet(alice).await.unwrap();

    let state = h.store.snapshot();
    let ids: Vec<&str> = state.events.iter().map(|e| e.event_id.as_str()).collect();
    assert_eq!(ids, ["1field", "3field"]);
    assert_eq!(state.owned_events.len(), 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_state() {
    let h = harness();
    let alice = address(1);
    h.mappings.set("events", vec![event_entry(1, &owner_hash(&alice))]);
    h.sync.connect_wallet(alice).await.unwrap();
    let before = h.store.snapshot();

    h.mappings.fail.store(true, Ordering::SeqCst);
    let err = h.sync.refresh_events().await.unwrap_err();
    assert!(matches!(err, ClientError::Indexer { status: 503, .. }));

    assert_eq!(*h.store.snapshot(), *before);
}

#[tokio::test]
async fn test_stale_fetch_discarded_after_disconnect() {
    let h = harness();
    let alice = address(1);
    h.sync.connect_wallet(alice.clone()).await.unwrap();
    assert!(h.store.snapshot().events.is_empty());

    h.mappings.set("events", vec![event_entry(1, &owner_hash(&alice))]);
    h.mappings.hold.store(true, Ordering::SeqCst);

    let sync = h.sync.clone();
    let in_flight = tokio::spawn(async move { sync.refresh_events().await });

    h.mappings.entered.notified().await;
    h.sync.disconnect_wallet();
    h.mappings.release.notify_one();

    in_flight.await.unwrap().unwrap();

    let state = h.store.snapshot();
    assert!(state.wallet.is_none());
    assert!(state.events.is_empty());
    assert!(state.events_refreshed_at.is_some());
}

#[tokio::test]
async fn test_balance_waits_for_loading() {
    let h = harness();
    let alice = address(1);
    h.rpc
        .balances
        .lock()
        .unwrap()
        .insert(alice.to_string(), "123456789u64".to_string());

    h.sync.set_loading(true);
    h.sync.connect_wallet(alice).await.unwrap();
    h.sync.refresh_balance().await.unwrap();
    assert_eq!(h.rpc.calls.load(Ordering::SeqCst), 0);
    assert!(h.store.snapshot().balance.is_none());

    h.sync.set_loading(false);
    h.sync.refresh_balance().await.unwrap();
    let state = h.store.snapshot();
    assert_eq!(h.rpc.calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.balance, Some(Balance::from_microcredits(123_456_789)));
    assert_eq!(state.balance.unwrap().to_string(), "123.456789");
    assert!(!state.balance_loading);
}

#[tokio::test]
async fn test_balance_failure_clears_loading() {
    let h = harness();
    h.sync.connect_wallet(address(1)).await.unwrap();
    assert_eq!(h.store.snapshot().balance, Some(Balance::ZERO));
    h.rpc.fail.store(true, Ordering::SeqCst);

    assert!(h.sync.refresh_balance().await.is_err());
    let state = h.store.snapshot();
    assert!(!state.balance_loading);
    assert_eq!(state.balance, Some(Balance::ZERO));
}

#[tokio::test]
async fn test_connect_fetches_balance() {
    let h = harness();
    let alice = address(1);
    h.rpc
        .balances
        .lock()
        .unwrap()
        .insert(alice.to_string(), "2500000u64".to_string());

    h.sync.connect_wallet(alice).await.unwrap();
    let state = h.store.snapshot();
    assert_eq!(h.rpc.calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.balance, Some(Balance::from_microcredits(2_500_000)));
    assert!(!state.balance_loading);
}

#[tokio::test]
async fn test_connect_succeeds_when_balance_fails() {
    let h = harness();
    let alice = address(1);
    h.mappings.set("events", vec![event_entry(1, &owner_hash(&alice))]);
    h.rpc.fail.store(true, Ordering::SeqCst);

    h.sync.connect_wallet(alice).await.unwrap();
    let state = h.store.snapshot();
    assert_eq!(h.rpc.calls.load(Ordering::SeqCst), 1);
    assert!(state.balance.is_none());
    assert!(!state.balance_loading);
    assert_eq!(state.owned_events.len(), 1);
}

#[tokio::test]
async fn test_submit_requires_wallet() {
    let h = harness();
    let err = h
        .sync
        .set_event_state("7", EventToggle::Start)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NoWallet));
    assert!(h.wallet.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_records_transaction() {
    let h = harness();
    let alice = address(1);
    h.sync.connect_wallet(alice.clone()).await.unwrap();

    let id = h
        .sync
        .register_event_named("Opening Night", 100, 50, "Red Rocks")
        .await
        .unwrap();
    assert_eq!(id, "at1accepted");

    let state = h.store.snapshot();
    assert_eq!(state.tx_status, TxStatus::Submitted);
    assert_eq!(state.transaction_id.as_deref(), Some("at1accepted"));

    let requests = h.wallet.requests.lock().unwrap();
    let tx = &requests[0];
    let hasher = Blake3BitHasher::new();
    assert_eq!(tx.caller, alice);
    assert_eq!(tx.function, "register_event");
    assert_eq!(tx.fee, 42_150);
    assert_eq!(
        tx.input_strings(),
        vec![
            hasher.hash_name("Opening Night").unwrap().to_string(),
            "100u32".to_string(),
            "50u64".to_string(),
            hasher.hash_name("Red Rocks").unwrap().to_string(),
            owner_hash(&alice).to_string(),
        ]
    );
}

#[tokio::test]
async fn test_wallet_rejection_is_generic_failure() {
    let h = harness();
    h.sync.connect_wallet(address(1)).await.unwrap();
    *h.wallet.outcome.lock().unwrap() = Err(WalletError::InsufficientFee);

    let err = h.sync.register_venue_named("Red Rocks", 10).await.unwrap_err();
    assert!(matches!(err, ClientError::TransactionFailed(ref msg) if msg == TRANSACTION_FAILED_MESSAGE));

    let state = h.store.snapshot();
    assert_eq!(
        state.tx_status,
        TxStatus::Failed {
            reason: TRANSACTION_FAILED_MESSAGE.to_string()
        }
    );
    assert!(state.transaction_id.is_none());
}

#[tokio::test]
async fn test_invalid_commission_not_submitted() {
    let h = harness();
    h.sync.connect_wallet(address(1)).await.unwrap();

    let err = h.sync.register_venue_named("Red Rocks", 101).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidCommission(101)));
    assert!(h.wallet.requests.lock().unwrap().is_empty());
    assert_eq!(h.store.snapshot().tx_status, TxStatus::Idle);
}

#[tokio::test]
async fn test_transaction_status_polling() {
    let h = harness();
    assert_eq!(h.sync.refresh_transaction_status().await.unwrap(), None);

    h.sync.connect_wallet(address(1)).await.unwrap();
    h.sync.set_event_state("7field", EventToggle::End).await.unwrap();

    let status = h.sync.refresh_transaction_status().await.unwrap();
    assert_eq!(status.as_deref(), Some("Finalized"));
    assert_eq!(h.store.snapshot().adapter_tx_status.as_deref(), Some("Finalized"));

    let requests = h.wallet.requests.lock().unwrap();
    assert_eq!(requests[0].function, "end_event");
    assert_eq!(requests[0].input_strings(), vec!["7field"]);
}
