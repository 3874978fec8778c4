//! Shared session store
//!
//! A single `watch` channel holds the current [`AppSessionState`]. Writers
//! call [`SessionStore::dispatch`], which runs the reducer under the
//! channel's lock, so updates are applied one at a time in dispatch order.
//! Readers take snapshots or subscribe for change notifications.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, trace};

use crate::state::{AppSessionState, StateAction};

#[derive(Debug)]
pub struct SessionStore {
    sender: watch::Sender<Arc<AppSessionState>>,
}

impl SessionStore {
    /// Store holding the blank initial state
    pub fn new() -> Self {
        Self::with_state(AppSessionState::default())
    }

    pub fn with_state(state: AppSessionState) -> Self {
        let (sender, _) = watch::channel(Arc::new(state));
        Self { sender }
    }

    /// Current state
    pub fn snapshot(&self) -> Arc<AppSessionState> {
        self.sender.borrow().clone()
    }

    /// Receiver notified after every change
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppSessionState>> {
        self.sender.subscribe()
    }

    /// Apply `action` and notify subscribers if the state changed.
    ///
    /// Returns whether anything changed; stale fetch results do not.
    pub fn dispatch(&self, action: StateAction) -> bool {
        let name = action.name();
        let changed = self.sender.send_if_modified(|state| {
            if state.is_stale(&action) {
                debug!(
                    action = name,
                    current = state.generation,
                    issued = ?action.generation(),
                    "Dropping stale fetch result"
                );
                return false;
            }
            let next = state.apply(action);
            if next == **state {
                return false;
            }
            *state = Arc::new(next);
            true
        });
        trace!(action = name, changed, "Dispatched");
        changed
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
