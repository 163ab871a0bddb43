use anyhow::Result;
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::PersistedState;
use crate::store::QueryStore;

/// In-process store with browser-like history.
///
/// Every change pushes the previous snapshot onto a bounded history so that
/// [`InMemoryQueryStore::back`] can emulate back-navigation.
pub struct InMemoryQueryStore {
    state: RwLock<Inner>,
    version: watch::Sender<u64>,
    max_history: usize,
}

#[derive(Default)]
struct Inner {
    current: PersistedState,
    history: Vec<PersistedState>,
}

impl Default for InMemoryQueryStore {
    fn default() -> Self {
        Self::new(PersistedState::new())
    }
}

impl InMemoryQueryStore {
    pub fn new(initial: PersistedState) -> Self {
        let (version, _) = watch::channel(0);

        Self {
            state: RwLock::new(Inner {
                current: initial,
                history: Vec::new(),
            }),
            version,
            max_history: 64,
        }
    }

    /// Seed the store from a shared link's query string.
    pub fn from_query(query: &str) -> Self {
        Self::new(PersistedState::from_query_string(query))
    }

    /// Restore the previous snapshot. Returns `false` when there is none.
    pub fn back(&self) -> bool {
        let restored = {
            let mut inner = self.state.write();
            match inner.history.pop() {
                Some(prev) => {
                    inner.current = prev;
                    true
                }
                None => false,
            }
        };

        if restored {
            debug!("query state navigated back");
            self.notify();
        }
        restored
    }

    pub fn history_len(&self) -> usize {
        self.state.read().history.len()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn push_history(&self, inner: &mut Inner) {
        if inner.history.len() >= self.max_history {
            inner.history.remove(0);
        }
        let prev = inner.current.clone();
        inner.history.push(prev);
    }

    fn notify(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl QueryStore for InMemoryQueryStore {
    fn snapshot(&self) -> Result<PersistedState> {
        Ok(self.state.read().current.clone())
    }

    fn update(&self, edit: &mut dyn FnMut(&mut PersistedState)) -> Result<()> {
        {
            let mut inner = self.state.write();
            self.push_history(&mut inner);

            let mut next = inner.current.clone();
            edit(&mut next);
            inner.current = next;
        }

        self.notify();
        Ok(())
    }

    fn replace(&self, state: PersistedState) -> Result<()> {
        {
            let mut inner = self.state.write();
            self.push_history(&mut inner);
            inner.current = state;
        }

        info!("query state replaced externally");
        self.notify();
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}
