use anyhow::Result;
use tokio::sync::watch;

use crate::state::PersistedState;

/// External key/value store holding the shareable form state.
///
/// Implementations bump the version published through [`QueryStore::subscribe`]
/// after every change, whether it came from a local write or from outside
/// (navigation, an opened link).
pub trait QueryStore: Send + Sync {
    /// Full current snapshot.
    fn snapshot(&self) -> Result<PersistedState>;

    /// Apply an edit atomically; subscribers see either none or all of it.
    fn update(&self, edit: &mut dyn FnMut(&mut PersistedState)) -> Result<()>;

    /// Swap in an entirely new snapshot (external navigation).
    fn replace(&self, state: PersistedState) -> Result<()>;

    /// Change notifications as a monotonically increasing version.
    fn subscribe(&self) -> watch::Receiver<u64>;

    /// Upsert one key. Last write wins.
    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut value = Some(value);
        self.update(&mut |state: &mut PersistedState| {
            if let Some(v) = value.take() {
                state.set(key, v);
            }
        })
    }
}
