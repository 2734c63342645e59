use std::sync::Arc;

use items_store::ItemStore;
use tokio::sync::{Mutex, MutexGuard};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    store: ItemStore,
    write_gate: Option<Arc<Mutex<()>>>,
}

impl AppState {
    /// Handlers call the store directly; overlapping writes are not serialized.
    pub fn new(store: ItemStore) -> Self {
        Self {
            store,
            write_gate: None,
        }
    }

    /// Handlers take a process-wide lock around every mutating call.
    pub fn serialized(store: ItemStore) -> Self {
        Self {
            store,
            write_gate: Some(Arc::new(Mutex::new(()))),
        }
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Acquire the write lock if this state serializes writes.
    pub(crate) async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        }
    }
}
