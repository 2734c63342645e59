use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::item::{Collection, Item};
use crate::traits::CollectionStore;

/// In-memory collection store.
///
/// Intended for tests and embedding. The collection lives in a `Vec` behind
/// a `RwLock` and is cloned on every load and save, so callers observe the
/// same copy-in/copy-out behavior as the file backend.
pub struct InMemoryCollectionStore {
    items: RwLock<Collection>,
}

impl InMemoryCollectionStore {
    /// Create a store holding an empty collection.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a store seeded with `items`.
    pub fn with_items(items: Collection) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Number of items currently stored.
    pub fn len(&self) -> usize {
        match self.items.read() {
            Ok(items) => items.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn load(&self) -> StoreResult<Collection> {
        let items = self
            .items
            .read()
            .map_err(|e| StoreError::StorageRead(format!("lock poisoned: {e}")))?;
        Ok(items.clone())
    }

    async fn save(&self, items: &[Item]) -> StoreResult<()> {
        let mut stored = self
            .items
            .write()
            .map_err(|e| StoreError::StorageWrite(format!("lock poisoned: {e}")))?;
        *stored = items.to_vec();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryCollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCollectionStore")
            .field("len", &self.len())
            .finish()
    }
}
