use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::id::{IdSource, SystemClockIds};
use crate::item::{validate, Collection, Item};
use crate::traits::CollectionStore;

/// The item collection manager.
///
/// Each operation loads the full collection from its [`CollectionStore`],
/// applies one change, and saves the full collection back. Nothing is kept
/// in memory between calls, and overlapping calls are not serialized: a
/// create racing a remove can silently drop one of the two changes.
#[derive(Clone)]
pub struct ItemStore {
    storage: Arc<dyn CollectionStore>,
    ids: Arc<dyn IdSource>,
}

impl ItemStore {
    /// Create a store that assigns wall-clock ids.
    pub fn new(storage: Arc<dyn CollectionStore>) -> Self {
        Self::with_id_source(storage, Arc::new(SystemClockIds))
    }

    pub fn with_id_source(storage: Arc<dyn CollectionStore>, ids: Arc<dyn IdSource>) -> Self {
        Self { storage, ids }
    }

    /// Return the full collection unchanged.
    pub async fn list(&self) -> StoreResult<Collection> {
        self.storage.load().await
    }

    /// Validate `candidate`, give it a fresh id, and append it.
    ///
    /// Any `id` the caller supplied is replaced.
    pub async fn create(&self, candidate: Value) -> StoreResult<Item> {
        let fields = validate(candidate)?;
        let mut items = self.storage.load().await?;

        let mut item = Item::from_fields(fields);
        item.assign_id(self.ids.next_id());
        items.push(item.clone());
        self.storage.save(&items).await?;

        debug!(id = item.id().unwrap_or_default(), len = items.len(), "item created");
        Ok(item)
    }

    /// Merge `patch` onto the item with `id` and return the result.
    ///
    /// `patch` must pass the same rule as a new item, so `name` is required
    /// even for a partial update. The path `id` is authoritative; an `id`
    /// key inside the patch is ignored.
    pub async fn update(&self, id: &str, patch: Value) -> StoreResult<Item> {
        let patch = validate(patch)?;
        let mut items = self.storage.load().await?;

        let existing = items
            .iter_mut()
            .find(|item| item.has_id(id))
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        existing.merge(patch);
        let merged = existing.clone();
        self.storage.save(&items).await?;

        debug!(id, "item updated");
        Ok(merged)
    }

    /// Remove the item with `id`, keeping the order of the rest.
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        let mut items = self.storage.load().await?;

        let index = items
            .iter()
            .position(|item| item.has_id(id))
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        items.remove(index);
        self.storage.save(&items).await?;

        debug!(id, len = items.len(), "item removed");
        Ok(())
    }
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore").finish_non_exhaustive()
    }
}
