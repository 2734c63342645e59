use async_trait::async_trait;

use crate::error::StoreResult;
use crate::item::{Collection, Item};

/// Backing medium for the persisted collection.
///
/// The interface is deliberately narrow: the whole collection goes in and
/// out in one piece. All implementations must satisfy these invariants:
/// - `load` returns the items in the order they were last saved.
/// - `save` replaces the whole document. A failed save leaves the previous
///   document readable.
/// - Neither call holds any lock across a load/save pair. Overlapping
///   read-modify-write sequences are not serialized.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Read the full collection.
    ///
    /// Returns `StorageRead` if the medium is unreadable or the document is
    /// not an array of objects.
    async fn load(&self) -> StoreResult<Collection>;

    /// Replace the full collection.
    ///
    /// Returns `StorageWrite` if the document could not be written.
    async fn save(&self, items: &[Item]) -> StoreResult<()>;
}
