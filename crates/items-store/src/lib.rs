//! Item collection store.
//!
//! This crate owns a single ordered collection of JSON items and the four
//! operations that act on it: list, create, update, and remove. Every
//! operation loads the whole collection from its backing medium, applies the
//! change in memory, and (for mutations) writes the whole collection back.
//!
//! # Key Types
//!
//! - [`Item`] -- a JSON object with a store-assigned `id` and a required `name`
//! - [`ItemStore`] -- the four collection operations
//! - [`CollectionStore`] -- load/save seam for the persisted document
//! - [`IdSource`] -- identity assignment for new items
//!
//! # Storage Backends
//!
//! - [`JsonFileStore`] -- one pretty-printed JSON array on disk
//! - [`InMemoryCollectionStore`] -- `RwLock<Vec<Item>>` for tests and embedding
//!
//! # Design Rules
//!
//! 1. Storage is the only source of truth; nothing is cached between calls.
//! 2. Validation and lookup failures abort before anything is written.
//! 3. A failed write leaves the previous document in place.
//! 4. The store does not serialize overlapping operations. Two concurrent
//!    mutations can interleave their load/save steps and one of them is lost.
//!    Callers that need strict consistency must wrap mutating calls in their
//!    own lock or queue.
//! 5. Failures are returned to the caller, never logged or swallowed here.

pub mod error;
pub mod file;
pub mod id;
pub mod item;
pub mod memory;
pub mod store;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use id::{IdSource, SequentialIds, SystemClockIds};
pub use item::{validate, Collection, Item, ID_FIELD, NAME_FIELD};
pub use memory::InMemoryCollectionStore;
pub use store::ItemStore;
pub use traits::CollectionStore;
