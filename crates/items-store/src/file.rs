use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::item::{Collection, Item};
use crate::traits::CollectionStore;

/// Collection persisted as one JSON array in a single file.
///
/// On-disk format: a pretty-printed JSON array (two-space indentation) of
/// item objects. No header, no schema version.
///
/// Saves are whole-file overwrites: the document is written to a temporary
/// file in the same directory, synced, and renamed over the target. A
/// failure at any step leaves the previous document untouched.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Point at `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Point at `path`, creating parent directories and seeding an empty
    /// collection if the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self::new(path);
        store.init().await?;
        Ok(store)
    }

    /// Seed `[]` at the store's path unless a document is already there.
    ///
    /// Returns `true` if a new document was written.
    pub async fn init(&self) -> StoreResult<bool> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| StoreError::StorageRead(format!("{}: {e}", self.path.display())))?;
        if exists {
            return Ok(false);
        }
        tokio::fs::create_dir_all(self.dir())
            .await
            .map_err(|e| StoreError::StorageWrite(format!("{}: {e}", self.dir().display())))?;
        self.save(&[]).await?;
        debug!(path = %self.path.display(), "seeded empty collection");
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

#[async_trait]
impl CollectionStore for JsonFileStore {
    async fn load(&self) -> StoreResult<Collection> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StoreError::StorageRead(format!("{}: {e}", self.path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::StorageRead(format!("{}: {e}", self.path.display())))
    }

    async fn save(&self, items: &[Item]) -> StoreResult<()> {
        let mut document = serde_json::to_vec_pretty(items)
            .map_err(|e| StoreError::StorageWrite(e.to_string()))?;
        document.push(b'\n');

        let dir = self.dir().to_path_buf();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&document)?;
            tmp.as_file().sync_all()?;
            // The temp file starts out owner-only; keep the document's mode.
            if let Ok(existing) = std::fs::metadata(&path) {
                tmp.as_file().set_permissions(existing.permissions())?;
            }
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::StorageWrite(format!("write task failed: {e}")))?
        .map_err(|e| StoreError::StorageWrite(format!("{}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> Item {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn open_seeds_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("items.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[tokio::test]
    async fn init_keeps_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{"id":"1","name":"A"}]"#).unwrap();

        let store = JsonFileStore::new(&path);
        assert!(!store.init().await.unwrap());
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_then_load_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("items.json")).await.unwrap();
        let items = vec![
            item(json!({"name": "B", "tags": ["x"], "id": "2"})),
            item(json!({"id": "1", "name": "A", "nested": {"k": 1}})),
        ];
        store.save(&items).await.unwrap();
        assert_eq!(store.load().await.unwrap(), items);
    }

    #[tokio::test]
    async fn document_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        store.save(&[item(json!({"id": "1", "name": "A"}))]).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "[\n  {\n    \"id\": \"1\",\n    \"name\": \"A\"\n  }\n]\n");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load().await, Err(StoreError::StorageRead(_))));
    }

    #[tokio::test]
    async fn malformed_document_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let store = JsonFileStore::new(&path);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(store.load().await, Err(StoreError::StorageRead(_))));

        std::fs::write(&path, r#"{"id":"1"}"#).unwrap();
        assert!(matches!(store.load().await, Err(StoreError::StorageRead(_))));

        std::fs::write(&path, r#"[1, 2]"#).unwrap();
        assert!(matches!(store.load().await, Err(StoreError::StorageRead(_))));
    }

    #[tokio::test]
    async fn failed_save_leaves_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        store.save(&[item(json!({"id": "1", "name": "A"}))]).await.unwrap();

        // A store whose directory does not exist cannot create its temp file.
        let broken = JsonFileStore::new(dir.path().join("missing").join("items.json"));
        assert!(matches!(
            broken.save(&[]).await,
            Err(StoreError::StorageWrite(_))
        ));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn save_keeps_document_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&[item(json!({"id": "1", "name": "A"}))]).await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();
        store.save(&[]).await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[tokio::test]
    async fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("items.json")).await.unwrap();
        for n in 0..3 {
            store.save(&[item(json!({"id": n.to_string(), "name": "A"}))]).await.unwrap();
        }
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
