//! Filesystem object store for local runs and tests.

use async_trait::async_trait;
use stash_core::ports::ObjectStore;
use stash_core::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Stores each object as a file under a root directory, with metadata in a
/// JSON sidecar. Keys are sanitized into flat filenames.
pub struct FilesystemStore {
    root_dir: PathBuf,
}

impl FilesystemStore {
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        let sanitized = key.replace(['/', '\\', ':'], "_");
        self.root_dir.join(sanitized)
    }

    fn metadata_path(&self, key: &str) -> PathBuf {
        let mut path = self.object_path(key).into_os_string();
        path.push(".meta");
        PathBuf::from(path)
    }
}

#[async_trait]
impl ObjectStore for FilesystemStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.object_path(key).exists())
    }

    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir)
            .await
            .map_err(|e| Error::Store(format!("Failed to create store dir: {}", e)))?;
        tokio::fs::write(self.object_path(key), &body)
            .await
            .map_err(|e| Error::Store(format!("Failed to write object {}: {}", key, e)))?;
        let raw = serde_json::to_vec(&metadata)
            .map_err(|e| Error::Store(format!("Failed to encode metadata: {}", e)))?;
        tokio::fs::write(self.metadata_path(key), raw)
            .await
            .map_err(|e| Error::Store(format!("Failed to write metadata {}: {}", key, e)))
    }

    async fn get(&self, key: &str) -> Result<(Vec<u8>, HashMap<String, String>)> {
        let body = tokio::fs::read(self.object_path(key))
            .await
            .map_err(|e| Error::Store(format!("Failed to read object {}: {}", key, e)))?;
        let metadata = match tokio::fs::read(self.metadata_path(key)).await {
            Ok(raw) => serde_json::from_slice(&raw)
                .map_err(|e| Error::Store(format!("Failed to decode metadata {}: {}", key, e)))?,
            // Object without a sidecar reads back with empty metadata.
            Err(_) => HashMap::new(),
        };
        Ok((body, metadata))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        for path in [self.object_path(key), self.metadata_path(key)] {
            if path.exists() {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| Error::Store(format!("Failed to delete {}: {}", key, e)))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemStore::new(dir.path().to_path_buf());

        let metadata = HashMap::from([("hash".to_string(), "sha256".to_string())]);
        store
            .put("cache/proj/main.cache", b"bytes".to_vec(), metadata.clone())
            .await
            .unwrap();

        assert!(store.exists("cache/proj/main.cache").await.unwrap());
        let (body, read_back) = store.get("cache/proj/main.cache").await.unwrap();
        assert_eq!(body, b"bytes");
        assert_eq!(read_back, metadata);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemStore::new(dir.path().to_path_buf());

        store
            .put("cache/k.cache", b"data".to_vec(), HashMap::new())
            .await
            .unwrap();
        store.delete("cache/k.cache").await.unwrap();
        assert!(!store.exists("cache/k.cache").await.unwrap());
        // Second delete of an absent object still succeeds.
        store.delete("cache/k.cache").await.unwrap();
        assert!(!store.exists("cache/k.cache").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_object_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemStore::new(dir.path().to_path_buf());
        assert!(store.get("cache/absent.cache").await.is_err());
    }
}
