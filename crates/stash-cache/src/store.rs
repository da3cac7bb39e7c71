//! Save, restore, and clear flows over the object-store boundary.

use crate::archiver;
use crate::hashing::{self, HashingWriter};
use crate::keys::CacheKey;
use crate::types::{ArchiveMetadata, CompressionScheme};
use stash_core::ports::ObjectStore;
use stash_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates archive construction and the object-store calls.
///
/// Holds no state between calls; the remote object is the only persistent
/// artifact. Conflicting concurrent saves to one key are last-write-wins at
/// the store layer, which is acceptable for idempotently rebuilt CI caches.
pub struct CacheStore {
    store: Arc<dyn ObjectStore>,
}

impl CacheStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Pack `paths`, digest the compressed stream, and upload under `key`.
    ///
    /// The hash name is resolved before any byte is packed or uploaded, so
    /// an unsupported name can never leave a partial object behind. The
    /// digest covers the compressed bytes as stored.
    pub async fn save(
        &self,
        paths: &[PathBuf],
        base_dir: &Path,
        hash_name: &str,
        scheme: CompressionScheme,
        key: &CacheKey,
    ) -> Result<()> {
        let algorithm = hashing::resolve(hash_name)?;
        let object_key = key.object_key();

        let writer = HashingWriter::new(Vec::new(), algorithm);
        let writer = archiver::pack(writer, paths, base_dir, scheme)?;
        let (body, digest) = writer.finalize();

        info!(
            key = %object_key,
            size = body.len(),
            hash = algorithm.name,
            digest = %digest,
            compression = scheme.as_name(),
            "Uploading cache archive"
        );

        let metadata = ArchiveMetadata::new(algorithm.name, scheme.as_name());
        self.store.put(&object_key, body, metadata.into_map()).await
    }

    /// Download the object at `key` and unpack it into `dest`.
    ///
    /// `Ok(false)` means no object exists, an expected outcome on a first
    /// run. The decode path comes from the stored metadata, never from the
    /// invoking configuration, so archives saved with other defaults still
    /// restore. Unrecognized metadata is `CorruptMetadata`, distinct from
    /// absence.
    pub async fn restore(&self, key: &CacheKey, dest: &Path) -> Result<bool> {
        let object_key = key.object_key();
        if !self.store.exists(&object_key).await? {
            debug!(key = %object_key, "No cache object found");
            return Ok(false);
        }

        let (body, metadata) = self.store.get(&object_key).await?;
        let metadata =
            ArchiveMetadata::from_map(&metadata).ok_or_else(|| Error::CorruptMetadata {
                key: object_key.clone(),
                detail: "missing hash or compression entry".to_string(),
            })?;
        let scheme = CompressionScheme::from_name(&metadata.compression).ok_or_else(|| {
            Error::CorruptMetadata {
                key: object_key.clone(),
                detail: format!("unrecognized compression \"{}\"", metadata.compression),
            }
        })?;
        hashing::resolve(&metadata.hash).map_err(|_| Error::CorruptMetadata {
            key: object_key.clone(),
            detail: format!("unrecognized hash algorithm \"{}\"", metadata.hash),
        })?;

        info!(
            key = %object_key,
            size = body.len(),
            compression = scheme.as_name(),
            dest = %dest.display(),
            "Restoring cache archive"
        );
        archiver::unpack(body.as_slice(), scheme, dest)?;
        Ok(true)
    }

    /// Delete the object at `key`. Absence is success, so clear is
    /// idempotent.
    pub async fn clear(&self, key: &CacheKey) -> Result<()> {
        let object_key = key.object_key();
        info!(key = %object_key, "Deleting cache object");
        self.store.delete(&object_key).await
    }
}
