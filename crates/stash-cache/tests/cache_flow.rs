//! End-to-end save, restore, and fallback flows against the filesystem
//! object store.

use stash_cache::types::{META_COMPRESSION, META_HASH};
use stash_cache::{CacheKey, CacheStore, CompressionScheme, FilesystemStore, restore_with_fallback};
use stash_core::Error;
use stash_core::ports::ObjectStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    _store_dir: TempDir,
    raw: Arc<FilesystemStore>,
    store: CacheStore,
}

fn harness() -> Harness {
    let store_dir = tempfile::tempdir().unwrap();
    let raw = Arc::new(FilesystemStore::new(store_dir.path().to_path_buf()));
    let store = CacheStore::new(raw.clone());
    Harness {
        _store_dir: store_dir,
        raw,
        store,
    }
}

fn key(branch: &str) -> CacheKey {
    CacheKey::new(Some("myproj".to_string()), Some(branch.to_string()), None)
}

fn write_workspace(dir: &Path, marker: &str) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir.join("deps")).unwrap();
    std::fs::write(dir.join("deps/lib.bin"), marker.as_bytes()).unwrap();
    std::fs::write(dir.join("manifest.lock"), b"pinned").unwrap();
    vec![PathBuf::from("deps"), PathBuf::from("manifest.lock")]
}

#[tokio::test]
async fn test_save_then_restore_is_byte_identical() {
    let h = harness();
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let paths = write_workspace(src.path(), "main-build");

    h.store
        .save(&paths, src.path(), "sha256", CompressionScheme::Gzip, &key("main"))
        .await
        .unwrap();

    let restored = h.store.restore(&key("main"), dest.path()).await.unwrap();
    assert!(restored);
    assert_eq!(
        std::fs::read(dest.path().join("deps/lib.bin")).unwrap(),
        b"main-build"
    );
    assert_eq!(
        std::fs::read(dest.path().join("manifest.lock")).unwrap(),
        b"pinned"
    );
}

#[tokio::test]
async fn test_saved_metadata_reads_back_exactly() {
    let h = harness();
    let src = tempfile::tempdir().unwrap();
    let paths = write_workspace(src.path(), "x");

    h.store
        .save(&paths, src.path(), "SHA256", CompressionScheme::Gzip, &key("main"))
        .await
        .unwrap();

    let (_, metadata) = h.raw.get(&key("main").object_key()).await.unwrap();
    // Canonical name is stored even when the caller spelled it differently.
    assert_eq!(metadata.get(META_HASH).map(String::as_str), Some("sha256"));
    assert_eq!(
        metadata.get(META_COMPRESSION).map(String::as_str),
        Some("gzip")
    );
}

#[tokio::test]
async fn test_restore_uses_stored_compression_not_caller_default() {
    let h = harness();
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let paths = write_workspace(src.path(), "lz4-build");

    h.store
        .save(&paths, src.path(), "sha512", CompressionScheme::Lz4, &key("main"))
        .await
        .unwrap();

    // Restore takes no scheme argument at all; the archive describes itself.
    assert!(h.store.restore(&key("main"), dest.path()).await.unwrap());
    assert_eq!(
        std::fs::read(dest.path().join("deps/lib.bin")).unwrap(),
        b"lz4-build"
    );
}

#[tokio::test]
async fn test_unsupported_hash_fails_before_upload() {
    let h = harness();
    let src = tempfile::tempdir().unwrap();
    let paths = write_workspace(src.path(), "x");

    let err = h
        .store
        .save(&paths, src.path(), "crc32", CompressionScheme::Gzip, &key("main"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedHash { .. }));

    // Nothing was uploaded.
    assert!(!h.raw.exists(&key("main").object_key()).await.unwrap());
}

#[tokio::test]
async fn test_restore_missing_key_is_not_an_error() {
    let h = harness();
    let dest = tempfile::tempdir().unwrap();
    let restored = h.store.restore(&key("never-built"), dest.path()).await.unwrap();
    assert!(!restored);
}

#[tokio::test]
async fn test_corrupt_metadata_is_distinct_from_absence() {
    let h = harness();
    let dest = tempfile::tempdir().unwrap();

    h.raw
        .put(
            &key("main").object_key(),
            b"not an archive".to_vec(),
            HashMap::from([
                (META_HASH.to_string(), "whirlpool".to_string()),
                (META_COMPRESSION.to_string(), "gzip".to_string()),
            ]),
        )
        .await
        .unwrap();

    let err = h.store.restore(&key("main"), dest.path()).await.unwrap_err();
    assert!(matches!(err, Error::CorruptMetadata { .. }));
}

#[tokio::test]
async fn test_fallback_restores_base_branch_content() {
    let h = harness();
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let paths = write_workspace(src.path(), "base-build");

    h.store
        .save(&paths, src.path(), "sha256", CompressionScheme::Gzip, &key("master"))
        .await
        .unwrap();

    let primary = key("feature/new-thing");
    let base = primary.with_branch("master");
    let restored = restore_with_fallback(&h.store, &primary, Some(&base), dest.path())
        .await
        .unwrap();

    assert!(restored);
    assert_eq!(
        std::fs::read(dest.path().join("deps/lib.bin")).unwrap(),
        b"base-build"
    );
}

#[tokio::test]
async fn test_fallback_both_absent_returns_false() {
    let h = harness();
    let dest = tempfile::tempdir().unwrap();

    let primary = key("feature");
    let base = primary.with_branch("master");
    let restored = restore_with_fallback(&h.store, &primary, Some(&base), dest.path())
        .await
        .unwrap();
    assert!(!restored);
}

#[tokio::test]
async fn test_corrupt_primary_never_falls_back() {
    let h = harness();
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();

    // A perfectly good base cache...
    let paths = write_workspace(src.path(), "base-build");
    h.store
        .save(&paths, src.path(), "sha256", CompressionScheme::Gzip, &key("master"))
        .await
        .unwrap();

    // ...and a primary whose metadata cannot be interpreted.
    let primary = key("feature");
    h.raw
        .put(
            &primary.object_key(),
            b"bytes".to_vec(),
            HashMap::from([
                (META_HASH.to_string(), "sha256".to_string()),
                (META_COMPRESSION.to_string(), "zpaq".to_string()),
            ]),
        )
        .await
        .unwrap();

    let base = primary.with_branch("master");
    let err = restore_with_fallback(&h.store, &primary, Some(&base), dest.path())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CorruptMetadata { .. }));

    // Nothing from the base cache landed in dest.
    assert!(!dest.path().join("deps").exists());
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let h = harness();
    let src = tempfile::tempdir().unwrap();
    let paths = write_workspace(src.path(), "x");

    h.store
        .save(&paths, src.path(), "sha256", CompressionScheme::Gzip, &key("main"))
        .await
        .unwrap();

    h.store.clear(&key("main")).await.unwrap();
    assert!(!h.raw.exists(&key("main").object_key()).await.unwrap());
    h.store.clear(&key("main")).await.unwrap();
    assert!(!h.raw.exists(&key("main").object_key()).await.unwrap());
}
