//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the cache core and external
//! adapters: the remote object store holding cache archives and the version
//! control system supplying the current branch name.

use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Remote object store holding cache archives.
///
/// A key addresses exactly one object plus a string-to-string metadata map.
/// Readers must ignore metadata keys they do not understand.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check whether an object exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Upload an object, replacing any previous object at `key`.
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: HashMap<String, String>,
    ) -> Result<()>;

    /// Download an object and its metadata.
    async fn get(&self, key: &str) -> Result<(Vec<u8>, HashMap<String, String>)>;

    /// Delete the object at `key`. Deleting an absent object is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Version control lookup for the current branch name.
#[async_trait]
pub trait BranchSource: Send + Sync {
    /// Name of the checked-out branch, or `None` when it cannot be
    /// determined (not a repository, tool missing). Never fails hard.
    async fn current_branch(&self, repo_dir: Option<&Path>) -> Option<String>;
}
