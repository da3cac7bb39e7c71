//! Branch fallback policy for restores.

use crate::keys::CacheKey;
use crate::store::CacheStore;
use stash_core::Result;
use std::path::Path;
use tracing::info;

/// Restore `primary`, falling back to `base` only on a confirmed miss.
///
/// A corrupt object or a store failure on the primary key is a hard error:
/// the object's presence is established (or unknown), so absence-driven
/// fallback would mask real problems. Only `Ok(false)` from the primary
/// restore is fallback-eligible. Returns whether either key restored.
pub async fn restore_with_fallback(
    store: &CacheStore,
    primary: &CacheKey,
    base: Option<&CacheKey>,
    dest: &Path,
) -> Result<bool> {
    if store.restore(primary, dest).await? {
        return Ok(true);
    }

    match base {
        Some(base) => {
            info!(
                key = %base.object_key(),
                "Primary cache missed, trying base branch"
            );
            store.restore(base, dest).await
        }
        None => Ok(false),
    }
}
