//! Command handlers mapping CLI actions onto the cache store.
//!
//! Each handler consumes one action and runs it to completion. Failures
//! propagate as result values; exit-code translation happens once, in main.

use crate::config::CliConfig;
use crate::stack;
use console::style;
use stash_cache::{CacheKey, CacheStore, CompressionScheme, restore_with_fallback};
use stash_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Save `paths` under `key`.
pub async fn save(
    store: &CacheStore,
    key: &CacheKey,
    paths: &[PathBuf],
    base_dir: &Path,
    hash: &str,
    scheme: CompressionScheme,
) -> Result<()> {
    store.save(paths, base_dir, hash, scheme, key).await?;
    println!("{} Saved cache {}", style("✓").green(), key.object_key());
    Ok(())
}

/// Save the stack global state: caller paths plus the stack root, under the
/// `stack` suffix.
pub async fn save_stack(
    store: &CacheStore,
    key: &CacheKey,
    paths: &[PathBuf],
    base_dir: &Path,
    hash: &str,
    scheme: CompressionScheme,
) -> Result<()> {
    let mut paths = paths.to_vec();
    paths.extend(stack::stack_root_paths().await?);
    save(
        store,
        &key.with_suffix(stack::STACK_SUFFIX),
        &paths,
        base_dir,
        hash,
        scheme,
    )
    .await
}

/// Save the project's .stack-work directories under the `stack-work`
/// suffix.
pub async fn save_stack_work(
    store: &CacheStore,
    key: &CacheKey,
    paths: &[PathBuf],
    base_dir: &Path,
    hash: &str,
    scheme: CompressionScheme,
) -> Result<()> {
    let mut paths = paths.to_vec();
    paths.extend(stack::stack_work_paths(base_dir)?);
    save(
        store,
        &key.with_suffix(stack::STACK_WORK_SUFFIX),
        &paths,
        base_dir,
        hash,
        scheme,
    )
    .await
}

/// Restore `key` into `dest`, falling back to the base branch's key when
/// one is configured and the primary misses.
pub async fn restore(
    store: &CacheStore,
    key: &CacheKey,
    base_branch: Option<&str>,
    dest: &Path,
) -> Result<bool> {
    // The base key shares prefix and suffix; only the branch differs.
    let base = base_branch.map(|branch| key.with_branch(branch));
    let restored = restore_with_fallback(store, key, base.as_ref(), dest).await?;
    if restored {
        println!("{} Restored cache {}", style("✓").green(), key.object_key());
    } else {
        println!(
            "{} No cache found for {}",
            style("!").yellow(),
            key.object_key()
        );
    }
    Ok(restored)
}

pub async fn restore_stack(
    store: &CacheStore,
    key: &CacheKey,
    base_branch: Option<&str>,
    dest: &Path,
) -> Result<bool> {
    restore(store, &key.with_suffix(stack::STACK_SUFFIX), base_branch, dest).await
}

pub async fn restore_stack_work(
    store: &CacheStore,
    key: &CacheKey,
    base_branch: Option<&str>,
    dest: &Path,
) -> Result<bool> {
    restore(
        store,
        &key.with_suffix(stack::STACK_WORK_SUFFIX),
        base_branch,
        dest,
    )
    .await
}

/// Delete the object at `key`. Absence is not an error.
pub async fn clear(store: &CacheStore, key: &CacheKey) -> Result<()> {
    store.clear(key).await?;
    println!("{} Cleared cache {}", style("✓").green(), key.object_key());
    Ok(())
}

pub async fn clear_stack(store: &CacheStore, key: &CacheKey) -> Result<()> {
    clear(store, &key.with_suffix(stack::STACK_SUFFIX)).await
}

pub async fn clear_stack_work(store: &CacheStore, key: &CacheKey) -> Result<()> {
    clear(store, &key.with_suffix(stack::STACK_WORK_SUFFIX)).await
}

/// Show the current configuration.
pub fn show_config(config: &CliConfig) -> Result<()> {
    let rendered = serde_yaml::to_string(config)
        .map_err(|e| Error::Internal(format!("Failed to render config: {}", e)))?;
    print!("{}", rendered);
    Ok(())
}

/// Set a configuration value and persist it.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = CliConfig::load().map_err(|e| Error::Internal(e.to_string()))?;
    config.set(key, value).map_err(Error::Internal)?;
    config.save().map_err(|e| Error::Internal(e.to_string()))?;
    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}
