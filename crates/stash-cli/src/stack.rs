//! Stack tool path discovery.
//!
//! The stack variants augment the caller's path list with tool-owned
//! directories: the global stack root for `save stack`, and each local
//! package's `.stack-work` for `save stack work`.

use stash_core::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Key suffix for the stack global cache.
pub const STACK_SUFFIX: &str = "stack";
/// Key suffix for the per-project .stack-work cache.
pub const STACK_WORK_SUFFIX: &str = "stack-work";

/// Global stack root, from `stack path --stack-root`.
pub async fn stack_root_paths() -> Result<Vec<PathBuf>> {
    let output = Command::new("stack")
        .args(["path", "--stack-root"])
        .output()
        .await
        .map_err(|e| Error::Internal(format!("Failed to run stack: {}", e)))?;
    if !output.status.success() {
        return Err(Error::Internal(
            "stack path --stack-root failed; is stack installed?".to_string(),
        ));
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() {
        return Err(Error::Internal("stack reported an empty stack root".to_string()));
    }
    debug!(root = %root, "Discovered stack root");
    Ok(vec![PathBuf::from(root)])
}

/// `.stack-work` directories of the local packages listed in `stack.yaml`.
///
/// A missing `stack.yaml` or one without a `packages:` list means a single
/// package in the project root, mirroring stack's own default.
pub fn stack_work_paths(project_dir: &Path) -> Result<Vec<PathBuf>> {
    let config = project_dir.join("stack.yaml");
    let packages: Vec<String> = if config.exists() {
        let raw = std::fs::read_to_string(&config)?;
        let doc: serde_yaml::Value = serde_yaml::from_str(&raw)
            .map_err(|e| Error::Internal(format!("Invalid stack.yaml: {}", e)))?;
        match doc.get("packages") {
            Some(serde_yaml::Value::Sequence(entries)) => entries
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            _ => vec![".".to_string()],
        }
    } else {
        vec![".".to_string()]
    };

    Ok(packages
        .into_iter()
        .map(|package| project_dir.join(package).join(".stack-work"))
        .collect())
}
