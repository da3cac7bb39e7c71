//! Git branch discovery.

use async_trait::async_trait;
use stash_core::ports::BranchSource;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Resolves the current branch by shelling out to `git`.
pub struct GitBranchSource;

#[async_trait]
impl BranchSource for GitBranchSource {
    async fn current_branch(&self, repo_dir: Option<&Path>) -> Option<String> {
        let mut cmd = Command::new("git");
        cmd.args(["rev-parse", "--abbrev-ref", "HEAD"]);
        if let Some(dir) = repo_dir {
            cmd.current_dir(dir);
        }

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) => {
                debug!(error = %e, "git is not available");
                return None;
            }
        };
        if !output.status.success() {
            debug!("Not inside a git repository");
            return None;
        }

        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if branch.is_empty() { None } else { Some(branch) }
    }
}
