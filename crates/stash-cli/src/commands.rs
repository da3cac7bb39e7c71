//! CLI command definitions.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Package paths and upload them to the cache
    Save(SaveArgs),

    /// Download the cache and unpack it
    Restore(RestoreArgs),

    /// Delete the cache object
    Clear(ClearArgs),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args)]
pub struct SaveArgs {
    /// Path to include in the archive (repeatable)
    #[arg(short = 'P', long = "path")]
    pub paths: Vec<PathBuf>,

    /// Hash algorithm for the archive digest
    #[arg(long)]
    pub hash: Option<String>,

    /// Compression scheme (gzip or lz4)
    #[arg(short, long)]
    pub compression: Option<String>,

    #[command(subcommand)]
    pub tool: Option<ToolCommands>,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// Base branch to fall back to when this branch has no cache
    #[arg(long)]
    pub base_branch: Option<String>,

    /// Directory to unpack into
    #[arg(long, default_value = ".")]
    pub dest: PathBuf,

    #[command(subcommand)]
    pub tool: Option<ToolCommands>,
}

#[derive(Args)]
pub struct ClearArgs {
    #[command(subcommand)]
    pub tool: Option<ToolCommands>,
}

/// Build-tool variants that augment the path list and namespace the key
/// with their own suffix.
#[derive(Subcommand)]
pub enum ToolCommands {
    /// Include the stack global state (stack root)
    Stack {
        #[command(subcommand)]
        command: Option<StackCommands>,
    },
}

#[derive(Subcommand)]
pub enum StackCommands {
    /// Include the project's .stack-work directories instead
    Work,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
}
