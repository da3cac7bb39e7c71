//! stash CLI entrypoint.

use clap::Parser;
use stash_cache::{CacheKey, CacheStore, CompressionScheme, FilesystemStore, GitBranchSource, S3Store};
use stash_core::ports::{BranchSource, ObjectStore};
use stash_core::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod config;
mod handlers;
mod stack;


use commands::{Commands, ConfigCommands, StackCommands, ToolCommands};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "stash")]
#[command(author, version, about = "Build cache synchronization for CI", long_about = None)]
struct Cli {
    /// S3 bucket holding cache objects
    #[arg(long, global = true)]
    bucket: Option<String>,

    /// Local object-store directory, used instead of S3
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Namespace prefix for cache keys
    #[arg(short, long, global = true)]
    prefix: Option<String>,

    /// Branch name; discovered from git when omitted
    #[arg(short, long, global = true)]
    branch: Option<String>,

    /// Repository directory for branch discovery
    #[arg(long, global = true)]
    git_dir: Option<PathBuf>,

    /// Working directory that relative paths resolve against
    #[arg(long, default_value = ".", global = true)]
    work_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load().unwrap_or_default();

    if let Err(err) = run(cli, config).await {
        eprintln!("{} {}", console::style("✗").red(), err);
        std::process::exit(exit_code(&err));
    }
}

/// Exit-code translation happens here and nowhere else; every failure below
/// main is an ordinary result value.
fn exit_code(err: &Error) -> i32 {
    match err {
        Error::UnsupportedHash { .. } => 2,
        Error::CorruptMetadata { .. } => 3,
        _ => 1,
    }
}

async fn run(cli: Cli, config: CliConfig) -> Result<()> {
    let Cli {
        bucket,
        store_dir,
        prefix,
        branch,
        git_dir,
        work_dir,
        command,
    } = cli;

    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Show => handlers::show_config(&config),
            ConfigCommands::Set { key, value } => handlers::set_config(&key, &value),
        },

        Commands::Save(args) => {
            let (store, key) = setup(bucket, store_dir, prefix, branch, git_dir, &config).await?;
            let hash = args.hash.as_deref().unwrap_or(&config.hash);
            let scheme = parse_compression(args.compression.as_deref(), config.compression)?;
            match args.tool {
                None => {
                    handlers::save(&store, &key, &args.paths, &work_dir, hash, scheme).await
                }
                Some(ToolCommands::Stack { command: None }) => {
                    handlers::save_stack(&store, &key, &args.paths, &work_dir, hash, scheme).await
                }
                Some(ToolCommands::Stack {
                    command: Some(StackCommands::Work),
                }) => {
                    handlers::save_stack_work(&store, &key, &args.paths, &work_dir, hash, scheme)
                        .await
                }
            }
        }

        Commands::Restore(args) => {
            let (store, key) = setup(bucket, store_dir, prefix, branch, git_dir, &config).await?;
            let base_branch = args
                .base_branch
                .as_deref()
                .or(config.base_branch.as_deref());
            // A miss is reported by the handler; the exit code stays zero.
            match args.tool {
                None => handlers::restore(&store, &key, base_branch, &args.dest).await?,
                Some(ToolCommands::Stack { command: None }) => {
                    handlers::restore_stack(&store, &key, base_branch, &args.dest).await?
                }
                Some(ToolCommands::Stack {
                    command: Some(StackCommands::Work),
                }) => handlers::restore_stack_work(&store, &key, base_branch, &args.dest).await?,
            };
            Ok(())
        }

        Commands::Clear(args) => {
            let (store, key) = setup(bucket, store_dir, prefix, branch, git_dir, &config).await?;
            match args.tool {
                None => handlers::clear(&store, &key).await,
                Some(ToolCommands::Stack { command: None }) => {
                    handlers::clear_stack(&store, &key).await
                }
                Some(ToolCommands::Stack {
                    command: Some(StackCommands::Work),
                }) => handlers::clear_stack_work(&store, &key).await,
            }
        }
    }
}

/// Build the object store and derive the primary cache key.
///
/// Branch precedence: explicit flag, then git discovery (soft-failing to an
/// absent branch), so running outside a repository still yields a valid key.
async fn setup(
    bucket: Option<String>,
    store_dir: Option<PathBuf>,
    prefix: Option<String>,
    branch: Option<String>,
    git_dir: Option<PathBuf>,
    config: &CliConfig,
) -> Result<(CacheStore, CacheKey)> {
    let store: Arc<dyn ObjectStore> =
        if let Some(dir) = store_dir.or_else(|| config.store_dir.clone()) {
            Arc::new(FilesystemStore::new(dir))
        } else if let Some(bucket) = bucket.or_else(|| config.bucket.clone()) {
            Arc::new(S3Store::from_env(bucket).await)
        } else {
            return Err(Error::Internal(
                "No object store configured; pass --bucket or --store-dir".to_string(),
            ));
        };

    let branch = match branch {
        Some(branch) => Some(branch),
        None => GitBranchSource.current_branch(git_dir.as_deref()).await,
    };
    let prefix = prefix.or_else(|| config.prefix.clone());

    Ok((CacheStore::new(store), CacheKey::new(prefix, branch, None)))
}

fn parse_compression(
    arg: Option<&str>,
    default: CompressionScheme,
) -> Result<CompressionScheme> {
    match arg {
        Some(name) => CompressionScheme::from_name(name).ok_or_else(|| {
            Error::Internal(format!(
                "Unknown compression scheme \"{}\" (valid: gzip, lz4)",
                name
            ))
        }),
        None => Ok(default),
    }
}
