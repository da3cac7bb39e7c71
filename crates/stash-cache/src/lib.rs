//! Build-cache packaging and synchronization (S3 compatible).
//!
//! Packs local paths into a compressed tar archive, uploads it under a
//! branch-derived key, and restores it later. Archives are self-describing:
//! the hash algorithm and compression scheme travel as object metadata and
//! are re-read on restore, so a restore never trusts the invoking
//! configuration to interpret stored bytes.

pub mod archiver;
pub mod compression;
pub mod fs;
pub mod hashing;
pub mod keys;
pub mod resolver;
pub mod s3;
pub mod store;
pub mod types;
pub mod vcs;

pub use fs::FilesystemStore;
pub use keys::CacheKey;
pub use resolver::restore_with_fallback;
pub use s3::S3Store;
pub use store::CacheStore;
pub use types::{ArchiveMetadata, CompressionScheme};
pub use vcs::GitBranchSource;
