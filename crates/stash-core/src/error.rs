//! Error types for stash.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Save errors
    #[error("Unsupported hash algorithm \"{name}\" (valid: {})", .valid.join(", "))]
    UnsupportedHash { name: String, valid: Vec<String> },

    #[error("Failed to build archive: {0}")]
    Archive(String),

    // Restore errors
    #[error("Corrupt metadata on cache object {key}: {detail}")]
    CorruptMetadata { key: String, detail: String },

    #[error("Failed to unpack archive: {0}")]
    Unpack(String),

    // Infrastructure errors
    #[error("Object store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
