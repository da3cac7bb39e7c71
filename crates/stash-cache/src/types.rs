//! Compression schemes and archive metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key carrying the hash algorithm's canonical name.
pub const META_HASH: &str = "hash";
/// Metadata key carrying the compression scheme's canonical name.
pub const META_COMPRESSION: &str = "compression";

/// Compression scheme applied to the tar stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionScheme {
    #[default]
    Gzip,
    Lz4,
}

impl CompressionScheme {
    /// Canonical lowercase name, used both in CLI flags and object metadata.
    pub fn as_name(&self) -> &'static str {
        match self {
            CompressionScheme::Gzip => "gzip",
            CompressionScheme::Lz4 => "lz4",
        }
    }

    /// Inverse of [`as_name`](Self::as_name); `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "gzip" => Some(CompressionScheme::Gzip),
            "lz4" => Some(CompressionScheme::Lz4),
            _ => None,
        }
    }
}

/// Metadata attached to an uploaded cache object.
///
/// Both fields are canonical lowercase names. On restore they select the
/// decode path before any byte of the archive is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMetadata {
    pub hash: String,
    pub compression: String,
}

impl ArchiveMetadata {
    pub fn new(hash: impl Into<String>, compression: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            compression: compression.into(),
        }
    }

    /// Render as the object-store metadata map.
    pub fn into_map(self) -> HashMap<String, String> {
        HashMap::from([
            (META_HASH.to_string(), self.hash),
            (META_COMPRESSION.to_string(), self.compression),
        ])
    }

    /// Read back from an object-store metadata map, ignoring unknown keys.
    /// `None` when either required entry is missing.
    pub fn from_map(map: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            hash: map.get(META_HASH)?.clone(),
            compression: map.get(META_COMPRESSION)?.clone(),
        })
    }
}
