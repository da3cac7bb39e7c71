//! CLI configuration management.

use serde::{Deserialize, Serialize};
use stash_cache::CompressionScheme;
use std::path::PathBuf;

/// CLI configuration. Every field can be overridden by a command-line flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// S3 bucket holding cache objects.
    pub bucket: Option<String>,
    /// Local object-store directory, used instead of S3 when set.
    pub store_dir: Option<PathBuf>,
    /// Namespace prefix for cache keys.
    pub prefix: Option<String>,
    /// Base branch used for restore fallback.
    pub base_branch: Option<String>,
    /// Default hash algorithm.
    #[serde(default = "default_hash")]
    pub hash: String,
    /// Default compression scheme.
    #[serde(default)]
    pub compression: CompressionScheme,
}

fn default_hash() -> String {
    "sha256".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            store_dir: None,
            prefix: None,
            base_branch: None,
            hash: default_hash(),
            compression: CompressionScheme::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from file.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dirs = directories::ProjectDirs::from("dev", "stash-ci", "stash")
            .ok_or("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.yaml"))
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "bucket" => self.bucket = Some(value.to_string()),
            "store_dir" => self.store_dir = Some(PathBuf::from(value)),
            "prefix" => self.prefix = Some(value.to_string()),
            "base_branch" => self.base_branch = Some(value.to_string()),
            "hash" => self.hash = value.to_string(),
            "compression" => {
                self.compression = CompressionScheme::from_name(value)
                    .ok_or_else(|| format!("Invalid compression scheme: {}", value))?;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}
