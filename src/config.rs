//! Configuration types for the pipeline and file staging.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`PipelineConfig`] - How export documents are decoded
//! - [`StorageConfig`] - Where uploads and exports are staged, and how long exports live
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use chatflat::config::{PipelineConfig, StorageConfig};
//!
//! let pipeline = PipelineConfig::new().with_skip_invalid(false);
//!
//! let storage = StorageConfig::new()
//!     .with_export_ttl(Duration::from_secs(300))
//!     .with_cleanup_interval(Duration::from_secs(30));
//! # assert!(!pipeline.skip_invalid);
//! # assert_eq!(storage.export_ttl.as_secs(), 300);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`StorageConfig::import_dir`].
pub const ENV_IMPORT_DIR: &str = "CHATFLAT_IMPORT_DIR";
/// Environment variable overriding [`StorageConfig::export_dir`].
pub const ENV_EXPORT_DIR: &str = "CHATFLAT_EXPORT_DIR";
/// Environment variable overriding [`StorageConfig::export_ttl`], in minutes.
pub const ENV_EXPORT_TTL_MINUTES: &str = "CHATFLAT_EXPORT_TTL_MINUTES";
/// Environment variable overriding [`StorageConfig::cleanup_interval`], in milliseconds.
pub const ENV_CLEANUP_INTERVAL_MS: &str = "CHATFLAT_CLEANUP_INTERVAL_MS";

/// Configuration for decoding export documents.
///
/// Telegram exports are JSON files with a `messages` array. This config
/// controls which field is read and how malformed elements are handled.
///
/// # Example
///
/// ```rust
/// use chatflat::config::PipelineConfig;
///
/// let config = PipelineConfig::new()
///     .with_messages_field("items")
///     .with_skip_invalid(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Skip malformed message elements instead of failing (default: true)
    pub skip_invalid: bool,

    /// Name of the top-level field holding the message list (default: `messages`)
    pub messages_field: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            skip_invalid: true,
            messages_field: "messages".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to skip malformed message elements.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Sets the top-level field holding the message list.
    #[must_use]
    pub fn with_messages_field(mut self, field: impl Into<String>) -> Self {
        self.messages_field = field.into();
        self
    }
}

/// Configuration for staging uploads and exports on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for staged uploads (default: `<tmp>/chatflat/import`)
    pub import_dir: PathBuf,

    /// Directory for produced exports (default: `<tmp>/chatflat/export`)
    pub export_dir: PathBuf,

    /// Age after which an export is swept (default: 10 minutes)
    pub export_ttl: Duration,

    /// Pause between cleanup sweeps (default: 60 seconds)
    pub cleanup_interval: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = std::env::temp_dir().join("chatflat");
        Self {
            import_dir: base.join("import"),
            export_dir: base.join("export"),
            export_ttl: Duration::from_secs(10 * 60),
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

impl StorageConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with both directories under `root`.
    pub fn in_dir(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            import_dir: root.join("import"),
            export_dir: root.join("export"),
            ..Self::default()
        }
    }

    /// Defaults overlaid with the `CHATFLAT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    ///
    /// Numeric values that fail to parse are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_IMPORT_DIR).filter(|v| !v.trim().is_empty()) {
            config.import_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|v| !v.trim().is_empty()) {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(minutes) = parse_number(&lookup, ENV_EXPORT_TTL_MINUTES) {
            config.export_ttl = Duration::from_secs(minutes.saturating_mul(60));
        }
        if let Some(millis) = parse_number(&lookup, ENV_CLEANUP_INTERVAL_MS) {
            config.cleanup_interval = Duration::from_millis(millis);
        }

        config
    }

    /// Sets the upload directory.
    #[must_use]
    pub fn with_import_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.import_dir = dir.into();
        self
    }

    /// Sets the export directory.
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Sets the export time-to-live.
    #[must_use]
    pub fn with_export_ttl(mut self, ttl: Duration) -> Self {
        self.export_ttl = ttl;
        self
    }

    /// Sets the pause between cleanup sweeps.
    #[must_use]
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric setting");
            None
        }
    }
}
