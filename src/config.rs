//! Tracker configuration.
//!
//! The configuration lives in a TOML document at `.deft/config` under the
//! storage root. Overrides arrive as a [`ConfigOverrides`] value with one
//! optional field per setting; merging is an explicit `apply` call rather
//! than any dynamic key juggling.

use crate::storage::FileStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marker directory that signals an initialised tracker.
pub const CONFIG_DIR: &str = ".deft";

/// Location of the persisted configuration document.
pub const CONFIG_FILE: &str = ".deft/config";

/// Where feature files live unless configured otherwise.
pub const DEFAULT_DATA_DIR: &str = ".deft/data";

/// On-disk format version written into new configurations.
pub const FORMAT_VERSION: &str = "0.1";

/// Status given to newly created features unless configured otherwise.
pub const DEFAULT_INITIAL_STATUS: &str = "new";

/// Persisted tracker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// On-disk format version tag.
    #[serde(default = "default_format")]
    pub format: String,

    /// Directory holding feature files, relative to the storage root.
    #[serde(default = "default_datadir")]
    pub datadir: PathBuf,

    /// Default status for features created without an explicit one.
    #[serde(default = "default_initial_status")]
    pub initial_status: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            datadir: default_datadir(),
            initial_status: default_initial_status(),
        }
    }
}

impl TrackerConfig {
    /// Loads the configuration document from storage.
    ///
    /// # Errors
    /// Returns an error if the document is missing or malformed.
    pub fn load(storage: &FileStorage) -> Result<Self> {
        storage.load_record(CONFIG_FILE)
    }

    /// Persists the configuration document to storage.
    ///
    /// # Errors
    /// Returns an error if the document cannot be written.
    pub fn save(&self, storage: &FileStorage) -> Result<()> {
        storage.save_record(CONFIG_FILE, self)
    }

    /// Merges `overrides` into this configuration. Fields left as `None`
    /// keep their current value.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(datadir) = &overrides.datadir {
            self.datadir.clone_from(datadir);
        }
        if let Some(initial_status) = &overrides.initial_status {
            self.initial_status.clone_from(initial_status);
        }
    }
}

/// Optional per-setting overrides supplied by `init` and `configure`.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replacement data directory, if any.
    pub datadir: Option<PathBuf>,
    /// Replacement initial status, if any.
    pub initial_status: Option<String>,
}

/// Default for the `format` field.
fn default_format() -> String {
    FORMAT_VERSION.to_string()
}

/// Default for the `datadir` field.
fn default_datadir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

/// Default for the `initial_status` field.
fn default_initial_status() -> String {
    DEFAULT_INITIAL_STATUS.to_string()
}
