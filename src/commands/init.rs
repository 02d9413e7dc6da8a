//! `deft init` — initialise an empty tracker.

use crate::config::ConfigOverrides;
use crate::output;
use crate::storage::FileStorage;
use crate::tracker::FeatureTracker;
use anyhow::Result;

/// Initialises a new tracker under `storage`'s root.
///
/// # Errors
/// Fails if a tracker is already initialised there, or on I/O failure.
pub fn execute(storage: FileStorage, overrides: &ConfigOverrides) -> Result<()> {
    FeatureTracker::init(storage, overrides)?;
    output::info("initialised deft tracker");
    Ok(())
}
