//! `deft configure` — change tracker settings.

use crate::config::ConfigOverrides;
use crate::storage::FileStorage;
use crate::tracker::FeatureTracker;
use anyhow::Result;

/// Merges the given overrides into the tracker configuration. The change is
/// persisted immediately.
///
/// # Errors
/// Fails if the tracker is not initialised or the configuration cannot be
/// written.
pub fn execute(storage: FileStorage, overrides: &ConfigOverrides) -> Result<()> {
    let mut tracker = FeatureTracker::load(storage)?;
    tracker.configure(overrides)?;
    tracker.save()
}
