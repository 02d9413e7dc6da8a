//! `deft purge` — delete features.

use crate::output;
use crate::storage::FileStorage;
use crate::tracker::FeatureTracker;
use anyhow::Result;

/// Purges each named feature, renumbering the buckets they leave behind.
///
/// # Errors
/// Fails on the first name that matches no feature; features purged before
/// the failure stay purged.
pub fn execute(storage: FileStorage, names: &[String]) -> Result<()> {
    let mut tracker = FeatureTracker::load(storage)?;
    for name in names {
        tracker.purge(name)?;
        output::verbose(&format!("purged feature {name}"));
    }
    tracker.save()
}
