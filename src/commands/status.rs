//! `deft status` — query or change a feature's status.

use crate::storage::FileStorage;
use crate::tracker::FeatureTracker;
use anyhow::Result;

/// With a new status, moves the feature into that bucket; without one,
/// prints the feature's current status.
///
/// # Errors
/// Fails if the tracker is not initialised or no feature has that name.
pub fn execute(storage: FileStorage, name: &str, new_status: Option<&str>) -> Result<()> {
    let mut tracker = FeatureTracker::load(storage)?;
    match new_status {
        Some(status) => {
            tracker.change_status(name, status)?;
            tracker.save()
        }
        None => {
            println!("{}", tracker.feature_named(name)?.status());
            Ok(())
        }
    }
}
