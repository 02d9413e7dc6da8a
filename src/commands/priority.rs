//! `deft priority` — query or change a feature's priority.

use crate::storage::FileStorage;
use crate::tracker::FeatureTracker;
use anyhow::Result;

/// With a new priority, moves the feature to that rank within its bucket
/// (clamped to the bucket's bounds); without one, prints the current
/// priority.
///
/// # Errors
/// Fails if the tracker is not initialised or no feature has that name.
pub fn execute(storage: FileStorage, name: &str, new_priority: Option<i64>) -> Result<()> {
    let mut tracker = FeatureTracker::load(storage)?;
    match new_priority {
        Some(priority) => {
            tracker.change_priority(name, priority)?;
            tracker.save()
        }
        None => {
            println!("{}", tracker.feature_named(name)?.priority());
            Ok(())
        }
    }
}
