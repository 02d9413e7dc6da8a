//! `deft create` — create a new feature.

use crate::output;
use crate::storage::FileStorage;
use crate::tracker::FeatureTracker;
use crate::utils::editor;
use anyhow::Result;

/// Creates a feature, optionally repositioning it and opening an editor on
/// its description.
///
/// The feature lands at the lowest-priority end of its bucket; an explicit
/// `priority` then moves it to that rank. When no `description` is given the
/// user's editor is opened on the (already saved) description file instead.
///
/// # Errors
/// Fails if the tracker is not initialised, the name is already taken, or
/// the editor cannot be run.
pub fn execute(
    storage: FileStorage,
    name: &str,
    status: Option<&str>,
    priority: Option<i64>,
    description: Option<&str>,
) -> Result<()> {
    let mut tracker = FeatureTracker::load(storage)?;
    tracker.create(name, status, description.unwrap_or(""))?;
    if let Some(priority) = priority {
        tracker.change_priority(name, priority)?;
    }
    // Save before any editing so the editor works on the persisted file and
    // save() cannot clobber what the user typed.
    let description_file = tracker.description_file(name);
    tracker.save()?;

    output::verbose(&format!("created feature {name}"));
    if description.is_none() {
        editor::edit_file(&description_file)?;
    }
    Ok(())
}
