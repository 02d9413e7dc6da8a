//! `deft description` — query, change or edit a feature's description.

use crate::storage::FileStorage;
use crate::tracker::FeatureTracker;
use crate::utils::editor;
use anyhow::Result;
use std::io::{self, Write};

/// Handles the description subcommand.
///
/// A positional description replaces the stored one. `--edit` then opens the
/// description file in the user's editor, `--file` prints its path, and with
/// no arguments at all the current description is written to stdout as-is.
///
/// # Errors
/// Fails if the tracker is not initialised, no feature has that name, or the
/// editor cannot be run.
pub fn execute(
    storage: FileStorage,
    name: &str,
    new_description: Option<&str>,
    edit: bool,
    file: bool,
) -> Result<()> {
    let mut tracker = FeatureTracker::load(storage)?;
    tracker.feature_named(name)?;

    if let Some(description) = new_description {
        tracker.set_description(name, description)?;
    }
    let description_file = tracker.description_file(name);
    let description = tracker.feature_named(name)?.description().to_string();
    tracker.save()?;

    if edit {
        editor::edit_file(&description_file)?;
    } else if file {
        println!("{}", description_file.display());
    } else if new_description.is_none() {
        io::stdout().write_all(description.as_bytes())?;
    }
    Ok(())
}
