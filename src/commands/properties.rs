//! `deft properties` — query, change or edit a feature's property table.

use crate::storage::FileStorage;
use crate::tracker::FeatureTracker;
use crate::utils::editor;
use anyhow::{Context, Result};
use std::io::{self, Write};

/// Handles the properties subcommand.
///
/// `--edit` opens the properties file in the user's editor, `--file` prints
/// its path, `--set KEY VALUE` pairs update individual properties, and with
/// none of those the whole table is printed as TOML.
///
/// # Errors
/// Fails if the tracker is not initialised, no feature has that name, or the
/// editor cannot be run.
pub fn execute(
    storage: FileStorage,
    name: &str,
    set: &[String],
    edit: bool,
    file: bool,
) -> Result<()> {
    let mut tracker = FeatureTracker::load(storage)?;
    tracker.feature_named(name)?;
    let properties_file = tracker.properties_file(name);

    if edit {
        tracker.save()?;
        return editor::edit_file(&properties_file);
    }
    if file {
        println!("{}", properties_file.display());
        return Ok(());
    }

    if set.is_empty() {
        let properties = tracker.feature_named(name)?.properties();
        let rendered =
            toml::to_string_pretty(properties).context("failed to encode properties")?;
        io::stdout().write_all(rendered.as_bytes())?;
        return Ok(());
    }

    for pair in set.chunks_exact(2) {
        tracker.set_property(name, &pair[0], parse_value(&pair[1]))?;
    }
    tracker.save()
}

/// Interprets a command-line value as a TOML value, falling back to a plain
/// string when it does not parse as one (so `5` is an integer, `true` a
/// boolean, and `high` a string).
fn parse_value(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("value = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}
