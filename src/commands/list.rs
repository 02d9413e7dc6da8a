//! `deft list` — list features in priority order.

use crate::output::{self, FeatureRow};
use crate::storage::FileStorage;
use crate::tracker::FeatureTracker;
use anyhow::Result;
use std::io::{self, Write};

/// Prints tracked features, either all of them grouped by status or only the
/// requested status buckets in the order given.
///
/// # Errors
/// Fails if the tracker is not initialised or features cannot be read.
pub fn execute(storage: FileStorage, statuses: &[String], csv: bool) -> Result<()> {
    let mut tracker = FeatureTracker::load(storage)?;

    let rows: Vec<FeatureRow> = if statuses.is_empty() {
        tracker
            .all_features()?
            .iter()
            .map(|f| (f.status().to_string(), f.priority(), f.name().to_string()))
            .collect()
    } else {
        let mut rows = Vec::new();
        for status in statuses {
            let bucket = tracker.features_with_status(status)?;
            for (index, name) in bucket.iter().enumerate() {
                rows.push((status.clone(), index + 1, name.to_string()));
            }
        }
        rows
    };

    let rendered = if csv {
        output::format_as_csv(&rows)
    } else {
        output::format_as_text(&rows)
    };
    io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}
