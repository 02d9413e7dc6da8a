#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Priorities are small dense ranks
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # Deft - the Distributed, Easy Feature Tracker
//!
//! Deft is a local, file-backed tracker of discrete work items ("features").
//! Each feature carries a status, a priority rank that is dense within its
//! status (a bucket of N features always uses exactly the ranks 1..=N), a
//! free-text description, and a TOML table of properties.
//!
//! Everything lives in plain files under a `.deft/` directory, so a tracker
//! can ship inside the repository of the project it tracks.
//!
//! ## Architecture
//!
//! - [`storage`]: the file-table abstraction every other module builds on
//! - [`tracker`]: the session-scoped [`tracker::FeatureTracker`] with its
//!   load cache and dirty set, plus the [`tracker::bucket`] reordering engine
//! - [`config`]: tracker configuration and override merging
//! - [`error`]: the [`error::UserError`] taxonomy for expected failures
//! - [`commands`]: CLI command implementations
//! - [`output`]: listing renderers and verbosity-gated printing
//! - [`utils`]: external editor invocation
//!
//! ## Example Usage
//!
//! ```no_run
//! use deft::config::ConfigOverrides;
//! use deft::storage::FileStorage;
//! use deft::tracker::FeatureTracker;
//!
//! # fn main() -> anyhow::Result<()> {
//! let storage = FileStorage::new("/path/to/project");
//! let mut tracker = FeatureTracker::init(storage, &ConfigOverrides::default())?;
//!
//! tracker.create("autosave", None, "save the document periodically")?;
//! tracker.change_status("autosave", "in-progress")?;
//! tracker.save()?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands module containing all CLI command implementations.
pub mod commands;

/// Tracker configuration and override merging.
pub mod config;

/// Expected, user-actionable error values.
pub mod error;

/// Output formatting and listing renderers.
pub mod output;

/// File storage substrate.
pub mod storage;

/// The feature tracker and its priority-bucket engine.
pub mod tracker;

/// Utility functions and helpers.
pub mod utils;

/// Current version of the deft binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
