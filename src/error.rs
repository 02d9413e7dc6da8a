//! Expected, user-actionable failures.
//!
//! A [`UserError`] means the user asked for something the tracker cannot do
//! in its current state, not that anything is broken. The CLI boundary prints
//! these as a single line without a backtrace and exits with status 1;
//! everything else (I/O failures, corrupt records) propagates as a plain
//! `anyhow::Error` chain.
//!
//! The display strings are a contract: callers and tests match on the
//! substrings "already initialised", "not initialised", "already exists" and
//! "no feature named".

use thiserror::Error;

/// Errors caused by user actions rather than internal failures.
#[derive(Debug, Error)]
pub enum UserError {
    /// `init` was run inside an already-initialised tracker.
    #[error("tracker already initialised in directory {0}")]
    AlreadyInitialised(String),

    /// A tracker operation was run where no tracker has been initialised.
    #[error("tracker not initialised: no {0} directory found (run `deft init` first)")]
    NotInitialised(String),

    /// `create` was given a name that is already taken.
    #[error("a feature already exists with name: {0}")]
    FeatureAlreadyExists(String),

    /// A feature was looked up by a name that matches nothing in storage.
    #[error("no feature named {0}")]
    NoFeatureNamed(String),

    /// No editor could be resolved from the environment.
    #[error("no editor specified: one of the environment variables {0} must be set")]
    NoEditor(String),

    /// The external editor exited with a non-zero status.
    #[error("editor command failed with status {status}: {command}")]
    EditorFailed {
        /// Exit status reported by the editor process.
        status: i32,
        /// The command line that was run.
        command: String,
    },
}
