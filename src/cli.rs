//! Command-line interface definitions for deft.
//!
//! All argument parsing structures live here, using clap's derive macros.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for deft.
#[derive(Parser)]
#[command(
    name = "deft",
    version = crate::VERSION,
    about = "Deft: the Distributed, Easy Feature Tracker",
    long_about = "A file-backed tracker of work items, each with a status and a \
                  dense priority rank within that status"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Run as if deft was started in this directory
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all but the most important output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialise an empty deft tracker within the current directory
    Init {
        /// The directory in which features are stored
        #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
        datadir: Option<PathBuf>,

        /// The default initial status for new features
        #[arg(short = 'i', long = "initial-status", value_name = "STATUS")]
        initial_status: Option<String>,
    },

    /// Configure the behaviour of the tracker
    Configure {
        /// The default initial status for new features
        #[arg(short = 'i', long = "initial-status", value_name = "STATUS")]
        initial_status: Option<String>,
    },

    /// Create a new feature
    Create {
        /// A short name for the feature
        name: String,

        /// The initial status of the feature
        #[arg(short, long)]
        status: Option<String>,

        /// The initial priority of the feature
        #[arg(short, long)]
        priority: Option<i64>,

        /// A longer description of the feature
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List tracked features in order of priority
    List {
        /// Statuses to list (lists all features if no statuses specified)
        #[arg(short, long = "status", value_name = "STATUS", num_args = 1..)]
        statuses: Vec<String>,

        /// Output in CSV format (default is human-readable text)
        #[arg(short = 'c', long)]
        csv: bool,
    },

    /// Query or change the status of a feature
    Status {
        /// Feature name
        name: String,

        /// The new status of the feature, if changing the status
        status: Option<String>,
    },

    /// Query or change the priority of a feature
    Priority {
        /// Feature name
        name: String,

        /// The new priority of the feature, if changing the priority
        priority: Option<i64>,
    },

    /// Query, change or edit the long description of a feature
    Description {
        /// Feature name
        name: String,

        /// Edit the description in an external editor
        #[arg(short, long)]
        edit: bool,

        /// Print the path of the description file
        #[arg(short, long)]
        file: bool,

        /// The new description of the feature, if changing the description
        description: Option<String>,
    },

    /// Query, change or edit the properties of a feature
    Properties {
        /// Feature name
        name: String,

        /// Edit the properties in TOML format in an external editor
        #[arg(short, long)]
        edit: bool,

        /// Print the path of the properties file
        #[arg(short, long)]
        file: bool,

        /// Set a property value (may be given multiple times)
        #[arg(short, long = "set", value_names = ["KEY", "VALUE"], num_args = 2, action = ArgAction::Append)]
        set: Vec<String>,
    },

    /// Delete one or more features from the tracker
    Purge {
        /// Feature names
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
