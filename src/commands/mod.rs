//! CLI command implementations.
//!
//! Each module implements one subcommand as an `execute` function taking the
//! injected storage root plus the parsed arguments. Mutating commands follow
//! the same lifecycle: load the tracker, perform the operation, `save()`.

pub mod configure;
pub mod create;
pub mod description;
pub mod init;
pub mod list;
pub mod priority;
pub mod properties;
pub mod purge;
pub mod status;
