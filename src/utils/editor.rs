//! External editor invocation.
//!
//! Descriptions and property tables can be edited in the user's editor of
//! choice. The command is taken from the first set variable among
//! `DEFT_EDITOR`, `VISUAL`, and `EDITOR`, parsed shell-style so values like
//! `code --wait` work, and run with the target file appended.

use crate::error::UserError;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Environment variables consulted for the editor command, in order.
pub const EDITOR_ENV_VARS: &[&str] = &["DEFT_EDITOR", "VISUAL", "EDITOR"];

/// Resolves the editor command from the environment.
///
/// # Errors
/// Fails with [`UserError::NoEditor`] if none of the variables is set.
pub fn find_editor_command() -> Result<String> {
    for var in EDITOR_ENV_VARS {
        if let Ok(command) = std::env::var(var)
            && !command.is_empty()
        {
            return Ok(command);
        }
    }
    Err(UserError::NoEditor(EDITOR_ENV_VARS.join(", ")).into())
}

/// Opens `path` in the user's editor and waits for it to exit.
///
/// # Errors
/// Fails with a [`UserError`] if no editor is configured or the editor exits
/// with a non-zero status, or with an I/O error if it cannot be spawned.
pub fn edit_file(path: &Path) -> Result<()> {
    let command = find_editor_command()?;
    let words =
        shell_words::split(&command).with_context(|| format!("invalid editor command: {command}"))?;
    let (program, args) = words
        .split_first()
        .with_context(|| format!("empty editor command: {command}"))?;

    debug!(program = %program, file = %path.display(), "launching editor");
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .with_context(|| format!("failed to launch editor: {command}"))?;

    if !status.success() {
        return Err(UserError::EditorFailed {
            status: status.code().unwrap_or(-1),
            command,
        }
        .into());
    }
    Ok(())
}
