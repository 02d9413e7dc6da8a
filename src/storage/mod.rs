//! File storage substrate.
//!
//! [`FileStorage`] presents a directory subtree as a small file table:
//! existence checks, scoped read/write handles, idempotent recursive removal,
//! glob listing, and rename. Every other part of deft goes through it, so the
//! rest of the code never does path arithmetic or touches `std::fs` directly.
//!
//! All paths handed to storage are relative to its base directory. The base
//! directory is injected at construction; storage never consults the process
//! working directory on its own.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// A directory subtree exposed as a flat table of relative paths.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Root of the subtree; all operations resolve against this.
    basedir: PathBuf,
}

impl FileStorage {
    /// Creates storage rooted at `basedir`. The directory need not exist yet.
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self {
            basedir: basedir.into(),
        }
    }

    /// Returns the storage root.
    #[must_use]
    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// Resolves `relpath` against the storage root, normalizing `.` and `..`
    /// segments lexically. Never touches the filesystem.
    #[must_use]
    pub fn abspath(&self, relpath: impl AsRef<Path>) -> PathBuf {
        normalize(&self.basedir.join(relpath))
    }

    /// True iff a file or directory exists at `relpath`.
    #[must_use]
    pub fn exists(&self, relpath: impl AsRef<Path>) -> bool {
        self.abspath(relpath).exists()
    }

    /// Opens `relpath` for reading.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn open_read(&self, relpath: impl AsRef<Path>) -> Result<File> {
        let path = self.abspath(relpath);
        File::open(&path).with_context(|| format!("failed to open {} for reading", path.display()))
    }

    /// Opens `relpath` for writing, truncating any existing content and
    /// creating missing parent directories first.
    ///
    /// # Errors
    /// Returns an error if a parent directory or the file cannot be created.
    pub fn open_write(&self, relpath: impl AsRef<Path>) -> Result<File> {
        let path = self.abspath(relpath);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        File::create(&path).with_context(|| format!("failed to open {} for writing", path.display()))
    }

    /// Creates the directory at `relpath` and any missing parents.
    ///
    /// # Errors
    /// Returns an error if a directory cannot be created.
    pub fn create_dir_all(&self, relpath: impl AsRef<Path>) -> Result<()> {
        let path = self.abspath(relpath);
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create directory {}", path.display()))
    }

    /// Removes `relpath`: directories are deleted recursively, files are
    /// unlinked, and a nonexistent path is a silent no-op.
    ///
    /// # Errors
    /// Returns an error if an existing path cannot be deleted.
    pub fn remove(&self, relpath: impl AsRef<Path>) -> Result<()> {
        let path = self.abspath(relpath);
        if path.is_dir() {
            debug!(path = %path.display(), "removing directory tree");
            fs::remove_dir_all(&path)
                .with_context(|| format!("failed to remove directory {}", path.display()))
        } else if path.exists() {
            debug!(path = %path.display(), "removing file");
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))
        } else {
            Ok(())
        }
    }

    /// Lists every path under the root matching a shell-glob pattern,
    /// returned relative to the root in unspecified order. A pattern that
    /// matches nothing yields an empty list, not an error.
    ///
    /// # Errors
    /// Returns an error if the pattern itself is malformed.
    pub fn list(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full_pattern = self.abspath(pattern);
        let base = normalize(&self.basedir);
        let matches = glob::glob(&full_pattern.to_string_lossy())
            .with_context(|| format!("invalid glob pattern: {pattern}"))?;
        Ok(matches
            .filter_map(std::result::Result::ok)
            .filter_map(|path| path.strip_prefix(&base).ok().map(Path::to_path_buf))
            .collect())
    }

    /// Moves `src` to `dst`, creating `dst`'s parent directories as needed.
    /// Unlike `std::fs::rename` this never overwrites: a missing source or an
    /// existing destination is an error.
    ///
    /// # Errors
    /// Returns an I/O error if `src` does not exist, `dst` already exists, or
    /// the move itself fails.
    pub fn rename(&self, src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
        let src_path = self.abspath(src);
        let dst_path = self.abspath(dst);
        if !src_path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("cannot rename {}: no such file", src_path.display()),
            )
            .into());
        }
        if dst_path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "cannot rename to {}: destination already exists",
                    dst_path.display()
                ),
            )
            .into());
        }
        if let Some(parent) = dst_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        debug!(src = %src_path.display(), dst = %dst_path.display(), "renaming");
        fs::rename(&src_path, &dst_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                src_path.display(),
                dst_path.display()
            )
        })
    }

    /// Reads the whole file at `relpath` as UTF-8 text.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not valid UTF-8.
    pub fn read_text(&self, relpath: impl AsRef<Path>) -> Result<String> {
        let path = self.abspath(&relpath);
        let mut text = String::new();
        self.open_read(relpath)?
            .read_to_string(&mut text)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(text)
    }

    /// Writes `text` to `relpath`, replacing any previous content.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_text(&self, relpath: impl AsRef<Path>, text: &str) -> Result<()> {
        let path = self.abspath(&relpath);
        self.open_write(relpath)?
            .write_all(text.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Reads and decodes the TOML record at `relpath`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not parse as `T`.
    pub fn load_record<T: DeserializeOwned>(&self, relpath: impl AsRef<Path>) -> Result<T> {
        let path = self.abspath(&relpath);
        let text = self.read_text(relpath)?;
        toml::from_str(&text).with_context(|| format!("malformed record in {}", path.display()))
    }

    /// Encodes `value` as TOML and writes it to `relpath`.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save_record<T: Serialize>(&self, relpath: impl AsRef<Path>, value: &T) -> Result<()> {
        let path = self.abspath(&relpath);
        let text = toml::to_string_pretty(value)
            .with_context(|| format!("failed to encode record for {}", path.display()))?;
        self.write_text(relpath, &text)
    }
}

/// Lexically normalizes a path, folding `.` segments and resolving `..`
/// against preceding normal components.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `..` at a filesystem root stays at the root.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}
