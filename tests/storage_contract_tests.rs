//! Behavioral contract of the `FileStorage` substrate.

use anyhow::Result;
use deft::storage::FileStorage;
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::TempDir;

fn storage() -> Result<(TempDir, FileStorage)> {
    let temp_dir = TempDir::new()?;
    let storage = FileStorage::new(temp_dir.path());
    Ok((temp_dir, storage))
}

fn given_file(storage: &FileStorage, relpath: &str) -> Result<()> {
    given_file_with_content(storage, relpath, "testing")
}

fn given_file_with_content(storage: &FileStorage, relpath: &str, content: &str) -> Result<()> {
    storage.write_text(relpath, content)
}

#[test]
fn content_of_written_files_can_be_read() -> Result<()> {
    let (_temp, storage) = storage()?;

    storage.open_write("foo.txt")?.write_all(b"testing!")?;

    let mut written_content = String::new();
    storage.open_read("foo.txt")?.read_to_string(&mut written_content)?;
    assert_eq!(written_content, "testing!");
    Ok(())
}

#[test]
fn written_files_exist() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file(&storage, "example.txt")?;

    assert!(storage.exists("example.txt"));
    Ok(())
}

#[test]
fn automagically_makes_parent_directories_when_writing_files() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file(&storage, "parent/subparent/example.txt")?;

    assert!(storage.exists("parent"));
    assert!(storage.exists("parent/subparent"));
    Ok(())
}

#[test]
fn opening_a_nonexistent_file_for_reading_is_an_error() -> Result<()> {
    let (_temp, storage) = storage()?;

    assert!(!storage.exists("does-not-exist"));
    assert!(storage.open_read("does-not-exist").is_err());
    Ok(())
}

#[test]
fn can_delete_files() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file(&storage, "to-be-deleted")?;

    storage.remove("to-be-deleted")?;

    assert!(!storage.exists("to-be-deleted"));
    Ok(())
}

#[test]
fn ignores_attempt_to_delete_nonexistent_file() -> Result<()> {
    let (_temp, storage) = storage()?;
    assert!(!storage.exists("nonexistent-file"));

    storage.remove("nonexistent-file")?;

    assert!(!storage.exists("nonexistent-file"));
    Ok(())
}

#[test]
fn can_delete_directory_tree() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file(&storage, "parent/child/file1")?;
    given_file(&storage, "parent/child/file2")?;

    storage.remove("parent/child")?;

    assert!(!storage.exists("parent/child"));
    assert!(!storage.exists("parent/child/file1"));
    assert!(!storage.exists("parent/child/file2"));
    assert!(storage.exists("parent"));
    Ok(())
}

#[test]
fn ignores_attempt_to_remove_nonexistent_directory_tree() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file(&storage, "dir/file")?;
    assert!(!storage.exists("another-dir"));

    storage.remove("another-dir")?;

    assert!(!storage.exists("another-dir"));
    Ok(())
}

#[test]
fn lists_files_that_match_glob_pattern() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file(&storage, "a/b1/1.txt")?;
    given_file(&storage, "a/b1/2.txt")?;
    given_file(&storage, "a/b1/3.mpg")?;
    given_file(&storage, "a/b2/c")?;
    given_file(&storage, "x/y")?;

    assert_eq!(
        sorted(storage.list("a/b1/*.txt")?),
        paths(&["a/b1/1.txt", "a/b1/2.txt"])
    );
    assert_eq!(
        sorted(storage.list("a/b*/*")?),
        paths(&["a/b1/1.txt", "a/b1/2.txt", "a/b1/3.mpg", "a/b2/c"])
    );
    assert_eq!(sorted(storage.list("*")?), paths(&["a", "x"]));
    Ok(())
}

#[test]
fn listing_with_an_unmatched_pattern_yields_nothing() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file(&storage, "a/b1/1.txt")?;

    assert!(storage.list("a/zzz*")?.is_empty());
    assert!(storage.list("zzz/*")?.is_empty());
    Ok(())
}

#[test]
fn can_rename_files() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file_with_content(&storage, "x", "x-contents")?;

    storage.rename("x", "y")?;

    assert!(!storage.exists("x"));
    assert!(storage.exists("y"));
    assert_eq!(storage.read_text("y")?, "x-contents");
    Ok(())
}

#[test]
fn can_rename_files_to_new_directory() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file_with_content(&storage, "parent/x", "x-contents")?;

    storage.rename("parent/x", "basedir/y")?;

    assert!(!storage.exists("parent/x"));
    assert!(storage.exists("basedir/y"));
    assert_eq!(storage.read_text("basedir/y")?, "x-contents");
    Ok(())
}

#[test]
fn cannot_rename_nonexistent_files() -> Result<()> {
    let (_temp, storage) = storage()?;

    let err = storage
        .rename("file/that/does/not/exist", "irrelevant")
        .unwrap_err();
    let io_err = err
        .downcast_ref::<std::io::Error>()
        .expect("rename failure should be an I/O error");
    assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
    Ok(())
}

#[test]
fn cannot_rename_file_over_existing_file() -> Result<()> {
    let (_temp, storage) = storage()?;
    given_file(&storage, "x")?;
    given_file(&storage, "y")?;

    let err = storage.rename("x", "y").unwrap_err();
    let io_err = err
        .downcast_ref::<std::io::Error>()
        .expect("rename failure should be an I/O error");
    assert_eq!(io_err.kind(), std::io::ErrorKind::AlreadyExists);
    // No silent overwrite: both files still there.
    assert!(storage.exists("x"));
    assert!(storage.exists("y"));
    Ok(())
}

fn sorted(mut list: Vec<PathBuf>) -> Vec<PathBuf> {
    list.sort();
    list
}

fn paths(relpaths: &[&str]) -> Vec<PathBuf> {
    relpaths.iter().map(PathBuf::from).collect()
}
