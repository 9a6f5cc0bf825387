/*!
 * Tests for file utility functions
 */

use ai_translate::file_utils::FileManager;
use anyhow::Result;
use std::io::Write;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "input.txt", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for missing files and directories
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that nested parent directories are created
#[test]
fn test_ensure_parent_dir_withNestedPath_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("a").join("b").join("out.txt");

    FileManager::ensure_parent_dir(&output)?;

    assert!(temp_dir.path().join("a").join("b").is_dir());
    Ok(())
}

/// Test that a bare file name needs no directory
#[test]
fn test_ensure_parent_dir_withBareFileName_shouldSucceed() {
    assert!(FileManager::ensure_parent_dir("out.txt").is_ok());
}

/// Test reading a missing file
#[test]
fn test_read_to_string_withMissingFile_shouldFailWithContext() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let err = FileManager::read_to_string(temp_dir.path().join("missing.txt")).unwrap_err();

    assert!(err.to_string().contains("Failed to read input file"));
    Ok(())
}

/// Test that the writer truncates an existing file
#[test]
fn test_create_writer_withExistingFile_shouldTruncate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "out.txt", "old content that is long")?;

    {
        let mut writer = FileManager::create_writer(&path)?;
        writer.write_all(b"new")?;
        writer.flush()?;
    }

    assert_eq!(FileManager::read_to_string(&path)?, "new");
    Ok(())
}
