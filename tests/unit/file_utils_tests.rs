/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use multilogue::file_utils::{FileManager, FileType, SCRIPT_EXTENSIONS};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    assert!(FileManager::dir_exists(temp_dir.path()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/play.plato"),
        Path::new("/tmp/output"),
        "html",
    );
    assert_eq!(output_path, Path::new("/tmp/output/play.html"));

    let dotted = FileManager::generate_output_path("scene.txt", "", ".html");
    assert_eq!(dotted, Path::new("scene.html"));
}

#[test]
fn test_find_files_withMixedExtensions_shouldReturnSortedScripts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_script(dir, "b.txt")?;
    common::create_test_script(dir, "nested/a.PLATO")?;
    common::create_test_script(dir, "c.md")?;
    common::create_test_file(dir, "ignored.html", "<p></p>")?;
    common::create_test_file(dir, "noext", "Alice: hi\n\n")?;

    let found = FileManager::find_files(dir, &SCRIPT_EXTENSIONS)?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.strip_prefix(dir).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["b.txt", "c.md", "nested/a.PLATO"]);
    Ok(())
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("deep").join("dir").join("out.html");

    FileManager::write_to_file(&target, "content")?;

    assert_eq!(FileManager::read_to_string(&target)?, "content");
    Ok(())
}

#[test]
fn test_read_to_string_withMissingFile_shouldFailWithPath() {
    let err = FileManager::read_to_string("definitely/missing.txt").unwrap_err();
    assert!(format!("{:#}", err).contains("missing.txt"));
}

#[test]
fn test_detect_file_type_byExtension_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let script = common::create_test_script(dir, "play.text")?;
    let markup = common::create_test_file(dir, "play.htm", common::SAMPLE_MARKUP)?;

    assert_eq!(FileManager::detect_file_type(&script)?, FileType::Script);
    assert_eq!(FileManager::detect_file_type(&markup)?, FileType::Markup);
    Ok(())
}

#[test]
fn test_detect_file_type_byContent_shouldSniffFormat() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let markup = common::create_test_file(dir, "export", common::SAMPLE_MARKUP)?;
    let script = common::create_test_file(dir, "draft", common::SAMPLE_SCRIPT)?;
    let other = common::create_test_file(dir, "blob", "nothing to see")?;

    assert_eq!(FileManager::detect_file_type(&markup)?, FileType::Markup);
    assert_eq!(FileManager::detect_file_type(&script)?, FileType::Script);
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    assert!(FileManager::detect_file_type(dir.join("missing")).is_err());
    Ok(())
}
