/*!
 * Tests for file and folder utilities
 */

use anyhow::Result;
use subline::file_utils::FileManager;
use crate::common;

/// Test file existence check
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = common::create_test_file(&temp_dir.path().to_path_buf(), "exists.txt", "content")?;

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
    // A directory is not a file
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test directory existence check and creation
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAllParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    assert!(!FileManager::dir_exists(&nested));
    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    // Creating an existing directory is a no-op
    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    Ok(())
}

/// Test output path generation for translated subtitles
#[test]
fn test_generate_output_path_withLanguageCode_shouldInsertLowercasedCode() {
    let output = FileManager::generate_output_path("movie.en.srt", "/out", "ZH", "srt");
    assert_eq!(output, std::path::PathBuf::from("/out/movie.en.zh.srt"));

    let output = FileManager::generate_output_path("/subs/episode.srt", "/subs", "fr", "srt");
    assert_eq!(output, std::path::PathBuf::from("/subs/episode.fr.srt"));
}

/// Test finding subtitle files in a directory tree
#[test]
fn test_find_files_withMixedExtensions_shouldMatchCaseInsensitively() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let a = common::create_test_subtitle(&dir, "a.srt")?;
    let b = common::create_test_subtitle(&dir, "b.SRT")?;
    common::create_test_file(&dir, "notes.txt", "not a subtitle")?;

    let nested_dir = dir.join("season1");
    FileManager::ensure_dir(&nested_dir)?;
    let c = common::create_test_subtitle(&nested_dir, "episode1.srt")?;

    let found = FileManager::find_files(&dir, "srt")?;
    assert_eq!(found.len(), 3);
    assert!(found.contains(&a));
    assert!(found.contains(&b));
    assert!(found.contains(&c));

    // Leading dot in the extension argument is accepted too
    let found_with_dot = FileManager::find_files(&dir, ".srt")?;
    assert_eq!(found_with_dot.len(), 3);

    Ok(())
}

/// Test finding files in a missing directory
#[test]
fn test_find_files_withMissingDirectory_shouldReturnError() {
    let result = FileManager::find_files("definitely/not/here", "srt");
    assert!(result.is_err());
}

/// Test writing content to a file in a directory that does not exist yet
#[test]
fn test_write_to_file_withMissingParent_shouldCreateParentDirs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = temp_dir.path().join("deep").join("nested").join("log.txt");

    FileManager::write_to_file(&file_path, "line one\nline two\n")?;

    let content = std::fs::read_to_string(&file_path)?;
    assert_eq!(content, "line one\nline two\n");

    Ok(())
}

/// Test SRT detection by extension
#[test]
fn test_looks_like_srt_withSrtExtension_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let srt = common::create_test_subtitle(&dir, "movie.srt")?;
    let upper = common::create_test_subtitle(&dir, "movie2.SRT")?;
    // The extension is authoritative, so SRT content in a .txt is rejected
    let txt = common::create_test_file(&dir, "movie.txt", common::sample_srt())?;

    assert!(FileManager::looks_like_srt(&srt));
    assert!(FileManager::looks_like_srt(&upper));
    assert!(!FileManager::looks_like_srt(&txt));

    Ok(())
}

/// Test SRT detection by content sniff for extensionless files
#[test]
fn test_looks_like_srt_withoutExtension_shouldSniffContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let subtitle = common::create_test_file(&dir, "subtitle", common::sample_srt())?;
    let plain = common::create_test_file(&dir, "readme", "just some notes\nnothing else\n")?;

    assert!(FileManager::looks_like_srt(&subtitle));
    assert!(!FileManager::looks_like_srt(&plain));
    assert!(!FileManager::looks_like_srt(dir.join("missing")));

    Ok(())
}
