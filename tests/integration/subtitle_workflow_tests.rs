/*!
 * End-to-end subtitle translation workflow tests
 *
 * These run the real read -> classify -> translate -> reassemble -> write
 * path against the mock provider, so everything except the HTTP call is
 * exercised exactly as in production.
 */

use std::sync::Arc;
use anyhow::Result;
use parking_lot::Mutex;
use subline::file_utils::FileManager;
use subline::providers::mock::MockProvider;
use subline::subtitle_processor::SubtitleLines;
use subline::translation::{LineTranslator, TranslationOptions, TranslationService};
use crate::common;

/// Translate a subtitle file on disk and return the written output path
async fn translate_file(
    input: &std::path::Path,
    target_language: &str,
    mock: MockProvider,
) -> Result<std::path::PathBuf> {
    let subtitle_lines = SubtitleLines::from_file(input)?;

    let options = TranslationOptions {
        target_language: target_language.to_string(),
        source_language: None,
        max_concurrent_requests: 4,
    };
    let service = TranslationService::with_mock(mock, options);
    let translator = LineTranslator::new(service);

    let log_capture = Arc::new(Mutex::new(Vec::new()));
    let translated = translator
        .translate_lines(&subtitle_lines.lines, log_capture, |_, _| {})
        .await?;

    let output_dir = input.parent().unwrap_or(std::path::Path::new("."));
    let output_path = FileManager::generate_output_path(input, output_dir, target_language, "srt");
    SubtitleLines::write_lines(&output_path, &translated)?;

    Ok(output_path)
}

/// Test the complete workflow on a plain subtitle file
#[tokio::test]
async fn test_workflow_withPlainSubtitle_shouldTranslateOnlyDialogue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_subtitle(&dir, "episode.srt")?;

    let output_path = translate_file(&input, "ZH", MockProvider::working()).await?;
    assert_eq!(output_path, dir.join("episode.zh.srt"));

    let output = std::fs::read_to_string(&output_path)?;
    let expected = "\
1
00:00:01,000 --> 00:00:04,000
[TRANSLATED to ZH] This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
[TRANSLATED to ZH] It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
[TRANSLATED to ZH] For testing purposes.
";
    assert_eq!(output, expected);

    Ok(())
}

/// Test that the workflow keeps inline style tags around translated content
#[tokio::test]
async fn test_workflow_withStyledSubtitle_shouldRestoreTags() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "styled.srt", common::styled_srt())?;

    let output_path = translate_file(&input, "FR", MockProvider::working()).await?;

    let output = std::fs::read_to_string(&output_path)?;
    assert!(output.contains("<i>[TRANSLATED to FR] Previously on the show</i>"));
    assert!(output.contains("[TRANSLATED to FR] A plain spoken line."));
    assert!(output.contains("<b>[TRANSLATED to FR] NO!</b>"));
    // Structural lines made it through byte for byte
    assert!(output.contains("00:00:05,000 --> 00:00:09,000"));

    Ok(())
}

/// Test the workflow on a file with a BOM and CRLF line endings
#[tokio::test]
async fn test_workflow_withBomAndCrlf_shouldNormalizeOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let content = "\u{feff}1\r\n00:00:01,000 --> 00:00:04,000\r\nHello there.\r\n";
    let input = common::create_test_file(&dir, "windows.srt", content)?;

    let output_path = translate_file(&input, "ZH", MockProvider::working()).await?;

    let output = std::fs::read_to_string(&output_path)?;
    // BOM and carriage returns are gone, the cue structure is intact
    assert_eq!(
        output,
        "1\n00:00:01,000 --> 00:00:04,000\n[TRANSLATED to ZH] Hello there.\n"
    );

    Ok(())
}

/// Test that the translated line count always matches the input line count
#[tokio::test]
async fn test_workflow_withSampleSubtitle_shouldKeepLineCount() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_subtitle(&dir, "count.srt")?;

    let original = SubtitleLines::from_file(&input)?;
    let output_path = translate_file(&input, "ZH", MockProvider::working()).await?;
    let translated = SubtitleLines::from_file(&output_path)?;

    assert_eq!(original.len(), translated.len());
    assert_eq!(original.kind_counts().timing, translated.kind_counts().timing);
    assert_eq!(original.kind_counts().cue_index, translated.kind_counts().cue_index);

    Ok(())
}
