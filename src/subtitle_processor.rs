use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::warn;

use crate::errors::SubtitleError;

// @module: Line-oriented subtitle file model
//
// SRT translation works on raw file lines, not parsed cues: structural lines
// (cue indices, timing ranges, blanks) pass through untouched and only
// dialogue lines are ever sent to the translation API. Keeping the file as an
// indexed line sequence means the output is a faithful copy of the input
// except for the translated text.

/// Classification of a single subtitle file line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only separator line
    Blank,
    /// Cue index line ("17")
    CueIndex,
    /// Timing line ("00:01:02,003 --> 00:01:04,005")
    Timing,
    /// Human-readable subtitle text
    Dialogue,
}

impl LineKind {
    /// Only dialogue lines are sent to the translation API
    pub fn is_translatable(&self) -> bool {
        matches!(self, LineKind::Dialogue)
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LineKind::Blank => "blank",
            LineKind::CueIndex => "cue index",
            LineKind::Timing => "timing",
            LineKind::Dialogue => "dialogue",
        };
        write!(f, "{}", name)
    }
}

/// Classify a raw subtitle line
///
/// The checks run in a fixed order: blank, cue index, timing, dialogue.
/// A cue index is a line that is all ASCII digits once spaces are removed,
/// and a timing line is anything containing the "-->" arrow, wherever it
/// appears. Everything else is dialogue.
pub fn classify_line(text: &str) -> LineKind {
    if text.trim().is_empty() {
        return LineKind::Blank;
    }

    // Spaces are removed before the digit check, so "1 2" still counts as an
    // index line. Tabs do not get this treatment.
    let mut digits = text.chars().filter(|c| *c != ' ');
    if digits.all(|c| c.is_ascii_digit()) {
        return LineKind::CueIndex;
    }

    if text.contains("-->") {
        return LineKind::Timing;
    }

    LineKind::Dialogue
}

// @struct: A raw file line paired with its original position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedLine {
    // @field: Zero-based position in the file
    pub index: usize,

    // @field: Line text, right-trimmed
    pub text: String,
}

impl IndexedLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        IndexedLine {
            index,
            text: text.into(),
        }
    }

    /// Classify this line
    pub fn kind(&self) -> LineKind {
        classify_line(&self.text)
    }
}

/// Per-kind line counts for a subtitle file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub blank: usize,
    pub cue_index: usize,
    pub timing: usize,
    pub dialogue: usize,
}

impl LineCounts {
    pub fn total(&self) -> usize {
        self.blank + self.cue_index + self.timing + self.dialogue
    }
}

/// An SRT file read as an ordered sequence of indexed lines
#[derive(Debug)]
pub struct SubtitleLines {
    /// Source filename
    pub source_file: PathBuf,

    /// Lines in file order
    pub lines: Vec<IndexedLine>,
}

impl SubtitleLines {
    /// Read a subtitle file into indexed lines
    ///
    /// The file must be UTF-8. A leading byte-order mark is stripped so the
    /// first cue index still classifies correctly, and every line is
    /// right-trimmed, which also normalizes CRLF input.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("Subtitle file does not exist: {}", path.display()));
        }

        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let content = String::from_utf8(bytes)
            .map_err(|_| SubtitleError::InvalidEncoding(path.display().to_string()))?;

        Ok(Self::from_string(&content, path.to_path_buf()))
    }

    /// Build the line sequence from already-loaded content
    pub fn from_string(content: &str, source_file: PathBuf) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let lines = content
            .lines()
            .enumerate()
            .map(|(index, text)| IndexedLine::new(index, text.trim_end()))
            .collect();

        SubtitleLines { source_file, lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Count lines by classification
    pub fn kind_counts(&self) -> LineCounts {
        let mut counts = LineCounts::default();
        for line in &self.lines {
            match line.kind() {
                LineKind::Blank => counts.blank += 1,
                LineKind::CueIndex => counts.cue_index += 1,
                LineKind::Timing => counts.timing += 1,
                LineKind::Dialogue => counts.dialogue += 1,
            }
        }
        counts
    }

    /// Number of lines that will be sent for translation
    pub fn translatable_count(&self) -> usize {
        self.lines.iter().filter(|l| l.kind().is_translatable()).count()
    }

    /// Write translated line texts to an SRT file, one per line
    pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }

    /// Sanity-check the classification mix and warn about suspicious files
    ///
    /// A file with dialogue but no timing lines is probably not SRT at all;
    /// translating it still works, so this only warns.
    pub fn warn_if_unusual(&self) {
        let counts = self.kind_counts();
        if counts.dialogue > 0 && counts.timing == 0 {
            warn!(
                "No timing lines found in {} ({} dialogue lines) - is this really an SRT file?",
                self.source_file.display(),
                counts.dialogue
            );
        }
    }
}

impl fmt::Display for SubtitleLines {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let counts = self.kind_counts();
        write!(
            f,
            "{}: {} lines ({} dialogue, {} timing, {} cue index, {} blank)",
            self.source_file.display(),
            counts.total(),
            counts.dialogue,
            counts.timing,
            counts.cue_index,
            counts.blank
        )
    }
}
