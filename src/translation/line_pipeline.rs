/*!
 * Concurrent line translation pipeline.
 *
 * This module drives the per-line translation of a subtitle file: structural
 * lines (blanks, cue indices, timing ranges) pass through untouched,
 * dialogue lines are dispatched to the translation service over a bounded
 * worker pool, and the results are reassembled in original file order no
 * matter what order the API answers in.
 */

use anyhow::{Result, anyhow};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use futures::stream::{self, StreamExt};

use crate::subtitle_processor::IndexedLine;
use crate::translation::markup;

use super::core::TranslationService;

/// Log entry captured while the progress bar owns the terminal
#[derive(Clone)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
}

/// Line translator for processing a subtitle file line by line
pub struct LineTranslator {
    /// The translation service to use
    service: TranslationService,

    /// Maximum number of concurrent requests
    max_concurrent_requests: usize,

    /// Whether to capture each original => translated pair
    show_translations: bool,
}

impl LineTranslator {
    /// Create a new line translator
    pub fn new(service: TranslationService) -> Self {
        Self {
            max_concurrent_requests: service.options.max_concurrent_requests.max(1),
            service,
            show_translations: false,
        }
    }

    /// Enable or disable echoing of translated pairs
    pub fn show_translations(mut self, enabled: bool) -> Self {
        self.show_translations = enabled;
        self
    }

    /// Translate a sequence of indexed lines, preserving file order
    ///
    /// Every line counts toward progress, including lines that skip the API.
    /// The output has exactly one entry per input line, in input order; the
    /// first line (by file position) whose translation failed fails the whole
    /// run with its 1-based line number.
    pub async fn translate_lines(
        &self,
        lines: &[IndexedLine],
        log_capture: Arc<Mutex<Vec<LogEntry>>>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<Vec<String>> {
        // Limit concurrent API requests
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_requests));

        let total_lines = lines.len();
        let processed_lines = Arc::new(AtomicUsize::new(0));

        // Process lines concurrently
        let results = stream::iter(lines.to_vec())
            .map(|line| {
                let service = self.service.clone();
                let semaphore = semaphore.clone();
                let log_capture = log_capture.clone();
                let processed_lines = processed_lines.clone();
                let progress_callback = progress_callback.clone();
                let show_translations = self.show_translations;

                async move {
                    let index = line.index;
                    let result = Self::translate_one(
                        &service,
                        &semaphore,
                        line,
                        show_translations,
                        &log_capture,
                    ).await;

                    // Update progress
                    let current = processed_lines.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_lines);

                    (index, result)
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        // Sort results by line index to restore original file order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(idx, _)| *idx);

        let mut output = Vec::with_capacity(total_lines);
        for (index, result) in sorted_results {
            match result {
                Ok(text) => output.push(text),
                Err(e) => {
                    let error_message = format!("Failed to translate line {}: {}", index + 1, e);
                    log_capture.lock().push(LogEntry {
                        level: "ERROR".to_string(),
                        message: error_message.clone(),
                    });
                    return Err(anyhow!(error_message));
                }
            }
        }

        Ok(output)
    }

    /// Translate a single line, passing structural lines through unchanged
    async fn translate_one(
        service: &TranslationService,
        semaphore: &Semaphore,
        line: IndexedLine,
        show_translations: bool,
        log_capture: &Mutex<Vec<LogEntry>>,
    ) -> Result<String> {
        // Structural lines never touch the API
        if !line.kind().is_translatable() {
            return Ok(line.text);
        }

        // Acquire a permit from the semaphore
        let _permit = semaphore.acquire().await?;

        let text = line.text;
        let translated = if markup::has_style_markup(&text) {
            match markup::split_style_tag(&text) {
                Some(styled) => {
                    let content_result = service.translate_text(&styled.content).await?;
                    styled.restore(&content_result)
                }
                // A closing marker without a recognized tag: hand the line
                // to the API as-is rather than failing the file
                None => service.translate_text(&text).await?,
            }
        } else {
            service.translate_text(&text).await?
        };

        if show_translations {
            log_capture.lock().push(LogEntry {
                level: "INFO".to_string(),
                message: format!("{} => {}", text, translated),
            });
        }

        Ok(translated)
    }
}
