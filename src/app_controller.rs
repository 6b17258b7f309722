use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use parking_lot::Mutex;
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::subtitle_processor::SubtitleLines;
use crate::translation::{TranslationService, LineTranslator, LogEntry};

// @module: Application controller for subtitle translation runs

/// Name of the per-directory log file for translation issues
const ISSUES_LOG_FILENAME: &str = "subline.issues.log";

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Echo original => translated pairs after each run
    show_translations: bool,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            show_translations: false,
        })
    }

    /// Enable or disable echoing of translated pairs
    pub fn show_translations(mut self, enabled: bool) -> Self {
        self.show_translations = enabled;
        self
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.target_language.is_empty()
    }

    /// Public method to write logs to a file for testing purposes
    pub fn write_translation_logs(&self, logs: &[LogEntry], file_path: &str, translation_context: &str) -> Result<()> {
        self.write_logs_to_file(logs, file_path, translation_context)
    }

    /// Run the main workflow with an input subtitle file and output directory
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(input_file, output_dir, &multi_progress, force_overwrite).await
    }

    /// Run the controller with progress reporting
    async fn run_with_progress(&self, input_file: PathBuf, output_dir: PathBuf, multi_progress: &MultiProgress, force_overwrite: bool) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input file exists
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if !FileManager::looks_like_srt(&input_file) {
            return Err(anyhow!("Input file does not look like an SRT subtitle file: {:?}", input_file));
        }

        // Ensure the output directory exists
        FileManager::ensure_dir(&output_dir)?;

        // Check if translation already exists
        let output_path = FileManager::generate_output_path(
            &input_file,
            &output_dir,
            &self.config.target_language,
            "srt",
        );
        if output_path.exists() && !force_overwrite {
            // Skip if translation already exists and no force flag
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(());
        }

        // Fire off a provider connection test once per process; a failure is
        // only a warning, the run itself will surface a real error
        static CONNECTION_TEST: Once = Once::new();
        CONNECTION_TEST.call_once(|| {
            let config_clone = self.config.clone();
            tokio::spawn(async move {
                if let Ok(translation_service) = TranslationService::new(&config_clone) {
                    if let Err(e) = translation_service.test_connection().await {
                        warn!("Translation provider connection test failed: {}", e);
                    }
                }
            });
        });

        // Read the subtitle file into indexed lines
        let subtitle_lines = SubtitleLines::from_file(&input_file)?;
        debug!("{}", subtitle_lines);
        subtitle_lines.warn_if_unusual();

        if subtitle_lines.is_empty() {
            warn!("Input file is empty: {:?}", input_file);
        }

        // Translate the lines
        let translated_lines =
            self.translate_lines_with_progress(&subtitle_lines, multi_progress, &output_dir).await?;

        // Save the translated subtitle file
        SubtitleLines::write_lines(&output_path, &translated_lines)?;
        info!("Success: {}", output_path.display());

        info!(
            "Translation completed in {}.",
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Internal method to translate lines with a progress bar from the provided MultiProgress
    async fn translate_lines_with_progress(&self, subtitle_lines: &SubtitleLines, multi_progress: &MultiProgress, output_dir: &Path) -> Result<Vec<String>> {
        let total_lines = subtitle_lines.len();
        let translatable_lines = subtitle_lines.translatable_count();

        // Create a progress bar for translation tracking
        let progress_bar = multi_progress.add(ProgressBar::new(total_lines as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        // Log that we're starting translation with provider info
        info!("🚀 subline: {} - {} ({} of {} lines to translate)",
            self.config.translation.provider.display_name(),
            self.config.target_language,
            translatable_lines,
            total_lines);

        info!("Translating, please wait…");
        progress_bar.set_message("Translating");

        // Create log capture for storing output during translation
        let log_capture = Arc::new(Mutex::new(Vec::new()));
        let log_capture_clone = Arc::clone(&log_capture);

        // Use the translation service to translate all lines
        let translation_service = TranslationService::new(&self.config)?;
        let line_translator = LineTranslator::new(translation_service)
            .show_translations(self.show_translations);

        // Clone the progress_bar for use in the callback
        let pb = progress_bar.clone();

        // Pass a callback to update the progress bar for each completed line
        let result = line_translator.translate_lines(
            &subtitle_lines.lines,
            log_capture_clone,
            move |completed, _total| {
                pb.set_position(completed as u64);
            }
        ).await;

        // Finish and clear the progress bar instead of just finishing it
        // This ensures only the folder progress bar remains visible when
        // processing multiple files
        progress_bar.finish_and_clear();

        // Now that the progress bar is gone, print any captured logs
        let logs = {
            let logs_guard = log_capture.lock();
            logs_guard.clone()
        };

        // Echoed translation pairs surface whenever echo mode is on
        if self.show_translations {
            for log in logs.iter().filter(|log| log.level == "INFO") {
                info!("{}", log.message);
            }
        }

        let error_logs = logs.iter().filter(|log| log.level == "ERROR").count();
        let warning_logs = logs.iter().filter(|log| log.level == "WARN").count();

        if error_logs > 0 || warning_logs > 0 {
            info!("Translation completed with {} errors and {} warnings.", error_logs, warning_logs);

            // In debug mode show everything that was captured
            if log::max_level() >= log::LevelFilter::Debug {
                for log in &logs {
                    match log.level.as_str() {
                        "ERROR" => error!("{}", log.message),
                        "WARN" => warn!("{}", log.message),
                        "INFO" => info!("{}", log.message),
                        "DEBUG" => debug!("{}", log.message),
                        _ => info!("{}", log.message),
                    }
                }
            }

            // Keep a per-directory record of what went wrong
            let log_file_path = output_dir.join(ISSUES_LOG_FILENAME).to_string_lossy().to_string();
            let context = format!("{} - {} ({})",
                self.config.translation.provider.display_name(),
                self.config.target_language,
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

            if let Err(e) = self.write_logs_to_file(&logs, &log_file_path, &context) {
                warn!("Failed to write logs to file: {}", e);
            } else {
                info!("Logs written to {}", log_file_path);
            }
        }

        let translated_lines = result?;

        // The pipeline guarantees this, but a mismatch here would corrupt the
        // output file silently, so keep the check loud
        if translated_lines.len() != total_lines {
            error!("Line count changed during translation! Before: {}, After: {}",
                  total_lines, translated_lines.len());
        } else {
            debug!("Translated all {} lines ({} via API)", total_lines, translatable_lines);
        }

        Ok(translated_lines)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Run the workflow in folder mode, processing all subtitle files in a directory
    /// Files that already carry the target-language suffix will be skipped
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input directory exists
        if !input_dir.exists() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        // Find all subtitle files in the directory (recursive)
        let subtitle_files = FileManager::find_files(&input_dir, "srt")?;

        // If no subtitle files found, return error
        if subtitle_files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        // Files ending in ".<target>.srt" are previous outputs, not inputs
        let target_suffix = format!(".{}.srt", self.config.target_language.to_lowercase());

        // Create multi-progress instance for multiple file processing
        let multi_progress = MultiProgress::new();

        // Create a progress bar for folder processing
        let folder_pb = multi_progress.add(ProgressBar::new(subtitle_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        // Track success and failure counts
        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        // Process each subtitle file
        for subtitle_file in subtitle_files.iter() {
            // Get the file name for display
            let file_name = subtitle_file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            // Skip files that are themselves translations into the target language
            if file_name.to_lowercase().ends_with(&target_suffix) {
                debug!("Skipping already-translated file: {}", file_name);
                skip_count += 1;
                folder_pb.inc(1);
                continue;
            }

            // Update the folder progress bar to show current file
            folder_pb.set_message(format!("Processing: {}", file_name));

            // Get output directory (use the file's own directory)
            let output_dir = match subtitle_file.parent() {
                Some(parent) => parent.to_path_buf(),
                None => input_dir.clone(),
            };

            // Check if translation already exists
            let output_path = FileManager::generate_output_path(
                subtitle_file,
                &output_dir,
                &self.config.target_language,
                "srt",
            );
            if output_path.exists() && !force_overwrite {
                // Skip if translation already exists and no force flag
                warn!("Skipping {}, translation already exists (use -f to force overwrite)", file_name);
                skip_count += 1;
                folder_pb.inc(1);
                continue;
            }

            // Run the translation for this file; per-file errors do not end
            // the folder run
            match self.run_with_progress(subtitle_file.clone(), output_dir, &multi_progress, force_overwrite).await {
                Ok(_) => {
                    success_count += 1;
                },
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            // Update the folder progress bar
            folder_pb.inc(1);
        }

        // Finish the folder progress bar
        folder_pb.finish_with_message("Folder processing complete");

        // Calculate and display the total elapsed time
        let duration = start_time.elapsed();

        // Give summary results - important for batch operations
        let summary_message = format!("Folder processing completed: {} processed, {} skipped, {} errors",
             success_count, skip_count, error_count);
        info!("{}", summary_message);

        // Write summary to log file
        let log_file_path = input_dir.join(ISSUES_LOG_FILENAME).to_string_lossy().to_string();
        let context = format!("Folder Processing: {} ({})",
            input_dir.display(),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

        let folder_log_entry = LogEntry {
            level: "INFO".to_string(),
            message: format!("{} - Duration: {}", summary_message, Self::format_duration(duration))
        };

        let folder_logs = vec![folder_log_entry];

        if let Err(e) = self.write_logs_to_file(&folder_logs, &log_file_path, &context) {
            warn!("Failed to write folder logs to file: {}", e);
        } else {
            info!("Folder processing logs written to {}", log_file_path);
        }

        Ok(())
    }

    /// Write translation logs to a log file
    fn write_logs_to_file(&self, logs: &[LogEntry], file_path: &str, translation_context: &str) -> Result<()> {
        let mut log_content = String::new();

        // Add header
        log_content.push_str(&format!("Translation Log - {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
        log_content.push_str(&format!("Context: {}\n\n", translation_context));

        // Add each log entry
        for entry in logs {
            log_content.push_str(&format!("[{}] {}\n", entry.level, entry.message));
        }

        // Write to file
        FileManager::write_to_file(file_path, &log_content)?;

        Ok(())
    }
}
