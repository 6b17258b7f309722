/*!
 * Translation service for subtitle translation via machine-translation APIs.
 *
 * This module contains the core functionality for translating subtitle
 * lines. It is split into several submodules:
 *
 * - `core`: Core translation service and provider dispatch
 * - `line_pipeline`: Concurrent order-preserving line translation
 * - `markup`: Inline style tag stripping and restoration
 */

// Re-export main types for easier usage
pub use self::core::{TranslationService, TranslationOptions};
pub use self::line_pipeline::{LineTranslator, LogEntry};
pub use self::markup::StyledLine;

// Submodules
pub mod core;
pub mod line_pipeline;
pub mod markup;
