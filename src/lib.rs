/*!
 * # ai-translate - document translation with AI
 *
 * A Rust library for translating plain text documents with a remote
 * language model.
 *
 * ## Features
 *
 * - Token-bounded chunking that prefers paragraph, then line, then sentence
 *   boundaries, with a fixed-width fallback
 * - Translation through the OpenRouter chat completions API
 * - Exponential backoff retries around every chunk and every HTTP send
 * - Incremental output: each chunk is written and flushed as soon as it is done
 * - Pacing between chunks to stay under remote rate limits
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Chunking, the translation client, retries and the pipeline:
 *   - `translation::chunker`: Document splitting
 *   - `translation::client`: Prompt building and `<result>` extraction
 *   - `translation::retry`: Exponential backoff
 *   - `translation::pipeline`: Sequential per-chunk driver
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Provider implementations:
 *   - `providers::openrouter`: OpenRouter API client
 *   - `providers::mock`: In-process provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use errors::{AppError, ProviderError, TranslationError};
pub use translation::{Chunker, DocumentPipeline, RetryPolicy, Translate, TranslationClient};
