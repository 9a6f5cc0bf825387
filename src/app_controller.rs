use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::providers::openrouter::OpenRouter;
use crate::translation::{Chunker, DocumentPipeline, RetryPolicy, Translate, TranslationClient};

// @module: Application controller for document translation

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Number of chunks translated
    pub chunks: usize,
    /// Size of the input document
    pub input_chars: usize,
    /// Bytes written to the output file
    pub output_chars: usize,
    /// Wall clock time of the whole run
    pub elapsed: Duration,
    /// Where the translation was written
    pub output_path: PathBuf,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Draw a progress bar while translating
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        Ok(Self {
            config,
            show_progress: true,
        })
    }

    /// Disable the progress bar (tests, piped output)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Retry policy shared by the per-chunk loop and the HTTP send
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.config.max_retries).with_initial_backoff(self.config.provider.retry_backoff())
    }

    /// Translate `input_file` into `output_file` through OpenRouter
    pub async fn run(&self, input_file: &Path, output_file: &Path) -> Result<RunSummary> {
        let provider = OpenRouter::new(&self.config.provider, self.retry_policy())?;
        info!("Using model {} via {}", self.config.model, provider.endpoint());
        let client = TranslationClient::new(provider, self.config.model.clone());

        self.run_with_translator(input_file, output_file, &client).await
    }

    /// Same flow as [`Controller::run`] against any translator
    pub async fn run_with_translator<T>(&self, input_file: &Path, output_file: &Path, translator: &T) -> Result<RunSummary>
    where
        T: Translate + ?Sized,
    {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {}", input_file.display())).into());
        }

        let text = FileManager::read_to_string(input_file)?;
        let chunker = Chunker::new(self.config.chunk_size);
        let chunks = chunker.split(&text);
        info!(
            "Split {} chars into {} chunks (budget {} tokens, effective {})",
            text.len(),
            chunks.len(),
            chunker.budget_tokens(),
            chunker.effective_budget()
        );

        FileManager::ensure_parent_dir(output_file)?;
        let mut writer = FileManager::create_writer(output_file)?;

        let pipeline = DocumentPipeline::new(
            self.config.target_language.clone(),
            self.retry_policy(),
            self.config.pacing.clone(),
        );

        let progress_bar = self.progress_bar(chunks.len());
        progress_bar.set_message("Translating");
        let pb = progress_bar.clone();

        let result = pipeline
            .translate_document(&chunks, translator, &mut writer, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await;

        let stats = match result {
            Ok(stats) => {
                progress_bar.finish_and_clear();
                stats
            }
            Err(e) => {
                progress_bar.abandon_with_message("Failed");
                return Err(e.into());
            }
        };

        let elapsed = start_time.elapsed();
        debug!(
            "Translated {} chunks: {} chars in, {} chars out",
            stats.chunks, stats.input_chars, stats.output_chars
        );

        Ok(RunSummary {
            chunks: stats.chunks,
            input_chars: text.len(),
            output_chars: stats.output_chars,
            elapsed,
            output_path: output_file.to_path_buf(),
        })
    }

    fn progress_bar(&self, total_chunks: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total_chunks as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Human readable duration, rounded to whole seconds
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = (duration.as_millis() + 500) / 1000;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
