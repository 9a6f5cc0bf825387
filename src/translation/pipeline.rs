/*!
 * Document pipeline.
 *
 * Drives the chunks through the translator strictly in order: one chunk at a
 * time, each wrapped in its own retry loop, written and flushed as soon as it
 * is translated, followed by a pacing pause before the next one.
 */

use log::debug;
use std::io::Write;

use crate::app_config::PacingConfig;
use crate::errors::AppError;
use crate::translation::client::Translate;
use crate::translation::retry::{with_retry, RetryPolicy};

/// Counters collected while translating a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Chunks translated and written
    pub chunks: usize,
    /// Bytes of source text sent for translation
    pub input_chars: usize,
    /// Bytes written to the output, separators included
    pub output_chars: usize,
}

/// Sequential per-chunk translation with retry and pacing
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    target_language: String,
    retry: RetryPolicy,
    pacing: PacingConfig,
}

impl DocumentPipeline {
    pub fn new(target_language: impl Into<String>, retry: RetryPolicy, pacing: PacingConfig) -> Self {
        Self {
            target_language: target_language.into(),
            retry,
            pacing,
        }
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Translate `chunks` in order and write them to `output`.
    ///
    /// `on_progress` is called with `(done, total)` after every written chunk.
    /// On failure the chunks already written stay in `output`.
    pub async fn translate_document<T, W, F>(
        &self,
        chunks: &[String],
        translator: &T,
        output: &mut W,
        mut on_progress: F,
    ) -> Result<PipelineStats, AppError>
    where
        T: Translate + ?Sized,
        W: Write,
        F: FnMut(usize, usize),
    {
        let total = chunks.len();
        let mut stats = PipelineStats::default();

        for (index, chunk) in chunks.iter().enumerate() {
            let number = index + 1;
            let is_last = number == total;
            debug!("Translating chunk {}/{} ({} chars)", number, total, chunk.len());

            let label = format!("chunk {}/{}", number, total);
            let translated = with_retry(&self.retry, &label, || {
                translator.translate_chunk(chunk, &self.target_language)
            })
            .await
            .map_err(|source| AppError::ChunkFailed {
                chunk: number,
                attempts: self.retry.max_attempts(),
                source,
            })?;

            output.write_all(translated.as_bytes())?;
            stats.output_chars += translated.len();
            if !is_last && !translated.ends_with('\n') {
                output.write_all(b"\n")?;
                stats.output_chars += 1;
            }
            output.flush()?;

            stats.chunks += 1;
            stats.input_chars += chunk.len();
            on_progress(number, total);

            if !is_last {
                let delay = self.pacing.delay_after(chunk.len());
                if !delay.is_zero() {
                    debug!("Pausing {:?} before next chunk", delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Ok(stats)
    }
}
