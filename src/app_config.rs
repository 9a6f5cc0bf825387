/*!
 * Application configuration module.
 *
 * Loads, validates and defaults the configuration consumed by the
 * translation pipeline.
 */

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language, either a language name ("russian") or an ISO code ("ru")
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Chunk budget in estimated tokens
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Model identifier sent to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum attempts per call; values <= 0 mean the default of 3
    #[serde(default = "default_max_retries")]
    pub max_retries: i32,

    /// Verbose progress logging
    #[serde(default)]
    pub verbose: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Provider connection settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Delays inserted between consecutive chunks
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Provider connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Chat completions URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds per call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: First retry backoff, doubled on every further retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    // @field: Value of the HTTP-Referer header
    #[serde(default = "default_referer")]
    pub referer: String,

    // @field: Value of the X-Title header
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            retry_backoff_ms: default_retry_backoff_ms(),
            referer: default_referer(),
            title: default_title(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Inter-chunk pacing used to stay under remote rate limits.
///
/// The delay after a chunk of `n` bytes is
/// `base + min((n / 1000) * per_thousand_chars, max_extra)`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PacingConfig {
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_per_thousand_chars_ms")]
    pub per_thousand_chars_ms: u64,

    #[serde(default = "default_max_extra_delay_ms")]
    pub max_extra_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            per_thousand_chars_ms: default_per_thousand_chars_ms(),
            max_extra_delay_ms: default_max_extra_delay_ms(),
        }
    }
}

impl PacingConfig {
    /// No delay at all, for tests and local endpoints.
    pub fn disabled() -> Self {
        Self {
            base_delay_ms: 0,
            per_thousand_chars_ms: 0,
            max_extra_delay_ms: 0,
        }
    }

    /// Delay to wait after a chunk of `chunk_len` bytes.
    pub fn delay_after(&self, chunk_len: usize) -> Duration {
        let thousands = (chunk_len / 1000) as u64;
        let extra = thousands
            .saturating_mul(self.per_thousand_chars_ms)
            .min(self.max_extra_delay_ms);
        Duration::from_millis(self.base_delay_ms.saturating_add(extra))
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "russian".to_string()
}

fn default_chunk_size() -> usize {
    500
}

fn default_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

fn default_max_retries() -> i32 {
    3
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_timeout_secs() -> u64 {
    300 // five minutes per call
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

fn default_referer() -> String {
    "https://github.com/ai-translate/ai-translate".to_string()
}

fn default_title() -> String {
    "AI Translate".to_string()
}

fn default_base_delay_ms() -> u64 {
    10
}

fn default_per_thousand_chars_ms() -> u64 {
    300
}

fn default_max_extra_delay_ms() -> u64 {
    1500
}

impl Config {
    /// Load a configuration file, falling back to defaults for missing fields
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language is required"));
        }

        if self.model.trim().is_empty() {
            return Err(anyhow!("Model identifier is required"));
        }

        if self.chunk_size == 0 {
            return Err(anyhow!("Chunk size must be greater than zero"));
        }

        if self.provider.api_key.trim().is_empty() {
            return Err(anyhow!("API key is required (use --api-key or OPENROUTER_API_KEY)"));
        }

        let endpoint = Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(anyhow!("Provider endpoint must use http or https: {}", endpoint));
        }

        Ok(())
    }

    /// Log level after taking the verbose flag into account
    pub fn effective_log_level(&self) -> LogLevel {
        if self.verbose {
            self.log_level.max(LogLevel::Debug)
        } else {
            self.log_level
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            chunk_size: default_chunk_size(),
            model: default_model(),
            max_retries: default_max_retries(),
            verbose: false,
            log_level: LogLevel::default(),
            provider: ProviderConfig::default(),
            pacing: PacingConfig::default(),
        }
    }
}
