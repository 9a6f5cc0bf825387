/*!
 * Error types for the ai-translate application.
 *
 * Errors are layered the same way the call stack is: the provider transport
 * raises `ProviderError`, a single chunk translation raises `TranslationError`,
 * and the document-level flow raises `AppError`.
 */

use thiserror::Error;

/// Errors that can occur when talking to the provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request never produced an HTTP response (DNS, connect, timeout)
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Structured error message, or the raw body when none could be parsed
        message: String,
    },

    /// A successful response whose body does not have the expected shape
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

impl ProviderError {
    /// Whether this error was raised before any HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestFailed(_))
    }
}

/// Errors that can occur while translating one chunk
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The response carried zero choices
    #[error("no translation returned from API")]
    EmptyResponse,

    /// The model answered without the `<result>` delimiter
    #[error("tag <result> not found in model output")]
    ResultTagNotFound,
}

impl TranslationError {
    /// Whether the response arrived but could not be used.
    pub fn is_format_error(&self) -> bool {
        match self {
            Self::Provider(ProviderError::ParseError(_)) => true,
            Self::Provider(_) => false,
            Self::EmptyResponse | Self::ResultTagNotFound => true,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// A chunk exhausted its retry budget
    #[error("failed to translate chunk {chunk} after {attempts} attempts: {source}")]
    ChunkFailed {
        /// 1-based chunk index
        chunk: usize,
        /// Number of attempts made
        attempts: u32,
        /// Last error observed
        #[source]
        source: TranslationError,
    },
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
