/*!
 * Tests for error types
 */

use ai_translate::errors::{AppError, ProviderError, TranslationError};
use std::error::Error;

/// Test provider error messages
#[test]
fn test_providerError_display_shouldDescribeFailure() {
    let err = ProviderError::ApiError {
        status_code: 429,
        message: "Rate limit exceeded".to_string(),
    };
    assert_eq!(err.to_string(), "API responded with error: 429 - Rate limit exceeded");
    assert!(!err.is_transport());

    let err = ProviderError::RequestFailed("connection refused".to_string());
    assert_eq!(err.to_string(), "API request failed: connection refused");
    assert!(err.is_transport());
}

/// Test the conversion from provider to translation errors
#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let err: TranslationError = ProviderError::ParseError("eof".to_string()).into();

    assert!(matches!(err, TranslationError::Provider(ProviderError::ParseError(_))));
    assert!(err.is_format_error());
    assert!(TranslationError::ResultTagNotFound.is_format_error());
    assert!(!TranslationError::from(ProviderError::RequestFailed("x".to_string())).is_format_error());
}

/// Test the chunk failure message and source chain
#[test]
fn test_appError_chunkFailed_shouldKeepSource() {
    let err = AppError::ChunkFailed {
        chunk: 4,
        attempts: 3,
        source: TranslationError::EmptyResponse,
    };

    assert_eq!(
        err.to_string(),
        "failed to translate chunk 4 after 3 attempts: no translation returned from API"
    );
    assert!(err.source().is_some());
}

/// Test io errors map to file errors
#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");

    let err: AppError = io.into();

    assert!(matches!(err, AppError::File(ref msg) if msg.contains("read-only")));
}
