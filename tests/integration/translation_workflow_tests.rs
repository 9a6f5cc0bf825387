/*!
 * End-to-end document translation tests with the mock provider
 */

use ai_translate::errors::{AppError, TranslationError};
use ai_translate::providers::mock::MockProvider;
use ai_translate::translation::{Chunker, TranslationClient};
use ai_translate::Controller;
use anyhow::Result;
use std::fs;
use crate::common;

fn controller_with_chunk_size(chunk_size: usize) -> Result<Controller> {
    let mut config = common::fast_test_config();
    config.chunk_size = chunk_size;
    config.target_language = "ja".to_string();
    Ok(Controller::with_config(config)?.without_progress())
}

/// Paragraph of roughly 39 estimated tokens starting with `marker`
fn paragraph(marker: &str) -> String {
    format!("{} {}", marker, "word ".repeat(30))
}

/// Test a full run over a multi-chunk document
#[tokio::test]
async fn test_run_withWorkingProvider_shouldWriteWholeDocument() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let text = common::sample_document(30);
    let input = common::create_test_file(temp_dir.path(), "book.txt", &text)?;
    let output = temp_dir.path().join("out").join("book.ja.txt");
    let controller = controller_with_chunk_size(50)?;
    let client = TranslationClient::new(MockProvider::working(), "test-model");

    let summary = controller.run_with_translator(&input, &output, &client).await?;

    let expected_chunks = Chunker::new(50).split(&text).len();
    assert!(expected_chunks > 1);
    assert_eq!(summary.chunks, expected_chunks);
    assert_eq!(summary.input_chars, text.len());
    assert_eq!(client.provider().call_count(), expected_chunks);

    let written = fs::read_to_string(&output)?;
    assert_eq!(summary.output_chars, written.len());
    assert_eq!(common::normalize_whitespace(&written), common::normalize_whitespace(&text));
    assert!(client.provider().prompts().iter().all(|p| p.contains("to Japanese language")));
    Ok(())
}

/// Test that a small document is sent in one piece
#[tokio::test]
async fn test_run_withSmallDocument_shouldTranslateOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let text = "Paragraph 1.\n\nParagraph 2.\n\nParagraph 3.\n\nParagraph 4.";
    let input = common::create_test_file(temp_dir.path(), "small.txt", text)?;
    let output = temp_dir.path().join("small.out.txt");
    let controller = controller_with_chunk_size(500)?;
    let client = TranslationClient::new(MockProvider::working(), "test-model");

    let summary = controller.run_with_translator(&input, &output, &client).await?;

    assert_eq!(summary.chunks, 1);
    assert_eq!(fs::read_to_string(&output)?, text);
    Ok(())
}

/// Test that empty input makes no calls and writes nothing
#[tokio::test]
async fn test_run_withEmptyInput_shouldNotCallProvider() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "empty.txt", "")?;
    let output = temp_dir.path().join("empty.out.txt");
    let controller = controller_with_chunk_size(50)?;
    let client = TranslationClient::new(MockProvider::working(), "test-model");

    let summary = controller.run_with_translator(&input, &output, &client).await?;

    assert_eq!(summary.chunks, 0);
    assert_eq!(client.provider().call_count(), 0);
    assert_eq!(fs::read_to_string(&output)?, "");
    Ok(())
}

/// Test that a missing input file is reported before any call
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with_chunk_size(50)?;
    let client = TranslationClient::new(MockProvider::working(), "test-model");

    let err = controller
        .run_with_translator(&temp_dir.path().join("nope.txt"), &temp_dir.path().join("out.txt"), &client)
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::File(_))));
    assert_eq!(client.provider().call_count(), 0);
    Ok(())
}

/// Test that transient failures are absorbed by the per-chunk retry
#[tokio::test]
async fn test_run_withTransientFailures_shouldRecover() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let text = [paragraph("Alpha"), paragraph("Beta"), paragraph("Gamma")].join("\n\n");
    let input = common::create_test_file(temp_dir.path(), "doc.txt", &text)?;
    let output = temp_dir.path().join("doc.out.txt");
    let controller = controller_with_chunk_size(50)?;
    let client = TranslationClient::new(MockProvider::fail_first(2), "test-model");

    let summary = controller.run_with_translator(&input, &output, &client).await?;

    assert_eq!(summary.chunks, 3);
    assert_eq!(client.provider().call_count(), 5);
    Ok(())
}

/// Test that an always failing provider stops after the configured attempts
#[tokio::test]
async fn test_run_withFailingProvider_shouldReportChunkFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "doc.txt", "Some text to translate")?;
    let output = temp_dir.path().join("doc.out.txt");
    let controller = controller_with_chunk_size(50)?;
    let client = TranslationClient::new(MockProvider::failing(), "test-model");

    let err = controller.run_with_translator(&input, &output, &client).await.unwrap_err();

    match err.downcast_ref::<AppError>() {
        Some(AppError::ChunkFailed { chunk, attempts, source }) => {
            assert_eq!(*chunk, 1);
            assert_eq!(*attempts, 3);
            assert!(matches!(source, TranslationError::Provider(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(client.provider().call_count(), 3);
    assert_eq!(fs::read_to_string(&output)?, "");
    Ok(())
}

/// Test that chunks written before a fatal failure stay on disk
#[tokio::test]
async fn test_run_withMissingTagMidDocument_shouldKeepPartialOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let first = paragraph("Alpha");
    let text = [first.clone(), paragraph("POISON"), paragraph("Omega")].join("\n\n");
    let input = common::create_test_file(temp_dir.path(), "doc.txt", &text)?;
    let output = temp_dir.path().join("doc.out.txt");
    let controller = controller_with_chunk_size(50)?;
    let provider = MockProvider::working().with_custom_response(|text| {
        if text.contains("POISON") {
            format!("Sorry, here it is: {}", text)
        } else {
            format!("<result>{}</result>", text)
        }
    });
    let client = TranslationClient::new(provider, "test-model");

    let err = controller.run_with_translator(&input, &output, &client).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::ChunkFailed { chunk: 2, source: TranslationError::ResultTagNotFound, .. })
    ));
    assert_eq!(client.provider().call_count(), 4);
    assert_eq!(fs::read_to_string(&output)?, format!("{}\n", first));
    Ok(())
}
