/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Echoes the text to translate inside `<result>` tags
 * - `MockProvider::missing_tag()` - Answers without the `<result>` tag
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::fail_first(n)` - Fails `n` times, then works
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::openrouter::{ChatChoice, ChatRequest, ChatResponse, ChoiceMessage};
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with the prompt's text wrapped in `<result>` tags
    Working,
    /// Succeeds but the answer has no `<result>` tag
    MissingTag,
    /// Always fails with an API error
    Failing,
    /// Fails the first `failures` requests, then behaves like `Working`
    FailFirst { failures: usize },
    /// Returns a response without choices
    EmptyChoices,
    /// Simulates slow response
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Prompts received, shared between clones
    prompts: Arc<Mutex<Vec<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn missing_tag() -> Self {
        Self::new(MockBehavior::MissingTag)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    pub fn empty_choices() -> Self {
        Self::new(MockBehavior::EmptyChoices)
    }

    /// Answers like `working()` after `delay_ms` milliseconds
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator.
    ///
    /// It receives the text to translate and returns the raw model answer.
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of `complete` calls so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Every prompt received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Text to translate, i.e. everything after the instruction paragraph
    fn text_to_translate(prompt: &str) -> &str {
        prompt.split_once("\n\n").map(|(_, text)| text).unwrap_or(prompt)
    }

    fn answer(&self, prompt: &str) -> String {
        let text = Self::text_to_translate(prompt);
        match self.custom_response {
            Some(generator) => generator(text),
            None => format!("<result>{}</result>", text),
        }
    }

    fn response_with(content: String) -> ChatResponse {
        ChatResponse {
            choices: vec![ChatChoice {
                message: ChoiceMessage {
                    role: "assistant".to_string(),
                    content: Some(content),
                },
            }],
            ..ChatResponse::default()
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            prompts: Arc::clone(&self.prompts),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.clone());
        }

        match self.behavior {
            MockBehavior::Working => Ok(Self::response_with(self.answer(&prompt))),

            MockBehavior::MissingTag => Ok(Self::response_with(format!(
                "Here is your translation: {}",
                Self::text_to_translate(&prompt)
            ))),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::FailFirst { failures } => {
                if count < failures {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(Self::response_with(self.answer(&prompt)))
                }
            }

            MockBehavior::EmptyChoices => Ok(ChatResponse::default()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(Self::response_with(self.answer(&prompt)))
            }
        }
    }

    fn extract_text(response: &ChatResponse) -> Option<String> {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone().unwrap_or_default())
    }
}
