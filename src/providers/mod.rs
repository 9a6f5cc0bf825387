/*!
 * Provider implementations for the translation backend.
 *
 * - OpenRouter: OpenAI-compatible chat completions over HTTP
 * - Mock: in-process provider with scripted behaviours, used by tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translation client.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract the generated text from the provider response
    ///
    /// # Returns
    /// * `Option<String>` - The first generated message, or `None` if the response has none
    fn extract_text(response: &Self::Response) -> Option<String>;
}

pub mod mock;
pub mod openrouter;
