use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::translation::retry::{with_retry, RetryPolicy};

/// OpenRouter client for the OpenAI-compatible chat completions API
pub struct OpenRouter {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Chat completions URL
    endpoint: String,
    /// Sent as HTTP-Referer for attribution
    referer: String,
    /// Sent as X-Title for attribution
    title: String,
    /// Retry policy for the raw send; status and body errors are not retried here
    retry: RetryPolicy,
}

impl fmt::Debug for OpenRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouter")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("retry", &self.retry)
            .finish()
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completions request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model to use
    pub model: String,

    /// The messages for the conversation
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Create a new request without messages
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }
}

/// Chat completions response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<ChatChoice>,

    /// Error reported inside a 200 response
    #[serde(default)]
    pub error: Option<ApiErrorBody>,

    /// Token usage information
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// One generated choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

/// Message inside a choice; content can be null for some models
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Structured API error
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,

    #[serde(default, rename = "type")]
    pub error_type: Option<String>,

    /// OpenRouter sends numeric codes, OpenAI sends strings
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Human readable message including type and code when present
    pub fn describe(&self) -> String {
        let mut description = self.message.clone();
        let error_type = self.error_type.as_deref().unwrap_or("");
        let code = match &self.code {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        if !error_type.is_empty() || !code.is_empty() {
            description.push_str(&format!(" (Type: {}, Code: {})", error_type, code));
        }
        description
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

/// Structured error message from an error body, if it has one
pub fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .filter(|envelope| !envelope.error.message.is_empty())
        .map(|envelope| envelope.error.describe())
}

/// Parse the body of a successful HTTP response
pub fn parse_chat_response(body: &str) -> Result<ChatResponse, ProviderError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("failed to unmarshal response: {}", e)))?;

    if let Some(api_error) = &response.error {
        return Err(ProviderError::ApiError {
            status_code: 200,
            message: api_error.describe(),
        });
    }

    Ok(response)
}

fn is_loopback_endpoint(endpoint: &str) -> bool {
    Url::parse(endpoint)
        .ok()
        .and_then(|url| url.host_str().map(|host| matches!(host, "localhost" | "127.0.0.1" | "[::1]")))
        .unwrap_or(false)
}

impl OpenRouter {
    /// Create a new client from the provider configuration
    pub fn new(config: &ProviderConfig, retry: RetryPolicy) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout());
        if is_loopback_endpoint(&config.endpoint) {
            // local gateways must not be routed through a system proxy
            builder = builder.no_proxy();
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
            retry,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Provider for OpenRouter {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let response = with_retry(&self.retry, "API call", || {
            self.client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .header("HTTP-Referer", &self.referer)
                .header("X-Title", &self.title)
                .json(&request)
                .send()
        })
        .await
        .map_err(|e| ProviderError::RequestFailed(format!("failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = api_error_message(&body).unwrap_or(body);
            error!("OpenRouter API error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let response = parse_chat_response(&body)?;
        if let Some(usage) = &response.usage {
            debug!(
                "Token usage: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
        Ok(response)
    }

    fn extract_text(response: &ChatResponse) -> Option<String> {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone().unwrap_or_default())
    }
}
