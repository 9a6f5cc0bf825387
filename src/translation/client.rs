/*!
 * Single-chunk translation.
 *
 * Builds the prompt, sends it through a provider and pulls the payload out
 * of the `<result>` tag. A missing tag is a hard failure; the raw answer is
 * never used as a fallback.
 */

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranslationError;
use crate::language_utils::prompt_language_name;
use crate::providers::openrouter::{ChatRequest, ChatResponse};
use crate::providers::Provider;

static RESULT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<result>(.*?)</result>").expect("result tag regex is valid"));

/// Anything that can translate one chunk of text
#[async_trait]
pub trait Translate: Send + Sync {
    /// Translate `text` into `target_language`, returning the extracted payload.
    async fn translate_chunk(&self, text: &str, target_language: &str) -> Result<String, TranslationError>;
}

/// Prompt sent to the model for one chunk
pub fn build_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {} language, but save formatting, the answer place in the tag <result>:\n\n{}",
        prompt_language_name(target_language),
        text
    )
}

/// Payload of the first `<result>...</result>` pair, if any
pub fn extract_result_tag(output: &str) -> Option<String> {
    RESULT_TAG
        .captures(output)
        .and_then(|captures| captures.get(1))
        .map(|payload| payload.as_str().to_string())
}

/// Chat-based translation client over any provider speaking the chat schema
#[derive(Debug)]
pub struct TranslationClient<P> {
    provider: P,
    model: String,
}

impl<P> TranslationClient<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl<P> Translate for TranslationClient<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    async fn translate_chunk(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        let request = ChatRequest::new(self.model.as_str()).add_message("user", build_prompt(text, target_language));

        let response = self.provider.complete(request).await?;
        let content = P::extract_text(&response).ok_or(TranslationError::EmptyResponse)?;

        match extract_result_tag(&content) {
            Some(payload) => Ok(payload),
            None => {
                debug!("Model output without result tag ({} chars discarded)", content.len());
                Err(TranslationError::ResultTagNotFound)
            }
        }
    }
}
