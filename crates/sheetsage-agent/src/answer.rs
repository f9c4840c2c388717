//! Answer generation: one completion call per question.
//!
//! The whole context is serialized into a single user message, followed by a
//! blank line and the question. There is no system message, no retry and no
//! conversation state.

use sheetsage_core::error::SageError;
use sheetsage_core::traits::CompletionProvider;
use sheetsage_core::types::{ChatMessage, CompletionRequest};
use sheetsage_knowledge::ContextChunks;
use std::fmt;

pub const MAX_TOKENS: u32 = 2000;
pub const COMPLETIONS: u32 = 1;
pub const TEMPERATURE: f32 = 0.7;

/// Every rendered [`AnswerError`] contains this marker; answers never do.
pub const ERROR_MARKER: &str = "error occurred";

/// Shown when the service returns no usable choice.
pub const EMPTY_ANSWER: &str = "No answer was returned for this question.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerErrorKind {
    /// The completion service reported the failure (status, error payload, credential).
    RemoteService,
    /// Anything else: network trouble, an undecodable response.
    Unexpected,
}

impl fmt::Display for AnswerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerErrorKind::RemoteService => write!(f, "remote service"),
            AnswerErrorKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("An error occurred ({kind}): {detail}")]
pub struct AnswerError {
    pub kind: AnswerErrorKind,
    pub detail: String,
}

impl From<SageError> for AnswerError {
    fn from(err: SageError) -> Self {
        let kind = if err.is_service_error() {
            AnswerErrorKind::RemoteService
        } else {
            AnswerErrorKind::Unexpected
        };
        Self {
            kind,
            detail: err.to_string(),
        }
    }
}

pub type AnswerOutcome = std::result::Result<String, AnswerError>;

/// Text shown to the user for either branch of an outcome.
pub fn render_outcome(outcome: &AnswerOutcome) -> String {
    match outcome {
        Ok(answer) => answer.clone(),
        Err(err) => err.to_string(),
    }
}

/// `"<context>\n\n<question>"`
pub fn build_prompt(context: &ContextChunks, question: &str) -> String {
    format!("{}\n\n{}", context.render(), question)
}

pub struct AnswerGenerator {
    provider: Box<dyn CompletionProvider>,
    model: String,
}

impl AnswerGenerator {
    pub fn new(provider: Box<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The request sent for a given prompt.
    pub fn request_for(&self, prompt: String) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: MAX_TOKENS,
            n: COMPLETIONS,
            stop: None,
            temperature: TEMPERATURE,
        }
    }

    pub async fn answer(&self, question: &str, context: &ContextChunks) -> AnswerOutcome {
        let request = self.request_for(build_prompt(context, question));
        tracing::debug!(
            "🤖 Asking {} ({}) with {} context chunks",
            self.provider.name(),
            self.model,
            context.len()
        );

        match self.provider.complete(&request).await {
            Ok(response) => match response.first_content() {
                Some(text) => Ok(text.trim().to_string()),
                None => {
                    tracing::warn!("⚠️ {} returned no choices", self.provider.name());
                    Ok(EMPTY_ANSWER.to_string())
                }
            },
            Err(e) => {
                tracing::error!("❌ Completion failed: {e}");
                Err(AnswerError::from(e))
            }
        }
    }
}
