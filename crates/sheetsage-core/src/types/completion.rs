//! Chat-completion request and response types (OpenAI wire shape).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single completion request. `stop` serializes as `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub n: u32,
    pub stop: Option<Vec<String>>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionChoice {
    pub index: u32,
    pub content: Option<String>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Provider-neutral completion result. `choices` may legitimately be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.content.as_deref())
    }
}
