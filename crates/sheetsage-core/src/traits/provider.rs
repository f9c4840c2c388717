//! Completion provider trait: the boundary to the remote language model.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CompletionRequest, CompletionResponse};

/// A remote chat-completion service.
///
/// Implementations report service-side rejections as `SageError::Provider`
/// (or `ApiKeyMissing`) and transport/decoding failures as `SageError::Http`.
/// They never retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Submit one completion request and wait for the full response.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}
