//! Unified OpenAI-compatible provider.
//!
//! A single struct that handles chat completions for every OpenAI-compatible API.
//! Providers are distinguished only by endpoint URL, auth style, and API key.

use async_trait::async_trait;
use serde_json::Value;
use sheetsage_core::config::SageConfig;
use sheetsage_core::error::{Result, SageError};
use sheetsage_core::traits::CompletionProvider;
use sheetsage_core::types::{CompletionChoice, CompletionRequest, CompletionResponse, Usage};

use crate::provider_registry::{AuthStyle, ProviderConfig};

/// Keys consulted for `custom:` endpoints when the config carries none.
const CUSTOM_ENV_KEYS: &[&str] = &["SHEETSAGE_API_KEY", "API_KEY"];

/// A unified provider that works with any OpenAI-compatible API.
pub struct OpenAiCompatibleProvider {
    /// Provider name (e.g., "openai", "groq", "custom").
    name: String,
    api_key: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    base_url: String,
    /// Path for chat completions (e.g., "/chat/completions").
    chat_path: String,
    auth_style: AuthStyle,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Bearer-authenticated provider for an explicit endpoint.
    pub fn new(name: &str, base_url: &str, api_key: &str) -> Self {
        Self {
            name: name.to_string(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_path: "/chat/completions".to_string(),
            auth_style: AuthStyle::Bearer,
            client: reqwest::Client::new(),
        }
    }

    /// Create from a known provider config.
    ///
    /// Resolution order:
    /// - API key: `config.api_key` > env vars > empty
    /// - Base URL: `config.llm.endpoint` > env override > registry default
    pub fn from_registry(registry: &ProviderConfig, config: &SageConfig) -> Self {
        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            key_from_env(registry.env_keys)
        };

        let base_url = if !config.llm.endpoint.is_empty() {
            config.llm.endpoint.clone()
        } else {
            registry
                .base_url_env
                .and_then(|env_key| {
                    let val = std::env::var(env_key).ok()?;
                    // OLLAMA_HOST is usually given without the /v1 suffix
                    if val.ends_with("/v1") {
                        Some(val)
                    } else {
                        Some(format!("{}/v1", val.trim_end_matches('/')))
                    }
                })
                .unwrap_or_else(|| registry.base_url.to_string())
        };

        Self {
            name: registry.name.to_string(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_path: registry.chat_path.to_string(),
            auth_style: registry.auth_style,
            client: reqwest::Client::new(),
        }
    }

    /// Create for a custom endpoint (e.g., "custom:https://my-server.com/v1").
    pub fn custom(endpoint: &str, config: &SageConfig) -> Self {
        let base_url = endpoint
            .strip_prefix("custom:")
            .unwrap_or(endpoint)
            .trim_end_matches('/')
            .to_string();

        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            key_from_env(CUSTOM_ENV_KEYS)
        };

        let auth_style = if api_key.is_empty() {
            AuthStyle::None
        } else {
            AuthStyle::Bearer
        };

        Self {
            name: "custom".to_string(),
            api_key,
            base_url,
            chat_path: "/chat/completions".to_string(),
            auth_style,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the auth header for the request.
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_style {
            AuthStyle::Bearer if !self.api_key.is_empty() => {
                req.header("Authorization", format!("Bearer {}", self.api_key))
            }
            _ => req,
        }
    }
}

fn key_from_env(keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
        .unwrap_or_default()
}

/// Pull a human-readable message out of an error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json["error"]["message"]
                .as_str()
                .or_else(|| json["error"].as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn parse_response(name: &str, json: &Value) -> Result<CompletionResponse> {
    if json.get("error").is_some_and(|e| !e.is_null()) {
        return Err(SageError::Provider(format!(
            "{name} API error: {}",
            error_detail(&json.to_string())
        )));
    }

    let choices = json["choices"]
        .as_array()
        .ok_or_else(|| SageError::Http(format!("{name} returned a malformed response: no choices array")))?;

    let choices = choices
        .iter()
        .enumerate()
        .map(|(i, choice)| CompletionChoice {
            index: choice["index"].as_u64().unwrap_or(i as u64) as u32,
            content: choice["message"]["content"].as_str().map(String::from),
            finish_reason: choice["finish_reason"].as_str().map(String::from),
        })
        .collect();

    let usage = json["usage"].as_object().map(|u| Usage {
        prompt_tokens: u.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        completion_tokens: u
            .get("completion_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        total_tokens: u.get("total_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
    });

    Ok(CompletionResponse { choices, usage })
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        // For providers that require auth, check API key
        if self.auth_style != AuthStyle::None && self.api_key.is_empty() {
            return Err(SageError::ApiKeyMissing(self.name.clone()));
        }

        let url = format!("{}{}", self.base_url, self.chat_path);
        tracing::debug!("🧠 {} completion via {} (model {})", self.name, url, request.model);

        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request);
        let req = self.apply_auth(req);

        let resp = req.send().await.map_err(|e| {
            SageError::Http(format!("{} connection failed ({}): {}", self.name, url, e))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(SageError::Provider(format!(
                "{} API error {}: {}",
                self.name,
                status,
                error_detail(&text)
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| SageError::Http(format!("{} returned invalid JSON: {e}", self.name)))?;

        let response = parse_response(&self.name, &json)?;
        if let Some(usage) = &response.usage {
            tracing::debug!(
                "📊 {} tokens: prompt={} completion={}",
                self.name,
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }
        Ok(response)
    }
}
