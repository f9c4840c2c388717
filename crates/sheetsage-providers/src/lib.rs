//! # SheetSage Providers
//!
//! Remote completion providers. Every supported service is reached through
//! the single [`OpenAiCompatibleProvider`]; the registry only decides the
//! endpoint, credential source and auth style.

pub mod openai_compatible;
pub mod provider_registry;

pub use openai_compatible::OpenAiCompatibleProvider;

use sheetsage_core::config::SageConfig;
use sheetsage_core::error::{Result, SageError};
use sheetsage_core::traits::CompletionProvider;

/// Create a provider from configuration.
pub fn create_provider(config: &SageConfig) -> Result<Box<dyn CompletionProvider>> {
    let provider_name = config.llm.provider.as_str();
    match provider_name {
        // Custom endpoint: "custom:https://my-server.com/v1"
        other if other.starts_with("custom:") => {
            Ok(Box::new(OpenAiCompatibleProvider::custom(other, config)))
        }
        _ => {
            let registry = provider_registry::get_provider_config(provider_name)
                .ok_or_else(|| SageError::ProviderNotFound(provider_name.into()))?;
            Ok(Box::new(OpenAiCompatibleProvider::from_registry(registry, config)))
        }
    }
}

/// List all available provider names.
pub fn available_providers() -> Vec<&'static str> {
    let mut names = provider_registry::all_provider_names();
    names.push("custom");
    names
}
