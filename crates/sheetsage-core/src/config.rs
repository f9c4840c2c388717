//! SheetSage configuration system.
//!
//! Loaded once at startup and handed to the store and provider constructors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SageError};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SageConfig {
    /// Credential for the completion service. Empty means "look in the environment".
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl SageConfig {
    /// Load config from the default path (~/.sheetsage/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SageError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| SageError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the SheetSage home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sheetsage")
    }
}

/// Remote completion service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Registry name ("openai", "groq", ...) or "custom:<url>".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Overrides the registry base URL when non-empty.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_provider() -> String { "openai".into() }
fn default_model() -> String { "gpt-4-turbo".into() }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: String::new(),
            model: default_model(),
        }
    }
}

/// Relation store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one `<name>.db` per dataset plus `.catalog.db`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String { "~/.sheetsage/datasets".into() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir() }
    }
}

impl StoreConfig {
    pub fn for_dir(dir: &Path) -> Self {
        Self { data_dir: dir.to_string_lossy().into_owned() }
    }

    /// Data directory with `~` and env vars expanded.
    pub fn resolved_data_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir).into_owned())
    }
}

/// Semantic schema configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Namespace prefixed to generated property identifiers.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String { "http://example.org/".into() }

impl Default for SchemaConfig {
    fn default() -> Self {
        Self { namespace: default_namespace() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SageConfig::default();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.model, "gpt-4-turbo");
        assert!(config.api_key.is_empty());
        assert_eq!(config.schema.namespace, "http://example.org/");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            api_key = "sk-test"

            [llm]
            provider = "groq"
            model = "llama-3.3-70b-versatile"

            [store]
            data_dir = "/var/lib/sheetsage"
        "#;

        let config: SageConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert!(config.llm.endpoint.is_empty());
        assert_eq!(
            config.store.resolved_data_dir(),
            PathBuf::from("/var/lib/sheetsage")
        );
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: SageConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.store.data_dir, "~/.sheetsage/datasets");
    }

    #[test]
    fn test_tilde_expansion() {
        let dir = StoreConfig::default().resolved_data_dir();
        assert!(dir.ends_with(".sheetsage/datasets"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nendpoint = \"http://localhost:11434/v1\"\n").unwrap();

        let loaded = SageConfig::load_from(&path).unwrap();
        assert_eq!(loaded.llm.endpoint, "http://localhost:11434/v1");
        assert_eq!(loaded.llm.model, "gpt-4-turbo");
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "llm = 3").unwrap();
        let err = SageConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SageError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SageConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SageError::Config(_)));
    }

    #[test]
    fn test_home_dir() {
        let home = SageConfig::home_dir();
        assert!(home.to_string_lossy().contains("sheetsage"));
    }
}
