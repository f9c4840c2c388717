//! Error taxonomy shared by all SheetSage crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SageError {
    /// The durable store could not be opened (permissions, corruption, disk full).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A write or read against an open store failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// No relation is stored under the requested name.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A source file could not be turned into a relation.
    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The completion service rejected or failed the request.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("API key missing for provider: {0}")]
    ApiKeyMissing(String),

    /// Transport or decoding failure talking to the completion service.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SageError {
    /// True for failures reported by the remote service itself, as opposed to
    /// transport or decoding problems on our side.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            SageError::Provider(_) | SageError::ApiKeyMissing(_) | SageError::ProviderNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(SageError::Provider("429 rate limited".into()).is_service_error());
        assert!(SageError::ApiKeyMissing("openai".into()).is_service_error());
        assert!(!SageError::Http("connection reset".into()).is_service_error());
        assert!(!SageError::NotFound("sales".into()).is_service_error());
    }

    #[test]
    fn test_error_display_keeps_detail() {
        let err = SageError::Persistence("disk I/O error".into());
        assert_eq!(err.to_string(), "Persistence error: disk I/O error");
    }
}
