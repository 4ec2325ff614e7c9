//! Error types shared by the provider clients and the structured-output parser

use std::time::Duration;
use thiserror::Error;

/// Failure of a single call to an external provider.
///
/// Every variant is recoverable from the scheduler's point of view: a failed
/// search becomes an error section, a failed judge call means no expansion.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("missing API key for {0}")]
    MissingApiKey(String),
}

impl ProviderError {
    /// Whether this error was caused by a deadline expiring
    pub fn is_timeout(&self) -> bool {
        match self {
            ProviderError::Timeout(_) => true,
            ProviderError::Network(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Failure to pull a JSON payload out of free-form model text
#[derive(Debug, Error)]
pub enum StructuredOutputError {
    #[error("no JSON block found in response")]
    MissingBlock,

    #[error("invalid JSON block: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_detection() {
        assert!(ProviderError::Timeout(Duration::from_secs(1)).is_timeout());
        assert!(!ProviderError::InvalidResponse("empty".to_string()).is_timeout());
    }

    #[test]
    fn test_error_messages() {
        let err = ProviderError::Status {
            status: 429,
            body: "slow down".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 429: slow down");
        assert_eq!(
            StructuredOutputError::MissingBlock.to_string(),
            "no JSON block found in response"
        );
    }
}
