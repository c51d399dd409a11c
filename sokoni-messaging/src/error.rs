//! Error handling for the messaging engine
//!
//! One taxonomy for everything that can go wrong between the engine and
//! the remote store. Background poll failures are recoverable by design:
//! the poll loop stays up and surfaces a dismissible banner. Nothing in
//! this module represents a state that should tear down the messaging
//! view.

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, MessagingError>;

/// Errors that can occur during messaging operations
#[derive(Error, Debug)]
pub enum MessagingError {
    /// A remote store operation failed
    #[error("API error: {0}")]
    Api(String),

    /// A remote store operation timed out
    #[error("request timeout: {0}")]
    Timeout(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record decoding error from the data model
    #[error("model error: {0}")]
    Model(#[from] sokoni_messaging_core::ModelError),

    /// An operation that needs an active conversation ran without one
    #[error("no conversation selected")]
    NoSelection,

    /// An operation was attempted in an invalid state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Configuration is invalid or unreadable
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MessagingError {
    /// Whether this error is transient and the operation can be retried
    /// on the next poll tick
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MessagingError::Api(_) | MessagingError::Timeout(_)
        )
    }

    /// User-facing message for banners and inline errors
    pub fn user_message(&self) -> String {
        match self {
            MessagingError::Api(msg) => {
                format!("Could not reach the marketplace: {}. Retrying.", msg)
            }
            MessagingError::Timeout(msg) => {
                format!("Request timed out: {}. Check your connection.", msg)
            }
            MessagingError::Json(e) => {
                format!("Received malformed data: {}.", e)
            }
            MessagingError::Model(e) => {
                format!("Received malformed record: {}.", e)
            }
            MessagingError::NoSelection => {
                "Select a conversation first.".to_string()
            }
            MessagingError::InvalidState(msg) => {
                format!("Messaging is in an unexpected state: {}.", msg)
            }
            MessagingError::Configuration(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MessagingError::Api("503 from /conversations".to_string());
        assert_eq!(error.to_string(), "API error: 503 from /conversations");

        let error = MessagingError::NoSelection;
        assert_eq!(error.to_string(), "no conversation selected");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(MessagingError::Api("down".to_string()).is_recoverable());
        assert!(MessagingError::Timeout("slow".to_string()).is_recoverable());
        assert!(!MessagingError::NoSelection.is_recoverable());
        assert!(!MessagingError::Configuration("bad toml".to_string()).is_recoverable());
    }

    #[test]
    fn test_user_message_is_not_empty() {
        let errors = vec![
            MessagingError::Api("down".to_string()),
            MessagingError::Timeout("slow".to_string()),
            MessagingError::NoSelection,
            MessagingError::InvalidState("poller stopped".to_string()),
            MessagingError::Configuration("bad toml".to_string()),
        ];
        for error in errors {
            assert!(!error.user_message().is_empty());
        }
    }
}
