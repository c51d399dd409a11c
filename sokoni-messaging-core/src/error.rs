//! Error handling for the messaging data model
//!
//! Model errors cover decoding of remote records only. They are always
//! non-fatal to the messaging view: callers degrade to placeholder
//! display values rather than propagating decode failures to the user.

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while decoding remote records
#[derive(Error, Debug)]
pub enum ModelError {
    /// JSON serialization/deserialization error
    ///
    /// Automatically converted from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record is missing a field the model cannot default
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ModelError::InvalidRecord("thread without id".to_string());
        assert_eq!(error.to_string(), "invalid record: thread without id");
    }

    #[test]
    fn test_json_error_conversion() {
        let json = r#"{"broken"#;
        let json_error = serde_json::from_str::<serde_json::Value>(json).unwrap_err();
        let model_error: ModelError = json_error.into();
        assert!(matches!(model_error, ModelError::Json(_)));
    }
}
