//! Error Types for the Volatility Engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A required field was absent and has no documented fallback
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A field was present but outside its valid range
    #[error("Invalid input: {field} = {value} ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A calculation parameter was rejected (e.g. zero simulation paths)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Snapshot source error: {0}")]
    Source(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Narrator error: {0}")]
    Narrator(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn invalid(
        field: impl Into<String>,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than a collaborator
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput(_) | Self::InvalidInput { .. } | Self::InvalidParameter(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_classification() {
        assert!(EngineError::MissingInput("eth_price".into()).is_input_error());
        assert!(EngineError::invalid("vix", -1.0, "must be non-negative").is_input_error());
        assert!(!EngineError::Store("locked".into()).is_input_error());
    }

    #[test]
    fn test_invalid_input_message() {
        let err = EngineError::invalid("eth_price", 0, "must be positive");
        assert_eq!(err.to_string(), "Invalid input: eth_price = 0 (must be positive)");
    }
}
