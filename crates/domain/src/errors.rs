//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_message() {
        let err = DomainError::validation("text must not be empty");
        assert_eq!(err.to_string(), "Validation failed: text must not be empty");
    }

    #[test]
    fn errors_are_debug() {
        let err = DomainError::ValidationError("bad".to_string());
        let debug = format!("{err:?}");
        assert!(debug.contains("ValidationError"));
    }
}
