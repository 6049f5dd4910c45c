//! Error types for clausekit

use thiserror::Error;

/// Result type alias for clausekit operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for building and executing queries
///
/// Whitelist rejections are not errors: a rejected ORDER BY or SELECT name
/// leaves the statement untouched.
#[derive(Debug, Error)]
pub enum OrmError {
    /// The value handed to a struct-driven operation is not a registered entity.
    #[error("Invalid input kind: {type_name} is not a registered entity struct")]
    InvalidInputKind { type_name: String },

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl OrmError {
    /// Create an invalid input kind error for the given type name
    pub fn invalid_input_kind(type_name: impl Into<String>) -> Self {
        Self::InvalidInputKind {
            type_name: type_name.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is an invalid input kind error
    pub fn is_invalid_input_kind(&self) -> bool {
        matches!(self, Self::InvalidInputKind { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_kind_message_names_type() {
        let err = OrmError::invalid_input_kind("i32");
        assert!(err.is_invalid_input_kind());
        assert_eq!(
            err.to_string(),
            "Invalid input kind: i32 is not a registered entity struct"
        );
    }

    #[test]
    fn predicates_are_exclusive() {
        let err = OrmError::not_found("Expected one row, got none");
        assert!(err.is_not_found());
        assert!(!err.is_invalid_input_kind());
    }
}
