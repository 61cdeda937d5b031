//! Custom error types for the finance manager
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for finance manager operations
#[derive(Error, Debug)]
pub enum FinanceError {
    /// Blank required field, malformed number or date
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Zero or negative amount where a positive one is required
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Duplicate entity errors (existing login, rename onto another category)
    #[error("{entity_type} already exists: {identifier}")]
    DuplicateName {
        entity_type: &'static str,
        identifier: String,
    },

    /// Budget requested for a category that only ever received income
    #[error("Illegal category: {0}")]
    IllegalCategory(String),

    /// Exact budget lookup found nothing
    #[error("Budget is not set for category: {0}")]
    NoBudgetSet(String),

    /// Transaction handle outside the wallet's log. Indicates a programming error.
    #[error("Transaction index {index} out of range (log has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Unknown login or wrong password
    #[error("Invalid login or password")]
    InvalidCredentials,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl FinanceError {
    /// Create a duplicate error for categories
    pub fn duplicate_category(identifier: impl Into<String>) -> Self {
        Self::DuplicateName {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a duplicate error for users
    pub fn duplicate_user(identifier: impl Into<String>) -> Self {
        Self::DuplicateName {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a validation-style error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidAmount(_))
    }

    /// Whether the error should be shown to the user as an ordinary failure.
    ///
    /// `IndexOutOfRange` is an internal invariant violation and is not.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::IndexOutOfRange { .. })
    }
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for finance manager operations
pub type FinanceResult<T> = Result<T, FinanceError>;
