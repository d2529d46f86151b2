//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A `link` header could not be parsed.
    #[error("invalid link header: {0}")]
    InvalidLinkHeader(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
