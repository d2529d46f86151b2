//! Application error types

use tally_domain::{DomainError, Operation};
use thiserror::Error;

use crate::ports::HttpClientError;

/// Errors surfaced by entity operations.
///
/// The `Display` form is what ends up in `EntityState::error_message`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}{}", detail_suffix(.detail.as_deref()))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Problem detail reported by the server, if any.
        detail: Option<String>,
    },

    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[from] HttpClientError),

    /// The response body or headers could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The entity could not be encoded as a request body.
    #[error("invalid request body: {0}")]
    Encode(String),

    /// An update or delete was attempted on a record without identifier.
    #[error("cannot {} an entity without an id", verb(.0))]
    MissingIdentifier(Operation),
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}

const fn verb(operation: &Operation) -> &'static str {
    match *operation {
        Operation::PartialUpdate => "partially update",
        Operation::Delete => "delete",
        _ => "update",
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_message() {
        let plain = ApiError::Status {
            status: 404,
            detail: None,
        };
        assert_eq!(plain.to_string(), "Request failed with status code 404");

        let detailed = ApiError::Status {
            status: 400,
            detail: Some("idnull".to_string()),
        };
        assert_eq!(
            detailed.to_string(),
            "Request failed with status code 400: idnull"
        );
    }

    #[test]
    fn test_missing_identifier_message() {
        let error = ApiError::MissingIdentifier(Operation::Update);
        assert_eq!(error.to_string(), "cannot update an entity without an id");
    }
}
