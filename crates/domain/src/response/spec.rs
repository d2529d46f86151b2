//! Response specification type

use std::collections::HashMap;
use std::time::Duration;

/// HTTP response as seen by the entity service.
///
/// Header names are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, names lowercased
    headers: HashMap<String, String>,
    /// Raw response body
    pub body: Vec<u8>,
    /// Response time
    pub duration: Duration,
}

impl ApiResponse {
    /// Creates a response, normalizing header names.
    #[must_use]
    pub fn new(
        status: u16,
        headers: impl IntoIterator<Item = (String, String)>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect(),
            body,
            duration,
        }
    }

    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = ApiResponse::new(
            200,
            [("X-Total-Count".to_string(), "57".to_string())],
            Vec::new(),
            Duration::ZERO,
        );
        assert_eq!(response.header("x-total-count"), Some("57"));
        assert_eq!(response.header("X-TOTAL-COUNT"), Some("57"));
        assert_eq!(response.header("link"), None);
    }

    #[test]
    fn test_status_checks() {
        let ok = ApiResponse {
            status: 204,
            ..Default::default()
        };
        assert!(ok.is_success());

        let not_found = ApiResponse {
            status: 404,
            ..Default::default()
        };
        assert!(!not_found.is_success());
    }
}
