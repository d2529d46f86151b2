//! Entity identifiers.
//!
//! The server emits numeric identifiers, but forms and route parameters hand
//! them back as strings. `EntityId` accepts both shapes and normalizes numeric
//! strings to the numeric form, so `5` and `"5"` name the same record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a persisted entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Numeric identifier (the common case).
    Number(i64),
    /// Identifier that arrived as a non-numeric string.
    Text(String),
}

impl EntityId {
    /// Returns the numeric value, if the identifier is numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.parse().ok(),
        }
    }

    /// Returns true for the placeholder ids forms use for "nothing selected".
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        match self {
            Self::Number(n) => *n == -1,
            Self::Text(s) => s.is_empty() || s == "-1",
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self::Number(n),
            Raw::Text(s) => s.parse::<i64>().map_or(Self::Text(s), Self::Number),
        })
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl FromStr for EntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidIdentifier(s.to_string()));
        }
        if trimmed.contains('/') {
            return Err(DomainError::InvalidIdentifier(s.to_string()));
        }
        Ok(trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Number))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: EntityId = serde_json::from_str("5").unwrap();
        let from_string: EntityId = serde_json::from_str("\"5\"").unwrap();

        assert_eq!(from_number, EntityId::Number(5));
        assert_eq!(from_string, from_number);
        assert_eq!(from_string, "5".parse::<EntityId>().unwrap());
    }

    #[test]
    fn test_deserialize_keeps_non_numeric_text() {
        let id: EntityId = serde_json::from_str("\"ab-12\"").unwrap();
        let empty: EntityId = serde_json::from_str("\"\"").unwrap();

        assert_eq!(id, EntityId::Text("ab-12".to_string()));
        assert!(empty.is_placeholder());
        assert_eq!(serde_json::to_string(&EntityId::Number(5)).unwrap(), "5");
    }

    #[test]
    fn test_parse_prefers_number() {
        assert_eq!("42".parse::<EntityId>().unwrap(), EntityId::Number(42));
        assert_eq!(
            "abc".parse::<EntityId>().unwrap(),
            EntityId::Text("abc".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_empty_and_path_segments() {
        assert!("".parse::<EntityId>().is_err());
        assert!("  ".parse::<EntityId>().is_err());
        assert!("1/2".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_placeholder() {
        assert!(EntityId::Number(-1).is_placeholder());
        assert!(EntityId::Text(String::new()).is_placeholder());
        assert!(!EntityId::Number(3).is_placeholder());
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId::Number(7).to_string(), "7");
        assert_eq!(EntityId::Text("x-1".to_string()).to_string(), "x-1");
    }
}
