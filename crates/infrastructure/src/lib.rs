//! Tally Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod config;
pub mod serialization;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::{ClientConfig, ConfigError};
pub use serialization::{SerializationError, from_json, to_json_stable};

use tally_application::EntityStore;

/// Entity store wired to the real HTTP client and clock.
pub type RestStore<T> = EntityStore<T, ReqwestHttpClient, SystemClock>;
