//! Tally Application - Entity stores and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The REST service for an entity resource
//! - The entity state store that folds request outcomes into UI state

pub mod error;
pub mod ordering;
pub mod ports;
pub mod service;
pub mod store;

pub use error::{ApiError, ApplicationResult};
pub use ordering::{Lane, RequestSequencer, ResponseOrdering, Ticket};
pub use ports::{Clock, HttpClient, HttpClientError};
pub use service::EntityService;
pub use store::EntityStore;
