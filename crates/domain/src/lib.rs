//! Tally Domain - Core entity types
//!
//! This crate defines the entity records of the project cost-sharing
//! application, the UI-facing `EntityState` and the reducer that folds
//! request lifecycle actions into it.
//! All types here are pure Rust with no I/O dependencies.

pub mod action;
pub mod clean;
pub mod entity;
pub mod error;
pub mod id;
pub mod model;
pub mod pagination;
pub mod request;
pub mod response;
pub mod state;

pub use action::{Action, Operation, OperationClass};
pub use clean::{clean_entity, clean_value};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::EntityId;
pub use model::{Bill, BillPosition, Project, ProjectSettings};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageLinks, PageRequest, SearchRequest, merge_scrolled};
pub use state::EntityState;
