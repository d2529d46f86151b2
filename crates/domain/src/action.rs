//! Store operations and the actions they dispatch.
//!
//! Every remote operation dispatches `Pending` when it starts and exactly one
//! completion action (a fulfilled variant or `Rejected`) when it ends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::pagination::Page;

/// The remote operations an entity store can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Full-text search over the collection.
    Search,
    /// Paged listing of the collection.
    List,
    /// Fetch of a single record by id.
    GetOne,
    /// Creation of a new record.
    Create,
    /// Full replacement of an existing record.
    Update,
    /// Partial update of an existing record.
    PartialUpdate,
    /// Removal of a record by id.
    Delete,
}

/// Whether an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    /// Read-only call, drives the `loading` flag.
    Fetch,
    /// Write call, drives the `updating` flag.
    Mutation,
}

impl Operation {
    /// Returns the class of this operation.
    #[must_use]
    pub const fn class(self) -> OperationClass {
        match self {
            Self::Search | Self::List | Self::GetOne => OperationClass::Fetch,
            Self::Create | Self::Update | Self::PartialUpdate | Self::Delete => {
                OperationClass::Mutation
            }
        }
    }

    /// Returns the action-name segment of this operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search_entity",
            Self::List => "fetch_entity_list",
            Self::GetOne => "fetch_entity",
            Self::Create => "create_entity",
            Self::Update => "update_entity",
            Self::PartialUpdate => "partial_update_entity",
            Self::Delete => "delete_entity",
        }
    }

    /// Returns the unique action name for entity type `T`,
    /// e.g. `billPosition/create_entity`.
    #[must_use]
    pub fn action_name<T: Entity>(self) -> String {
        format!("{}/{}", T::SLICE, self.as_str())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state transition request for an entity store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<T> {
    /// A remote operation started.
    Pending(Operation),
    /// A list or search returned a page.
    PageLoaded {
        /// `List` or `Search`.
        operation: Operation,
        /// The decoded page.
        page: Page<T>,
    },
    /// A single-record fetch returned.
    EntityLoaded(T),
    /// A create, update or partial update returned the stored record.
    EntitySaved {
        /// `Create`, `Update` or `PartialUpdate`.
        operation: Operation,
        /// The record as stored by the server.
        entity: T,
    },
    /// A delete succeeded.
    EntityDeleted,
    /// A remote operation failed.
    Rejected {
        /// The operation that failed.
        operation: Operation,
        /// Serialized error.
        message: String,
    },
    /// Restore the initial state.
    Reset,
}

impl<T> Action<T> {
    /// Returns the operation this action belongs to, `None` for `Reset`.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Pending(operation)
            | Self::PageLoaded { operation, .. }
            | Self::EntitySaved { operation, .. }
            | Self::Rejected { operation, .. } => Some(*operation),
            Self::EntityLoaded(_) => Some(Operation::GetOne),
            Self::EntityDeleted => Some(Operation::Delete),
            Self::Reset => None,
        }
    }

    /// Returns the lifecycle phase: `pending`, `fulfilled` or `rejected`.
    #[must_use]
    pub const fn phase(&self) -> Option<&'static str> {
        match self {
            Self::Pending(_) => Some("pending"),
            Self::Rejected { .. } => Some("rejected"),
            Self::Reset => None,
            _ => Some("fulfilled"),
        }
    }
}

impl<T: Entity> Action<T> {
    /// Returns the full action type, e.g. `billPosition/fetch_entity/pending`.
    #[must_use]
    pub fn action_type(&self) -> String {
        match (self.operation(), self.phase()) {
            (Some(operation), Some(phase)) => {
                format!("{}/{phase}", operation.action_name::<T>())
            }
            _ => format!("{}/reset", T::SLICE),
        }
    }
}
