//! Project reference record

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::EntityId;

/// A project, usually seen as a reference embedded in other records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Project {
    /// Creates a reference to an existing project.
    #[must_use]
    pub fn reference(id: impl Into<EntityId>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }
}

impl Entity for Project {
    const RESOURCE: &'static str = "projects";
    const SLICE: &'static str = "project";

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}
