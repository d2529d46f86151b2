//! Project settings record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Project;
use crate::entity::Entity;
use crate::id::EntityId;

/// Per-project settings.
///
/// Settings fields the client does not model explicitly are kept in `extra`
/// and sent back unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// Identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// The project these settings apply to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
    /// Remaining settings fields, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for ProjectSettings {
    const RESOURCE: &'static str = "project-settings";
    const SLICE: &'static str = "projectSettings";

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}
