//! Bill record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Project;
use crate::entity::Entity;
use crate::id::EntityId;

/// A bill collected within a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Bill title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// When the bill was closed, if it is closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_timestamp: Option<DateTime<Utc>>,
    /// Total once closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_amount: Option<f64>,
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
}

impl Bill {
    /// Creates a reference to an existing bill.
    #[must_use]
    pub fn reference(id: impl Into<EntityId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

impl Entity for Bill {
    const RESOURCE: &'static str = "bills";
    const SLICE: &'static str = "bill";

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}
