//! Bill position record

use serde::{Deserialize, Serialize};

use super::Bill;
use crate::entity::Entity;
use crate::id::EntityId;

/// A single line item on a bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPosition {
    /// Identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Line item title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Line item cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// The bill this position belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill: Option<Bill>,
}

impl BillPosition {
    /// Creates a new, unsaved position.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Sets the cost.
    #[must_use]
    pub const fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Attaches the position to a bill.
    #[must_use]
    pub fn with_bill(mut self, bill: Bill) -> Self {
        self.bill = Some(bill);
        self
    }
}

impl Entity for BillPosition {
    const RESOURCE: &'static str = "bill-positions";
    const SLICE: &'static str = "billPosition";

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_position_serializes_to_empty_object() {
        let value = serde_json::to_value(BillPosition::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_deserialize_server_payload() {
        let position: BillPosition = serde_json::from_value(json!({
            "id": 5,
            "title": "Pizza",
            "cost": 12.5,
            "bill": { "id": "3", "title": "Dinner" }
        }))
        .unwrap();

        assert_eq!(position.id, Some(EntityId::Number(5)));
        assert_eq!(position.cost, Some(12.5));
        assert_eq!(
            position.bill.and_then(|b| b.id).and_then(|id| id.as_number()),
            Some(3)
        );
    }

    #[test]
    fn test_is_new() {
        assert!(BillPosition::new("Taxi").is_new());
        let saved = BillPosition {
            id: Some(EntityId::Number(1)),
            ..BillPosition::default()
        };
        assert!(!saved.is_new());
    }
}
