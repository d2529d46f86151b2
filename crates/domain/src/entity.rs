//! The contract every stored record type fulfils.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::id::EntityId;

/// A domain record managed by an entity store.
///
/// `Default` is the empty record: it is the initial focused entity and the
/// value the focus is cleared to after a delete.
pub trait Entity:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// REST resource name, e.g. `bill-positions` for `api/bill-positions`.
    const RESOURCE: &'static str;

    /// Prefix for action names, e.g. `billPosition/fetch_entity`.
    const SLICE: &'static str;

    /// Returns the identifier, if the record has been persisted.
    fn id(&self) -> Option<&EntityId>;

    /// Returns true when the record has not been persisted yet.
    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}
