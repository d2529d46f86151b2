//! Entity store state and its reducer.
//!
//! `EntityState` is what the UI binds to: request flags, the loaded page(s),
//! the focused record and the last error. It only changes through
//! [`EntityState::apply`].

use serde::{Deserialize, Serialize};

use crate::action::{Action, OperationClass};
use crate::pagination::{PageLinks, merge_scrolled};

/// UI-facing state of one entity collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityState<T> {
    /// A fetch-class request is in flight.
    pub loading: bool,
    /// A mutate-class request is in flight.
    pub updating: bool,
    /// The last operation was a successful mutation.
    pub update_success: bool,
    /// Serialized error of the last failed operation.
    pub error_message: Option<String>,
    /// Loaded records, in server order.
    pub entities: Vec<T>,
    /// The focused record.
    pub entity: T,
    /// Pagination cursors of the last page loaded.
    pub links: PageLinks,
    /// Total number of records reported by the server.
    pub total_items: u64,
}

impl<T: Default> EntityState<T> {
    /// Returns the initial state.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            loading: false,
            updating: false,
            update_success: false,
            error_message: None,
            entities: Vec::new(),
            entity: T::default(),
            links: PageLinks::initial(),
            total_items: 0,
        }
    }

    /// Applies one action.
    pub fn apply(&mut self, action: Action<T>) {
        match action {
            Action::Pending(operation) => {
                self.error_message = None;
                self.update_success = false;
                match operation.class() {
                    OperationClass::Fetch => self.loading = true,
                    OperationClass::Mutation => self.updating = true,
                }
            }
            Action::PageLoaded { page, .. } => {
                self.loading = false;
                let current = std::mem::take(&mut self.entities);
                self.entities = merge_scrolled(current, page.items, &page.links);
                self.links = page.links;
                self.total_items = page.total_items;
            }
            Action::EntityLoaded(entity) => {
                self.loading = false;
                self.entity = entity;
            }
            Action::EntitySaved { entity, .. } => {
                self.updating = false;
                self.loading = false;
                self.update_success = true;
                self.entity = entity;
            }
            Action::EntityDeleted => {
                self.updating = false;
                self.update_success = true;
                self.entity = T::default();
            }
            Action::Rejected { message, .. } => {
                self.loading = false;
                self.updating = false;
                self.update_success = false;
                self.error_message = Some(message);
            }
            Action::Reset => *self = Self::initial(),
        }
    }

    /// Returns the state after applying `action`.
    #[must_use]
    pub fn reduce(mut self, action: Action<T>) -> Self {
        self.apply(action);
        self
    }
}

impl<T> EntityState<T> {
    /// Returns true while any request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.loading || self.updating
    }

    /// Returns true when a further page can be loaded.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.links.has_next()
    }
}

impl<T: Default> Default for EntityState<T> {
    fn default() -> Self {
        Self::initial()
    }
}
