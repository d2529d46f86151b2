//! Entity state store.
//!
//! The store owns the `EntityState` of one entity type. Each operation
//! dispatches `Pending`, awaits the remote call and dispatches the outcome.
//! State lives in a `watch` channel: every transition is a single
//! synchronous modification, and subscribers see each one.

use std::future::Future;
use std::sync::Arc;

use tally_domain::{Action, Entity, EntityId, EntityState, Operation, Page, PageRequest, SearchRequest};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ApplicationResult;
use crate::ordering::{RequestSequencer, ResponseOrdering, Ticket};
use crate::ports::{Clock, HttpClient};
use crate::service::EntityService;

/// Client-side store for one entity collection.
pub struct EntityStore<T: Entity, C, K> {
    service: EntityService<T, C, K>,
    state: watch::Sender<EntityState<T>>,
    sequencer: RequestSequencer,
    ordering: ResponseOrdering,
}

impl<T: Entity, C: HttpClient, K: Clock> EntityStore<T, C, K> {
    /// Creates a store in the initial state.
    pub fn new(client: Arc<C>, clock: Arc<K>) -> Self {
        Self::with_service(EntityService::new(client, clock))
    }

    /// Creates a store over an existing service.
    #[must_use]
    pub fn with_service(service: EntityService<T, C, K>) -> Self {
        let (state, _) = watch::channel(EntityState::initial());
        Self {
            service,
            state,
            sequencer: RequestSequencer::new(),
            ordering: ResponseOrdering::default(),
        }
    }

    /// Sets how completions of overlapping requests are applied.
    #[must_use]
    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> EntityState<T> {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EntityState<T>> {
        self.state.subscribe()
    }

    /// Searches the collection and merges the page into `entities`.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded in `error_message`.
    pub async fn search(&self, search: SearchRequest) -> ApplicationResult<Page<T>> {
        self.run(Operation::Search, self.service.search(&search), |page| {
            Action::PageLoaded {
                operation: Operation::Search,
                page: page.clone(),
            }
        })
        .await
    }

    /// Lists one page of the collection and merges it into `entities`.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded in `error_message`.
    pub async fn list(&self, page: PageRequest) -> ApplicationResult<Page<T>> {
        self.run(Operation::List, self.service.list(&page), |page| {
            Action::PageLoaded {
                operation: Operation::List,
                page: page.clone(),
            }
        })
        .await
    }

    /// Fetches one record into `entity`.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded in `error_message`.
    pub async fn get_one(&self, id: EntityId) -> ApplicationResult<T> {
        self.run(Operation::GetOne, self.service.get(&id), |entity| {
            Action::EntityLoaded(entity.clone())
        })
        .await
    }

    /// Creates a record; the stored record becomes `entity`.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded in `error_message`.
    pub async fn create(&self, entity: T) -> ApplicationResult<T> {
        self.run(Operation::Create, self.service.create(&entity), |saved| {
            Action::EntitySaved {
                operation: Operation::Create,
                entity: saved.clone(),
            }
        })
        .await
    }

    /// Replaces a record by id; the stored record becomes `entity`.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded in `error_message`.
    pub async fn update(&self, entity: T) -> ApplicationResult<T> {
        self.run(Operation::Update, self.service.update(&entity), |saved| {
            Action::EntitySaved {
                operation: Operation::Update,
                entity: saved.clone(),
            }
        })
        .await
    }

    /// Updates the set fields of a record; the stored record becomes `entity`.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded in `error_message`.
    pub async fn partial_update(&self, entity: T) -> ApplicationResult<T> {
        self.run(
            Operation::PartialUpdate,
            self.service.partial_update(&entity),
            |saved| Action::EntitySaved {
                operation: Operation::PartialUpdate,
                entity: saved.clone(),
            },
        )
        .await
    }

    /// Deletes a record by id and clears `entity`.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded in `error_message`.
    pub async fn delete(&self, id: EntityId) -> ApplicationResult<()> {
        self.run(Operation::Delete, self.service.delete(&id), |_| {
            Action::EntityDeleted
        })
        .await
    }

    /// Restores the initial state. Requests still in flight are discarded
    /// under `ResponseOrdering::LatestIssued`.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.sequencer.reset();
            Self::log(&Action::Reset);
            state.apply(Action::Reset);
        });
    }

    async fn run<R>(
        &self,
        operation: Operation,
        call: impl Future<Output = ApplicationResult<R>>,
        fulfilled: impl FnOnce(&R) -> Action<T>,
    ) -> ApplicationResult<R> {
        let ticket = self.begin(operation);
        let result = call.await;
        let action = match &result {
            Ok(value) => fulfilled(value),
            Err(error) => {
                warn!(action = %operation.action_name::<T>(), %error, "request rejected");
                Action::Rejected {
                    operation,
                    message: error.to_string(),
                }
            }
        };
        self.dispatch(ticket, action);
        result
    }

    fn begin(&self, operation: Operation) -> Ticket {
        let ticket = self.sequencer.issue(operation);
        self.dispatch(ticket, Action::Pending(operation));
        ticket
    }

    /// Applies `action` unless a newer request or a reset superseded `ticket`.
    /// The check runs under the state lock, so it cannot interleave with a reset.
    fn dispatch(&self, ticket: Ticket, action: Action<T>) {
        self.state.send_if_modified(|state| {
            if self.ordering == ResponseOrdering::LatestIssued
                && !self.sequencer.is_current(ticket)
            {
                warn!(
                    action = %action.action_type(),
                    ticket = ticket.seq(),
                    "discarding superseded action"
                );
                return false;
            }
            Self::log(&action);
            state.apply(action);
            true
        });
    }

    fn log(action: &Action<T>) {
        debug!(action = %action.action_type(), "dispatch");
    }
}
