//! Response ordering for overlapping requests.
//!
//! Requests are grouped into lanes by the part of the state their completion
//! writes: pages (`entities`, `links`, `total_items`), the single `entity`
//! read, and mutations. With `LatestIssued`, each request takes a ticket and
//! its completion is dropped if a newer request in the same lane was issued,
//! or the store was reset, after the ticket was taken. `ArrivalOrder` applies
//! every completion as it arrives.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tally_domain::Operation;

/// How completions of overlapping requests are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Only the most recently issued request of a lane updates the state.
    #[default]
    LatestIssued,
    /// Every completion updates the state, last to arrive wins.
    ArrivalOrder,
}

/// Requests in the same lane supersede each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// `list` and `search`.
    Page,
    /// `get_one`.
    Entity,
    /// `create`, `update`, `partial_update` and `delete`.
    Mutation,
}

impl Lane {
    /// Returns the lane `operation` runs in.
    #[must_use]
    pub const fn of(operation: Operation) -> Self {
        match operation {
            Operation::Search | Operation::List => Self::Page,
            Operation::GetOne => Self::Entity,
            Operation::Create
            | Operation::Update
            | Operation::PartialUpdate
            | Operation::Delete => Self::Mutation,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Page => 0,
            Self::Entity => 1,
            Self::Mutation => 2,
        }
    }
}

/// A request's position in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    lane: Lane,
}

impl Ticket {
    /// Sequence number, starting at 1.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.seq
    }

    /// Lane the ticket was issued in.
    #[must_use]
    pub const fn lane(self) -> Lane {
        self.lane
    }
}

/// Hands out tickets and tells stale ones apart.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    latest: [AtomicU64; 3],
    reset_at: AtomicU64,
}

impl RequestSequencer {
    /// Creates a sequencer with nothing issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket for `operation`.
    pub fn issue(&self, operation: Operation) -> Ticket {
        let lane = Lane::of(operation);
        let seq = self.issued.fetch_add(1, Ordering::AcqRel) + 1;
        self.latest[lane.index()].fetch_max(seq, Ordering::AcqRel);
        Ticket { seq, lane }
    }

    /// Returns true if no newer request of the ticket's lane was issued and
    /// no reset happened since the ticket was issued.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.seq > self.reset_at.load(Ordering::Acquire)
            && ticket.seq >= self.latest[ticket.lane.index()].load(Ordering::Acquire)
    }

    /// Makes every ticket issued so far stale.
    pub fn reset(&self) {
        self.reset_at
            .store(self.issued.load(Ordering::Acquire), Ordering::Release);
    }
}
