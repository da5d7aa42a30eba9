//! Request bookkeeping shared by the screen controllers.
//!
//! # Design
//! A controller hands out `PendingRequest`s and later receives their outcome
//! through `settle`. Each request carries a `Ticket` naming the slot it fills
//! and the generation it belongs to; a controller only applies settlements of
//! its newest generation. A `CancellationToken` bounds the controller's
//! lifetime: once cancelled, every settlement is dropped. Hosts may clone the
//! token to abort their own in-flight I/O.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::http::HttpRequest;

/// Which piece of screen state a request populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    RandomRecipe,
    Categories,
    Search,
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
    pub slot: Slot,
}

/// A request the host must execute and settle with its ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

/// What a controller did with a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The result was written to screen state and loading cleared.
    Applied,
    /// Stored; the batch is still waiting on its other request.
    Pending,
    /// The fetch failed; state kept, error recorded, loading cleared.
    Failed,
    /// Ignored without touching state.
    Dropped(DropReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// A newer request superseded this one, or its batch already failed.
    Stale,
    /// The owning screen was torn down.
    TornDown,
    /// The ticket names a slot this controller does not own.
    UnexpectedSlot,
}

/// Lifetime signal for one screen controller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Monotonic generation counter; the last issued value is the only live one.
#[derive(Debug, Default)]
pub(crate) struct Sequencer {
    latest: u64,
}

impl Sequencer {
    pub(crate) fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// False until something has been issued.
    pub(crate) fn is_latest(&self, generation: u64) -> bool {
        self.latest != 0 && generation == self.latest
    }
}
