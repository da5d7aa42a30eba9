//! Blocking driver for hosts that want the core to run the round trips.
//!
//! # Design
//! The controllers stay I/O-free; this module only sequences them around a
//! caller-supplied `Transport`. The two home requests run on scoped threads
//! so they are in flight at the same time. A panicking transport is turned
//! into a `TransportError` so the settlement still happens and `loading`
//! still clears. Requests are not dispatched once the screen's token has
//! been cancelled.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::ScopedJoinHandle;

use crate::error::ApiError;
use crate::home::HomeController;
use crate::http::{HttpRequest, HttpResponse};
use crate::lifecycle::{CancellationToken, Settlement};
use crate::search::SearchController;

/// Executes one HTTP round trip. Implementations must be shareable across
/// threads because the home batch is dispatched concurrently.
pub trait Transport: Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl HomeController {
    /// Refresh and drive both requests to settlement.
    ///
    /// Returns `None` when the screen is torn down and nothing was issued.
    pub fn load_with<T: Transport>(&mut self, transport: &T) -> Option<Settlement> {
        let fetch = self.refresh()?;
        let token = self.token();
        let (random, categories) = std::thread::scope(|scope| {
            let random = scope.spawn(|| dispatch(transport, &token, &fetch.random.request));
            let categories = scope.spawn(|| dispatch(transport, &token, &fetch.categories.request));
            (joined(random), joined(categories))
        });

        let first = self.settle(fetch.random.ticket, random);
        let second = self.settle(fetch.categories.ticket, categories);
        Some(match first {
            Settlement::Failed | Settlement::Dropped(_) => first,
            _ => second,
        })
    }
}

impl SearchController {
    /// Search for the current query and drive the request to settlement.
    ///
    /// Returns `None` when nothing was issued (empty query or torn down).
    pub fn search_with<T: Transport>(&mut self, transport: &T) -> Option<Settlement> {
        let pending = self.perform_search()?;
        let token = self.token();
        let outcome = catch_unwind(AssertUnwindSafe(|| dispatch(transport, &token, &pending.request)))
            .unwrap_or_else(|_| Err(panicked()));
        Some(self.settle(pending.ticket, outcome))
    }
}

fn dispatch<T: Transport>(
    transport: &T,
    token: &CancellationToken,
    request: &HttpRequest,
) -> Result<HttpResponse, ApiError> {
    if token.is_cancelled() {
        return Err(ApiError::TransportError("cancelled before dispatch".to_string()));
    }
    transport.execute(request)
}

fn joined(handle: ScopedJoinHandle<'_, Result<HttpResponse, ApiError>>) -> Result<HttpResponse, ApiError> {
    handle.join().unwrap_or_else(|_| Err(panicked()))
}

fn panicked() -> ApiError {
    ApiError::TransportError("transport panicked".to_string())
}
