//! Latest-wins sequencing for lookups issued while the user is typing.
//!
//! Each lookup gets a ticket. Starting a new lookup cancels the previous
//! ticket, and a lookup that finishes after being superseded yields `None`
//! so its result is never applied over a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::geocode::GeocodeResolver;
use crate::types::LocationCandidate;

/// Delay between the last keystroke and the geocode request
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct LookupTicket {
    generation: u64,
    token: CancellationToken,
}

impl LookupTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug, Default)]
pub struct LookupSequencer {
    latest: Mutex<Option<LookupTicket>>,
    issued: AtomicU64,
}

impl LookupSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new lookup, cancelling the one in flight.
    pub fn begin(&self) -> LookupTicket {
        let ticket = LookupTicket {
            generation: self.issued.fetch_add(1, Ordering::SeqCst) + 1,
            token: CancellationToken::new(),
        };

        let previous = self.latest.lock().replace(ticket.clone());
        if let Some(previous) = previous {
            tracing::trace!(generation = previous.generation, "Superseded lookup");
            previous.token.cancel();
        }
        ticket
    }

    pub fn is_latest(&self, ticket: &LookupTicket) -> bool {
        self.latest
            .lock()
            .as_ref()
            .is_some_and(|t| t.generation == ticket.generation)
    }

    /// Cancel whatever is in flight, e.g. when the input is cleared.
    pub fn cancel(&self) {
        if let Some(ticket) = self.latest.lock().take() {
            ticket.token.cancel();
        }
    }

    /// Drive `lookup` under `ticket`.
    ///
    /// Returns `None` if the ticket is cancelled before the lookup finishes,
    /// or if a newer ticket was issued by the time it does.
    pub async fn run<F>(&self, ticket: &LookupTicket, lookup: F) -> Option<F::Output>
    where
        F: Future,
    {
        let output = tokio::select! {
            biased;
            () = ticket.token.cancelled() => return None,
            output = lookup => output,
        };
        self.is_latest(ticket).then_some(output)
    }

    /// Wait out `delay`, then run the lookup unless a newer one started meanwhile.
    pub async fn debounced<F, Fut>(&self, delay: Duration, lookup: F) -> Option<Fut::Output>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let ticket = self.begin();

        tokio::select! {
            biased;
            () = ticket.token.cancelled() => return None,
            () = tokio::time::sleep(delay) => {}
        }

        self.run(&ticket, lookup()).await
    }

    /// Geocode-as-you-type: debounced, latest query wins.
    pub async fn resolve_latest(
        &self,
        resolver: &GeocodeResolver,
        query: &str,
    ) -> Option<Vec<LocationCandidate>> {
        if query.trim().is_empty() {
            self.cancel();
            return Some(Vec::new());
        }
        self.debounced(DEFAULT_DEBOUNCE, || resolver.resolve(query))
            .await
    }
}
