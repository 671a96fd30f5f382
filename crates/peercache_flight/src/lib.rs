// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Collapses concurrent calls for the same key into a single execution.
//!
//! [`Flight`] tracks one in-flight call per key. The first caller for a key runs its
//! producer; every caller that arrives before the producer finishes waits for that run and
//! receives a clone of its result instead of running its own producer. Once the call
//! completes its record is dropped, so the next call for the key runs the producer again:
//! `Flight` suppresses a thundering herd, it does not cache.
//!
//! # Example
//!
//! ```
//! use peercache_flight::Flight;
//!
//! # futures::executor::block_on(async {
//! let flight: Flight<String, Result<String, String>> = Flight::new();
//!
//! let value = flight
//!     .work("user:123".to_string(), || async { Ok("loaded".to_string()) })
//!     .await;
//! assert_eq!(value, Ok("loaded".to_string()));
//! # });
//! ```
//!
//! # Locking
//!
//! The key table sits behind a mutex that is held only to look up, insert or remove a
//! record, never while a producer runs. A slow producer for one key therefore never delays
//! callers of another key.
//!
//! # Cancellation and Panics
//!
//! If the caller running the producer is dropped or panics before the producer completes,
//! the next waiting caller runs its own producer and the remaining waiters receive that
//! result. A record nobody waits on any more is removed from the table.

use std::{collections::HashMap, fmt::Debug, future::Future, hash::Hash, sync::Arc};

use async_once_cell::OnceCell;
use parking_lot::Mutex;

type Calls<K, T> = Arc<Mutex<HashMap<K, Arc<Call<T>>>>>;

/// Deduplicates concurrent work per key.
pub struct Flight<K, T> {
    calls: Calls<K, T>,
}

impl<K, T> Default for Flight<K, T> {
    fn default() -> Self {
        Self { calls: Arc::default() }
    }
}

impl<K, T> Debug for Flight<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flight").field("in_flight", &self.calls.lock().len()).finish()
    }
}

/// The shared completion slot of one call. Every caller of the key awaits the same cell.
struct Call<T> {
    result: OnceCell<T>,
}

impl<T> Default for Call<T> {
    fn default() -> Self {
        Self { result: OnceCell::new() }
    }
}

/// One caller's hold on a call record.
///
/// Dropping it removes the record from the table once the call has completed, or when this
/// was the last caller waiting on an unfinished call.
struct Ticket<K: Hash + Eq, T> {
    key: K,
    call: Arc<Call<T>>,
    calls: Calls<K, T>,
}

impl<K: Hash + Eq, T> Drop for Ticket<K, T> {
    fn drop(&mut self) {
        let mut calls = self.calls.lock();
        let finished = self.call.result.get().is_some();
        // The table and this ticket are the only holders left.
        let abandoned = Arc::strong_count(&self.call) == 2;

        if (finished || abandoned) && calls.get(&self.key).is_some_and(|call| Arc::ptr_eq(call, &self.call)) {
            calls.remove(&self.key);
        }
    }
}

impl<K, T> Flight<K, T>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty `Flight`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `func` for `key` unless a call for `key` is already in flight, in which case the
    /// returned future resolves to that call's result.
    ///
    /// The caller joins the in-flight call as soon as `work` returns, before the future is
    /// first polled, so two futures created back to back always share one execution.
    pub fn work<F, Fut>(&self, key: K, func: F) -> impl Future<Output = T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
        T: Clone,
    {
        let call = Arc::clone(self.calls.lock().entry(key.clone()).or_default());
        let ticket = Ticket {
            key,
            call,
            calls: Arc::clone(&self.calls),
        };

        async move {
            // The producer is only invoked if this caller ends up initializing the cell.
            let value = ticket.call.result.get_or_init(async move { func().await }).await.clone();
            drop(ticket);
            value
        }
    }

    /// Number of keys with a call currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Flight<String, String>: Send, Sync);

    #[test]
    fn completed_call_leaves_no_record() {
        let flight: Flight<&str, u32> = Flight::new();
        let value = futures::executor::block_on(flight.work("key", || async { 7 }));
        assert_eq!(value, 7);
        assert_eq!(flight.in_flight(), 0);
    }

    #[test]
    fn pending_call_is_tracked_until_dropped() {
        let flight: Flight<&str, u32> = Flight::new();
        let pending = flight.work("key", || async { 1 });
        assert_eq!(flight.in_flight(), 1);
        drop(pending);
        assert_eq!(flight.in_flight(), 0);
    }

    #[test]
    fn debug_reports_in_flight_count() {
        let flight: Flight<&str, u32> = Flight::new();
        let _pending = flight.work("key", || async { 1 });
        assert_eq!(format!("{flight:?}"), "Flight { in_flight: 1 }");
    }
}
