//! Latest-wins asynchronous requests.
//!
//! Search suggestions, selection resolution, and nearby-set lookups all
//! follow the same discipline: a new request supersedes the outstanding one,
//! and a superseded request's result must never reach shared state. This
//! module provides that discipline once.
//!
//! Cancellation is cooperative: dropping the in-flight [`Task`] cancels it,
//! and because the task is the only route to the result, a superseded
//! request's value is unreachable by construction.

use std::future::Future;

use bevy::tasks::futures_lite::future;
use bevy::tasks::{AsyncComputeTaskPool, Task};

/// A single-slot holder for the most recent async request of one kind.
pub struct LatestFetch<T: Send + 'static> {
    task: Option<Task<T>>,
    generation: u64,
}

impl<T: Send + 'static> Default for LatestFetch<T> {
    fn default() -> Self {
        Self {
            task: None,
            generation: 0,
        }
    }
}

impl<T: Send + 'static> LatestFetch<T> {
    /// Start a new request, superseding (and cancelling) any outstanding one.
    ///
    /// Returns the new request's generation, for logging.
    pub fn begin(&mut self, fut: impl Future<Output = T> + Send + 'static) -> u64 {
        self.generation += 1;
        self.task = Some(AsyncComputeTaskPool::get().spawn(fut));
        self.generation
    }

    /// Cancel the outstanding request, if any.
    pub fn cancel(&mut self) {
        self.task = None;
    }

    /// Whether a request is outstanding.
    pub fn in_flight(&self) -> bool {
        self.task.is_some()
    }

    /// Non-blocking poll. Returns the result exactly once when the current
    /// request finishes; `None` while pending or after cancellation.
    pub fn poll(&mut self) -> Option<T> {
        let task = self.task.as_mut()?;
        let result = future::block_on(future::poll_once(task))?;
        self.task = None;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::tasks::TaskPool;
    use std::time::Duration;

    fn init_pool() {
        AsyncComputeTaskPool::get_or_init(TaskPool::new);
    }

    fn poll_until<T: Send + 'static>(fetch: &mut LatestFetch<T>) -> T {
        for _ in 0..500 {
            if let Some(value) = fetch.poll() {
                return value;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        panic!("fetch did not finish in time");
    }

    #[test]
    fn test_poll_yields_result_exactly_once() {
        init_pool();
        let mut fetch = LatestFetch::default();
        fetch.begin(async { 42 });
        assert_eq!(poll_until(&mut fetch), 42);
        assert!(fetch.poll().is_none());
        assert!(!fetch.in_flight());
    }

    #[test]
    fn test_superseded_request_result_is_unreachable() {
        init_pool();
        let mut fetch = LatestFetch::default();
        fetch.begin(async { 1 });
        let generation = fetch.begin(async { 2 });
        assert_eq!(generation, 2);
        // Only the latest request's value can ever come out.
        assert_eq!(poll_until(&mut fetch), 2);
        assert!(fetch.poll().is_none());
    }

    #[test]
    fn test_cancel_discards_pending_result() {
        init_pool();
        let mut fetch = LatestFetch::default();
        fetch.begin(async { 7 });
        fetch.cancel();
        assert!(!fetch.in_flight());
        // Give the (cancelled) task time to have finished if it was going to.
        std::thread::sleep(Duration::from_millis(10));
        assert!(fetch.poll().is_none());
    }
}
