//! Resource counters shared between a runner and its observers

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Observable state of a runner's scheduler
///
/// Clones share the same counters and stay readable after the runner is
/// closed or dropped, which is what lets a test check that every scheduler
/// thread has stopped.
#[derive(Debug, Clone, Default)]
pub struct ResourceGauge {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    live_threads: AtomicUsize,
    threads_started: AtomicUsize,
    calls: AtomicU64,
    closed: AtomicBool,
}

impl ResourceGauge {
    /// Scheduler threads currently running
    pub fn live_threads(&self) -> usize {
        self.inner.live_threads.load(Ordering::SeqCst)
    }

    /// Scheduler threads started over the runner's lifetime
    pub fn threads_started(&self) -> usize {
        self.inner.threads_started.load(Ordering::SeqCst)
    }

    /// Calls driven to completion; a call that panics is not counted
    pub fn calls(&self) -> u64 {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn thread_started(&self) {
        self.inner.threads_started.fetch_add(1, Ordering::SeqCst);
        self.inner.live_threads.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn thread_stopped(&self) {
        self.inner.live_threads.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn record_call(&self) {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn mark_closed(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let gauge = ResourceGauge::default();
        let observer = gauge.clone();

        gauge.thread_started();
        gauge.thread_started();
        gauge.thread_stopped();
        assert_eq!(observer.live_threads(), 1);
        assert_eq!(observer.threads_started(), 2);

        gauge.record_call();
        gauge.record_call();
        assert_eq!(observer.calls(), 2);

        assert!(!observer.is_closed());
        gauge.mark_closed();
        assert!(observer.is_closed());
    }

    #[test]
    fn test_gauge_outlives_owner() {
        let observer = {
            let gauge = ResourceGauge::default();
            gauge.thread_started();
            gauge.clone()
        };
        assert_eq!(observer.live_threads(), 1);
    }
}
