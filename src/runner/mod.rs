//! Execution bridge contract - drives async functions from synchronous callers
//!
//! A [`TestRunner`] owns exactly one scheduler for its whole lifetime. Every
//! `call` made through the same runner is driven on that scheduler, one after
//! another, so tasks, timers and channels created by one call remain usable by
//! the next. `close` tears the scheduler down.

mod error;
mod gauge;
mod scope;

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

pub use error::{RunnerError, ScopeError, TeardownError};
pub use gauge::ResourceGauge;
pub use scope::{run_scoped, Scoped};

/// Process-unique runner identifier, used in log events and thread names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunnerId(u64);

impl RunnerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Blocking bridge between a synchronous caller and an async callee
///
/// Implementors hold one scheduler and drive every call on it. Calls take
/// `&mut self`, so a runner can only ever run one computation at a time and
/// calls complete in the order they were issued.
pub trait TestRunner: Sized {
    /// Identifier of this runner
    fn id(&self) -> RunnerId;

    /// Resource counters shared with this runner's scheduler
    fn gauge(&self) -> &ResourceGauge;

    /// Whether `close` has already run
    fn is_closed(&self) -> bool {
        self.gauge().is_closed()
    }

    /// Invoke `func` and drive the returned future to completion on the owned
    /// scheduler, or report [`RunnerError::Closed`] if the runner was closed.
    ///
    /// The future's output is returned untouched: a `Result` produced by the
    /// callee comes back as the same `Result`, and a panic raised while the
    /// future is polled unwinds out of this call with its original payload.
    fn try_call<F, Fut>(&mut self, func: F) -> Result<Fut::Output, RunnerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future;

    /// Invoke `func` and block until its future completes.
    ///
    /// # Panics
    ///
    /// Panics if the runner has been closed. Calling into a closed runner is a
    /// programming error; use [`TestRunner::try_call`] to observe it as a value.
    fn call<F, Fut>(&mut self, func: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        match self.try_call(func) {
            Ok(output) => output,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`TestRunner::call`], passing `args` to `func`.
    ///
    /// Positional arguments are usually a tuple, named ones a struct.
    fn call_with<F, A, Fut>(&mut self, func: F, args: A) -> Fut::Output
    where
        F: FnOnce(A) -> Fut,
        Fut: Future,
    {
        self.call(move || func(args))
    }

    /// Stop the scheduler and release everything it holds.
    ///
    /// Must be called once per runner. The shipped runners treat a second
    /// call as a no-op.
    fn close(&mut self) -> Result<(), TeardownError>;

    /// Use this runner as a scoped resource that closes itself on every exit
    /// path.
    fn scoped(self) -> Scoped<Self> {
        Scoped::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_ids_are_unique_and_increasing() {
        let first = RunnerId::next();
        let second = RunnerId::next();
        assert!(second > first);
        assert_eq!(second.to_string(), second.get().to_string());
    }
}
