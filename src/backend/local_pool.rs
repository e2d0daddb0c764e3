//! `futures` LocalPool adapter - a single-threaded executor driven by the caller

use std::future::Future;

use futures::executor::{LocalPool, LocalSpawner};

use crate::runner::{ResourceGauge, RunnerError, RunnerId, TeardownError, TestRunner};

/// Runner that owns one `LocalPool`
///
/// The pool has no threads of its own: spawned tasks make progress only while
/// a `call` is driving the pool. Tasks left pending when the runner closes are
/// dropped with the pool.
#[derive(Debug)]
pub struct LocalPoolRunner {
    id: RunnerId,
    pool: Option<LocalPool>,
    gauge: ResourceGauge,
}

impl LocalPoolRunner {
    pub fn new() -> Self {
        let id = RunnerId::next();
        tracing::debug!(runner = %id, backend = "local-pool", "Scheduler started");
        Self {
            id,
            pool: Some(LocalPool::new()),
            gauge: ResourceGauge::default(),
        }
    }

    /// Spawner for the owned pool, `None` once closed.
    ///
    /// Tasks spawned through it outlive the call that spawned them and can be
    /// awaited by a later call.
    pub fn spawner(&self) -> Option<LocalSpawner> {
        self.pool.as_ref().map(LocalPool::spawner)
    }
}

impl Default for LocalPoolRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner for LocalPoolRunner {
    fn id(&self) -> RunnerId {
        self.id
    }

    fn gauge(&self) -> &ResourceGauge {
        &self.gauge
    }

    fn try_call<F, Fut>(&mut self, func: F) -> Result<Fut::Output, RunnerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let Some(pool) = self.pool.as_mut() else {
            return Err(RunnerError::Closed { runner: self.id });
        };

        let call = self.gauge.calls() + 1;
        tracing::debug!(runner = %self.id, call, "Driving call to completion");

        let pending = func();
        let output = pool.run_until(pending);
        self.gauge.record_call();
        Ok(output)
    }

    fn close(&mut self) -> Result<(), TeardownError> {
        let Some(pool) = self.pool.take() else {
            tracing::debug!(runner = %self.id, "Runner already closed");
            return Ok(());
        };

        drop(pool);
        self.gauge.mark_closed();

        tracing::info!(
            runner = %self.id,
            backend = "local-pool",
            calls = self.gauge.calls(),
            "Scheduler closed"
        );
        Ok(())
    }
}
