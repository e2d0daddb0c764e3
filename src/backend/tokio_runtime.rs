//! Tokio adapter - blocks the caller on an owned Tokio runtime
//!
//! The runtime is built eagerly in the constructor, so build failures surface
//! there and never from `call`. It lives until `close`, which means tasks,
//! timers and channels created by one call are still alive for the next.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::backend::Backend;
use crate::config::RunnerConfig;
use crate::runner::{ResourceGauge, RunnerError, RunnerId, TeardownError, TestRunner};

/// Tokio scheduler flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Everything runs on the calling thread inside `call`
    CurrentThread,
    /// A pool of worker threads keeps running between calls
    MultiThread,
}

impl Flavor {
    pub fn backend(self) -> Backend {
        match self {
            Flavor::CurrentThread => Backend::Tokio,
            Flavor::MultiThread => Backend::TokioMultiThread,
        }
    }
}

/// Runner that owns one Tokio runtime
#[derive(Debug)]
pub struct TokioRunner {
    id: RunnerId,
    flavor: Flavor,
    runtime: Option<Runtime>,
    gauge: ResourceGauge,
    shutdown_timeout: Option<Duration>,
}

impl TokioRunner {
    /// Build a runner with default options
    pub fn new(flavor: Flavor) -> Result<Self, RunnerError> {
        Self::with_config(flavor, &RunnerConfig::default())
    }

    /// Build a runner using the runtime options of `config`.
    ///
    /// `config.backend` is ignored; `flavor` decides the runtime kind.
    pub fn with_config(flavor: Flavor, config: &RunnerConfig) -> Result<Self, RunnerError> {
        let id = RunnerId::next();
        let gauge = ResourceGauge::default();

        let mut builder = match flavor {
            Flavor::CurrentThread => Builder::new_current_thread(),
            Flavor::MultiThread => {
                let mut builder = Builder::new_multi_thread();
                // Zero keeps Tokio's default of one worker per core
                if let Some(workers) = config.worker_threads.filter(|&n| n > 0) {
                    builder.worker_threads(workers);
                }
                builder
            }
        };
        if config.enable_io {
            builder.enable_io();
        }
        if config.enable_time {
            builder.enable_time();
        }

        let on_start = gauge.clone();
        let on_stop = gauge.clone();
        let runtime = builder
            .thread_name(format!("{}-{}", config.thread_name, id))
            .on_thread_start(move || on_start.thread_started())
            .on_thread_stop(move || on_stop.thread_stopped())
            .build()
            .map_err(|source| RunnerError::Build {
                backend: flavor.backend(),
                source,
            })?;

        tracing::debug!(runner = %id, backend = %flavor.backend(), "Scheduler started");

        Ok(Self {
            id,
            flavor,
            runtime: Some(runtime),
            gauge,
            shutdown_timeout: config.shutdown_timeout(),
        })
    }

    pub fn backend(&self) -> Backend {
        self.flavor.backend()
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Handle to the owned runtime, `None` once closed
    pub fn handle(&self) -> Option<Handle> {
        self.runtime.as_ref().map(|runtime| runtime.handle().clone())
    }
}

impl TestRunner for TokioRunner {
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
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(RunnerError::Closed { runner: self.id });
        };

        let call = self.gauge.calls() + 1;
        tracing::debug!(runner = %self.id, call, "Driving call to completion");

        // The function itself may spawn or create timers before its first poll
        let pending = {
            let _context = runtime.enter();
            func()
        };
        let output = runtime.block_on(pending);
        self.gauge.record_call();
        Ok(output)
    }

    fn close(&mut self) -> Result<(), TeardownError> {
        let Some(runtime) = self.runtime.take() else {
            tracing::debug!(runner = %self.id, "Runner already closed");
            return Ok(());
        };

        let result = match self.shutdown_timeout {
            // Dropping the runtime waits for every runtime thread to exit
            None => {
                drop(runtime);
                Ok(())
            }
            Some(timeout) => {
                runtime.shutdown_timeout(timeout);
                match self.gauge.live_threads() {
                    0 => Ok(()),
                    count => Err(TeardownError::WorkersOutstanding {
                        runner: self.id,
                        count,
                        timeout,
                    }),
                }
            }
        };
        self.gauge.mark_closed();

        tracing::info!(
            runner = %self.id,
            backend = %self.backend(),
            calls = self.gauge.calls(),
            "Scheduler closed"
        );
        result
    }
}

impl Drop for TokioRunner {
    fn drop(&mut self) {
        if self.runtime.is_none() {
            return;
        }
        tracing::warn!(runner = %self.id, "Runner dropped without close");
        if let Err(err) = self.close() {
            tracing::error!(runner = %self.id, error = %err, "Teardown failed during drop");
        }
    }
}
