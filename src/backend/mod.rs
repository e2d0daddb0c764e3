//! Backend adapters - one runner per supported async runtime
//!
//! - `tokio` - a current-thread Tokio runtime
//! - `tokio-multi-thread` - a multi-thread Tokio runtime
//! - `local-pool` - a `futures` single-threaded `LocalPool`
//!
//! [`AnyRunner`] picks one of them from an explicit [`Backend`] value.

mod local_pool;
mod tokio_runtime;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::RunnerConfig;
use crate::runner::{ResourceGauge, RunnerError, RunnerId, TeardownError, TestRunner};

pub use local_pool::LocalPoolRunner;
pub use tokio_runtime::{Flavor, TokioRunner};

/// Supported scheduler backends
///
/// Deserialized through [`FromStr`], so config files accept the same names
/// and aliases as `SYNC_BRIDGE_BACKEND`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Backend {
    #[default]
    Tokio,
    TokioMultiThread,
    LocalPool,
}

impl Backend {
    /// Every backend, for drivers that run the same test once per backend
    pub const ALL: [Backend; 3] = [Backend::Tokio, Backend::TokioMultiThread, Backend::LocalPool];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Tokio => "tokio",
            Backend::TokioMultiThread => "tokio-multi-thread",
            Backend::LocalPool => "local-pool",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tokio" | "current-thread" => Ok(Backend::Tokio),
            "tokio-multi-thread" | "multi-thread" => Ok(Backend::TokioMultiThread),
            "local-pool" | "futures" => Ok(Backend::LocalPool),
            _ => Err(RunnerError::UnknownBackend(s.to_string())),
        }
    }
}

impl TryFrom<String> for Backend {
    type Error = RunnerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A runner bound to whichever backend was selected at construction
#[derive(Debug)]
pub enum AnyRunner {
    Tokio(TokioRunner),
    LocalPool(LocalPoolRunner),
}

impl AnyRunner {
    /// Build a runner for `backend` with default options
    pub fn new(backend: Backend) -> Result<Self, RunnerError> {
        Self::from_config(&RunnerConfig {
            backend,
            ..RunnerConfig::default()
        })
    }

    /// Build a runner for `config.backend` using the remaining options
    pub fn from_config(config: &RunnerConfig) -> Result<Self, RunnerError> {
        match config.backend {
            Backend::Tokio => TokioRunner::with_config(Flavor::CurrentThread, config).map(Self::Tokio),
            Backend::TokioMultiThread => {
                TokioRunner::with_config(Flavor::MultiThread, config).map(Self::Tokio)
            }
            Backend::LocalPool => Ok(Self::LocalPool(LocalPoolRunner::new())),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            AnyRunner::Tokio(runner) => runner.backend(),
            AnyRunner::LocalPool(_) => Backend::LocalPool,
        }
    }
}

impl TestRunner for AnyRunner {
    fn id(&self) -> RunnerId {
        match self {
            AnyRunner::Tokio(runner) => runner.id(),
            AnyRunner::LocalPool(runner) => runner.id(),
        }
    }

    fn gauge(&self) -> &ResourceGauge {
        match self {
            AnyRunner::Tokio(runner) => runner.gauge(),
            AnyRunner::LocalPool(runner) => runner.gauge(),
        }
    }

    fn try_call<F, Fut>(&mut self, func: F) -> Result<Fut::Output, RunnerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        match self {
            AnyRunner::Tokio(runner) => runner.try_call(func),
            AnyRunner::LocalPool(runner) => runner.try_call(func),
        }
    }

    fn close(&mut self) -> Result<(), TeardownError> {
        match self {
            AnyRunner::Tokio(runner) => runner.close(),
            AnyRunner::LocalPool(runner) => runner.close(),
        }
    }
}
