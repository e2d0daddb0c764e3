//! Runner error types

use std::time::Duration;

use thiserror::Error;

use crate::backend::Backend;
use crate::runner::RunnerId;

/// Errors reported by the bridge itself, never by the callee
#[derive(Debug, Error)]
pub enum RunnerError {
    /// `call` was issued after `close`
    #[error("runner {runner} is closed; calling into a closed runner is a programming error")]
    Closed { runner: RunnerId },

    /// The scheduler could not be constructed
    #[error("failed to build {backend} scheduler")]
    Build {
        backend: Backend,
        #[source]
        source: std::io::Error,
    },

    /// A backend name did not match any known backend
    #[error("unknown backend `{0}` (expected one of: tokio, tokio-multi-thread, local-pool)")]
    UnknownBackend(String),
}

/// Failure while releasing scheduler resources
#[derive(Debug, Error)]
pub enum TeardownError {
    #[error("runner {runner}: {count} scheduler thread(s) still alive after a {timeout:?} shutdown")]
    WorkersOutstanding {
        runner: RunnerId,
        count: usize,
        timeout: Duration,
    },
}

/// Outcome of a scope body combined with the scope's teardown
///
/// Neither failure is dropped: when both the body and the teardown fail, the
/// body's error is kept as the source and the teardown error is carried next
/// to it.
#[derive(Debug, Error)]
pub enum ScopeError<E> {
    #[error(transparent)]
    Body(E),

    #[error(transparent)]
    Teardown(TeardownError),

    #[error("{body}; teardown also failed: {teardown}")]
    Both {
        #[source]
        body: E,
        teardown: TeardownError,
    },
}

impl<E> ScopeError<E> {
    /// The body's failure, if the body failed
    pub fn body(&self) -> Option<&E> {
        match self {
            ScopeError::Body(body) | ScopeError::Both { body, .. } => Some(body),
            ScopeError::Teardown(_) => None,
        }
    }

    /// The teardown failure, if closing the runner failed
    pub fn teardown(&self) -> Option<&TeardownError> {
        match self {
            ScopeError::Teardown(teardown) | ScopeError::Both { teardown, .. } => Some(teardown),
            ScopeError::Body(_) => None,
        }
    }
}
