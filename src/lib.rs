//! Sync bridge - run async functions to completion from synchronous code
//!
//! A [`TestRunner`] owns one scheduler and blocks the calling thread on it
//! for each `call`. Every call made through the same runner uses the same
//! scheduler, so state created by one call (spawned tasks, timers, channels)
//! is still valid in the next, and the scheduler is torn down exactly once by
//! `close` or by leaving a [`Scoped`] block.
//!
//! ```no_run
//! use sync_bridge::{AnyRunner, Backend, TestRunner};
//!
//! let mut runner = AnyRunner::new(Backend::Tokio)?.scoped();
//! assert_eq!(runner.call(|| async { 42 }), 42);
//! assert_eq!(runner.call_with(|(a, b)| async move { a + b }, (1, 2)), 3);
//! # Ok::<(), sync_bridge::RunnerError>(())
//! ```
//!
//! Layers:
//! - `runner` - the contract, the scope guard, errors and resource counters
//! - `backend` - Tokio and `futures` LocalPool adapters
//! - `config` - TOML/env backend selection and runtime options

pub mod backend;
pub mod config;
pub mod runner;

pub use backend::{AnyRunner, Backend, Flavor, LocalPoolRunner, TokioRunner};
pub use config::{ConfigError, RunnerConfig};
pub use runner::{
    run_scoped, ResourceGauge, RunnerError, RunnerId, ScopeError, Scoped, TeardownError,
    TestRunner,
};
