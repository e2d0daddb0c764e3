//! Shared helpers for the integration tests
#![allow(dead_code)]

use std::future::poll_fn;
use std::task::Poll;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber; `RUST_LOG=sync_bridge=debug` shows runner events
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Failure kinds raised by the async functions under test
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("timed out")]
    TimedOut,
}

/// Panic payload used to check that panics cross the bridge untouched
#[derive(Debug, PartialEq, Eq)]
pub struct Boom(pub u32);

/// Suspend once, on any executor
pub async fn yield_once() {
    let mut yielded = false;
    poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}
