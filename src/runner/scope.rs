//! Scoped lifetime wrapper - closes a runner on every exit path

use std::ops::{Deref, DerefMut};

use crate::runner::{ScopeError, TeardownError, TestRunner};

/// A runner used as a scoped resource
///
/// Dereferences to the runner itself. When the guard goes out of scope, by
/// normal exit, `?`, `return` or an unwinding panic, the runner is closed
/// exactly once.
///
/// A teardown failure during drop is never dropped on the floor. While a panic
/// is already unwinding it is logged and the original panic keeps going;
/// otherwise the drop panics with it. Use [`Scoped::close`] or [`run_scoped`]
/// to receive it as a value instead.
#[derive(Debug)]
pub struct Scoped<R: TestRunner> {
    runner: Option<R>,
}

impl<R: TestRunner> Scoped<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner: Some(runner),
        }
    }

    /// Close the runner now and return the teardown result
    pub fn close(mut self) -> Result<(), TeardownError> {
        match self.runner.take() {
            Some(mut runner) => runner.close(),
            None => Ok(()),
        }
    }

    /// Leave the scope without closing; the caller takes over the runner
    pub fn into_inner(mut self) -> R {
        match self.runner.take() {
            Some(runner) => runner,
            None => unreachable!("scope released twice"),
        }
    }

    fn runner(&self) -> &R {
        match &self.runner {
            Some(runner) => runner,
            None => unreachable!("runner is only taken when the scope is consumed"),
        }
    }

    fn runner_mut(&mut self) -> &mut R {
        match &mut self.runner {
            Some(runner) => runner,
            None => unreachable!("runner is only taken when the scope is consumed"),
        }
    }
}

impl<R: TestRunner> Deref for Scoped<R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.runner()
    }
}

impl<R: TestRunner> DerefMut for Scoped<R> {
    fn deref_mut(&mut self) -> &mut R {
        self.runner_mut()
    }
}

impl<R: TestRunner> Drop for Scoped<R> {
    fn drop(&mut self) {
        let Some(mut runner) = self.runner.take() else {
            return;
        };
        if let Err(err) = runner.close() {
            if std::thread::panicking() {
                tracing::error!(
                    runner = %runner.id(),
                    error = %err,
                    "Teardown failed while unwinding from a panic"
                );
            } else {
                panic!("{err}");
            }
        }
    }
}

/// Run `body` against `runner`, then close the runner whatever happened.
///
/// Panics inside `body` still close the runner (through [`Scoped`]) and keep
/// unwinding. Errors from `body` and from the teardown are both reported.
pub fn run_scoped<R, T, E, F>(runner: R, body: F) -> Result<T, ScopeError<E>>
where
    R: TestRunner,
    F: FnOnce(&mut R) -> Result<T, E>,
{
    let mut scope = Scoped::new(runner);
    let outcome = body(&mut *scope);
    let teardown = scope.close();

    match (outcome, teardown) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(body), Ok(())) => Err(ScopeError::Body(body)),
        (Ok(_), Err(teardown)) => Err(ScopeError::Teardown(teardown)),
        (Err(body), Err(teardown)) => Err(ScopeError::Both { body, teardown }),
    }
}
