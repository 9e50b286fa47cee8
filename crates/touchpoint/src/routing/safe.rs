//! Boundary between code that raises [`Fault`]s and code that must always produce a value.
//!
//! Both the failing branch of the action and any panic it raises are handed to `on_error`;
//! nothing is swallowed without the caller seeing the fault.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

use futures_util::FutureExt;

use super::faults::Fault;

/// Runs `action`, recovering any fault or panic through `on_error`.
///
/// With `T = ()` this is the statement form: the action is run for its effects and `on_error`
/// only observes the fault.
pub fn attempt<T, A, E>(action: A, on_error: E) -> T
where
    A: FnOnce() -> Result<T, Fault>,
    E: FnOnce(Fault) -> T,
{
    match catch_unwind(AssertUnwindSafe(action)) {
        Ok(Ok(value)) => value,
        Ok(Err(fault)) => on_error(fault),
        Err(payload) => on_error(Fault::from_panic(payload)),
    }
}

/// Async counterpart of [`attempt`], awaiting `action` before recovering.
pub async fn attempt_async<T, F, E>(action: F, on_error: E) -> T
where
    F: Future<Output = Result<T, Fault>>,
    E: FnOnce(Fault) -> T,
{
    match AssertUnwindSafe(action).catch_unwind().await {
        Ok(Ok(value)) => value,
        Ok(Err(fault)) => on_error(fault),
        Err(payload) => on_error(Fault::from_panic(payload)),
    }
}
