//! Unwind barrier for boundary frames.
//!
//! The host and the engine use incompatible unwinding mechanisms, so no
//! panic may leave a function that the other side called (or that calls the
//! other side). Every such frame runs its body through [`guard`], which turns
//! a caught panic into [`QueryError::Panic`].

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;

use crate::error::QueryError;

/// Run `f`, converting a panic into `QueryError::Panic`.
///
/// `frame` names the boundary function for the log line.
pub fn guard<F, T>(frame: &'static str, f: F) -> Result<T, QueryError>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let msg = panic_message(payload.as_ref());
        error!(frame, %msg, "caught panic at boundary");
        QueryError::panic(msg)
    })
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
