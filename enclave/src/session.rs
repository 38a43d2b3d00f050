//! Per-thread installation of the storage backend.
//!
//! The exported operations take nothing but a buffer, so the backend they
//! act on is installed for the current thread around one execution with
//! [`enter`]. Executions on other threads install their own backend and
//! never see this one.

use std::cell::Cell;
use std::mem;
use std::ptr::NonNull;

use conduit_hostapi::{BoundaryConfig, QueryError};

use crate::storage::EvmStorage;

#[derive(Clone, Copy)]
struct Installed {
    backend: NonNull<dyn EvmStorage>,
    max_request_len: usize,
    max_error_len: usize,
}

thread_local! {
    static ACTIVE: Cell<Option<Installed>> = const { Cell::new(None) };
    static BUSY: Cell<bool> = const { Cell::new(false) };
}

/// Restores the outer session when an `enter` scope ends, panic or not.
struct Restore {
    previous: Option<Installed>,
    busy: bool,
}

impl Drop for Restore {
    fn drop(&mut self) {
        ACTIVE.with(|slot| slot.set(self.previous));
        BUSY.with(|flag| flag.set(self.busy));
    }
}

/// Clears the busy flag when an operation finishes, panic or not.
struct Release;

impl Drop for Release {
    fn drop(&mut self) {
        BUSY.with(|flag| flag.set(false));
    }
}

/// Run `f` with `backend` installed for this thread, using default limits.
pub fn enter<R>(backend: &mut dyn EvmStorage, f: impl FnOnce() -> R) -> R {
    enter_with(backend, &BoundaryConfig::default(), f)
}

/// Run `f` with `backend` installed for this thread.
///
/// Sessions nest: the previous backend (if any) is reinstalled when `f`
/// returns or unwinds.
pub fn enter_with<R>(
    backend: &mut dyn EvmStorage,
    config: &BoundaryConfig,
    f: impl FnOnce() -> R,
) -> R {
    let installed = Installed {
        backend: erase(backend),
        max_request_len: config.max_query_len,
        max_error_len: config.max_error_len,
    };
    let _restore = Restore {
        previous: ACTIVE.with(|slot| slot.replace(Some(installed))),
        busy: BUSY.with(|flag| flag.replace(false)),
    };
    f()
}

/// Whether a backend is installed on this thread.
pub fn is_active() -> bool {
    ACTIVE.with(|slot| slot.get().is_some())
}

/// Request size limit of the active session, or the default.
pub(crate) fn max_request_len() -> usize {
    ACTIVE
        .with(Cell::get)
        .map_or(BoundaryConfig::default().max_query_len, |s| s.max_request_len)
}

/// Clip an error message to the active session's limit.
pub(crate) fn clip_error(msg: String) -> String {
    let max_error_len = ACTIVE
        .with(Cell::get)
        .map_or(BoundaryConfig::default().max_error_len, |s| s.max_error_len);
    BoundaryConfig {
        max_error_len,
        ..BoundaryConfig::default()
    }
    .clip_message(msg)
}

/// Run `f` against the installed backend.
///
/// Fails with `QuerierError` when no backend is installed, or when the
/// backend is already serving an operation on this thread.
pub(crate) fn with_backend<R>(
    f: impl FnOnce(&mut dyn EvmStorage) -> Result<R, QueryError>,
) -> Result<R, QueryError> {
    let installed = ACTIVE
        .with(Cell::get)
        .ok_or_else(|| QueryError::querier("no storage backend installed on this thread"))?;
    if BUSY.with(|flag| flag.replace(true)) {
        return Err(QueryError::querier("storage backend is already serving a request"));
    }
    let _release = Release;
    // SAFETY: `installed` was set by an `enter_with` frame that is still on
    // this thread's stack and holds the `&mut` borrow, and the busy flag
    // guarantees no other reference to the backend is live.
    let backend = unsafe { &mut *installed.backend.as_ptr() };
    f(backend)
}

fn erase<'a>(backend: &'a mut (dyn EvmStorage + 'a)) -> NonNull<dyn EvmStorage> {
    let ptr = NonNull::from(backend);
    // SAFETY: only the trait object lifetime changes. The pointer is removed
    // from the thread-local before the borrow it came from ends.
    unsafe { mem::transmute::<NonNull<dyn EvmStorage + 'a>, NonNull<dyn EvmStorage + 'static>>(ptr) }
}
