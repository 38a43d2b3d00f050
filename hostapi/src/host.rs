//! Host side of the querier table, for hosts written in Rust.
//!
//! [`HostQuerier`] owns a [`QueryHandler`] and exposes it as a [`GoQuerier`]
//! whose single table entry is a monomorphized `extern "C"` trampoline. The
//! trampoline is the host's half of the protocol: it never unwinds, writes
//! the response or the error message into the engine's output slots, and
//! returns the matching [`GoError`] code.

use std::marker::PhantomData;
use std::ptr;

use conduit_primitives::{GoError, U8SliceView, UnmanagedVector};
use tracing::warn;

use crate::barrier::guard;
use crate::config::BoundaryConfig;
use crate::error::QueryError;
use crate::querier::{querier_t, GoQuerier, QuerierVtable};
use crate::traits::QueryHandler;

/// A query handler packaged as a callback table.
pub struct HostQuerier<H: QueryHandler> {
    handler: H,
    config: BoundaryConfig,
}

impl<H: QueryHandler> HostQuerier<H> {
    pub fn new(handler: H) -> Self {
        Self::with_config(handler, BoundaryConfig::default())
    }

    pub fn with_config(handler: H, config: BoundaryConfig) -> Self {
        Self { handler, config }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Borrow `self` as a callback table.
    ///
    /// The returned value points at `self`; it must not be used after `self`
    /// is moved or dropped. [`BorrowedQuerier`] ties the two together.
    pub fn as_go_querier(&self) -> BorrowedQuerier<'_> {
        BorrowedQuerier {
            inner: GoQuerier {
                state: self as *const Self as *const querier_t,
                vtable: QuerierVtable {
                    query_external: query_external_trampoline::<H>,
                },
            },
            _host: PhantomData,
        }
    }
}

/// A [`GoQuerier`] that cannot outlive the [`HostQuerier`] it points at.
#[derive(Copy, Clone)]
pub struct BorrowedQuerier<'a> {
    inner: GoQuerier,
    _host: PhantomData<&'a ()>,
}

impl BorrowedQuerier<'_> {
    /// The raw table, as passed by value to an engine entry point.
    pub fn get(&self) -> GoQuerier {
        self.inner
    }
}

extern "C" fn query_external_trampoline<H: QueryHandler>(
    state: *const querier_t,
    request: U8SliceView<'_>,
    result: *mut UnmanagedVector,
    error_msg: *mut UnmanagedVector,
) -> i32 {
    if state.is_null() || result.is_null() || error_msg.is_null() {
        return GoError::BadArgument as i32;
    }
    // SAFETY: `state` was produced by `as_go_querier` from a live
    // `HostQuerier<H>`, which `BorrowedQuerier` keeps borrowed.
    let host = unsafe { &*(state as *const HostQuerier<H>) };

    let outcome = guard("query_external_trampoline", || match request.read() {
        Some(data) => host.handler.handle(data),
        None => Err(QueryError::bad_argument("request is none")),
    })
    .and_then(|res| res);

    match outcome {
        Ok(data) => {
            // SAFETY: checked non-null above; the engine reserved the slot.
            // The slot may be uninitialised, so it is overwritten, not dropped.
            unsafe {
                ptr::write(result, UnmanagedVector::new(Some(data)));
            }
            GoError::None as i32
        }
        Err(err) => {
            warn!(code = %err.code(), %err, "query handler failed");
            let msg = host.config.clip_message(err.message());
            // SAFETY: as above.
            unsafe {
                ptr::write(error_msg, UnmanagedVector::new(Some(msg.into_bytes())));
            }
            err.code() as i32
        }
    }
}
