//! The querier callback table handed from the host to the engine.
//!
//! The host passes an opaque state pointer plus a table of function pointers
//! by value into one engine call. The engine calls the table synchronously
//! and decodes each result with [`decode_outcome`].

use conduit_primitives::{U8SliceView, UnmanagedVector};
use tracing::debug;

use crate::barrier::guard;
use crate::config::BoundaryConfig;
use crate::error::QueryError;
use crate::outcome::decode_outcome;
use crate::traits::Querier;

/// Opaque host-side state. The engine never looks inside.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct querier_t {
    _private: [u8; 0],
}

// These functions should return GoError but because we don't trust them here,
// we treat the return value as i32 and convert it with `GoError::from`.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct QuerierVtable {
    pub query_external: extern "C" fn(
        *const querier_t,
        U8SliceView<'_>,
        *mut UnmanagedVector, // result output
        *mut UnmanagedVector, // error message output
    ) -> i32,
}

/// State handle plus callback table, valid for one engine call.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct GoQuerier {
    pub state: *const querier_t,
    pub vtable: QuerierVtable,
}

// The table must travel into the engine's execution thread. The known host
// passes immutable function pointers and synchronizes its own state; other
// callers have to uphold the same.
unsafe impl Send for GoQuerier {}

impl GoQuerier {
    /// Query through the table, enforcing the size limits in `config`.
    ///
    /// An oversize request is rejected with `BadArgument` before the host is
    /// called; an oversize response is a `QuerierError`.
    pub fn query_with(
        &self,
        request: &[u8],
        config: &BoundaryConfig,
    ) -> Result<Vec<u8>, QueryError> {
        if request.len() > config.max_query_len {
            return Err(QueryError::bad_argument(format!(
                "query of {} bytes exceeds limit of {}",
                request.len(),
                config.max_query_len
            )));
        }
        let response = self.call(request)?;
        if response.len() > config.max_response_len {
            return Err(QueryError::querier(format!(
                "response of {} bytes exceeds limit of {}",
                response.len(),
                config.max_response_len
            )));
        }
        Ok(response)
    }

    fn call(&self, request: &[u8]) -> Result<Vec<u8>, QueryError> {
        let mut output = UnmanagedVector::default();
        let mut error_msg = UnmanagedVector::default();
        let code = guard("query_external", || {
            (self.vtable.query_external)(
                self.state,
                U8SliceView::new(Some(request)),
                &mut output as *mut UnmanagedVector,
                &mut error_msg as *mut UnmanagedVector,
            )
        })?;
        debug!(code, request_len = request.len(), "query_external returned");

        let default = || {
            format!(
                "Failed to query the host with this request: {}",
                String::from_utf8_lossy(request)
            )
        };
        Ok(decode_outcome(code, output, error_msg, default)?.unwrap_or_default())
    }
}

/// Unbounded: payload sizes are the host's business. Use
/// [`GoQuerier::query_with`] to apply limits.
impl Querier for GoQuerier {
    fn query_raw(&self, request: &[u8]) -> Result<Vec<u8>, QueryError> {
        self.call(request)
    }
}
