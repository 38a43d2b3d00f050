//! Request entry points exported to the host.
//!
//! - `make_pb_request` — forward one encoded request through the querier
//! - `debug` — probe a querier table and log what happened
//!
//! Entry points report failures through `errno` plus an optional error
//! message vector and never unwind into the host.

use conduit_hostapi::{guard, GoQuerier, Querier};
use conduit_primitives::{handle_c_error_binary, ByteSliceView, RustError, UnmanagedVector};
use tracing::{info, warn};

/// Name of the request argument in `EmptyArg` errors.
pub const PB_REQUEST_ARG: &str = "pb_request";

/// Issue one request through `querier` and return the response payload.
///
/// On success `errno` is cleared and the response is returned. On failure
/// `errno` is set, the message is written to `error_msg` (if given) and an
/// empty vector is returned. The returned vector is owned by the caller, who
/// must release it with `destroy_unmanaged_vector`.
#[no_mangle]
pub extern "C" fn make_pb_request(
    querier: GoQuerier,
    request: ByteSliceView<'_>,
    error_msg: Option<&mut UnmanagedVector>,
) -> UnmanagedVector {
    let result = guard("make_pb_request", || forward_request(&querier, &request))
        .unwrap_or_else(|_| Err(RustError::panic()));
    let data = handle_c_error_binary(result, error_msg);
    UnmanagedVector::new(Some(data))
}

fn forward_request<Q: Querier>(
    querier: &Q,
    request: &ByteSliceView<'_>,
) -> Result<Vec<u8>, RustError> {
    let request = request
        .read()
        .ok_or_else(|| RustError::empty_arg(PB_REQUEST_ARG))?;
    tracing::debug!(len = request.len(), "forwarding request to querier");
    Ok(querier.query_raw(request)?)
}

/// Diagnostic probe for a querier table.
///
/// Logs the state handle and the callback pointer, then sends one empty
/// request through `querier` and logs the outcome. The empty request is a
/// real call: the host's handler runs against its state, so hosts must
/// accept an empty query without side effects before wiring this up.
#[no_mangle]
pub extern "C" fn debug(querier: GoQuerier) {
    let _ = guard("debug", || {
        tracing::debug!(
            state = ?querier.state,
            query_external = ?(querier.vtable.query_external as *const ()),
            "debug called with querier"
        );
        match querier.query_raw(&[]) {
            Ok(response) => info!(len = response.len(), "probe query succeeded"),
            Err(err) => warn!(code = %err.code(), %err, "probe query failed"),
        }
    });
}
