//! Shared test helpers for the wasmvm integration tests.
//!
//! Hosts are built with `HostQuerier`, so every call below goes through a
//! real callback table and the C-ABI trampoline.

#![allow(dead_code)]

use std::collections::BTreeMap;

use conduit_hostapi::{HostQuerier, QueryError};
use conduit_primitives::{ByteSliceView, ErrnoValue, UnmanagedVector};
use conduit_wasmvm::{make_pb_request, GoQuerier};

/// Handler type used by the test hosts.
pub type BoxedHandler = Box<dyn Fn(&[u8]) -> Result<Vec<u8>, QueryError> + Sync>;

/// A host around `f`.
pub fn host<F>(f: F) -> HostQuerier<BoxedHandler>
where
    F: Fn(&[u8]) -> Result<Vec<u8>, QueryError> + Sync + 'static,
{
    HostQuerier::new(Box::new(f))
}

/// A host that answers every request with the request reversed.
pub fn reversing_host() -> HostQuerier<BoxedHandler> {
    host(|req| {
        let mut out = req.to_vec();
        out.reverse();
        Ok(out)
    })
}

/// A host that fails every request with `err`.
pub fn failing_host(err: QueryError) -> HostQuerier<BoxedHandler> {
    host(move |_| Err(err.clone()))
}

/// A host backed by a fixed key/value table; missing keys are user errors.
pub fn kv_host(entries: &[(&[u8], &[u8])]) -> HostQuerier<BoxedHandler> {
    let table: BTreeMap<Vec<u8>, Vec<u8>> = entries
        .iter()
        .map(|(k, v)| (k.to_vec(), v.to_vec()))
        .collect();
    host(move |key| {
        table.get(key).cloned().ok_or_else(|| {
            QueryError::user(format!("no entry for {}", String::from_utf8_lossy(key)))
        })
    })
}

/// Outcome of one `make_pb_request` call as seen by the host.
#[derive(Debug)]
pub struct CallOutcome {
    pub data: Option<Vec<u8>>,
    pub error_msg: Option<String>,
    pub errno: ErrnoValue,
}

/// Call `make_pb_request` and collect everything it produced.
pub fn call(querier: GoQuerier, request: Option<&[u8]>) -> CallOutcome {
    let mut error_msg = UnmanagedVector::default();
    let data = make_pb_request(
        querier,
        ByteSliceView::from_option(request),
        Some(&mut error_msg),
    );
    let errno = ErrnoValue::current();
    CallOutcome {
        data: data.consume(),
        error_msg: error_msg
            .consume()
            .map(|bytes| String::from_utf8(bytes).unwrap()),
        errno,
    }
}
