//! `debug` against hosts that answer, fail, or panic.
//!
//! Each host counts the queries it sees, so the tests can check both that
//! the call returned and what reached the host.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use conduit_hostapi::{HostQuerier, QueryError};
use conduit_wasmvm::debug;

use common::*;

/// A host around `answer` that records how many queries it received and
/// the length of the last one.
fn counting_host<F>(answer: F) -> (HostQuerier<BoxedHandler>, Arc<AtomicUsize>, Arc<AtomicUsize>)
where
    F: Fn() -> Result<Vec<u8>, QueryError> + Sync + 'static,
{
    let seen = Arc::new(AtomicUsize::new(0));
    let last_len = Arc::new(AtomicUsize::new(usize::MAX));
    let (seen_by_host, len_by_host) = (Arc::clone(&seen), Arc::clone(&last_len));
    let host = host(move |req| {
        seen_by_host.fetch_add(1, Ordering::SeqCst);
        len_by_host.store(req.len(), Ordering::SeqCst);
        answer()
    });
    (host, seen, last_len)
}

#[test]
fn test_debug_with_answering_host() {
    let (host, seen, last_len) = counting_host(|| Ok(b"pong".to_vec()));
    debug(host.as_go_querier().get());

    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(last_len.load(Ordering::SeqCst), 0);
}

#[test]
fn test_debug_with_failing_host() {
    let (host, seen, _) = counting_host(|| Err(QueryError::user("not today")));
    debug(host.as_go_querier().get());
    debug(host.as_go_querier().get());

    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn test_debug_with_panicking_host() {
    let (host, seen, last_len) = counting_host(|| panic!("host state corrupted"));
    debug(host.as_go_querier().get());

    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(last_len.load(Ordering::SeqCst), 0);

    // the same table still serves regular requests afterwards
    let outcome = call(host.as_go_querier().get(), Some(b"x"));
    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert!(outcome.error_msg.unwrap().contains("host state corrupted"));
}
