//! Capabilities on either side of the querier boundary.
//!
//! - [`Querier`] is what the engine sees: one synchronous call,
//!   `query(bytes) -> Result<bytes, QueryError>`. No host type leaks through.
//! - [`QueryHandler`] is what a Rust host implements to answer those calls
//!   through a real callback table (see [`HostQuerier`](crate::HostQuerier)).

use crate::error::QueryError;

/// Engine-side access to host state.
///
/// Implemented by [`GoQuerier`](crate::GoQuerier) over the C callback table,
/// and by anything else an engine wants to inject for the duration of one
/// execution.
pub trait Querier {
    /// Send one opaque request and wait for its response.
    fn query_raw(&self, request: &[u8]) -> Result<Vec<u8>, QueryError>;
}

impl<Q: Querier + ?Sized> Querier for &Q {
    fn query_raw(&self, request: &[u8]) -> Result<Vec<u8>, QueryError> {
        (**self).query_raw(request)
    }
}

/// Host-side answer to a query.
///
/// `Sync` because the table built from it may be handed to an engine thread.
/// Any locking the host state needs lives behind the handler.
pub trait QueryHandler: Sync {
    fn handle(&self, request: &[u8]) -> Result<Vec<u8>, QueryError>;
}

impl<F> QueryHandler for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, QueryError> + Sync,
{
    fn handle(&self, request: &[u8]) -> Result<Vec<u8>, QueryError> {
        self(request)
    }
}
