//! `conduit-hostapi` — the querier side of the Conduit boundary.
//!
//! The engine reaches host state only through a callback table supplied for
//! one execution. This crate provides:
//!
//! - [`GoQuerier`] — the C-layout state handle + callback table
//! - [`Querier`] — the safe capability the engine programs against
//! - [`HostQuerier`] / [`QueryHandler`] — the table built from a Rust handler
//! - [`decode_outcome`] — status-code-first decoding of a callback result
//! - [`guard`] — the unwind barrier used at every boundary frame
//! - [`QueryError`] / [`BoundaryConfig`]

pub mod barrier;
pub mod config;
pub mod error;
pub mod host;
pub mod outcome;
pub mod querier;
pub mod traits;

// Re-export commonly used types at the crate root.
pub use barrier::{guard, panic_message};
pub use config::BoundaryConfig;
pub use error::QueryError;
pub use host::{BorrowedQuerier, HostQuerier};
pub use outcome::decode_outcome;
pub use querier::{querier_t, GoQuerier, QuerierVtable};
pub use traits::{QueryHandler, Querier};
