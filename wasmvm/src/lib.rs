//! `conduit-wasmvm` — the contract VM library loaded by the host runtime.
//!
//! Every item the host calls is a `#[no_mangle] extern "C"` function:
//!
//! - `make_pb_request` — forward one request through the host's querier
//! - `new_unmanaged_vector` / `destroy_unmanaged_vector` — vector lifecycle
//! - `version_str` — library version as a static C string
//! - `debug` — querier probe for diagnostics
//!
//! Vectors returned by these functions belong to the caller until they are
//! handed back to `destroy_unmanaged_vector`. No entry point unwinds into
//! the host; failures are reported through `errno` and an error message
//! vector.

mod exports;
mod memory;
mod version;

pub use exports::{debug, make_pb_request, PB_REQUEST_ARG};
pub use memory::{destroy_unmanaged_vector, new_unmanaged_vector};
pub use version::{version, version_str};

// Types that appear in the exported signatures.
pub use conduit_hostapi::{querier_t, GoQuerier, QuerierVtable};
pub use conduit_primitives::{ByteSliceView, GoError, U8SliceView, UnmanagedVector};
