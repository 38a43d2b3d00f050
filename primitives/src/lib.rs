//! `conduit-primitives` — the data that crosses the Conduit boundary.
//!
//! This crate is shared by the contract VM library, the EVM enclave backend
//! and any Rust host. It provides:
//!
//! - [`ByteSliceView`] / [`U8SliceView`] — borrowed, call-scoped input views
//! - [`UnmanagedVector`] — the move-only, transferable owned buffer
//! - [`GoError`] — the closed status-code set returned by host callbacks
//! - [`ErrnoValue`] / [`RustError`] — the engine entry points' error channel

pub mod error;
pub mod memory;

// Re-export commonly used types at the crate root.
pub use error::{clear_error, handle_c_error_binary, set_error, ErrnoValue, GoError, RustError};
pub use memory::{ByteSliceView, U8SliceView, UnmanagedVector};
