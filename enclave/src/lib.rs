//! `conduit-enclave` — storage protocol of the EVM enclave backend.
//!
//! The EVM reaches its state through ten exported operations, each taking
//! one owned request buffer and returning one owned response buffer:
//!
//! - **Reads:** `get_block_hash`, `get_account`, `contains_key`,
//!   `get_storage_cell`, `get_account_code`
//! - **Writes:** `insert_account`, `insert_account_code`,
//!   `insert_storage_cell`, `remove`, `remove_storage_cell`
//!
//! Requests and responses are prost messages; every response is wrapped in
//! a [`ResponseEnvelope`] carrying a `GoError` code. The operations act on
//! the [`EvmStorage`] installed for the current thread with
//! [`session::enter`], and [`OcallStorage`] is the typed client that calls
//! them.

pub mod client;
pub mod error;
pub mod mem_backend;
pub mod ops;
pub mod proto;
pub mod session;
pub mod storage;

pub use client::{OcallStorage, OcallTable, OpFn};
pub use error::EnvelopeError;
pub use mem_backend::MemBackend;
pub use proto::ResponseEnvelope;
pub use storage::{Account, Address, EvmStorage, H256};
