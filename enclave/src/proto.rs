//! Request and response messages of the enclave storage protocol.
//!
//! Each exported operation decodes exactly one request message from its
//! input buffer and answers with a [`ResponseEnvelope`]. On success the
//! envelope's `payload` holds the operation's response message; on failure
//! it carries a status code and a message instead.

use conduit_hostapi::QueryError;
use conduit_primitives::GoError;
use prost::Message;

use crate::error::EnvelopeError;

pub const ADDRESS_LEN: usize = 20;
pub const WORD_LEN: usize = 32;

// ── Requests ──

#[derive(Clone, PartialEq, Message)]
pub struct QueryBlockHash {
    #[prost(uint64, tag = "1")]
    pub number: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryGetAccount {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryContainsKey {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryGetAccountStorageCell {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub index: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryGetAccountCode {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryInsertAccount {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    /// 32-byte big-endian.
    #[prost(bytes = "vec", tag = "2")]
    pub balance: Vec<u8>,
    #[prost(uint64, tag = "3")]
    pub nonce: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryInsertAccountCode {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub code: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryInsertStorageCell {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub index: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryRemove {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryRemoveStorageCell {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub index: Vec<u8>,
}

// ── Responses ──

#[derive(Clone, PartialEq, Message)]
pub struct QueryBlockHashResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryGetAccountResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub balance: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub nonce: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryContainsKeyResponse {
    #[prost(bool, tag = "1")]
    pub contains: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryGetAccountStorageCellResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryGetAccountCodeResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub code: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryInsertAccountResponse {}

#[derive(Clone, PartialEq, Message)]
pub struct QueryInsertAccountCodeResponse {}

#[derive(Clone, PartialEq, Message)]
pub struct QueryInsertStorageCellResponse {}

#[derive(Clone, PartialEq, Message)]
pub struct QueryRemoveResponse {}

#[derive(Clone, PartialEq, Message)]
pub struct QueryRemoveStorageCellResponse {}

// ── Envelope ──

/// Outer message of every operation's output buffer.
#[derive(Clone, PartialEq, Message)]
pub struct ResponseEnvelope {
    /// A `GoError` code; `0` on success.
    #[prost(int32, tag = "1")]
    pub code: i32,
    /// The encoded response message. Empty on failure.
    #[prost(bytes = "vec", tag = "2")]
    pub payload: Vec<u8>,
    /// Failure message. Empty on success.
    #[prost(string, tag = "3")]
    pub error: String,
}

impl ResponseEnvelope {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            code: GoError::None as i32,
            payload,
            error: String::new(),
        }
    }

    pub fn failure(code: GoError, error: String) -> Self {
        Self {
            code: code as i32,
            payload: Vec::new(),
            error,
        }
    }

    /// The payload, or the error the code and message describe.
    ///
    /// Codes outside the known set come back as `QueryError::Unknown`.
    pub fn into_result(self) -> Result<Vec<u8>, QueryError> {
        match QueryError::from_code(GoError::from(self.code), self.error) {
            None => Ok(self.payload),
            Some(err) => Err(err),
        }
    }
}

/// Check that `bytes` is exactly `N` long and copy it out.
pub fn fixed<const N: usize>(
    field: &'static str,
    bytes: &[u8],
) -> Result<[u8; N], EnvelopeError> {
    bytes.try_into().map_err(|_| EnvelopeError::BadLength {
        field,
        expected: N,
        actual: bytes.len(),
    })
}
