//! Exported storage operations.
//!
//! Every operation takes one owned request buffer and returns one owned
//! response buffer, and which operation runs is decided by the function
//! called. The input is consumed on every path. The output is always a
//! present, freshly encoded [`ResponseEnvelope`]: malformed input, a
//! missing session, a backend error and a backend panic all come back as
//! error envelopes.
//!
//! The symbol names are the ones the host links against. `remove` shares
//! its name with the C library's `remove(const char *)`: any executable
//! that links this crate resolves `remove` to the storage operation, so
//! nothing in such a process may call the C function (use `unlink` or
//! `std::fs` instead). Load the library as a separate `cdylib` when that
//! cannot be guaranteed.

use conduit_hostapi::guard;
use conduit_primitives::UnmanagedVector;
use prost::Message;
use tracing::{debug, warn};

use crate::error::EnvelopeError;
use crate::proto::*;
use crate::session;
use crate::storage::Account;

#[no_mangle]
pub extern "C" fn get_block_hash(req: UnmanagedVector) -> UnmanagedVector {
    serve("get_block_hash", req, |q: QueryBlockHash| {
        let hash = session::with_backend(|b| b.block_hash(q.number))?;
        Ok(QueryBlockHashResponse {
            hash: hash.to_vec(),
        })
    })
}

#[no_mangle]
pub extern "C" fn get_account(req: UnmanagedVector) -> UnmanagedVector {
    serve("get_account", req, |q: QueryGetAccount| {
        let address = fixed::<ADDRESS_LEN>("address", &q.address)?;
        let account = session::with_backend(|b| b.get_account(&address))?;
        Ok(QueryGetAccountResponse {
            balance: account.balance.to_vec(),
            nonce: account.nonce,
        })
    })
}

#[no_mangle]
pub extern "C" fn contains_key(req: UnmanagedVector) -> UnmanagedVector {
    serve("contains_key", req, |q: QueryContainsKey| {
        let address = fixed::<ADDRESS_LEN>("key", &q.key)?;
        let contains = session::with_backend(|b| b.contains_key(&address))?;
        Ok(QueryContainsKeyResponse { contains })
    })
}

#[no_mangle]
pub extern "C" fn get_storage_cell(req: UnmanagedVector) -> UnmanagedVector {
    serve("get_storage_cell", req, |q: QueryGetAccountStorageCell| {
        let address = fixed::<ADDRESS_LEN>("address", &q.address)?;
        let index = fixed::<WORD_LEN>("index", &q.index)?;
        let value = session::with_backend(|b| b.get_storage_cell(&address, &index))?;
        Ok(QueryGetAccountStorageCellResponse {
            value: value.to_vec(),
        })
    })
}

#[no_mangle]
pub extern "C" fn get_account_code(req: UnmanagedVector) -> UnmanagedVector {
    serve("get_account_code", req, |q: QueryGetAccountCode| {
        let address = fixed::<ADDRESS_LEN>("address", &q.address)?;
        let code = session::with_backend(|b| b.get_account_code(&address))?;
        Ok(QueryGetAccountCodeResponse { code })
    })
}

#[no_mangle]
pub extern "C" fn insert_account(req: UnmanagedVector) -> UnmanagedVector {
    serve("insert_account", req, |q: QueryInsertAccount| {
        let address = fixed::<ADDRESS_LEN>("address", &q.address)?;
        let balance = fixed::<WORD_LEN>("balance", &q.balance)?;
        let account = Account::new(balance, q.nonce);
        session::with_backend(|b| b.insert_account(address, account))?;
        Ok(QueryInsertAccountResponse {})
    })
}

#[no_mangle]
pub extern "C" fn insert_account_code(req: UnmanagedVector) -> UnmanagedVector {
    serve("insert_account_code", req, |q: QueryInsertAccountCode| {
        let address = fixed::<ADDRESS_LEN>("address", &q.address)?;
        session::with_backend(|b| b.insert_account_code(address, q.code))?;
        Ok(QueryInsertAccountCodeResponse {})
    })
}

#[no_mangle]
pub extern "C" fn insert_storage_cell(req: UnmanagedVector) -> UnmanagedVector {
    serve("insert_storage_cell", req, |q: QueryInsertStorageCell| {
        let address = fixed::<ADDRESS_LEN>("address", &q.address)?;
        let index = fixed::<WORD_LEN>("index", &q.index)?;
        let value = fixed::<WORD_LEN>("value", &q.value)?;
        session::with_backend(|b| b.insert_storage_cell(address, index, value))?;
        Ok(QueryInsertStorageCellResponse {})
    })
}

/// Shadows the C library's `remove` in any binary that links this crate;
/// see the module documentation.
#[no_mangle]
pub extern "C" fn remove(req: UnmanagedVector) -> UnmanagedVector {
    serve("remove", req, |q: QueryRemove| {
        let address = fixed::<ADDRESS_LEN>("address", &q.address)?;
        session::with_backend(|b| b.remove(&address))?;
        Ok(QueryRemoveResponse {})
    })
}

#[no_mangle]
pub extern "C" fn remove_storage_cell(req: UnmanagedVector) -> UnmanagedVector {
    serve("remove_storage_cell", req, |q: QueryRemoveStorageCell| {
        let address = fixed::<ADDRESS_LEN>("address", &q.address)?;
        let index = fixed::<WORD_LEN>("index", &q.index)?;
        session::with_backend(|b| b.remove_storage_cell(&address, &index))?;
        Ok(QueryRemoveStorageCellResponse {})
    })
}

/// Decode `req` as `Q`, run `handler`, and wrap the outcome in an envelope.
fn serve<Q, R, F>(op: &'static str, req: UnmanagedVector, handler: F) -> UnmanagedVector
where
    Q: Message + Default,
    R: Message,
    F: FnOnce(Q) -> Result<R, EnvelopeError>,
{
    let outcome = guard(op, move || {
        let request = decode_request::<Q>(op, req)?;
        handler(request).map(|response| response.encode_to_vec())
    })
    .map_err(EnvelopeError::from)
    .and_then(|res| res);

    let envelope = match outcome {
        Ok(payload) => {
            debug!(op, payload_len = payload.len(), "request served");
            ResponseEnvelope::success(payload)
        }
        Err(err) => {
            warn!(op, code = %err.code(), %err, "request failed");
            ResponseEnvelope::failure(err.code(), session::clip_error(err.message()))
        }
    };
    UnmanagedVector::new(Some(envelope.encode_to_vec()))
}

fn decode_request<Q: Message + Default>(
    op: &'static str,
    req: UnmanagedVector,
) -> Result<Q, EnvelopeError> {
    let bytes = req.consume().ok_or(EnvelopeError::Absent)?;
    let limit = session::max_request_len();
    if bytes.len() > limit {
        return Err(EnvelopeError::TooLarge {
            len: bytes.len(),
            limit,
        });
    }
    Q::decode(bytes.as_slice()).map_err(|source| EnvelopeError::Decode { what: op, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem_backend::MemBackend;
    use conduit_hostapi::QueryError;
    use conduit_primitives::GoError;

    fn envelope(out: UnmanagedVector) -> ResponseEnvelope {
        ResponseEnvelope::decode(out.consume().unwrap().as_slice()).unwrap()
    }

    fn request<M: Message>(msg: M) -> UnmanagedVector {
        UnmanagedVector::new(Some(msg.encode_to_vec()))
    }

    #[test]
    fn test_absent_input() {
        let env = envelope(get_account(UnmanagedVector::new(None)));
        assert_eq!(GoError::from(env.code), GoError::BadArgument);
        assert_eq!(env.error, "request buffer is absent");
    }

    #[test]
    fn test_garbage_input() {
        let mut backend = MemBackend::new();
        session::enter(&mut backend, || {
            let env = envelope(get_account(UnmanagedVector::new(Some(vec![0xff; 4]))));
            assert_eq!(GoError::from(env.code), GoError::CannotSerialize);
            assert!(env.error.starts_with("cannot decode get_account"));
            assert!(env.payload.is_empty());
        });
    }

    #[test]
    fn test_no_session() {
        let env = envelope(get_block_hash(request(QueryBlockHash { number: 1 })));
        assert_eq!(GoError::from(env.code), GoError::QuerierError);
    }

    #[test]
    fn test_short_address() {
        let mut backend = MemBackend::new();
        session::enter(&mut backend, || {
            let out = contains_key(request(QueryContainsKey { key: vec![1; 19] }));
            let err = envelope(out).into_result().unwrap_err();
            assert_eq!(err, QueryError::bad_argument("key must be 20 bytes, got 19"));
        });
    }

    #[test]
    fn test_insert_then_get() {
        let mut backend = MemBackend::new();
        session::enter(&mut backend, || {
            let mut balance = vec![0u8; 32];
            balance[31] = 9;
            let env = envelope(insert_account(request(QueryInsertAccount {
                address: vec![3; 20],
                balance: balance.clone(),
                nonce: 2,
            })));
            assert!(env.into_result().unwrap().is_empty());

            let env = envelope(get_account(request(QueryGetAccount {
                address: vec![3; 20],
            })));
            let payload = env.into_result().unwrap();
            let response = QueryGetAccountResponse::decode(payload.as_slice()).unwrap();
            assert_eq!(response.balance, balance);
            assert_eq!(response.nonce, 2);
        });
        assert_eq!(backend.account(&[3; 20]).unwrap().nonce, 2);
    }
}
