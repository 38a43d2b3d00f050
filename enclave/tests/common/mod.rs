//! Shared test helpers for the enclave integration tests.
//!
//! Provides deterministic addresses and words, pre-populated backends, and
//! a wrapper that calls an operation with a message and decodes the
//! envelope it returns.

#![allow(dead_code)]

use conduit_enclave::{ops, Account, Address, MemBackend, OpFn, ResponseEnvelope, H256};
use conduit_primitives::UnmanagedVector;
use prost::Message;

/// Address whose 20 bytes are all `seed`.
pub fn addr(seed: u8) -> Address {
    [seed; 20]
}

/// Word holding `n` in its last byte.
pub fn word(n: u8) -> H256 {
    let mut w = [0u8; 32];
    w[31] = n;
    w
}

/// Alice: seed=1, funded with 10_000.
pub fn alice() -> Address {
    addr(1)
}

/// Bob: seed=2, unfunded.
pub fn bob() -> Address {
    addr(2)
}

/// A backend where Alice holds `balance` at nonce 0.
pub fn funded_backend(balance: u64) -> MemBackend {
    let mut backend = MemBackend::new();
    conduit_enclave::EvmStorage::insert_account(
        &mut backend,
        alice(),
        Account::with_balance(balance, 0),
    )
    .unwrap();
    backend
}

/// Every exported operation, by name.
pub fn all_ops() -> [(&'static str, OpFn); 10] {
    [
        ("get_block_hash", ops::get_block_hash),
        ("get_account", ops::get_account),
        ("contains_key", ops::contains_key),
        ("get_storage_cell", ops::get_storage_cell),
        ("get_account_code", ops::get_account_code),
        ("insert_account", ops::insert_account),
        ("insert_account_code", ops::insert_account_code),
        ("insert_storage_cell", ops::insert_storage_cell),
        ("remove", ops::remove),
        ("remove_storage_cell", ops::remove_storage_cell),
    ]
}

/// Call `op` with `msg` encoded as the request.
pub fn call<M: Message>(op: OpFn, msg: M) -> ResponseEnvelope {
    call_raw(op, UnmanagedVector::new(Some(msg.encode_to_vec())))
}

/// Call `op` with an arbitrary input buffer.
pub fn call_raw(op: OpFn, input: UnmanagedVector) -> ResponseEnvelope {
    let output = op(input);
    assert!(output.is_some(), "operations never return an absent buffer");
    ResponseEnvelope::decode(output.consume().unwrap().as_slice()).unwrap()
}

/// Decode the payload of a successful envelope.
pub fn payload<R: Message + Default>(envelope: ResponseEnvelope) -> R {
    let bytes = envelope.into_result().unwrap();
    R::decode(bytes.as_slice()).unwrap()
}
