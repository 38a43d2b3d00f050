//! Typed client for the storage operations.
//!
//! `OcallStorage` is the EVM-side `EvmStorage`: each method encodes its
//! request message, calls the matching operation through an [`OcallTable`]
//! and decodes the envelope that comes back.

use conduit_hostapi::QueryError;
use conduit_primitives::UnmanagedVector;
use prost::Message;
use tracing::trace;

use crate::error::EnvelopeError;
use crate::ops;
use crate::proto::*;
use crate::storage::{Account, Address, EvmStorage, H256};

/// Signature shared by all ten operations.
pub type OpFn = extern "C" fn(UnmanagedVector) -> UnmanagedVector;

/// One function pointer per operation.
#[derive(Clone, Copy)]
pub struct OcallTable {
    pub get_block_hash: OpFn,
    pub get_account: OpFn,
    pub contains_key: OpFn,
    pub get_storage_cell: OpFn,
    pub get_account_code: OpFn,
    pub insert_account: OpFn,
    pub insert_account_code: OpFn,
    pub insert_storage_cell: OpFn,
    pub remove: OpFn,
    pub remove_storage_cell: OpFn,
}

impl Default for OcallTable {
    /// The operations exported by this crate.
    fn default() -> Self {
        Self {
            get_block_hash: ops::get_block_hash,
            get_account: ops::get_account,
            contains_key: ops::contains_key,
            get_storage_cell: ops::get_storage_cell,
            get_account_code: ops::get_account_code,
            insert_account: ops::insert_account,
            insert_account_code: ops::insert_account_code,
            insert_storage_cell: ops::insert_storage_cell,
            remove: ops::remove,
            remove_storage_cell: ops::remove_storage_cell,
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct OcallStorage {
    table: OcallTable,
}

impl OcallStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: OcallTable) -> Self {
        Self { table }
    }

    fn call<Q, R>(&self, op: OpFn, request: Q) -> Result<R, QueryError>
    where
        Q: Message,
        R: Message + Default,
    {
        let output = op(UnmanagedVector::new(Some(request.encode_to_vec())));
        let bytes = output
            .consume()
            .ok_or_else(|| QueryError::querier("operation returned an absent buffer"))?;
        trace!(len = bytes.len(), "operation returned");
        let envelope = ResponseEnvelope::decode(bytes.as_slice())
            .map_err(|source| decode_error("response envelope", source))?;
        let payload = envelope.into_result()?;
        R::decode(payload.as_slice()).map_err(|source| decode_error("response payload", source))
    }
}

fn decode_error(what: &'static str, source: prost::DecodeError) -> QueryError {
    EnvelopeError::Decode { what, source }.into()
}

fn word(field: &'static str, bytes: &[u8]) -> Result<H256, QueryError> {
    Ok(fixed::<WORD_LEN>(field, bytes)?)
}

impl EvmStorage for OcallStorage {
    fn block_hash(&self, number: u64) -> Result<H256, QueryError> {
        let res: QueryBlockHashResponse =
            self.call(self.table.get_block_hash, QueryBlockHash { number })?;
        word("hash", &res.hash)
    }

    fn contains_key(&self, address: &Address) -> Result<bool, QueryError> {
        let res: QueryContainsKeyResponse = self.call(
            self.table.contains_key,
            QueryContainsKey {
                key: address.to_vec(),
            },
        )?;
        Ok(res.contains)
    }

    fn get_account(&self, address: &Address) -> Result<Account, QueryError> {
        let res: QueryGetAccountResponse = self.call(
            self.table.get_account,
            QueryGetAccount {
                address: address.to_vec(),
            },
        )?;
        Ok(Account::new(word("balance", &res.balance)?, res.nonce))
    }

    fn get_storage_cell(&self, address: &Address, index: &H256) -> Result<H256, QueryError> {
        let res: QueryGetAccountStorageCellResponse = self.call(
            self.table.get_storage_cell,
            QueryGetAccountStorageCell {
                address: address.to_vec(),
                index: index.to_vec(),
            },
        )?;
        word("value", &res.value)
    }

    fn get_account_code(&self, address: &Address) -> Result<Vec<u8>, QueryError> {
        let res: QueryGetAccountCodeResponse = self.call(
            self.table.get_account_code,
            QueryGetAccountCode {
                address: address.to_vec(),
            },
        )?;
        Ok(res.code)
    }

    fn insert_account(&mut self, address: Address, account: Account) -> Result<(), QueryError> {
        let _: QueryInsertAccountResponse = self.call(
            self.table.insert_account,
            QueryInsertAccount {
                address: address.to_vec(),
                balance: account.balance.to_vec(),
                nonce: account.nonce,
            },
        )?;
        Ok(())
    }

    fn insert_account_code(&mut self, address: Address, code: Vec<u8>) -> Result<(), QueryError> {
        let _: QueryInsertAccountCodeResponse = self.call(
            self.table.insert_account_code,
            QueryInsertAccountCode {
                address: address.to_vec(),
                code,
            },
        )?;
        Ok(())
    }

    fn insert_storage_cell(
        &mut self,
        address: Address,
        index: H256,
        value: H256,
    ) -> Result<(), QueryError> {
        let _: QueryInsertStorageCellResponse = self.call(
            self.table.insert_storage_cell,
            QueryInsertStorageCell {
                address: address.to_vec(),
                index: index.to_vec(),
                value: value.to_vec(),
            },
        )?;
        Ok(())
    }

    fn remove(&mut self, address: &Address) -> Result<(), QueryError> {
        let _: QueryRemoveResponse = self.call(
            self.table.remove,
            QueryRemove {
                address: address.to_vec(),
            },
        )?;
        Ok(())
    }

    fn remove_storage_cell(&mut self, address: &Address, index: &H256) -> Result<(), QueryError> {
        let _: QueryRemoveStorageCellResponse = self.call(
            self.table.remove_storage_cell,
            QueryRemoveStorageCell {
                address: address.to_vec(),
                index: index.to_vec(),
            },
        )?;
        Ok(())
    }
}
