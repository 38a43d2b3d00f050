//! In-memory EVM storage for testing.
//!
//! `MemBackend` implements `EvmStorage` using `BTreeMap`s for deterministic
//! ordering. Useful for unit tests, integration tests and demos where a
//! real keeper is not needed.

use std::collections::BTreeMap;

use conduit_hostapi::QueryError;

use crate::storage::{Account, Address, EvmStorage, H256};

/// In-memory EVM state backed by `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct MemBackend {
    accounts: BTreeMap<Address, Account>,
    code: BTreeMap<Address, Vec<u8>>,
    storage: BTreeMap<(Address, H256), H256>,
    block_hashes: BTreeMap<u64, H256>,
}

impl MemBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the hash of block `number`. Unknown blocks hash to zero.
    pub fn set_block_hash(&mut self, number: u64, hash: H256) {
        self.block_hashes.insert(number, hash);
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn code(&self, address: &Address) -> Option<&[u8]> {
        self.code.get(address).map(Vec::as_slice)
    }

    /// The value of one cell, if it was ever written.
    pub fn cell(&self, address: &Address, index: &H256) -> Option<&H256> {
        self.storage.get(&(*address, *index))
    }

    /// Returns the number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl EvmStorage for MemBackend {
    fn block_hash(&self, number: u64) -> Result<H256, QueryError> {
        Ok(self.block_hashes.get(&number).copied().unwrap_or_default())
    }

    fn contains_key(&self, address: &Address) -> Result<bool, QueryError> {
        Ok(self.contains(address))
    }

    fn get_account(&self, address: &Address) -> Result<Account, QueryError> {
        Ok(self.accounts.get(address).copied().unwrap_or_default())
    }

    fn get_storage_cell(&self, address: &Address, index: &H256) -> Result<H256, QueryError> {
        Ok(self.cell(address, index).copied().unwrap_or_default())
    }

    fn get_account_code(&self, address: &Address) -> Result<Vec<u8>, QueryError> {
        Ok(self.code.get(address).cloned().unwrap_or_default())
    }

    fn insert_account(&mut self, address: Address, account: Account) -> Result<(), QueryError> {
        self.accounts.insert(address, account);
        Ok(())
    }

    fn insert_account_code(&mut self, address: Address, code: Vec<u8>) -> Result<(), QueryError> {
        self.code.insert(address, code);
        Ok(())
    }

    fn insert_storage_cell(
        &mut self,
        address: Address,
        index: H256,
        value: H256,
    ) -> Result<(), QueryError> {
        self.storage.insert((address, index), value);
        Ok(())
    }

    fn remove(&mut self, address: &Address) -> Result<(), QueryError> {
        self.accounts.remove(address);
        self.code.remove(address);
        self.storage.retain(|(owner, _), _| owner != address);
        Ok(())
    }

    fn remove_storage_cell(&mut self, address: &Address, index: &H256) -> Result<(), QueryError> {
        if let Some(value) = self.storage.get_mut(&(*address, *index)) {
            *value = [0u8; 32];
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Address = [0xa1; 20];
    const BOB: Address = [0xb0; 20];

    fn word(n: u8) -> H256 {
        let mut w = [0u8; 32];
        w[31] = n;
        w
    }

    #[test]
    fn test_empty_backend() {
        let backend = MemBackend::new();
        assert!(backend.is_empty());
        assert_eq!(backend.len(), 0);
        assert!(!backend.contains_key(&ALICE).unwrap());
        assert_eq!(backend.get_account(&ALICE).unwrap(), Account::default());
        assert_eq!(backend.get_storage_cell(&ALICE, &word(1)).unwrap(), [0u8; 32]);
        assert!(backend.get_account_code(&ALICE).unwrap().is_empty());
        assert_eq!(backend.block_hash(10).unwrap(), [0u8; 32]);
    }

    #[test]
    fn test_insert_and_get() {
        let mut backend = MemBackend::new();
        backend
            .insert_account(ALICE, Account::with_balance(100, 1))
            .unwrap();
        backend.insert_account_code(ALICE, vec![0x60, 0x00]).unwrap();
        backend
            .insert_storage_cell(ALICE, word(1), word(42))
            .unwrap();
        backend.set_block_hash(7, word(7));

        assert!(backend.contains_key(&ALICE).unwrap());
        assert_eq!(backend.get_account(&ALICE).unwrap().nonce, 1);
        assert_eq!(backend.get_account_code(&ALICE).unwrap(), vec![0x60, 0x00]);
        assert_eq!(backend.get_storage_cell(&ALICE, &word(1)).unwrap(), word(42));
        assert_eq!(backend.block_hash(7).unwrap(), word(7));
    }

    #[test]
    fn test_remove_storage_cell_zeroes() {
        let mut backend = MemBackend::new();
        backend
            .insert_storage_cell(ALICE, word(1), word(42))
            .unwrap();
        backend.remove_storage_cell(&ALICE, &word(1)).unwrap();

        assert_eq!(backend.cell(&ALICE, &word(1)), Some(&[0u8; 32]));
        assert_eq!(backend.get_storage_cell(&ALICE, &word(1)).unwrap(), [0u8; 32]);

        // removing an unwritten cell does not create it
        backend.remove_storage_cell(&ALICE, &word(2)).unwrap();
        assert_eq!(backend.cell(&ALICE, &word(2)), None);
    }

    #[test]
    fn test_remove_account_only_touches_owner() {
        let mut backend = MemBackend::new();
        for owner in [ALICE, BOB] {
            backend.insert_account(owner, Account::with_balance(1, 0)).unwrap();
            backend.insert_account_code(owner, vec![1]).unwrap();
            backend.insert_storage_cell(owner, word(1), word(1)).unwrap();
        }
        backend.remove(&ALICE).unwrap();

        assert!(!backend.contains(&ALICE));
        assert_eq!(backend.code(&ALICE), None);
        assert_eq!(backend.cell(&ALICE, &word(1)), None);
        assert!(backend.contains(&BOB));
        assert_eq!(backend.cell(&BOB, &word(1)), Some(&word(1)));
    }
}
