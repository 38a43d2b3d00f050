//! The storage capability the EVM runs against.

use conduit_hostapi::QueryError;

/// 20-byte account address.
pub type Address = [u8; 20];
/// 32-byte word: block hashes, storage indices and storage values.
pub type H256 = [u8; 32];

/// Balance and nonce of one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Account {
    /// 256-bit balance, big-endian.
    pub balance: H256,
    pub nonce: u64,
}

impl Account {
    pub fn new(balance: H256, nonce: u64) -> Self {
        Self { balance, nonce }
    }

    /// An account whose balance fits in a `u64`.
    pub fn with_balance(balance: u64, nonce: u64) -> Self {
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&balance.to_be_bytes());
        Self::new(word, nonce)
    }
}

/// EVM state backend.
///
/// Unset storage cells read as zero and unknown accounts as
/// `Account::default()`; neither is an error.
pub trait EvmStorage {
    fn block_hash(&self, number: u64) -> Result<H256, QueryError>;

    /// Whether an account exists at `address`.
    fn contains_key(&self, address: &Address) -> Result<bool, QueryError>;

    fn get_account(&self, address: &Address) -> Result<Account, QueryError>;

    fn get_storage_cell(&self, address: &Address, index: &H256) -> Result<H256, QueryError>;

    fn get_account_code(&self, address: &Address) -> Result<Vec<u8>, QueryError>;

    fn insert_account(&mut self, address: Address, account: Account) -> Result<(), QueryError>;

    fn insert_account_code(&mut self, address: Address, code: Vec<u8>) -> Result<(), QueryError>;

    fn insert_storage_cell(
        &mut self,
        address: Address,
        index: H256,
        value: H256,
    ) -> Result<(), QueryError>;

    /// Remove the account at `address` together with its code and storage.
    fn remove(&mut self, address: &Address) -> Result<(), QueryError>;

    /// Reset one storage cell to zero.
    fn remove_storage_cell(&mut self, address: &Address, index: &H256) -> Result<(), QueryError>;
}
