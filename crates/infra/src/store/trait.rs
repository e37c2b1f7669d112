//! Ledger store abstraction.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use ledgerd_ledger::{
    Account, AccountId, Entry, IdempotencyKey, IdempotencyRecord, TransactionId,
};

/// Transaction header as persisted; entries live in their own table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub id: TransactionId,
    pub name: Option<String>,
}

/// Errors surfaced by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated on insert. The constraint
    /// name lets callers distinguish which key collided under a race.
    #[error("unique violation on {constraint}: {message}")]
    UniqueViolation { constraint: String, message: String },
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A ledger storage backend. `begin` opens a unit of work; all data
/// access goes through it.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    type Uow: LedgerUnitOfWork;

    async fn begin(&self) -> Result<Self::Uow, StoreError>;
}

#[async_trait]
impl<S: LedgerStore> LedgerStore for Arc<S> {
    type Uow = S::Uow;

    async fn begin(&self) -> Result<Self::Uow, StoreError> {
        (**self).begin().await
    }
}

/// One atomic unit of work against the ledger.
///
/// Dropping a unit of work without calling [`commit`](Self::commit)
/// discards every buffered write. Reads observe the backend's committed
/// state plus this unit's own writes.
#[async_trait]
pub trait LedgerUnitOfWork: Send {
    async fn account_by_id(&mut self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    /// Fetch (and, where the backend supports it, lock) the given
    /// accounts. Missing ids are simply absent from the result.
    async fn accounts_by_ids(&mut self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError>;

    async fn all_accounts(&mut self) -> Result<Vec<Account>, StoreError>;

    async fn insert_account(&mut self, account: &Account) -> Result<(), StoreError>;

    async fn update_balance(&mut self, id: &AccountId, balance: i64) -> Result<(), StoreError>;

    async fn transaction_by_id(
        &mut self,
        id: &TransactionId,
    ) -> Result<Option<TransactionRow>, StoreError>;

    /// Entries of a transaction in their original insertion order.
    async fn entries_by_transaction(
        &mut self,
        id: &TransactionId,
    ) -> Result<Vec<Entry>, StoreError>;

    async fn insert_transaction(&mut self, row: &TransactionRow) -> Result<(), StoreError>;

    async fn insert_entries(&mut self, entries: &[Entry]) -> Result<(), StoreError>;

    async fn idempotency_by_key(
        &mut self,
        key: &IdempotencyKey,
    ) -> Result<Option<IdempotencyRecord>, StoreError>;

    async fn insert_idempotency(&mut self, record: &IdempotencyRecord) -> Result<(), StoreError>;

    async fn commit(self) -> Result<(), StoreError>;
}
