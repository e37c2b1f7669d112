//! In-memory ledger store for tests and local development.
//!
//! A unit of work clones the shared state, buffers writes against the
//! clone, and swaps it back in on commit. The store mutex is held for
//! the lifetime of the unit of work, so postings are fully serialized,
//! matching the isolation the Postgres backend gets from row locks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use ledgerd_ledger::{
    Account, AccountId, Entry, IdempotencyKey, IdempotencyRecord, TransactionId,
};

use super::r#trait::{LedgerStore, LedgerUnitOfWork, StoreError, TransactionRow};

#[derive(Debug, Default, Clone)]
struct State {
    accounts: HashMap<AccountId, Account>,
    transactions: HashMap<TransactionId, TransactionRow>,
    entries: Vec<Entry>,
    idempotency: HashMap<IdempotencyKey, IdempotencyRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    type Uow = InMemoryUnitOfWork;

    async fn begin(&self) -> Result<Self::Uow, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let pending = guard.clone();
        Ok(InMemoryUnitOfWork { guard, pending })
    }
}

pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<State>,
    pending: State,
}

fn unique_violation(constraint: &str, key: impl core::fmt::Display) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
        message: format!("duplicate key: {key}"),
    }
}

#[async_trait]
impl LedgerUnitOfWork for InMemoryUnitOfWork {
    async fn account_by_id(&mut self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.pending.accounts.get(id).cloned())
    }

    async fn accounts_by_ids(&mut self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.pending.accounts.get(id).cloned())
            .collect())
    }

    async fn all_accounts(&mut self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self.pending.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(accounts)
    }

    async fn insert_account(&mut self, account: &Account) -> Result<(), StoreError> {
        if self.pending.accounts.contains_key(&account.id) {
            return Err(unique_violation("accounts_pkey", &account.id));
        }
        self.pending.accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn update_balance(&mut self, id: &AccountId, balance: i64) -> Result<(), StoreError> {
        let account = self
            .pending
            .accounts
            .get_mut(id)
            .ok_or_else(|| StoreError::Backend(format!("no account {id} to update")))?;
        account.balance = balance;
        Ok(())
    }

    async fn transaction_by_id(
        &mut self,
        id: &TransactionId,
    ) -> Result<Option<TransactionRow>, StoreError> {
        Ok(self.pending.transactions.get(id).cloned())
    }

    async fn entries_by_transaction(
        &mut self,
        id: &TransactionId,
    ) -> Result<Vec<Entry>, StoreError> {
        Ok(self
            .pending
            .entries
            .iter()
            .filter(|e| &e.transaction_id == id)
            .cloned()
            .collect())
    }

    async fn insert_transaction(&mut self, row: &TransactionRow) -> Result<(), StoreError> {
        if self.pending.transactions.contains_key(&row.id) {
            return Err(unique_violation("transactions_pkey", &row.id));
        }
        self.pending.transactions.insert(row.id.clone(), row.clone());
        Ok(())
    }

    async fn insert_entries(&mut self, entries: &[Entry]) -> Result<(), StoreError> {
        for entry in entries {
            if self.pending.entries.iter().any(|e| e.id == entry.id) {
                return Err(unique_violation("entries_pkey", &entry.id));
            }
            self.pending.entries.push(entry.clone());
        }
        Ok(())
    }

    async fn idempotency_by_key(
        &mut self,
        key: &IdempotencyKey,
    ) -> Result<Option<IdempotencyRecord>, StoreError> {
        Ok(self.pending.idempotency.get(key).cloned())
    }

    async fn insert_idempotency(&mut self, record: &IdempotencyRecord) -> Result<(), StoreError> {
        if self.pending.idempotency.contains_key(&record.key) {
            return Err(unique_violation("idempotency_keys_pkey", &record.key));
        }
        self.pending
            .idempotency
            .insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        let Self { mut guard, pending } = self;
        *guard = pending;
        Ok(())
    }
}
