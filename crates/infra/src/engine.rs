//! Transaction posting engine.
//!
//! `create` runs the whole posting pipeline inside one unit of work:
//! balance validation, idempotency replay, duplicate detection, account
//! lookup, balance projection and the final inserts. Either everything
//! commits or nothing does.

use std::collections::{HashMap, HashSet};
use tracing::instrument;

use ledgerd_core::{LedgerError, LedgerResult};
use ledgerd_ledger::{
    AccountId, Entry, EntryId, IdempotencyKey, IdempotencyRecord, Transaction, TransactionDraft,
    TransactionId, request_hash, validate_balanced,
};

use crate::store::{LedgerStore, LedgerUnitOfWork, StoreError, TransactionRow};

#[derive(Debug, Clone)]
pub struct TransactionEngine<S> {
    store: S,
}

impl<S: LedgerStore> TransactionEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Post a transaction.
    ///
    /// With an idempotency key, an identical retry replays the original
    /// transaction without side effects; a different request under the
    /// same key is rejected as a conflict.
    #[instrument(
        skip(self, draft, idempotency_key),
        fields(entries = draft.entries.len(), keyed = idempotency_key.is_some())
    )]
    pub async fn create(
        &self,
        draft: TransactionDraft,
        idempotency_key: Option<IdempotencyKey>,
    ) -> LedgerResult<Transaction> {
        if draft.entries.is_empty() {
            return Err(LedgerError::validation(
                "transaction requires at least one entry",
            ));
        }
        validate_balanced(draft.entries.iter().map(|e| (e.direction, e.amount)))?;

        let mut uow = self.store.begin().await.map_err(store_error)?;
        let transaction = create_in(&mut uow, draft, idempotency_key).await?;
        uow.commit().await.map_err(store_error)?;

        tracing::info!(transaction_id = %transaction.id, "transaction posted");
        Ok(transaction)
    }

    pub async fn get(&self, id: &TransactionId) -> LedgerResult<Transaction> {
        let mut uow = self.store.begin().await.map_err(store_error)?;
        fetch_transaction(&mut uow, id).await
    }
}

async fn create_in<U: LedgerUnitOfWork>(
    uow: &mut U,
    draft: TransactionDraft,
    idempotency_key: Option<IdempotencyKey>,
) -> LedgerResult<Transaction> {
    // Hash before ids are generated so a retry of the same request
    // canonicalizes identically.
    let hash = idempotency_key.as_ref().map(|_| request_hash(&draft));

    if let (Some(key), Some(hash)) = (&idempotency_key, &hash) {
        if let Some(record) = uow.idempotency_by_key(key).await.map_err(store_error)? {
            if &record.request_hash != hash {
                return Err(LedgerError::IdempotencyConflict);
            }
            tracing::info!(key = %key, transaction_id = %record.transaction_id, "idempotent replay");
            return fetch_transaction(uow, &record.transaction_id).await;
        }
    }

    let transaction_id = draft.id.unwrap_or_else(TransactionId::generate);
    if uow
        .transaction_by_id(&transaction_id)
        .await
        .map_err(store_error)?
        .is_some()
    {
        return Err(LedgerError::DuplicateTransaction);
    }

    // Distinct account ids in first-reference order, so lock acquisition
    // and balance updates are deterministic.
    let mut seen = HashSet::new();
    let mut account_ids: Vec<AccountId> = Vec::new();
    for entry in &draft.entries {
        if seen.insert(entry.account_id.clone()) {
            account_ids.push(entry.account_id.clone());
        }
    }

    let accounts: HashMap<AccountId, _> = uow
        .accounts_by_ids(&account_ids)
        .await
        .map_err(store_error)?
        .into_iter()
        .map(|a| (a.id.clone(), a))
        .collect();
    for id in &account_ids {
        if !accounts.contains_key(id) {
            return Err(LedgerError::MissingAccount(id.as_str().to_string()));
        }
    }

    // Project new balances. Several entries may hit the same account, so
    // deltas compose against a running balance, not the stored one.
    let mut balances: HashMap<AccountId, i64> = accounts
        .values()
        .map(|a| (a.id.clone(), a.balance))
        .collect();
    let mut entries = Vec::with_capacity(draft.entries.len());
    for entry_draft in draft.entries {
        let account = accounts
            .get(&entry_draft.account_id)
            .ok_or_else(|| LedgerError::MissingAccount(entry_draft.account_id.as_str().to_string()))?;
        let delta = if entry_draft.direction == account.direction {
            entry_draft.amount
        } else {
            -entry_draft.amount
        };
        let balance = balances
            .get_mut(&entry_draft.account_id)
            .ok_or_else(|| LedgerError::MissingAccount(entry_draft.account_id.as_str().to_string()))?;
        *balance = balance
            .checked_add(delta)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        entries.push(Entry {
            id: entry_draft.id.unwrap_or_else(EntryId::generate),
            transaction_id: transaction_id.clone(),
            account_id: entry_draft.account_id,
            direction: entry_draft.direction,
            amount: entry_draft.amount,
        });
    }

    uow.insert_transaction(&TransactionRow {
        id: transaction_id.clone(),
        name: draft.name.clone(),
    })
    .await
    .map_err(store_error)?;
    uow.insert_entries(&entries).await.map_err(store_error)?;
    for id in &account_ids {
        if let Some(balance) = balances.get(id) {
            uow.update_balance(id, *balance).await.map_err(store_error)?;
        }
    }

    if let (Some(key), Some(hash)) = (idempotency_key, hash) {
        uow.insert_idempotency(&IdempotencyRecord {
            key,
            request_hash: hash,
            transaction_id: transaction_id.clone(),
        })
        .await
        .map_err(store_error)?;
    }

    Ok(Transaction {
        id: transaction_id,
        name: draft.name,
        entries,
    })
}

async fn fetch_transaction<U: LedgerUnitOfWork>(
    uow: &mut U,
    id: &TransactionId,
) -> LedgerResult<Transaction> {
    let row = uow
        .transaction_by_id(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| LedgerError::TransactionNotFound(id.as_str().to_string()))?;
    let entries = uow.entries_by_transaction(id).await.map_err(store_error)?;
    Ok(Transaction {
        id: row.id,
        name: row.name,
        entries,
    })
}

/// Map storage failures onto domain errors. Unique violations raised by
/// a losing writer in a race become the same errors the pre-checks
/// produce on the slow path.
pub(crate) fn store_error(err: StoreError) -> LedgerError {
    match err {
        StoreError::UniqueViolation { constraint, message } => {
            if constraint.contains("idempotency") {
                LedgerError::IdempotencyConflict
            } else if constraint.contains("transactions") {
                LedgerError::DuplicateTransaction
            } else if constraint.contains("entries") {
                LedgerError::validation("duplicate entry id")
            } else {
                LedgerError::store(message)
            }
        }
        StoreError::Backend(message) => LedgerError::store(message),
    }
}
