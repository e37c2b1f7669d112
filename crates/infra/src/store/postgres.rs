//! Postgres-backed ledger store.
//!
//! Each unit of work maps directly onto a database transaction.
//! `accounts_by_ids` takes `FOR UPDATE` row locks so concurrent postings
//! against the same accounts serialize instead of clobbering balances,
//! and unique-key races surface as [`StoreError::UniqueViolation`] with
//! the violated constraint's name.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, Row};
use std::str::FromStr;

use ledgerd_ledger::{
    Account, AccountId, Direction, Entry, IdempotencyKey, IdempotencyRecord, TransactionId,
};

use super::r#trait::{LedgerStore, LedgerUnitOfWork, StoreError, TransactionRow};
use super::schema;

#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the ledger tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        for statement in schema::ALL {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    type Uow = PgUnitOfWork;

    async fn begin(&self) -> Result<Self::Uow, StoreError> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(PgUnitOfWork { tx })
    }
}

pub struct PgUnitOfWork {
    tx: sqlx::Transaction<'static, Postgres>,
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::UniqueViolation {
                constraint: db_err.constraint().unwrap_or_default().to_string(),
                message: db_err.message().to_string(),
            };
        }
    }
    StoreError::Backend(err.to_string())
}

fn decode_direction(raw: &str) -> Result<Direction, StoreError> {
    Direction::from_str(raw)
        .map_err(|_| StoreError::Backend(format!("corrupt direction column: {raw:?}")))
}

fn decode_account(row: &PgRow) -> Result<Account, StoreError> {
    Ok(Account {
        id: AccountId::from(row.try_get::<String, _>("id").map_err(map_sqlx_error)?),
        name: row.try_get("name").map_err(map_sqlx_error)?,
        direction: decode_direction(
            &row.try_get::<String, _>("direction").map_err(map_sqlx_error)?,
        )?,
        balance: row.try_get("balance").map_err(map_sqlx_error)?,
    })
}

fn decode_entry(row: &PgRow) -> Result<Entry, StoreError> {
    Ok(Entry {
        id: ledgerd_ledger::EntryId::from(
            row.try_get::<String, _>("id").map_err(map_sqlx_error)?,
        ),
        transaction_id: TransactionId::from(
            row.try_get::<String, _>("transaction_id")
                .map_err(map_sqlx_error)?,
        ),
        account_id: AccountId::from(
            row.try_get::<String, _>("account_id")
                .map_err(map_sqlx_error)?,
        ),
        direction: decode_direction(
            &row.try_get::<String, _>("direction").map_err(map_sqlx_error)?,
        )?,
        amount: row.try_get("amount").map_err(map_sqlx_error)?,
    })
}

#[async_trait]
impl LedgerUnitOfWork for PgUnitOfWork {
    async fn account_by_id(&mut self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query("SELECT id, name, direction, balance FROM accounts WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(decode_account).transpose()
    }

    async fn accounts_by_ids(&mut self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError> {
        let raw: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
        let rows = sqlx::query(
            "SELECT id, name, direction, balance FROM accounts WHERE id = ANY($1) FOR UPDATE",
        )
        .bind(&raw)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        rows.iter().map(decode_account).collect()
    }

    async fn all_accounts(&mut self) -> Result<Vec<Account>, StoreError> {
        let rows =
            sqlx::query("SELECT id, name, direction, balance FROM accounts ORDER BY id ASC")
                .fetch_all(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;
        rows.iter().map(decode_account).collect()
    }

    async fn insert_account(&mut self, account: &Account) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO accounts (id, name, direction, balance) VALUES ($1, $2, $3, $4)")
            .bind(account.id.as_str())
            .bind(account.name.as_deref())
            .bind(account.direction.as_str())
            .bind(account.balance)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn update_balance(&mut self, id: &AccountId, balance: i64) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE accounts SET balance = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(balance)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!("no account {id} to update")));
        }
        Ok(())
    }

    async fn transaction_by_id(
        &mut self,
        id: &TransactionId,
    ) -> Result<Option<TransactionRow>, StoreError> {
        let row = sqlx::query("SELECT id, name FROM transactions WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        row.map(|row| {
            Ok(TransactionRow {
                id: TransactionId::from(row.try_get::<String, _>("id").map_err(map_sqlx_error)?),
                name: row.try_get("name").map_err(map_sqlx_error)?,
            })
        })
        .transpose()
    }

    async fn entries_by_transaction(
        &mut self,
        id: &TransactionId,
    ) -> Result<Vec<Entry>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, transaction_id, account_id, direction, amount \
             FROM entries WHERE transaction_id = $1 ORDER BY ordinal ASC",
        )
        .bind(id.as_str())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        rows.iter().map(decode_entry).collect()
    }

    async fn insert_transaction(&mut self, row: &TransactionRow) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO transactions (id, name) VALUES ($1, $2)")
            .bind(row.id.as_str())
            .bind(row.name.as_deref())
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn insert_entries(&mut self, entries: &[Entry]) -> Result<(), StoreError> {
        for (ordinal, entry) in entries.iter().enumerate() {
            sqlx::query(
                "INSERT INTO entries (id, transaction_id, account_id, direction, amount, ordinal) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(entry.id.as_str())
            .bind(entry.transaction_id.as_str())
            .bind(entry.account_id.as_str())
            .bind(entry.direction.as_str())
            .bind(entry.amount)
            .bind(ordinal as i32)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        }
        Ok(())
    }

    async fn idempotency_by_key(
        &mut self,
        key: &IdempotencyKey,
    ) -> Result<Option<IdempotencyRecord>, StoreError> {
        let row =
            sqlx::query("SELECT key, request_hash, transaction_id FROM idempotency_keys WHERE key = $1")
                .bind(key.as_str())
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;
        row.map(|row| {
            Ok(IdempotencyRecord {
                key: IdempotencyKey::from(
                    row.try_get::<String, _>("key").map_err(map_sqlx_error)?,
                ),
                request_hash: ledgerd_ledger::RequestHash::from(
                    row.try_get::<String, _>("request_hash")
                        .map_err(map_sqlx_error)?,
                ),
                transaction_id: TransactionId::from(
                    row.try_get::<String, _>("transaction_id")
                        .map_err(map_sqlx_error)?,
                ),
            })
        })
        .transpose()
    }

    async fn insert_idempotency(&mut self, record: &IdempotencyRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO idempotency_keys (key, request_hash, transaction_id) VALUES ($1, $2, $3)",
        )
        .bind(record.key.as_str())
        .bind(record.request_hash.as_str())
        .bind(record.transaction_id.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }
}
