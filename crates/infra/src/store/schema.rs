//! Postgres schema for the ledger tables.
//!
//! Statements are idempotent so [`PgLedgerStore::init_schema`] can run at
//! every startup.
//!
//! [`PgLedgerStore::init_schema`]: super::postgres::PgLedgerStore::init_schema

pub const CREATE_ACCOUNTS: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id        TEXT PRIMARY KEY,
    name      TEXT,
    direction TEXT NOT NULL CHECK (direction IN ('debit', 'credit')),
    balance   BIGINT NOT NULL
)
"#;

pub const CREATE_TRANSACTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id   TEXT PRIMARY KEY,
    name TEXT
)
"#;

/// `ordinal` preserves the caller's entry order across reads.
pub const CREATE_ENTRIES: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id             TEXT PRIMARY KEY,
    transaction_id TEXT NOT NULL REFERENCES transactions(id),
    account_id     TEXT NOT NULL REFERENCES accounts(id),
    direction      TEXT NOT NULL CHECK (direction IN ('debit', 'credit')),
    amount         BIGINT NOT NULL CHECK (amount > 0),
    ordinal        INT NOT NULL
)
"#;

pub const CREATE_ENTRIES_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS entries_transaction_idx
    ON entries (transaction_id, ordinal)
"#;

pub const CREATE_IDEMPOTENCY_KEYS: &str = r#"
CREATE TABLE IF NOT EXISTS idempotency_keys (
    key            TEXT PRIMARY KEY,
    request_hash   TEXT NOT NULL,
    transaction_id TEXT NOT NULL REFERENCES transactions(id)
)
"#;

pub const ALL: &[&str] = &[
    CREATE_ACCOUNTS,
    CREATE_TRANSACTIONS,
    CREATE_ENTRIES,
    CREATE_ENTRIES_INDEX,
    CREATE_IDEMPOTENCY_KEYS,
];
