//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger domain.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error taxonomy.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). `Store` is the single escape hatch for
/// persistence-layer failures; callers must not assume partial success when
/// they see it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An entry or balance amount was out of range (non-positive entry
    /// amount, negative starting balance).
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Checked integer arithmetic overflowed.
    #[error("amount arithmetic overflowed")]
    ArithmeticOverflow,

    /// Debit and credit totals of a proposed entry set differ.
    #[error("transaction entries must balance")]
    UnbalancedTransaction,

    /// An entry referenced an account that does not exist.
    #[error("account does not exist: {0}")]
    MissingAccount(String),

    /// The effective transaction id is already taken.
    #[error("transaction already exists")]
    DuplicateTransaction,

    /// An idempotency key was reused with a different payload.
    #[error("idempotency key reused with different payload")]
    IdempotencyConflict,

    /// A request failed validation (e.g. malformed input, empty entry set).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Account creation collided with an existing account id.
    #[error("account already exists: {0}")]
    AccountExists(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    /// A persistence-layer failure; the enclosing unit of work was rolled
    /// back in full.
    #[error("store failure: {0}")]
    Store(String),
}

impl LedgerError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
