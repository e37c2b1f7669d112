//! Data model: identifiers, accounts, transactions, entries, idempotency
//! records and the request drafts the engine consumes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::direction::Direction;
use crate::hash::RequestHash;

/// Identifier of an account (opaque, caller- or server-assigned).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

/// Identifier of a transaction (opaque, caller- or server-assigned).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

/// Identifier of an entry within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

/// Client-supplied idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

macro_rules! impl_string_id {
    ($t:ty) => {
        impl $t {
            /// Generate a fresh identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Caller-assigned values are
            /// accepted verbatim; nothing downstream assumes UUID shape.
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

impl_string_id!(AccountId);
impl_string_id!(TransactionId);
impl_string_id!(EntryId);
impl_string_id!(IdempotencyKey);

/// A ledger account.
///
/// `direction` is fixed at creation and defines the account's natural side.
/// `balance` is in minor currency units; non-negative at creation, but
/// posting against the natural direction can drive it negative (overdraft
/// is permitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: Option<String>,
    pub direction: Direction,
    pub balance: i64,
}

/// One side of a posted transaction. Immutable after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub direction: Direction,
    /// Strictly positive, minor currency units.
    pub amount: i64,
}

/// A materialized transaction with its entries in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub name: Option<String>,
    pub entries: Vec<Entry>,
}

/// Resolution record for an idempotency key: created once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub key: IdempotencyKey,
    pub request_hash: RequestHash,
    pub transaction_id: TransactionId,
}

/// Caller's request to post a transaction (ids are generated when absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub id: Option<TransactionId>,
    pub name: Option<String>,
    pub entries: Vec<EntryDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub id: Option<EntryId>,
    pub account_id: AccountId,
    pub direction: Direction,
    pub amount: i64,
}

/// Caller's request to create an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub id: Option<AccountId>,
    pub name: Option<String>,
    pub direction: Direction,
    /// Starting balance; defaults to zero, must be non-negative.
    pub balance: Option<i64>,
}
