//! Ledger domain (double-entry posting).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod balance;
pub mod direction;
pub mod hash;
pub mod model;

pub use balance::validate_balanced;
pub use direction::Direction;
pub use hash::{RequestHash, request_hash};
pub use model::{
    Account, AccountDraft, AccountId, Entry, EntryDraft, EntryId, IdempotencyKey,
    IdempotencyRecord, Transaction, TransactionDraft, TransactionId,
};
