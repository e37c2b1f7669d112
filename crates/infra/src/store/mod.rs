//! Storage boundary for the ledger.
//!
//! This module defines an infrastructure-facing abstraction over ledger
//! persistence without making any storage assumptions. All reads and
//! writes happen inside a unit of work so a posting either lands in full
//! or leaves no trace.

pub mod in_memory;
pub mod postgres;
pub mod schema;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use postgres::PgLedgerStore;
pub use r#trait::{LedgerStore, LedgerUnitOfWork, StoreError, TransactionRow};
