//! `ledgerd-infra` — persistence backends and the transaction engine.
//!
//! The [`store`] module defines the storage abstraction ([`LedgerStore`] /
//! [`LedgerUnitOfWork`]) with an in-memory backend for tests and a
//! Postgres backend for production. [`engine`] and [`accounts`] implement
//! the application services on top of it.

pub mod accounts;
pub mod engine;
pub mod store;

pub use accounts::AccountService;
pub use engine::TransactionEngine;
pub use store::in_memory::InMemoryLedgerStore;
pub use store::postgres::PgLedgerStore;
pub use store::{LedgerStore, LedgerUnitOfWork, StoreError, TransactionRow};

#[cfg(test)]
mod integration_tests;
