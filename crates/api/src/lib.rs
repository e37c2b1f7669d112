//! `ledgerd-api` — HTTP surface of the ledger.

pub mod app;

pub use app::{AppServices, build_router, build_services};
