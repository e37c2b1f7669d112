use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use super::services::AppServices;

pub mod accounts;
pub mod system;
pub mod transactions;

pub fn router(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/accounts", post(accounts::create).get(accounts::list))
        .route("/accounts/:id", get(accounts::get_one))
        .route("/transactions", post(transactions::create))
        .route("/transactions/:id", get(transactions::get_one))
        .with_state(services)
}
