//! HTTP application wiring.

use std::sync::Arc;

use axum::Router;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Assemble the router over a ready set of services.
pub fn build_router(services: Arc<AppServices>) -> Router {
    routes::router(services)
}
