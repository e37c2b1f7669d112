//! Domain-error to HTTP mapping.

use std::str::FromStr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ledgerd_core::{LedgerError, LedgerResult};
use ledgerd_ledger::Direction;

/// Wrapper so handlers can bubble domain errors with `?`.
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = status_and_code(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        json_error(status, code, &self.0.to_string()).into_response()
    }
}

fn status_and_code(err: &LedgerError) -> (StatusCode, &'static str) {
    match err {
        LedgerError::InvalidAmount(_) | LedgerError::Validation(_) => {
            (StatusCode::BAD_REQUEST, "invalid_request")
        }
        LedgerError::ArithmeticOverflow => (StatusCode::BAD_REQUEST, "arithmetic_overflow"),
        LedgerError::UnbalancedTransaction => {
            (StatusCode::UNPROCESSABLE_ENTITY, "unbalanced_transaction")
        }
        LedgerError::MissingAccount(_) => (StatusCode::BAD_REQUEST, "account_missing"),
        LedgerError::AccountNotFound(_) => (StatusCode::NOT_FOUND, "account_not_found"),
        LedgerError::TransactionNotFound(_) => (StatusCode::NOT_FOUND, "transaction_not_found"),
        LedgerError::DuplicateTransaction => (StatusCode::CONFLICT, "transaction_exists"),
        LedgerError::IdempotencyConflict => (StatusCode::CONFLICT, "idempotency_conflict"),
        LedgerError::AccountExists(_) => (StatusCode::CONFLICT, "account_exists"),
        LedgerError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

/// Uniform error body: `{ "code", "message", "timestamp" }`.
pub fn json_error(status: StatusCode, code: &str, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(json!({
            "code": code,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// Parse a wire direction, case-insensitively.
pub fn parse_direction(raw: &str) -> LedgerResult<Direction> {
    Direction::from_str(raw)
}
