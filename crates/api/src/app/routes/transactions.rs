use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};

use ledgerd_core::LedgerError;
use ledgerd_ledger::{IdempotencyKey, TransactionId};

use crate::app::dto::{CreateTransactionRequest, TransactionResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn create(
    State(services): State<Arc<AppServices>>,
    headers: HeaderMap,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let key = idempotency_key(&headers)?;
    let draft = request.into_draft()?;
    let transaction = services.create_transaction(draft, key).await?;
    // Replays return the original transaction with 201 as well.
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

pub async fn get_one(
    State(services): State<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = services.get_transaction(&TransactionId::from(id)).await?;
    Ok(Json(transaction.into()))
}

/// A blank `Idempotency-Key` header counts as no key at all.
fn idempotency_key(headers: &HeaderMap) -> Result<Option<IdempotencyKey>, ApiError> {
    let Some(value) = headers.get("Idempotency-Key") else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| LedgerError::validation("Idempotency-Key must be visible ASCII"))?
        .trim();
    if raw.is_empty() {
        Ok(None)
    } else {
        Ok(Some(IdempotencyKey::from(raw)))
    }
}
