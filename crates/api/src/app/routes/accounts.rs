use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use ledgerd_ledger::AccountId;

use crate::app::dto::{AccountResponse, CreateAccountRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn create(
    State(services): State<Arc<AppServices>>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let draft = request.into_draft()?;
    let account = services.create_account(draft).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

pub async fn get_one(
    State(services): State<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = services.get_account(&AccountId::from(id)).await?;
    Ok(Json(account.into()))
}

pub async fn list(
    State(services): State<Arc<AppServices>>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = services.list_accounts().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}
