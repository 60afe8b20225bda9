use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{ListQuery, TransactionsPage},
    repo::{insert, list, owned_by},
    repo_types::Transaction,
    validate::{validate, TransactionInput},
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    response::ApiResponse,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/transactions",
        get(list_transactions).post(create_transaction),
    )
}

#[instrument(skip(state, payload))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Transaction>>)> {
    let Json(payload) = payload?;
    let now = OffsetDateTime::now_utc();

    let mut doc = state.store.load().await?;
    let normalized = validate(&payload, &doc.categories, now).map_err(|e| {
        warn!(%user_id, code = e.code(), "transaction rejected");
        e
    })?;
    let tx = normalized.into_transaction(Uuid::new_v4(), user_id, now);

    let stored = insert(&mut doc, tx)
        .cloned()
        .ok_or(ApiError::NotFound("account"))?;
    state.store.save(&doc).await?;

    info!(%user_id, tx_id = %stored.id, kind = %stored.kind, "transaction created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Transaction created", stored)),
    ))
}

#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<TransactionsPage>>> {
    let Query(query) = query?;
    let filter = query.filter()?;

    let doc = state.store.load().await?;
    let page = list(
        owned_by(doc.transactions, user_id),
        &filter,
        query.page(),
        query.limit(),
    );
    Ok(Json(ApiResponse::ok(TransactionsPage::from(page))))
}
