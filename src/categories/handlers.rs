use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::dto::{CategoryWithStats, UsageStats};
use crate::{
    auth::extractors::AuthUser, error::ApiResult, response::ApiResponse, state::AppState,
    transactions::repo::owned_by,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<CategoryWithStats>>>> {
    let doc = state.store.load().await?;
    let mine = owned_by(doc.transactions, user_id);
    let categories = doc
        .categories
        .into_iter()
        .map(|category| CategoryWithStats {
            stats: UsageStats::of(&mine, &category.id),
            category,
        })
        .collect();
    Ok(Json(ApiResponse::ok(categories)))
}
