use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use super::{
    dashboard::{build_insights, build_overview, DashboardOverview, InsightsReport},
    period::Period,
};
use crate::{
    auth::extractors::AuthUser, error::ApiResult, response::ApiResponse, state::AppState,
    transactions::repo::owned_by,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/overview", get(dashboard_overview))
        .route("/ai/insights", get(insights))
}

fn current_period(state: &AppState) -> Period {
    Period::of(OffsetDateTime::now_utc(), state.config.utc_offset)
}

#[instrument(skip(state))]
pub async fn dashboard_overview(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ApiResponse<DashboardOverview>>> {
    let doc = state.store.load().await?;
    let mine = owned_by(doc.transactions, user_id);
    let period = current_period(&state);
    debug!(%user_id, %period, transactions = mine.len(), "building dashboard");

    let overview = build_overview(&mine, &doc.categories, period, state.config.utc_offset);
    Ok(Json(ApiResponse::ok(overview)))
}

#[instrument(skip(state))]
pub async fn insights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ApiResponse<InsightsReport>>> {
    let doc = state.store.load().await?;
    let mine = owned_by(doc.transactions, user_id);
    let period = current_period(&state);

    let report = build_insights(&mine, &doc.categories, period, state.config.utc_offset);
    debug!(%user_id, %period, insights = report.insights.len(), "insights generated");
    Ok(Json(ApiResponse::ok(report)))
}
