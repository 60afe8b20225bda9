use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        repo_types::Account,
        services::{authenticate, register_account, validate_registration},
    },
    error::{ApiError, ApiResult},
    response::ApiResponse,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn auth_response(keys: &JwtKeys, account: &Account) -> ApiResult<AuthResponse> {
    let pair = keys.sign_pair(account.id)?;
    Ok(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: PublicUser::from(account),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let Json(payload) = payload?;
    let registration = validate_registration(payload).map_err(|e| {
        warn!(code = e.code(), "registration rejected");
        e
    })?;

    let mut doc = state.store.load().await?;
    let account = register_account(&mut doc, registration, OffsetDateTime::now_utc())
        .inspect_err(|e| warn!(error = %e, "registration rejected"))?;
    state.store.save(&doc).await?;

    let body = auth_response(&JwtKeys::from_ref(&state), &account)?;
    info!(user_id = %account.id, email = %account.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Account created", body)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let Json(payload) = payload?;
    let mut doc = state.store.load().await?;
    let account = authenticate(&mut doc, &payload, OffsetDateTime::now_utc()).map_err(|e| {
        warn!(email = %payload.email, error = %e, "login rejected");
        e
    })?;
    state.store.save(&doc).await?;

    let body = auth_response(&JwtKeys::from_ref(&state), &account)?;
    info!(user_id = %account.id, email = %account.email, "user logged in");
    Ok(Json(ApiResponse::with_message("Welcome back", body)))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        ApiError::InvalidToken
    })?;

    let doc = state.store.load().await?;
    let account = Account::find_by_id(&doc, claims.sub).ok_or(ApiError::NotFound("account"))?;

    Ok(Json(ApiResponse::ok(auth_response(&keys, account)?)))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ApiResponse<PublicUser>>> {
    let doc = state.store.load().await?;
    let account = Account::find_by_id(&doc, user_id).ok_or_else(|| {
        warn!(%user_id, "token subject has no account");
        ApiError::NotFound("account")
    })?;
    Ok(Json(ApiResponse::ok(PublicUser::from(account))))
}
