//! Handler error type and its JSON rendering.
//!
//! Every handler returns `ApiResult<T>`. Client mistakes keep their message and
//! machine-readable code; store and internal failures are logged and reported as
//! a generic `SERVER_ERROR`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::{
    auth::services::RegistrationError, storage::StoreError,
    transactions::validate::ValidationError,
};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error("malformed query string: {0}")]
    MalformedQuery(#[from] QueryRejection),

    #[error("access token required")]
    AuthRequired,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("email and password are required")]
    MissingCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailExists,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::Registration(_)
            | ApiError::MalformedBody(_)
            | ApiError::MalformedQuery(_)
            | ApiError::MissingCredentials => StatusCode::BAD_REQUEST,
            ApiError::AuthRequired | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::EmailExists => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.code(),
            ApiError::Registration(e) => e.code(),
            ApiError::MalformedBody(_) | ApiError::MalformedQuery(_) => "INVALID_REQUEST",
            ApiError::AuthRequired => "AUTH_REQUIRED",
            ApiError::InvalidToken => "INVALID_TOKEN",
            ApiError::MissingCredentials => "MISSING_CREDENTIALS",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::EmailExists => "EMAIL_EXISTS",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Store(_) | ApiError::Internal(_) => "SERVER_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Store(e) => {
                error!(error = %e, "document store failure");
                "Internal server error".to_string()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "unexpected error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            success: false,
            error: message,
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
