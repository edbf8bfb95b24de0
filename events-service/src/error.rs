use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Application error taxonomy.
///
/// The token-endpoint variants carry OAuth-style error codes in the response
/// body. `InvalidClient` and `InvalidGrant` deliberately share the same body
/// shape and description so a caller cannot tell which factor failed; only
/// the error code differs. A missing account on login is folded into
/// `InvalidGrant` rather than surfaced as `NotFound`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid client: {0}")]
    InvalidClient(anyhow::Error),

    #[error("invalid grant: {0}")]
    InvalidGrant(anyhow::Error),

    #[error("invalid scope: {0}")]
    InvalidScope(anyhow::Error),

    #[error("unauthenticated: {0}")]
    Unauthenticated(anyhow::Error),

    #[error("forbidden: {0}")]
    Forbidden(anyhow::Error),

    #[error("not found: {0}")]
    NotFound(anyhow::Error),

    #[error("conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

/// Error body for token-endpoint failures (RFC 6749 shape).
#[derive(Debug, Serialize, ToSchema)]
pub struct OAuthErrorResponse {
    #[schema(example = "invalid_grant")]
    pub error: String,
    pub error_description: String,
}

/// Error body for all other failures.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Token endpoint errors: identical body shape, distinct code.
            // The description never reveals which factor failed.
            AppError::InvalidClient(err) => {
                tracing::warn!(error = %err, "Client authentication failed");
                oauth_error(StatusCode::UNAUTHORIZED, "invalid_client")
            }
            AppError::InvalidGrant(err) => {
                tracing::warn!(error = %err, "Grant rejected");
                oauth_error(StatusCode::BAD_REQUEST, "invalid_grant")
            }
            AppError::InvalidScope(err) => {
                tracing::warn!(error = %err, "Scope rejected");
                oauth_error(StatusCode::BAD_REQUEST, "invalid_scope")
            }
            AppError::Unauthenticated(err) => {
                plain_error(StatusCode::UNAUTHORIZED, err.to_string(), None)
            }
            AppError::Forbidden(err) => plain_error(StatusCode::FORBIDDEN, err.to_string(), None),
            AppError::NotFound(err) => plain_error(StatusCode::NOT_FOUND, err.to_string(), None),
            AppError::Conflict(err) => plain_error(StatusCode::CONFLICT, err.to_string(), None),
            AppError::ConfigError(err) => plain_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
            ),
            // Invariant violations (token collision, store corruption) are
            // fatal to the request, never to the process.
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                plain_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        }
    }
}

fn oauth_error(status: StatusCode, code: &str) -> Response {
    (
        status,
        Json(OAuthErrorResponse {
            error: code.to_string(),
            error_description: "Authentication failed".to_string(),
        }),
    )
        .into_response()
}

fn plain_error(status: StatusCode, error: String, details: Option<String>) -> Response {
    (status, Json(ErrorResponse { error, details })).into_response()
}
