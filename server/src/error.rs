//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Engine(#[from] summit_engine::Error),

    #[error("Authorization required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    ///
    /// Engine errors map by taxonomy: conflicts are 409, missing entities
    /// (including malformed opaque keys) are 404, invariant violations are
    /// server faults, everything else is caller input at fault.
    pub fn status(&self) -> StatusCode {
        use summit_engine::Error as Engine;
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Engine(e) => match e {
                Engine::Conflict(_) => StatusCode::CONFLICT,
                Engine::NotFound(_) => StatusCode::NOT_FOUND,
                Engine::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
                Engine::InvalidFilter(_)
                | Engine::MultipleInequalityFields
                | Engine::IncompleteFilter
                | Engine::MissingRequiredField(_)
                | Engine::InvalidValue { .. } => StatusCode::BAD_REQUEST,
            },
        }
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match &self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            ApiError::Engine(summit_engine::Error::InvariantViolation(msg)) => {
                tracing::error!("Invariant violation: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use summit_engine::Error as Engine;

    #[test]
    fn engine_errors_map_to_statuses() {
        let cases = [
            (Engine::Conflict("full".into()), StatusCode::CONFLICT),
            (Engine::NotFound("k".into()), StatusCode::NOT_FOUND),
            (
                Engine::MultipleInequalityFields,
                StatusCode::BAD_REQUEST,
            ),
            (Engine::IncompleteFilter, StatusCode::BAD_REQUEST),
            (
                Engine::InvalidFilter("field 'X'".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                Engine::MissingRequiredField("name".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                Engine::InvariantViolation("seats".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::Engine(err).status(), status);
        }
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("only the owner can update the conference".into()).status(),
            StatusCode::FORBIDDEN
        );
    }
}
