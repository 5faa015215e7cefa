//! Error types for seminar-console

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seminar_common::response::Envelope;
use thiserror::Error;

use crate::workflow::WorkflowError;

/// API error type
///
/// Every variant maps to an HTTP status and renders as the standard
/// `{code, data, error}` envelope. No internal detail beyond the message
/// reaches the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request fields (400)
    #[error("{0}")]
    InvalidArgument(String),

    /// Illegal state change (400)
    #[error("{0}")]
    InvalidTransition(String),

    /// Resource absent or not visible to the caller (404)
    #[error("{0}")]
    NotFound(String),

    /// Expired or missing session (401)
    #[error("{0}")]
    Unauthorized(String),

    /// A required side-effect operation failed (400)
    #[error("{0}")]
    DependencyFailure(String),

    /// Message broker unreachable or rejecting (500)
    #[error("{0}")]
    DispatchFailure(String),

    /// Identity provider or face-compare service rejected the request (400)
    #[error("{0}")]
    UpstreamRejected(String),

    /// Identity provider or face-compare service unreachable / timed out (502)
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Shared portal error
    #[error(transparent)]
    Common(#[from] seminar_common::Error),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_)
            | ApiError::InvalidTransition(_)
            | ApiError::DependencyFailure(_)
            | ApiError::UpstreamRejected(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::DispatchFailure(_)
            | ApiError::Database(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Common(e) => match e {
                seminar_common::Error::NotFound(_) => StatusCode::NOT_FOUND,
                seminar_common::Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
                seminar_common::Error::Upstream(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<crate::services::IdentityError> for ApiError {
    fn from(e: crate::services::IdentityError) -> Self {
        use crate::services::IdentityError;
        match e {
            IdentityError::Timeout(_) | IdentityError::Transport(_) => {
                ApiError::UpstreamUnavailable(e.to_string())
            }
            IdentityError::Rejected(_, _) | IdentityError::Parse(_) => {
                ApiError::UpstreamRejected(e.to_string())
            }
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        match e {
            WorkflowError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            WorkflowError::InvalidTransition { from, to } => {
                ApiError::InvalidTransition(format!("illegal transition {} --> {}", from, to))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!("{}", message);
        }

        let body = Json(Envelope::failure(status.as_u16(), message));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
