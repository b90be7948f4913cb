use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl From<RepositoryError> for UsecaseError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => UsecaseError::NotFound("Resource".to_string()),
            RepositoryError::Conflict => UsecaseError::Conflict("Duplicate record".to_string()),
            RepositoryError::DatabaseError(msg) => UsecaseError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for UsecaseError {
    fn from(e: anyhow::Error) -> Self {
        UsecaseError::Internal(e.to_string())
    }
}

impl IntoResponse for UsecaseError {
    fn into_response(self) -> axum::response::Response {
        // Duplicate bookmarks/emails surface as 400, matching the API the
        // frontend was built against.
        let status = match &self {
            UsecaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UsecaseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            UsecaseError::Forbidden(_) => StatusCode::FORBIDDEN,
            UsecaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UsecaseError::Conflict(_) => StatusCode::BAD_REQUEST,
            UsecaseError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UsecaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Provider and database detail stays in the server logs; clients
        // get a generic message.
        let body = match &self {
            UsecaseError::Upstream(_) => {
                tracing::error!(error = %self, "upstream provider error");
                "Upstream service error".to_string()
            }
            UsecaseError::Internal(_) => {
                tracing::error!(error = %self, "internal error");
                "Internal server error".to_string()
            }
            UsecaseError::NotFound(_) => {
                tracing::warn!(error = %self, "resource not found");
                self.to_string()
            }
            UsecaseError::Forbidden(_) => {
                tracing::warn!(error = %self, "forbidden");
                self.to_string()
            }
            _ => {
                tracing::debug!(error = %self);
                self.to_string()
            }
        };

        (status, body).into_response()
    }
}
