use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::presentation::Reply;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Catalog rate limit exceeded")]
    RateLimited,

    #[error("Catalog request timed out")]
    Timeout,

    /// Every catalog query needed for a request failed
    #[error("Movie catalog temporarily unavailable")]
    CatalogUnavailable,

    /// The preference store could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Collapses backend failures raised inside a preference store
    pub fn into_storage(self) -> Self {
        match self {
            AppError::Database(e) => AppError::StorageUnavailable(e.to_string()),
            AppError::Cache(e) => AppError::StorageUnavailable(e.to_string()),
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::CatalogUnavailable | AppError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::HttpClient(_) | AppError::RateLimited | AppError::Timeout => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        }

        let body = Json(json!({
            "error": message,
            "reply": Reply::from_error(&self),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
