use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Coarse classification of a failure, used by retry policies and the notice boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Network,
    Provider,
    NotFound,
    Configuration,
    InvalidInput,
    Internal,
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Language model error: {0}")]
    Model(String),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::Timeout(_) => FailureKind::Timeout,
            AppError::HttpClient(e) if e.is_timeout() => FailureKind::Timeout,
            AppError::HttpClient(e) if e.is_status() || e.is_decode() => FailureKind::Provider,
            AppError::HttpClient(_) => FailureKind::Network,
            AppError::NotFound(_) => FailureKind::NotFound,
            AppError::InvalidInput(_) => FailureKind::InvalidInput,
            AppError::ExternalApi(_) | AppError::Model(_) => FailureKind::Provider,
            AppError::MissingConfiguration(_) => FailureKind::Configuration,
            AppError::Internal(_) => FailureKind::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, self.to_string()),
            AppError::ExternalApi(msg) | AppError::Model(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::MissingConfiguration(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
