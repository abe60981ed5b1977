//! Typed errors and HTTP mapping.

use crate::model::FieldErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("duplicate path segment: {0}")]
    DuplicatePathSegment(String),
    #[error("invalid path segment: '{0}'")]
    InvalidPathSegment(String),
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Infrastructure failure raised by a service, decorator or collaborator.
/// Never interpreted by the handlers; surfaces as a 500.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("storage: {0}")]
    Storage(String),
    #[error("event handler: {0}")]
    Event(String),
    #[error("transaction: {0}")]
    Transaction(String),
    #[error("internal: {0}")]
    Internal(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("permission denied: {policy}")]
    Forbidden { policy: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("identifier mismatch: path '{path}', body '{body}'")]
    IdentifierMismatch { path: String, body: String },
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::IdentifierMismatch { .. } | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Forbidden { .. } => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::IdentifierMismatch { .. } => "identifier_mismatch",
            AppError::Validation(_) => "validation_error",
            AppError::Service(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let details = match &self {
            AppError::Validation(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        };
        let message = match &self {
            // Internal details stay in the log.
            AppError::Service(_) | AppError::Config(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
