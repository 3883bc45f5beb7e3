//! Error types for the conversion API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rtl_docx_engine::ConvertError;
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Conversion timeout after {0}ms")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::ConversionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ServerError::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            ServerError::InvalidRequest(_) => "INVALID_REQUEST",
            ServerError::ConversionFailed(_) => "CONVERSION_FAILED",
            ServerError::Timeout(_) => "TIMEOUT",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.to_string(),
            code: self.code(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<ConvertError> for ServerError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::TemplateNotFound { id, .. } => ServerError::TemplateNotFound(id),
            ConvertError::Timeout(ms) => ServerError::Timeout(ms),
            ConvertError::ConversionError(stderr) => ServerError::ConversionFailed(stderr),
            ConvertError::InvalidInput(msg)
            | ConvertError::InvalidArgument(msg)
            | ConvertError::PathSecurityViolation(msg) => ServerError::InvalidRequest(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}
