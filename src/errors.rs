// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Empty selections, partial coverage and exhausted searches all degrade to
// data, not errors; only a missing or broken catalog surfaces here.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Catalog unavailable: {0}")]
    DataUnavailable(String),

    #[error("Import failed: {0}")]
    ImportError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::DataUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Catalog unavailable".to_string(),
            ),
            AppError::ImportError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Import failed".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

// Helper conversion functions
impl AppError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        AppError::DataUnavailable(msg.into())
    }

    pub fn import(msg: impl Into<String>) -> Self {
        AppError::ImportError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
