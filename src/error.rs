use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::database::StoreError;
use crate::handlers::shared::ErrorResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request body: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    StorageOperation(String),

    #[error("Error encoding response: {0}")]
    Encoding(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::StorageUnavailable(_) => "storage_unavailable",
            AppError::StorageOperation(_) => "storage_error",
            AppError::Encoding(_) => "encoding_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StorageOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        if status_code.is_server_error() {
            log::error!(
                "Request failed with status {}: {}",
                status_code,
                error_message
            );
        } else {
            log::debug!(
                "Request rejected with status {}: {}",
                status_code,
                error_message
            );
        }

        HttpResponse::build(status_code).json(ErrorResponse::new(self.kind(), &error_message))
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable(_) => AppError::StorageUnavailable(error.to_string()),
            StoreError::Duplicate { .. } => AppError::Conflict(error.to_string()),
            StoreError::Timeout(_) | StoreError::Operation(_) | StoreError::Serialization(_) => {
                AppError::StorageOperation(error.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Encoding(error.to_string())
    }
}
