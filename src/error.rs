use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to save message: {0}")]
    MessageNotSaved(StoreError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::MessageNotSaved(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Store faults are logged here and replaced by a fixed message.
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::InvalidIdentifier(raw) => format!("Invalid id: {raw}"),
            ApiError::InvalidBody(reason) => format!("Invalid request body: {reason}"),
            ApiError::Store(e) => {
                log::error!("Database error: {}", e);
                "Internal Server Error".to_string()
            }
            ApiError::MessageNotSaved(e) => {
                log::error!("Error saving message: {}", e);
                "Failed to save message".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { message })
    }
}
