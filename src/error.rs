use crate::lineup::LineupError;
use crate::store::StoreError;
use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Lineup(#[from] LineupError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("storage task was cancelled")]
    Blocking(#[from] BlockingError),
}

impl AppError {
    pub fn missing(what: &str) -> AppError {
        AppError::Validation(format!("{what} required"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Lineup(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}
