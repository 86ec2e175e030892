use crate::store::StoreError;
use crate::validation::Rejection;
use ntex::http::StatusCode;
use ntex::web::{HttpResponse, WebResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Status and the message safe to show a client. Storage details stay in the log.
    pub fn status_and_message(&self) -> (StatusCode, &str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Invalid password"),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Storage error"),
        }
    }
}

impl WebResponseError for AppError {
    fn error_response(&self, _: &ntex::web::HttpRequest) -> HttpResponse {
        let (status, message) = self.status_and_message();
        HttpResponse::build(status).json(&serde_json::json!({ "error": message }))
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Unauthorized => AppError::Unauthorized,
            other => AppError::BadRequest(other.to_string()),
        }
    }
}
