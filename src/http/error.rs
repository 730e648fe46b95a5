use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::error::Error;
use thiserror::Error;
use tracing::error;

use crate::gemini::GeminiError;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Rate limit exceeded")]
    TooManyRequests,
    #[error("{0}")]
    Internal(String),
    #[error("Database error: `{0}`")]
    Database(#[from] sqlx::Error),
    #[error("IO error: `{0}`")]
    IO(#[from] std::io::Error),
    #[error("Image model error: `{0}`")]
    Upstream(#[from] GeminiError),
}

impl HttpError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            HttpError::Internal(_)
            | HttpError::Database(_)
            | HttpError::IO(_)
            | HttpError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the caller sees. Infrastructure failures stay generic, the
    /// specifics are only logged.
    fn public_message(&self) -> String {
        match self {
            HttpError::BadRequest(message) | HttpError::Internal(message) => message.clone(),
            HttpError::TooManyRequests => "Rate limit exceeded".to_string(),
            HttpError::Upstream(_) => "Failed to process image".to_string(),
            HttpError::Database(_) | HttpError::IO(_) => "Something went wrong!".to_string(),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for HttpError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        HttpError::BadRequest(format!("Invalid multipart payload: {e}"))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            if let Some(source) = self.source() {
                error!("Error: {self}, caused by: {source}");
            } else {
                error!("Error: {self}");
            }
        }

        let mut body = json!({
            "error": self.public_message(),
            "success": false,
            "status": status.as_u16(),
        });

        // Matches the original's development-only error detail
        if cfg!(debug_assertions) && status == StatusCode::INTERNAL_SERVER_ERROR {
            body["details"] = json!(self.to_string());
        }

        (status, Json(body)).into_response()
    }
}

pub type HttpResult<T = Response> = Result<T, HttpError>;
