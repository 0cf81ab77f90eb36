use crate::services::{file_service::FileError, movie_service::MovieError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error. The detail is logged and
    /// replaced with a generic message.
    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!(error = %msg, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred")
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

impl From<FileError> for AppError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound(_) => AppError::not_found(err.to_string()),
            FileError::AlreadyExists(_) => AppError::conflict(err.to_string()),
            FileError::InvalidFileName(_) => AppError::bad_request(err.to_string()),
            FileError::Io(io) => AppError::internal(io.to_string()),
        }
    }
}

impl From<MovieError> for AppError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::NotFound(_) => AppError::not_found(err.to_string()),
            MovieError::FileAlreadyExists(_) => AppError::conflict(err.to_string()),
            MovieError::EmptyPayload
            | MovieError::InvalidSortField(_)
            | MovieError::InvalidPageRequest
            | MovieError::Validation(_) => AppError::bad_request(err.to_string()),
            MovieError::File(file) => file.into(),
            MovieError::Sqlx(db) => AppError::internal(db.to_string()),
        }
    }
}
