//! Error responses.
//!
//! # Responsibilities
//! - Map note errors to HTTP status codes
//! - Render a JSON `{"message": ...}` body
//!
//! # Design Decisions
//! - Only "not found" is a client-visible failure (404)
//! - Everything else is a 500 with a generic message; details go to the log

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::NoteError;

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Handler error.
#[derive(Debug)]
pub struct ApiError(pub NoteError);

impl From<NoteError> for ApiError {
    fn from(err: NoteError) -> Self {
        ApiError(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            NoteError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            NoteError::NotFound => self.0.to_string(),
            err => {
                tracing::error!(error = %err, "Request failed");
                "Internal server error".to_string()
            }
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}
