use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::services::progress_store::StoreError;
use crate::services::word_selector::SelectError;

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Selection(SelectError),
    BadRequest(String),
    Diagnostics(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{}", e),
            Self::Selection(e) => write!(f, "{}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Diagnostics(e) => write!(f, "Diagnostics log error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Selection(e) => Some(e),
            Self::Diagnostics(e) => Some(e),
            Self::BadRequest(_) => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<SelectError> for AppError {
    fn from(err: SelectError) -> Self {
        Self::Selection(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Diagnostics(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Progress store error".to_string()),
            Self::Selection(_) => (StatusCode::INTERNAL_SERVER_ERROR, "No words available".to_string()),
            Self::Diagnostics(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving invalid words".to_string()),
        };

        if status.is_server_error() {
            error!("{}", self);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
