//! Diagnostic endpoints: client analytics events and guesses the
//! dictionary did not know.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use shared::shared_word_game::{InvalidWordRequest, LogEventRequest};

use crate::error::AppError;
use crate::AppState;

pub async fn log_event_handler(
    State(state): State<AppState>,
    Json(request): Json<LogEventRequest>,
) -> StatusCode {
    state.diagnostics.log_event(&request.event).await;
    StatusCode::OK
}

pub async fn log_invalid_word_handler(
    State(state): State<AppState>,
    Json(request): Json<InvalidWordRequest>,
) -> StatusCode {
    state.diagnostics.log_invalid_word(&request.word).await;
    StatusCode::OK
}

pub async fn invalid_words_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.diagnostics.invalid_words().await?))
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub fn create_diagnostics_router() -> Router<AppState> {
    Router::new()
        .route("/log-event", post(log_event_handler))
        .route("/log-invalid-word", post(log_invalid_word_handler))
        .route("/invalid-words", get(invalid_words_handler))
}
