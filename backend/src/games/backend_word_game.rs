use axum::extract::{Json, Query, State};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use shared::shared_word_game::{IssuedWordResponse, ProgressResponse, UpdateProgressRequest};
use tracing::{debug, info};

use crate::error::AppError;
use crate::services::progress_service::{issue_word, mint_user_id, record_outcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GetWordQuery {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

// === Endpoint Handlers ===

/// Issues the next word for a player, minting an id for first-time players.
async fn get_word(
    State(state): State<AppState>,
    Query(query): Query<GetWordQuery>,
) -> Result<Json<IssuedWordResponse>, AppError> {
    let user_id = match query.user_id.map(|id| id.trim().to_string()) {
        Some(id) if !id.is_empty() => id,
        _ => {
            let id = mint_user_id();
            info!("🌍 New player {}", id);
            id
        }
    };

    let issued = {
        let mut rng = rand::thread_rng();
        issue_word(state.store.as_ref(), &user_id, &mut rng, Utc::now())?
    };
    debug!("Issued bank word #{} to {}", issued.index, user_id);

    Ok(Json(IssuedWordResponse {
        user_id,
        word: issued.word,
        hints: issued.hints,
    }))
}

async fn update_progress(
    State(state): State<AppState>,
    Json(request): Json<UpdateProgressRequest>,
) -> Result<Json<ProgressResponse>, AppError> {
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("userId is required".to_string()));
    }

    let stats = record_outcome(state.store.as_ref(), user_id, request.won, request.hints_used)?;

    Ok(Json(ProgressResponse {
        current_streak: stats.streak,
        total_words_played: stats.total_played,
        total_hints_used: stats.hints_used,
    }))
}

// === Router Setup ===

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/get-word", get(get_word))
        .route("/update-progress", post(update_progress))
}
