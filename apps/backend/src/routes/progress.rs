//! Per-game progress endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::{
    GameProgress, GameType, OverallStats, ProgressBook, ProgressResponse, SaveProgressResponse,
};
use crate::routes::auth::AuthenticatedPlayer;
use crate::services::validation;
use crate::AppState;

/// GET /api/progress
/// Only games with a stored row appear in `progress`.
pub async fn list(
    Extension(auth): Extension<AuthenticatedPlayer>,
    State(state): State<AppState>,
) -> Result<Json<ProgressResponse>> {
    let rows = state.db.get_progress(auth.player_id).await?;

    let progress = rows
        .iter()
        .map(|row| row.to_core())
        .collect::<Result<BTreeMap<GameType, GameProgress>>>()?;
    let stats = OverallStats::from_progress(&ProgressBook::from(progress.clone()));

    Ok(Json(ProgressResponse { progress, stats }))
}

/// PUT /api/progress/:game_type
/// Replaces the stored counters for one game.
pub async fn save(
    Extension(auth): Extension<AuthenticatedPlayer>,
    State(state): State<AppState>,
    Path(game_type): Path<String>,
    Json(payload): Json<GameProgress>,
) -> Result<Json<SaveProgressResponse>> {
    let game = game_type.parse::<GameType>()?;
    validation::progress(&payload)?;

    let row = state
        .db
        .upsert_progress(auth.player_id, game, &payload)
        .await?;
    let (game_type, progress) = row.to_core()?;

    Ok(Json(SaveProgressResponse {
        game_type,
        progress,
    }))
}
