//! Achievement endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{AchievementsResponse, AddAchievementRequest, AddAchievementResponse};
use crate::routes::auth::AuthenticatedPlayer;
use crate::services::validation;
use crate::AppState;

/// GET /api/achievements
/// Badges in the order they were earned.
pub async fn list(
    Extension(auth): Extension<AuthenticatedPlayer>,
    State(state): State<AppState>,
) -> Result<Json<AchievementsResponse>> {
    let achievements = state
        .db
        .get_achievements(auth.player_id)
        .await?
        .into_iter()
        .map(|row| row.achievement)
        .collect();

    Ok(Json(AchievementsResponse { achievements }))
}

/// POST /api/achievements
/// Idempotent: re-sending a stored badge succeeds with `inserted: false`.
pub async fn add(
    Extension(auth): Extension<AuthenticatedPlayer>,
    State(state): State<AppState>,
    Json(payload): Json<AddAchievementRequest>,
) -> Result<Json<AddAchievementResponse>> {
    let achievement = validation::achievement(&payload.achievement)?;
    let inserted = state
        .db
        .add_achievement(auth.player_id, &achievement)
        .await?;

    if inserted {
        tracing::info!(player_id = %auth.player_id, %achievement, "achievement earned");
    }

    Ok(Json(AddAchievementResponse {
        achievement,
        inserted,
    }))
}
