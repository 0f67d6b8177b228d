//! Public leaderboard

use axum::extract::{Query, State};
use axum::Json;

use crate::error::Result;
use crate::models::{count_from_db, LeaderboardEntry, LeaderboardQuery, LeaderboardResponse};
use crate::services::validation;
use crate::AppState;

/// GET /api/leaderboard?limit=N
pub async fn top(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let limit = validation::leaderboard_limit(query.limit);
    let rows = state.db.get_leaderboard(limit).await?;

    let entries = rows
        .into_iter()
        .zip(1u32..)
        .map(|(row, rank)| LeaderboardEntry {
            rank,
            id: row.id,
            name: row.name,
            avatar: row.avatar,
            level: count_from_db(row.level),
            total_stars: count_from_db(row.total_stars),
        })
        .collect();

    Ok(Json(LeaderboardResponse { entries }))
}
