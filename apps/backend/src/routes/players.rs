//! Player registration

use axum::{extract::State, Json};
use speech_kids_core::DEFAULT_AVATAR;

use crate::error::Result;
use crate::models::{RegisterRequest, RegisterResponse};
use crate::services::{tokens, validation};
use crate::AppState;

/// POST /api/players/register
/// Creates a player and its profile, returning the only copy of the token.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let name = validation::player_name(&payload.name)?;
    let avatar = validation::avatar(payload.avatar.as_deref().unwrap_or(DEFAULT_AVATAR))?;

    let token = tokens::generate_token();
    let (player, _profile) = state
        .db
        .create_player(&tokens::hash_token(&token), &name, &avatar)
        .await?;

    tracing::info!(player_id = %player.id, "registered new player");

    Ok(Json(RegisterResponse {
        player_id: player.id,
        token,
    }))
}
