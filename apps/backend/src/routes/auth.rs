//! Bearer token authentication

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::services::tokens::hash_token;
use crate::AppState;

/// Player resolved from the request's token, stored in request extensions.
#[derive(Clone, Debug)]
pub struct AuthenticatedPlayer {
    pub player_id: Uuid,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?;

    let player = state
        .db
        .get_player_by_token_hash(&hash_token(token))
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid player token".to_string()))?;

    state.db.update_last_seen(player.id).await?;

    request.extensions_mut().insert(AuthenticatedPlayer {
        player_id: player.id,
    });

    Ok(next.run(request).await)
}
