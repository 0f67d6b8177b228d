//! Profile endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{count_to_db, Profile, UpdateProfileRequest, UpdateStarsRequest};
use crate::routes::auth::AuthenticatedPlayer;
use crate::services::validation;
use crate::AppState;

fn profile_not_found() -> ApiError {
    ApiError::NotFound("Profile not found".to_string())
}

/// GET /api/profile
pub async fn get(
    Extension(auth): Extension<AuthenticatedPlayer>,
    State(state): State<AppState>,
) -> Result<Json<Profile>> {
    let profile = state
        .db
        .get_profile(auth.player_id)
        .await?
        .ok_or_else(profile_not_found)?;

    Ok(Json(profile.to_api_profile()))
}

/// PUT /api/profile
pub async fn update(
    Extension(auth): Extension<AuthenticatedPlayer>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let name = payload
        .name
        .as_deref()
        .map(validation::player_name)
        .transpose()?;
    let avatar = payload
        .avatar
        .as_deref()
        .map(validation::avatar)
        .transpose()?;

    let profile = state
        .db
        .update_profile(auth.player_id, name.as_deref(), avatar.as_deref())
        .await?
        .ok_or_else(profile_not_found)?;

    Ok(Json(profile.to_api_profile()))
}

/// PUT /api/profile/stars
/// Stores the client's star total; the level must be the one the total implies.
pub async fn update_stars(
    Extension(auth): Extension<AuthenticatedPlayer>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateStarsRequest>,
) -> Result<Json<Profile>> {
    validation::stars(payload.total_stars, payload.level)?;

    let profile = state
        .db
        .update_stars(
            auth.player_id,
            count_to_db("total_stars", payload.total_stars)?,
            count_to_db("level", payload.level)?,
        )
        .await?
        .ok_or_else(profile_not_found)?;

    tracing::debug!(
        player_id = %auth.player_id,
        total_stars = payload.total_stars,
        "stars updated"
    );

    Ok(Json(profile.to_api_profile()))
}
