//! Database models and API types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub use speech_kids_core::{GameProgress, GameType, OverallStats, ProgressBook};

use crate::error::{ApiError, Result};

// === Database Entity Types ===

/// Registered player. Only the hash of the bearer token is kept.
#[derive(Debug, Clone, FromRow)]
pub struct Player {
    pub id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbProfile {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub level: i32,
    pub total_stars: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbProfile {
    pub fn to_api_profile(&self) -> Profile {
        Profile {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            level: count_from_db(self.level),
            total_stars: count_from_db(self.total_stars),
            updated_at: self.updated_at,
        }
    }
}

/// One row per (player, game).
#[derive(Debug, Clone, FromRow)]
pub struct DbGameProgress {
    pub player_id: Uuid,
    pub game_type: String,
    pub games_played: i32,
    pub correct_answers: i32,
    pub total_answers: i32,
    pub highest_streak: i32,
    pub updated_at: DateTime<Utc>,
}

impl DbGameProgress {
    pub fn to_core(&self) -> Result<(GameType, GameProgress)> {
        let game = self.game_type.parse::<GameType>().map_err(|_| {
            ApiError::Internal(format!("stored game type '{}' is unknown", self.game_type))
        })?;

        Ok((
            game,
            GameProgress {
                games_played: count_from_db(self.games_played),
                correct_answers: count_from_db(self.correct_answers),
                total_answers: count_from_db(self.total_answers),
                highest_streak: count_from_db(self.highest_streak),
            },
        ))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbAchievement {
    pub achievement: String,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbLeaderboardEntry {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub level: i32,
    pub total_stars: i32,
}

/// Counters are non-negative in the schema; a negative value reads as zero.
pub fn count_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Convert a counter for storage, rejecting values the column cannot hold.
pub fn count_to_db(field: &str, value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| ApiError::BadRequest(format!("{} is too large", field)))
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub player_id: Uuid,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub total_stars: u32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateStarsRequest {
    pub total_stars: u32,
    pub level: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub progress: BTreeMap<GameType, GameProgress>,
    pub stats: OverallStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveProgressResponse {
    pub game_type: GameType,
    pub progress: GameProgress,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddAchievementRequest {
    pub achievement: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddAchievementResponse {
    pub achievement: String,
    pub inserted: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub total_stars: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}
