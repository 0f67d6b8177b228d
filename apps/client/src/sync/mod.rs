//! Remote persistence: the `RemoteStore` contract and its HTTP client.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use speech_kids_core::{GameProgress, GameType, ProgressBook};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Not authenticated - please register first")]
    NotAuthenticated,

    #[error("Offline - no backend configured")]
    Offline,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Profile as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteProfile {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub total_stars: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    /// Player id, used to highlight the current player.
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub total_stars: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registration {
    pub player_id: Uuid,
    pub token: String,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    avatar: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateStarsRequest {
    total_stars: u32,
    level: u32,
}

#[derive(Debug, Serialize)]
struct AddAchievementRequest {
    achievement: String,
}

#[derive(Debug, Deserialize)]
struct ProgressResponse {
    progress: BTreeMap<GameType, GameProgress>,
}

#[derive(Debug, Deserialize)]
struct AchievementsResponse {
    achievements: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    entries: Vec<LeaderboardEntry>,
}

/// Remote persistence for one player. The player is implied by the store's
/// credentials, never passed per call.
pub trait RemoteStore: Send + Sync + 'static {
    /// `None` when nothing has been stored for any game yet.
    fn load_progress(&self) -> impl Future<Output = Result<Option<ProgressBook>, SyncError>> + Send;

    /// Replace the stored progress for one game.
    fn save_progress(
        &self,
        game: GameType,
        progress: GameProgress,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn load_achievements(&self) -> impl Future<Output = Result<Vec<String>, SyncError>> + Send;

    /// Idempotent.
    fn add_achievement(&self, badge: String) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn update_stars(
        &self,
        total_stars: u32,
        level: u32,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn fetch_leaderboard(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<LeaderboardEntry>, SyncError>> + Send;

    fn fetch_profile(&self) -> impl Future<Output = Result<RemoteProfile, SyncError>> + Send;

    fn update_profile(
        &self,
        name: Option<String>,
        avatar: Option<String>,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;
}

struct SyncClientInner {
    client: Client,
    backend_url: String,
    token: Option<String>,
}

/// HTTP implementation of `RemoteStore` against the speech-kids backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct SyncClient {
    inner: Arc<SyncClientInner>,
}

impl SyncClient {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self::build(backend_url.into(), None)
    }

    pub fn with_token(backend_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::build(backend_url.into(), Some(token.into()))
    }

    fn build(backend_url: String, token: Option<String>) -> Self {
        Self {
            inner: Arc::new(SyncClientInner {
                client: Client::new(),
                backend_url: backend_url.trim_end_matches('/').to_string(),
                token,
            }),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.inner.backend_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.token.is_some()
    }

    /// Create a player on the backend. The returned token is not stored anywhere.
    pub async fn register(&self, name: &str, avatar: &str) -> Result<Registration, SyncError> {
        let request = self
            .inner
            .client
            .post(self.url("/api/players/register"))
            .json(&RegisterRequest { name, avatar });

        read_json(send(request).await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.backend_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> Result<RequestBuilder, SyncError> {
        let token = self.inner.token.as_deref().ok_or(SyncError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }
}

async fn send(request: RequestBuilder) -> Result<Response, SyncError> {
    let resp = request
        .send()
        .await
        .map_err(|e| SyncError::Network(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        return Err(SyncError::Backend { status, message });
    }

    Ok(resp)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, SyncError> {
    resp.json().await.map_err(|e| SyncError::Parse(e.to_string()))
}

impl RemoteStore for SyncClient {
    async fn load_progress(&self) -> Result<Option<ProgressBook>, SyncError> {
        let request = self.authed(self.inner.client.get(self.url("/api/progress")))?;
        let response: ProgressResponse = read_json(send(request).await?).await?;

        if response.progress.is_empty() {
            return Ok(None);
        }
        Ok(Some(ProgressBook::from(response.progress)))
    }

    async fn save_progress(&self, game: GameType, progress: GameProgress) -> Result<(), SyncError> {
        let path = format!("/api/progress/{}", game.as_str());
        let request = self.authed(self.inner.client.put(self.url(&path)))?.json(&progress);
        send(request).await?;
        Ok(())
    }

    async fn load_achievements(&self) -> Result<Vec<String>, SyncError> {
        let request = self.authed(self.inner.client.get(self.url("/api/achievements")))?;
        let response: AchievementsResponse = read_json(send(request).await?).await?;
        Ok(response.achievements)
    }

    async fn add_achievement(&self, badge: String) -> Result<(), SyncError> {
        let request = self
            .authed(self.inner.client.post(self.url("/api/achievements")))?
            .json(&AddAchievementRequest { achievement: badge });
        send(request).await?;
        Ok(())
    }

    async fn update_stars(&self, total_stars: u32, level: u32) -> Result<(), SyncError> {
        let request = self
            .authed(self.inner.client.put(self.url("/api/profile/stars")))?
            .json(&UpdateStarsRequest { total_stars, level });
        send(request).await?;
        Ok(())
    }

    async fn fetch_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, SyncError> {
        let request = self
            .inner
            .client
            .get(self.url("/api/leaderboard"))
            .query(&[("limit", limit)]);
        let response: LeaderboardResponse = read_json(send(request).await?).await?;
        Ok(response.entries)
    }

    async fn fetch_profile(&self) -> Result<RemoteProfile, SyncError> {
        let request = self.authed(self.inner.client.get(self.url("/api/profile")))?;
        read_json(send(request).await?).await
    }

    async fn update_profile(
        &self,
        name: Option<String>,
        avatar: Option<String>,
    ) -> Result<(), SyncError> {
        let request = self
            .authed(self.inner.client.put(self.url("/api/profile")))?
            .json(&UpdateProfileRequest { name, avatar });
        send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_trimmed() {
        let client = SyncClient::new("http://localhost:3000/");
        assert_eq!(client.backend_url(), "http://localhost:3000");
        assert_eq!(client.url("/health"), "http://localhost:3000/health");
    }

    #[tokio::test]
    async fn unauthenticated_calls_fail_fast() {
        let client = SyncClient::new("http://127.0.0.1:9");
        assert!(!client.is_authenticated());
        assert!(matches!(
            client.load_achievements().await,
            Err(SyncError::NotAuthenticated)
        ));
        assert!(matches!(
            client.update_stars(10, 1).await,
            Err(SyncError::NotAuthenticated)
        ));
    }

    #[test]
    fn progress_response_ignores_stats() {
        let body = r#"{
            "progress": {"word-sound": {"games_played": 1, "correct_answers": 4, "total_answers": 5, "highest_streak": 3}},
            "stats": {"total_games_played": 1, "total_correct": 4, "total_answers": 5, "highest_streak": 3, "accuracy": 80}
        }"#;
        let response: ProgressResponse = serde_json::from_str(body).unwrap();
        let book = ProgressBook::from(response.progress);
        assert_eq!(book.get(GameType::WordSound).correct_answers, 4);
        assert!(book.get(GameType::RhymeTime).is_empty());
    }

    #[test]
    fn leaderboard_entries_carry_player_id() {
        let body = r#"{
            "entries": [
                {"rank": 1, "id": "6f1c2a4e-9b0d-4c55-8e7a-2d3b4c5d6e7f", "name": "Ava", "avatar": "🦊", "level": 3, "total_stars": 120}
            ]
        }"#;
        let response: LeaderboardResponse = serde_json::from_str(body).unwrap();
        let entry = &response.entries[0];
        assert_eq!(
            entry.id,
            Uuid::parse_str("6f1c2a4e-9b0d-4c55-8e7a-2d3b4c5d6e7f").unwrap()
        );
        assert_eq!(entry.total_stars, 120);
    }

    #[test]
    fn profile_update_omits_missing_fields() {
        let body = serde_json::to_value(UpdateProfileRequest {
            name: Some("Ava".to_string()),
            avatar: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "name": "Ava" }));
    }
}
