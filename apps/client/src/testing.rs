//! In-process `RemoteStore` fake that records every call.

use std::sync::Mutex;
use std::time::Duration;

use speech_kids_core::{GameProgress, GameType, ProgressBook};
use uuid::Uuid;

use crate::sync::{LeaderboardEntry, RemoteProfile, RemoteStore, SyncError};
use crate::worker::SyncCommand;

pub struct RecordingStore {
    pub profile: RemoteProfile,
    pub progress: Option<ProgressBook>,
    pub achievements: Vec<String>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub fail: bool,
    pub delay: Option<Duration>,
    calls: Mutex<Vec<SyncCommand>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            profile: RemoteProfile {
                id: Uuid::nil(),
                name: "Remote Ruby".to_string(),
                avatar: "🦄".to_string(),
                level: 3,
                total_stars: 110,
            },
            progress: None,
            achievements: Vec::new(),
            leaderboard: Vec::new(),
            fail: false,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_progress(mut self, progress: ProgressBook) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_achievements(mut self, achievements: &[&str]) -> Self {
        self.achievements = achievements.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<SyncCommand> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond<T>(&self, value: T) -> Result<T, SyncError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(SyncError::Network("connection refused".to_string()));
        }
        Ok(value)
    }

    async fn record(&self, command: SyncCommand) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(command);
        self.respond(()).await
    }
}

impl RemoteStore for RecordingStore {
    async fn load_progress(&self) -> Result<Option<ProgressBook>, SyncError> {
        self.respond(self.progress).await
    }

    async fn save_progress(&self, game: GameType, progress: GameProgress) -> Result<(), SyncError> {
        self.record(SyncCommand::SaveProgress { game, progress }).await
    }

    async fn load_achievements(&self) -> Result<Vec<String>, SyncError> {
        self.respond(self.achievements.clone()).await
    }

    async fn add_achievement(&self, badge: String) -> Result<(), SyncError> {
        self.record(SyncCommand::AddAchievement(badge)).await
    }

    async fn update_stars(&self, total_stars: u32, level: u32) -> Result<(), SyncError> {
        self.record(SyncCommand::UpdateStars { total_stars, level }).await
    }

    async fn fetch_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, SyncError> {
        let entries = self.leaderboard.iter().take(limit as usize).cloned().collect();
        self.respond(entries).await
    }

    async fn fetch_profile(&self) -> Result<RemoteProfile, SyncError> {
        self.respond(self.profile.clone()).await
    }

    async fn update_profile(
        &self,
        name: Option<String>,
        avatar: Option<String>,
    ) -> Result<(), SyncError> {
        self.record(SyncCommand::UpdateProfile { name, avatar }).await
    }
}
