//! Game session: the client's single owner of game state.
//!
//! Every mutation goes through the scoring engine first, is then saved to
//! the local database, and finally enqueued for the remote store. Local save
//! and remote sync failures are logged; they never undo or fail a move that
//! the engine already accepted.

use std::sync::Arc;
use std::time::Duration;

use speech_kids_core::achievements::{badge_for_answer, badge_for_completed_session};
use speech_kids_core::{
    AnswerOutcome, GameError, GameType, MatchResult, OverallStats, PlayerProfile, ProgressBook,
    ScoringEngine, SessionSummary, TranscriptGrader,
};
use tokio::task::JoinHandle;

use crate::db::{DbError, GameStateRepository, SqliteRepository, StoredGameState};
use crate::sync::{LeaderboardEntry, RemoteProfile, RemoteStore, SyncClient, SyncError};
use crate::worker::{spawn_sync_worker, SyncCommand, SyncQueue};

/// Result of one graded answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEvent {
    pub outcome: AnswerOutcome,
    /// Badge earned by this answer, if it was not held already.
    pub new_achievement: Option<&'static str>,
}

/// Result of finishing a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEnd {
    pub summary: SessionSummary,
    pub new_achievement: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No remote store configured.
    Offline,
    /// Remote state merged; `adopted_progress` when remote stars and progress
    /// replaced a fresh local state.
    Merged { adopted_progress: bool },
    Failed,
    TimedOut,
}

struct RemoteSnapshot {
    profile: RemoteProfile,
    achievements: Vec<String>,
    progress: Option<ProgressBook>,
}

pub struct GameSession<R: RemoteStore = SyncClient> {
    engine: ScoringEngine,
    grader: TranscriptGrader,
    repository: SqliteRepository,
    remote: Option<Arc<R>>,
    queue: Option<SyncQueue>,
    worker: Option<JoinHandle<()>>,
    bootstrap_timeout: Duration,
}

impl GameSession<SyncClient> {
    /// Session with local persistence only.
    pub fn offline(repository: SqliteRepository) -> Result<Self, DbError> {
        Self::new(repository, None, Duration::ZERO)
    }
}

impl<R: RemoteStore> GameSession<R> {
    /// Restore the saved game and, with a remote store, start the sync
    /// worker. Must run inside a tokio runtime when `remote` is set.
    ///
    /// A saved game that cannot be read is an error; it is never replaced
    /// with defaults.
    pub fn new(
        repository: SqliteRepository,
        remote: Option<Arc<R>>,
        bootstrap_timeout: Duration,
    ) -> Result<Self, DbError> {
        let engine = match repository.load_game_state()? {
            Some(state) => ScoringEngine::restore(state.player, state.progress),
            None => ScoringEngine::new(),
        };

        let (queue, worker) = match &remote {
            Some(store) => {
                let (queue, worker) = spawn_sync_worker(Arc::clone(store));
                (Some(queue), Some(worker))
            }
            None => (None, None),
        };

        Ok(Self {
            engine,
            grader: TranscriptGrader::new(),
            repository,
            remote,
            queue,
            worker,
            bootstrap_timeout,
        })
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn player(&self) -> &PlayerProfile {
        self.engine.player()
    }

    pub fn progress(&self) -> &ProgressBook {
        self.engine.progress()
    }

    pub fn overall_stats(&self) -> OverallStats {
        OverallStats::from_progress(self.engine.progress())
    }

    pub fn is_online(&self) -> bool {
        self.remote.is_some()
    }

    // === Gameplay ===

    pub fn start_game(&mut self, game: GameType) {
        self.engine.start_game(game);
        self.grader.reset_transcript();
        tracing::debug!(%game, "game started");
    }

    /// Arm the grader for a new listening attempt.
    pub fn start_listening(&mut self) {
        self.grader.start_listening();
    }

    /// Move on to the next word; any pending transcript is discarded.
    pub fn next_word(&mut self) {
        self.grader.reset_transcript();
    }

    pub fn record_answer(
        &mut self,
        game: GameType,
        correct: bool,
    ) -> Result<AnswerEvent, GameError> {
        let outcome = self.engine.record_answer(game, correct)?;

        let new_achievement =
            badge_for_answer(&outcome).filter(|badge| self.engine.add_achievement(*badge));

        self.persist();
        self.enqueue(SyncCommand::SaveProgress {
            game,
            progress: outcome.progress,
        });
        if outcome.stars_earned > 0 {
            self.enqueue(SyncCommand::UpdateStars {
                total_stars: outcome.total_stars,
                level: outcome.level,
            });
        }
        if let Some(badge) = new_achievement {
            tracing::info!(badge, "achievement earned");
            self.enqueue(SyncCommand::AddAchievement(badge.to_string()));
        }

        Ok(AnswerEvent {
            outcome,
            new_achievement,
        })
    }

    /// Grade a speech transcript and record it as the answer for `game`.
    ///
    /// Only the first non-empty transcript of a listening cycle counts;
    /// later ones return `Ok(None)` without touching the score.
    pub fn submit_transcript(
        &mut self,
        game: GameType,
        transcript: &str,
        target: &str,
    ) -> Result<Option<(MatchResult, AnswerEvent)>, GameError> {
        match self.engine.active_session() {
            Some(session) if session.game == game => {}
            Some(session) => {
                return Err(GameError::GameMismatch {
                    active: session.game,
                    requested: game,
                })
            }
            None => return Err(GameError::NoActiveGame),
        }

        let Some(result) = self.grader.submit(transcript, target) else {
            return Ok(None);
        };
        let event = self.record_answer(game, result.is_correct)?;
        Ok(Some((result, event)))
    }

    /// Complete the game, awarding its completion badge if earned.
    pub fn finish_game(&mut self, game: GameType) -> Result<GameEnd, GameError> {
        let summary = self.close_game(game)?;

        let new_achievement = badge_for_completed_session(&summary)
            .filter(|badge| self.engine.add_achievement(*badge));
        if let Some(badge) = new_achievement {
            self.persist();
            tracing::info!(badge, "achievement earned");
            self.enqueue(SyncCommand::AddAchievement(badge.to_string()));
        }

        Ok(GameEnd {
            summary,
            new_achievement,
        })
    }

    /// Leave the game early. It still counts as played; no completion badge.
    pub fn exit_game(&mut self, game: GameType) -> Result<SessionSummary, GameError> {
        self.close_game(game)
    }

    fn close_game(&mut self, game: GameType) -> Result<SessionSummary, GameError> {
        let summary = self.engine.end_game(game)?;
        self.grader.reset_transcript();

        self.persist();
        self.enqueue(SyncCommand::SaveProgress {
            game,
            progress: summary.progress,
        });

        Ok(summary)
    }

    // === Profile ===

    pub fn add_stars(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.engine.add_stars(amount);
        self.persist();
        self.enqueue_stars();
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.engine.set_player_name(name.clone());
        self.persist();
        self.enqueue(SyncCommand::UpdateProfile {
            name: Some(name),
            avatar: None,
        });
    }

    pub fn set_player_avatar(&mut self, avatar: impl Into<String>) {
        let avatar = avatar.into();
        self.engine.set_player_avatar(avatar.clone());
        self.persist();
        self.enqueue(SyncCommand::UpdateProfile {
            name: None,
            avatar: Some(avatar),
        });
    }

    /// Restore every local default. Remote data is left as it is.
    pub fn reset_progress(&mut self) {
        self.engine.reset_progress();
        self.grader.reset_transcript();
        self.persist();
        tracing::info!("local progress reset");
    }

    // === Remote ===

    pub async fn fetch_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, SyncError> {
        let store = self.remote.as_ref().ok_or(SyncError::Offline)?;
        store.fetch_leaderboard(limit).await
    }

    /// Pull the remote profile, achievements and progress, bounded by the
    /// configured timeout, and merge them into local state.
    pub async fn bootstrap(&mut self) -> BootstrapOutcome {
        let Some(store) = self.remote.clone() else {
            return BootstrapOutcome::Offline;
        };

        match tokio::time::timeout(self.bootstrap_timeout, fetch_snapshot(store.as_ref())).await {
            Ok(Ok(snapshot)) => {
                let adopted_progress = self.merge_remote(snapshot);
                self.persist();
                tracing::info!(adopted_progress, "remote state merged");
                BootstrapOutcome::Merged { adopted_progress }
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "could not load remote state; continuing offline");
                BootstrapOutcome::Failed
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.bootstrap_timeout.as_millis() as u64,
                    "timed out loading remote state; continuing offline"
                );
                BootstrapOutcome::TimedOut
            }
        }
    }

    /// Remote name, avatar and achievements always win or merge; remote stars
    /// and progress replace local ones only while local state is untouched.
    fn merge_remote(&mut self, snapshot: RemoteSnapshot) -> bool {
        let local = self.engine.player();
        let pristine = self.engine.active_session().is_none()
            && self.engine.progress().is_empty()
            && local.total_stars() == 0;

        let remote_badges = snapshot.achievements;
        let local_only: Vec<String> = local
            .achievements()
            .iter()
            .filter(|badge| !remote_badges.contains(*badge))
            .cloned()
            .collect();

        let name = if snapshot.profile.name.trim().is_empty() {
            local.name().to_string()
        } else {
            snapshot.profile.name
        };
        let avatar = snapshot.profile.avatar;

        if pristine {
            let achievements = local.achievements().iter().cloned().chain(remote_badges);
            let player =
                PlayerProfile::restore(name, avatar, snapshot.profile.total_stars, achievements);
            self.engine = ScoringEngine::restore(player, snapshot.progress.unwrap_or_default());
        } else {
            self.engine.set_player_name(name);
            self.engine.set_player_avatar(avatar);
            for badge in remote_badges {
                self.engine.add_achievement(badge);
            }
            if self.engine.player().total_stars() != snapshot.profile.total_stars {
                self.enqueue_stars();
            }
        }

        for badge in local_only {
            self.enqueue(SyncCommand::AddAchievement(badge));
        }

        pristine
    }

    /// Stop the sync worker after it has drained every queued command.
    pub async fn shutdown(mut self) {
        self.queue = None;
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                tracing::warn!(error = %e, "sync worker panicked");
            }
        }
    }

    fn persist(&self) {
        let state = StoredGameState {
            player: self.engine.player().clone(),
            progress: *self.engine.progress(),
        };
        if let Err(e) = self.repository.save_game_state(&state) {
            tracing::warn!(error = %e, "failed to save game locally");
        }
    }

    fn enqueue(&self, command: SyncCommand) {
        if let Some(queue) = &self.queue {
            queue.push(command);
        }
    }

    fn enqueue_stars(&self) {
        let player = self.engine.player();
        self.enqueue(SyncCommand::UpdateStars {
            total_stars: player.total_stars(),
            level: player.level(),
        });
    }
}

async fn fetch_snapshot<R: RemoteStore>(store: &R) -> Result<RemoteSnapshot, SyncError> {
    let (profile, achievements, progress) = tokio::try_join!(
        store.fetch_profile(),
        store.load_achievements(),
        store.load_progress()
    )?;

    Ok(RemoteSnapshot {
        profile,
        achievements,
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingStore;
    use pretty_assertions::assert_eq;
    use speech_kids_core::GameProgress;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn online(store: RecordingStore) -> (GameSession<RecordingStore>, Arc<RecordingStore>) {
        let store = Arc::new(store);
        let repo = SqliteRepository::open_in_memory().unwrap();
        (GameSession::new(repo, Some(Arc::clone(&store)), TIMEOUT).unwrap(), store)
    }

    fn offline_session() -> GameSession {
        GameSession::offline(SqliteRepository::open_in_memory().unwrap()).unwrap()
    }

    fn count(calls: &[SyncCommand], pred: impl Fn(&SyncCommand) -> bool) -> usize {
        calls.iter().filter(|c| pred(c)).count()
    }

    #[tokio::test]
    async fn answers_are_saved_locally_and_synced() {
        let (mut session, store) = online(RecordingStore::new());

        session.start_game(GameType::WordSound);
        let mut last = None;
        for _ in 0..5 {
            last = Some(session.record_answer(GameType::WordSound, true).unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.outcome.total_stars, 8);
        assert_eq!(last.new_achievement, Some("🔥 5 in a Row!"));

        let saved = session.repository.load_game_state().unwrap().unwrap();
        assert_eq!(saved.player.total_stars(), 8);
        assert_eq!(saved.progress.get(GameType::WordSound).correct_answers, 5);

        session.shutdown().await;
        let calls = store.calls();
        assert_eq!(count(&calls, |c| matches!(c, SyncCommand::SaveProgress { .. })), 5);
        assert_eq!(count(&calls, |c| matches!(c, SyncCommand::UpdateStars { .. })), 5);
        assert_eq!(
            count(&calls, |c| matches!(c, SyncCommand::AddAchievement(_))),
            1
        );
        assert!(calls.contains(&SyncCommand::UpdateStars {
            total_stars: 8,
            level: 1
        }));
    }

    #[tokio::test]
    async fn wrong_answers_do_not_sync_stars() {
        let (mut session, store) = online(RecordingStore::new());

        session.start_game(GameType::RhymeTime);
        let event = session.record_answer(GameType::RhymeTime, false).unwrap();
        assert_eq!(event.outcome.stars_earned, 0);
        assert_eq!(event.new_achievement, None);

        session.shutdown().await;
        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], SyncCommand::SaveProgress { game: GameType::RhymeTime, .. }));
    }

    #[tokio::test]
    async fn finishing_awards_completion_badge_once() {
        let (mut session, store) = online(RecordingStore::new());

        for _ in 0..2 {
            session.start_game(GameType::PictureStory);
            session.record_answer(GameType::PictureStory, true).unwrap();
            session.record_answer(GameType::PictureStory, true).unwrap();
            let end = session.finish_game(GameType::PictureStory).unwrap();
            assert_eq!(end.summary.correct, 2);
        }

        assert!(session.player().has_achievement("📖 Bookworm!"));
        assert_eq!(session.progress().get(GameType::PictureStory).games_played, 2);

        session.shutdown().await;
        let bookworms = count(&store.calls(), |c| {
            *c == SyncCommand::AddAchievement("📖 Bookworm!".to_string())
        });
        assert_eq!(bookworms, 1);
    }

    #[tokio::test]
    async fn exiting_early_counts_game_without_badge() {
        let mut session = offline_session();

        session.start_game(GameType::ListenChoose);
        let summary = session.exit_game(GameType::ListenChoose).unwrap();

        assert_eq!(summary.progress.games_played, 1);
        assert!(!session.player().has_achievement("🎧 Listening Star!"));
        assert_eq!(
            session.exit_game(GameType::ListenChoose),
            Err(GameError::NoActiveGame)
        );
    }

    #[tokio::test]
    async fn transcript_graded_once_per_cycle() {
        let mut session = offline_session();
        session.start_game(GameType::WordSound);
        session.start_listening();

        let (result, event) = session
            .submit_transcript(GameType::WordSound, "kat", "cat")
            .unwrap()
            .unwrap();
        assert!(result.is_correct);
        assert_eq!(event.outcome.total_stars, 1);

        assert_eq!(
            session.submit_transcript(GameType::WordSound, "cat", "cat").unwrap(),
            None
        );
        assert_eq!(session.progress().get(GameType::WordSound).total_answers, 1);

        session.next_word();
        let (result, _) = session
            .submit_transcript(GameType::WordSound, "dog", "cat")
            .unwrap()
            .unwrap();
        assert!(!result.is_correct);
        assert_eq!(session.progress().get(GameType::WordSound).total_answers, 2);
    }

    #[tokio::test]
    async fn transcript_without_game_keeps_grader_armed() {
        let mut session = offline_session();

        assert_eq!(
            session.submit_transcript(GameType::WordSound, "sun", "sun"),
            Err(GameError::NoActiveGame)
        );

        session.start_game(GameType::RhymeTime);
        assert!(matches!(
            session.submit_transcript(GameType::WordSound, "sun", "sun"),
            Err(GameError::GameMismatch { .. })
        ));

        session.start_game(GameType::WordSound);
        assert!(session
            .submit_transcript(GameType::WordSound, "sun", "sun")
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn reset_restores_defaults_and_leaves_remote_alone() {
        let (mut session, store) = online(RecordingStore::new());
        session.start_game(GameType::WordSound);
        session.record_answer(GameType::WordSound, true).unwrap();
        session.set_player_name("Ava");

        session.reset_progress();

        assert_eq!(session.player(), &PlayerProfile::default());
        assert!(session.progress().is_empty());
        assert_eq!(session.engine().current_streak(), 0);
        assert_eq!(
            session.repository.load_game_state().unwrap(),
            Some(StoredGameState::default())
        );

        // Only the answer and the rename reach the remote store.
        session.shutdown().await;
        assert_eq!(store.calls().len(), 3);
    }

    #[tokio::test]
    async fn profile_changes_are_synced() {
        let (mut session, store) = online(RecordingStore::new());

        session.set_player_name("Ava");
        session.set_player_avatar("🦊");
        session.add_stars(60);
        assert_eq!(session.player().level(), 2);

        session.shutdown().await;
        assert_eq!(
            store.calls(),
            vec![
                SyncCommand::UpdateProfile {
                    name: Some("Ava".to_string()),
                    avatar: None
                },
                SyncCommand::UpdateProfile {
                    name: None,
                    avatar: Some("🦊".to_string())
                },
                SyncCommand::UpdateStars {
                    total_stars: 60,
                    level: 2
                },
            ]
        );
    }

    #[tokio::test]
    async fn sync_failures_do_not_affect_gameplay() {
        let (mut session, _store) = online(RecordingStore::failing());

        session.start_game(GameType::RhymeTime);
        for _ in 0..4 {
            session.record_answer(GameType::RhymeTime, true).unwrap();
        }
        let end = session.finish_game(GameType::RhymeTime).unwrap();

        assert_eq!(end.new_achievement, Some("🎶 Poet Expert!"));
        assert_eq!(session.player().total_stars(), 6);
        session.shutdown().await;
    }

    #[tokio::test]
    async fn bootstrap_offline() {
        let mut session = offline_session();
        assert_eq!(session.bootstrap().await, BootstrapOutcome::Offline);
        assert!(!session.is_online());
    }

    #[tokio::test]
    async fn bootstrap_adopts_remote_state_when_fresh() {
        let mut remote_progress = ProgressBook::default();
        remote_progress.set(
            GameType::ListenChoose,
            GameProgress {
                games_played: 4,
                correct_answers: 15,
                total_answers: 20,
                highest_streak: 6,
            },
        );
        let store = RecordingStore::new()
            .with_progress(remote_progress)
            .with_achievements(&["🎧 Listening Star!"]);
        let (mut session, _store) = online(store);

        let outcome = session.bootstrap().await;

        assert_eq!(outcome, BootstrapOutcome::Merged { adopted_progress: true });
        assert_eq!(session.player().name(), "Remote Ruby");
        assert_eq!(session.player().avatar(), "🦄");
        assert_eq!(session.player().total_stars(), 110);
        assert_eq!(session.player().level(), 3);
        assert_eq!(session.progress(), &remote_progress);
        assert!(session.player().has_achievement("🎧 Listening Star!"));

        let saved = session.repository.load_game_state().unwrap().unwrap();
        assert_eq!(saved.player.total_stars(), 110);
        session.shutdown().await;
    }

    #[tokio::test]
    async fn bootstrap_keeps_local_progress_once_played() {
        let store = RecordingStore::new().with_achievements(&["📖 Bookworm!"]);
        let (mut session, store) = online(store);

        session.start_game(GameType::WordSound);
        for _ in 0..5 {
            session.record_answer(GameType::WordSound, true).unwrap();
        }
        session.exit_game(GameType::WordSound).unwrap();

        let outcome = session.bootstrap().await;

        assert_eq!(outcome, BootstrapOutcome::Merged { adopted_progress: false });
        assert_eq!(session.player().name(), "Remote Ruby");
        assert_eq!(session.player().total_stars(), 8);
        assert_eq!(session.progress().get(GameType::WordSound).games_played, 1);
        assert_eq!(
            session.player().achievements(),
            &["🔥 5 in a Row!".to_string(), "📖 Bookworm!".to_string()]
        );

        session.shutdown().await;
        let calls = store.calls();
        assert_eq!(
            count(&calls, |c| *c == SyncCommand::AddAchievement("🔥 5 in a Row!".to_string())),
            2
        );
        assert_eq!(
            calls.last(),
            Some(&SyncCommand::AddAchievement("🔥 5 in a Row!".to_string()))
        );
    }

    #[tokio::test]
    async fn bootstrap_failure_keeps_local_state() {
        let (mut session, _store) = online(RecordingStore::failing());
        session.set_player_name("Local Lou");

        assert_eq!(session.bootstrap().await, BootstrapOutcome::Failed);
        assert_eq!(session.player().name(), "Local Lou");
        session.shutdown().await;
    }

    #[tokio::test]
    async fn bootstrap_times_out() {
        let store = Arc::new(RecordingStore::new().with_delay(Duration::from_secs(2)));
        let repo = SqliteRepository::open_in_memory().unwrap();
        let mut session =
            GameSession::new(repo, Some(store), Duration::from_millis(20)).unwrap();

        assert_eq!(session.bootstrap().await, BootstrapOutcome::TimedOut);
        assert_eq!(session.player().total_stars(), 0);
    }

    #[tokio::test]
    async fn saved_game_is_restored() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.save_game_state(&StoredGameState {
            player: PlayerProfile::restore("Mia", "🐼", 75, Vec::new()),
            progress: ProgressBook::default(),
        })
        .unwrap();

        let session = GameSession::offline(repo).unwrap();
        assert_eq!(session.player().name(), "Mia");
        assert_eq!(session.player().level(), 2);
    }

    #[tokio::test]
    async fn unreadable_saved_game_is_never_overwritten() {
        let path = std::env::temp_dir()
            .join(format!("speech-kids-session-{}.db", uuid::Uuid::new_v4()));
        SqliteRepository::open(&path)
            .unwrap()
            .save_game_state(&StoredGameState {
                player: PlayerProfile::restore("Mia", "🐼", 400, Vec::new()),
                progress: ProgressBook::default(),
            })
            .unwrap();

        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute("UPDATE game_storage SET version = 2", []).unwrap();
        let before: String = conn
            .query_row("SELECT payload FROM game_storage", [], |row| row.get(0))
            .unwrap();

        let result = GameSession::offline(SqliteRepository::open(&path).unwrap());
        assert!(matches!(
            result,
            Err(DbError::UnsupportedVersion {
                found: 2,
                expected: 1
            })
        ));

        let after: (i32, String) = conn
            .query_row("SELECT version, payload FROM game_storage", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(after, (2, before));
        assert!(after.1.contains("\"total_stars\":400"));

        drop(conn);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn leaderboard_requires_remote() {
        let session = offline_session();
        assert!(matches!(
            session.fetch_leaderboard(10).await,
            Err(SyncError::Offline)
        ));
    }
}
