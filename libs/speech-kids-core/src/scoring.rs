//! Scoring engine: streaks, stars, levels and per-game statistics.
//!
//! The engine is a plain value. Whoever owns it (normally the client's
//! session) decides when to persist or sync what it reports back.

use serde::Serialize;

use crate::error::{GameError, Result};
use crate::types::{GameProgress, GameType, PlayerProfile, ProgressBook};

/// A streak at or above this earns double stars.
pub const STREAK_BONUS_THRESHOLD: u32 = 3;

/// Stars earned by one graded answer, given the streak it produced.
pub fn stars_for_answer(correct: bool, new_streak: u32) -> u32 {
    match (correct, new_streak >= STREAK_BONUS_THRESHOLD) {
        (false, _) => 0,
        (true, false) => 1,
        (true, true) => 2,
    }
}

/// The game currently being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveSession {
    pub game: GameType,
    pub streak: u32,
    /// Correct answers in this session.
    pub correct: u32,
    /// Graded answers in this session.
    pub answered: u32,
}

impl ActiveSession {
    fn new(game: GameType) -> Self {
        Self {
            game,
            streak: 0,
            correct: 0,
            answered: 0,
        }
    }
}

/// What a single graded answer changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub game: GameType,
    pub correct: bool,
    pub streak: u32,
    pub stars_earned: u32,
    pub total_stars: u32,
    pub level: u32,
    pub leveled_up: bool,
    pub progress: GameProgress,
}

/// Summary handed back when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub game: GameType,
    pub correct: u32,
    pub answered: u32,
    pub progress: GameProgress,
}

/// Owns the player profile and per-game progress.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    player: PlayerProfile,
    progress: ProgressBook,
    session: Option<ActiveSession>,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previously stored state. No game is active afterwards.
    pub fn restore(player: PlayerProfile, progress: ProgressBook) -> Self {
        Self {
            player,
            progress,
            session: None,
        }
    }

    pub fn player(&self) -> &PlayerProfile {
        &self.player
    }

    pub fn progress(&self) -> &ProgressBook {
        &self.progress
    }

    pub fn active_session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    /// Current streak, 0 when idle.
    pub fn current_streak(&self) -> u32 {
        self.session.map_or(0, |s| s.streak)
    }

    /// Begin a session. Any session still open is abandoned without being
    /// counted as played.
    pub fn start_game(&mut self, game: GameType) {
        self.session = Some(ActiveSession::new(game));
    }

    /// Grade one round of the active game.
    pub fn record_answer(&mut self, game: GameType, correct: bool) -> Result<AnswerOutcome> {
        let session = self.active_for(game)?;

        let streak = if correct { session.streak + 1 } else { 0 };
        let stars_earned = stars_for_answer(correct, streak);
        let level_before = self.player.level();

        let mut progress = *self.progress.get(game);
        progress.total_answers += 1;
        if correct {
            progress.correct_answers += 1;
        }
        progress.highest_streak = progress.highest_streak.max(streak);

        // Commit everything together.
        self.session = Some(ActiveSession {
            game,
            streak,
            correct: session.correct + u32::from(correct),
            answered: session.answered + 1,
        });
        self.player.add_stars(stars_earned);
        self.progress.set(game, progress);

        let level = self.player.level();
        Ok(AnswerOutcome {
            game,
            correct,
            streak,
            stars_earned,
            total_stars: self.player.total_stars(),
            level,
            leveled_up: level > level_before,
            progress,
        })
    }

    /// Close the active session and count it as played.
    pub fn end_game(&mut self, game: GameType) -> Result<SessionSummary> {
        let session = self.active_for(game)?;

        let progress = self.progress.get_mut(game);
        progress.games_played += 1;
        let progress = *progress;
        self.session = None;

        Ok(SessionSummary {
            game,
            correct: session.correct,
            answered: session.answered,
            progress,
        })
    }

    /// Award stars outside of a graded round.
    pub fn add_stars(&mut self, amount: u32) {
        self.player.add_stars(amount);
    }

    /// Add a badge. Returns false when the player already had it.
    pub fn add_achievement(&mut self, badge: impl Into<String>) -> bool {
        self.player.insert_achievement(badge.into())
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player.set_name(name.into());
    }

    pub fn set_player_avatar(&mut self, avatar: impl Into<String>) {
        self.player.set_avatar(avatar.into());
    }

    /// Restore the default profile and zeroed progress.
    pub fn reset_progress(&mut self) {
        *self = Self::default();
    }

    fn active_for(&self, game: GameType) -> Result<ActiveSession> {
        match self.session {
            Some(session) if session.game == game => Ok(session),
            Some(session) => Err(GameError::GameMismatch {
                active: session.game,
                requested: game,
            }),
            None => Err(GameError::NoActiveGame),
        }
    }
}
