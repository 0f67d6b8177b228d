//! Badge rules for each game.

use crate::scoring::{AnswerOutcome, SessionSummary};
use crate::types::GameType;

/// Streak that unlocks a game's streak badge.
pub const STREAK_BADGE_THRESHOLD: u32 = 5;

/// Badge for a long streak within one session.
pub fn streak_badge(game: GameType) -> &'static str {
    match game {
        GameType::WordSound => "🔥 5 in a Row!",
        GameType::PictureStory => "📚 Story Master!",
        GameType::RhymeTime => "🎵 Rhyme Master!",
        GameType::ListenChoose => "👂 Super Listener!",
    }
}

/// Badge earned by the answer just recorded, if any.
pub fn badge_for_answer(outcome: &AnswerOutcome) -> Option<&'static str> {
    (outcome.correct && outcome.streak >= STREAK_BADGE_THRESHOLD).then(|| streak_badge(outcome.game))
}

/// Badge earned by playing a session through to its last round.
pub fn badge_for_completed_session(summary: &SessionSummary) -> Option<&'static str> {
    match summary.game {
        GameType::WordSound => None,
        GameType::PictureStory => (summary.correct >= 2).then_some("📖 Bookworm!"),
        GameType::RhymeTime => (summary.correct >= 4).then_some("🎶 Poet Expert!"),
        GameType::ListenChoose => Some("🎧 Listening Star!"),
    }
}
