//! Core game library shared by the client and the backend.
//!
//! Provides:
//! - Scoring engine (streaks, stars, levels, per-game progress)
//! - Answer matching for spoken input (Levenshtein distance)
//! - One-shot transcript grading
//! - Achievement rules and built-in game content
//! - Shared types (GameType, GameProgress, PlayerProfile, etc.)

pub mod achievements;
pub mod content;
pub mod error;
pub mod matching;
pub mod scoring;
pub mod transcript;
pub mod types;

pub use error::{GameError, Result};
pub use matching::{grade_response, is_acceptable_match, levenshtein_distance, normalize, MatchResult};
pub use scoring::{ActiveSession, AnswerOutcome, ScoringEngine, SessionSummary};
pub use transcript::TranscriptGrader;
pub use types::{
    level_for_stars, GameProgress, GameType, MatchingMode, OverallStats, PlayerProfile,
    ProgressBook, DEFAULT_AVATAR, STARS_PER_LEVEL,
};
