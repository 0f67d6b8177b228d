//! Error types for speech-kids-core.

use thiserror::Error;

use crate::types::GameType;

/// Result type alias using GameError.
pub type Result<T> = std::result::Result<T, GameError>;

/// Precondition violations raised by the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid game type: {0}")]
    InvalidGameType(String),

    #[error("no game in progress")]
    NoActiveGame,

    #[error("{requested} is not the active game ({active} is)")]
    GameMismatch {
        active: GameType,
        requested: GameType,
    },
}
