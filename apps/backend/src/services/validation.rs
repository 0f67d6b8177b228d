//! Request validation shared by the route handlers.

use speech_kids_core::content::is_avatar;
use speech_kids_core::{level_for_stars, GameProgress};

use crate::error::{ApiError, Result};

pub const MAX_NAME_CHARS: usize = 20;
pub const MAX_ACHIEVEMENT_CHARS: usize = 64;
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Trim a player name and cut it to `MAX_NAME_CHARS` characters.
pub fn player_name(raw: &str) -> Result<String> {
    let name: String = raw.trim().chars().take(MAX_NAME_CHARS).collect();
    let name = name.trim_end().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    Ok(name)
}

pub fn avatar(raw: &str) -> Result<String> {
    if !is_avatar(raw) {
        return Err(ApiError::BadRequest(format!("unknown avatar '{}'", raw)));
    }
    Ok(raw.to_string())
}

pub fn progress(progress: &GameProgress) -> Result<()> {
    if progress.correct_answers > progress.total_answers {
        return Err(ApiError::BadRequest(format!(
            "correct_answers ({}) exceeds total_answers ({})",
            progress.correct_answers, progress.total_answers
        )));
    }
    if progress.highest_streak > progress.correct_answers {
        return Err(ApiError::BadRequest(format!(
            "highest_streak ({}) exceeds correct_answers ({})",
            progress.highest_streak, progress.correct_answers
        )));
    }
    Ok(())
}

/// The level is derived from the star count; a client may not send another one.
pub fn stars(total_stars: u32, level: u32) -> Result<()> {
    let expected = level_for_stars(total_stars);
    if level != expected {
        return Err(ApiError::BadRequest(format!(
            "level {} does not match {} stars (expected {})",
            level, total_stars, expected
        )));
    }
    Ok(())
}

pub fn achievement(raw: &str) -> Result<String> {
    let badge = raw.trim();
    if badge.is_empty() {
        return Err(ApiError::BadRequest("achievement must not be empty".to_string()));
    }
    if badge.chars().count() > MAX_ACHIEVEMENT_CHARS {
        return Err(ApiError::BadRequest("achievement is too long".to_string()));
    }
    Ok(badge.to_string())
}

pub fn leaderboard_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_trimmed_and_truncated() {
        assert_eq!(player_name("  Sam  ").unwrap(), "Sam");
        assert_eq!(
            player_name("Bartholomew the Magnificent").unwrap(),
            "Bartholomew the Magn"
        );
        assert_eq!(player_name("Ünïcødé Ñame").unwrap(), "Ünïcødé Ñame");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(player_name("   ").is_err());
        assert!(player_name("").is_err());
    }

    #[test]
    fn test_avatar_must_be_known() {
        assert_eq!(avatar("🦊").unwrap(), "🦊");
        assert!(avatar("🚀").is_err());
        assert!(avatar("").is_err());
    }

    #[test]
    fn test_progress_consistency() {
        let ok = GameProgress {
            games_played: 1,
            correct_answers: 3,
            total_answers: 5,
            highest_streak: 2,
        };
        assert!(progress(&ok).is_ok());

        let bad = GameProgress {
            correct_answers: 6,
            ..ok
        };
        assert!(progress(&bad).is_err());
    }

    #[test]
    fn test_progress_error_names_failed_rule() {
        let base = GameProgress {
            games_played: 1,
            correct_answers: 3,
            total_answers: 5,
            highest_streak: 2,
        };

        let too_many_correct = GameProgress {
            correct_answers: 6,
            ..base
        };
        match progress(&too_many_correct) {
            Err(ApiError::BadRequest(msg)) => assert!(msg.starts_with("correct_answers (6)")),
            other => panic!("unexpected result: {:?}", other.err()),
        }

        let long_streak = GameProgress {
            highest_streak: 4,
            ..base
        };
        match progress(&long_streak) {
            Err(ApiError::BadRequest(msg)) => {
                assert_eq!(msg, "highest_streak (4) exceeds correct_answers (3)")
            }
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn test_stars_level_must_match() {
        assert!(stars(0, 1).is_ok());
        assert!(stars(49, 1).is_ok());
        assert!(stars(50, 2).is_ok());
        assert!(stars(50, 1).is_err());
        assert!(stars(120, 9).is_err());
    }

    #[test]
    fn test_achievement_trimmed() {
        assert_eq!(achievement(" 📖 Bookworm! ").unwrap(), "📖 Bookworm!");
        assert!(achievement("  ").is_err());
        assert!(achievement(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_leaderboard_limit_clamped() {
        assert_eq!(leaderboard_limit(None), 10);
        assert_eq!(leaderboard_limit(Some(0)), 1);
        assert_eq!(leaderboard_limit(Some(-5)), 1);
        assert_eq!(leaderboard_limit(Some(25)), 25);
        assert_eq!(leaderboard_limit(Some(1000)), 100);
    }
}
