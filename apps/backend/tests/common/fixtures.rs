//! Request bodies used across the API tests.

use serde_json::json;
use uuid::Uuid;

pub fn register_request(name: &str, avatar: Option<&str>) -> serde_json::Value {
    match avatar {
        Some(a) => json!({ "name": name, "avatar": a }),
        None => json!({ "name": name }),
    }
}

pub fn progress_body(
    games_played: u32,
    correct_answers: u32,
    total_answers: u32,
    highest_streak: u32,
) -> serde_json::Value {
    json!({
        "games_played": games_played,
        "correct_answers": correct_answers,
        "total_answers": total_answers,
        "highest_streak": highest_streak
    })
}

pub fn stars_body(total_stars: u32, level: u32) -> serde_json::Value {
    json!({ "total_stars": total_stars, "level": level })
}

pub fn achievement_body(achievement: &str) -> serde_json::Value {
    json!({ "achievement": achievement })
}

/// Player name unlikely to collide with other test runs (fits the 20-char limit).
pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}
