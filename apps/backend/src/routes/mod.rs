pub mod achievements;
pub mod auth;
pub mod leaderboard;
pub mod players;
pub mod profile;
pub mod progress;
