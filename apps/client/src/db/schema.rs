//! SQLite schema definitions.

/// Current version of the stored game payload.
pub const SCHEMA_VERSION: i32 = 1;

/// Key under which the game state is persisted.
pub const GAME_STORAGE_KEY: &str = "speech-kids-game-storage";

pub const SCHEMA: &str = r#"
-- Persisted game state (profile + per-game progress), one JSON payload per key
CREATE TABLE IF NOT EXISTS game_storage (
    storage_key TEXT PRIMARY KEY,
    version INTEGER NOT NULL,
    payload TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Backend credentials issued at registration
CREATE TABLE IF NOT EXISTS local_player (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    player_id TEXT NOT NULL,
    token TEXT NOT NULL
);
"#;
