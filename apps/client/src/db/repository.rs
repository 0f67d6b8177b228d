//! Repository pattern for database access.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use speech_kids_core::{PlayerProfile, ProgressBook};
use uuid::Uuid;

use crate::db::error::DbError;
use crate::db::schema::{GAME_STORAGE_KEY, SCHEMA, SCHEMA_VERSION};

type Result<T> = std::result::Result<T, DbError>;

/// Everything the game persists locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGameState {
    pub player: PlayerProfile,
    pub progress: ProgressBook,
}

/// Backend identity of this install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCredentials {
    pub player_id: Uuid,
    pub token: String,
}

pub trait GameStateRepository {
    fn load_game_state(&self) -> Result<Option<StoredGameState>>;
    fn save_game_state(&self, state: &StoredGameState) -> Result<()>;
}

pub trait CredentialsRepository {
    fn get_credentials(&self) -> Result<Option<PlayerCredentials>>;
    fn save_credentials(&self, credentials: &PlayerCredentials) -> Result<()>;
}

pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating it and its directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

impl GameStateRepository for SqliteRepository {
    fn load_game_state(&self) -> Result<Option<StoredGameState>> {
        let row: Option<(i32, String)> = self
            .conn
            .query_row(
                "SELECT version, payload FROM game_storage WHERE storage_key = ?1",
                params![GAME_STORAGE_KEY],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((version, payload)) = row else {
            return Ok(None);
        };

        if version != SCHEMA_VERSION {
            return Err(DbError::UnsupportedVersion {
                found: version,
                expected: SCHEMA_VERSION,
            });
        }

        let state: StoredGameState = serde_json::from_str(&payload)?;
        if state.progress.iter().any(|(_, p)| !p.is_consistent()) {
            return Err(DbError::InvalidData(
                "stored progress has more correct than total answers".to_string(),
            ));
        }

        Ok(Some(state))
    }

    fn save_game_state(&self, state: &StoredGameState) -> Result<()> {
        let payload = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT INTO game_storage (storage_key, version, payload, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(storage_key) DO UPDATE SET
                version = excluded.version,
                payload = excluded.payload,
                updated_at = excluded.updated_at",
            params![GAME_STORAGE_KEY, SCHEMA_VERSION, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl CredentialsRepository for SqliteRepository {
    fn get_credentials(&self) -> Result<Option<PlayerCredentials>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT player_id, token FROM local_player WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(player_id, token)| {
            let player_id = Uuid::parse_str(&player_id)
                .map_err(|e| DbError::InvalidData(format!("player id: {}", e)))?;
            Ok(PlayerCredentials { player_id, token })
        })
        .transpose()
    }

    fn save_credentials(&self, credentials: &PlayerCredentials) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO local_player (id, player_id, token) VALUES (1, ?1, ?2)",
            params![credentials.player_id.to_string(), credentials.token],
        )?;
        Ok(())
    }
}
