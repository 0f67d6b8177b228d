//! Speech Kids game client.
//!
//! Owns the local game state (SQLite) and mirrors it to the backend in the
//! background. The UI layer drives a [`GameSession`].

pub mod config;
pub mod db;
pub mod session;
pub mod sync;
pub mod worker;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use speech_kids_core::PlayerProfile;

pub use config::ClientConfig;
pub use db::{DbError, SqliteRepository};
pub use session::{AnswerEvent, BootstrapOutcome, GameEnd, GameSession};
pub use sync::{RemoteStore, SyncClient, SyncError};

use db::{CredentialsRepository, GameStateRepository, PlayerCredentials};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("local storage: {0}")]
    Db(#[from] DbError),

    #[error("sync: {0}")]
    Sync(#[from] SyncError),
}

/// Open the local game and, when a backend is configured and this install
/// is registered, connect it and merge remote state.
pub async fn launch(config: &ClientConfig) -> Result<GameSession, ClientError> {
    let repository = SqliteRepository::open(config.db_path())?;

    let remote = match (&config.backend_url, repository.get_credentials()?) {
        (Some(url), Some(credentials)) => {
            tracing::info!(player_id = %credentials.player_id, "using registered player");
            Some(Arc::new(SyncClient::with_token(url.as_str(), credentials.token)))
        }
        (Some(_), None) => {
            tracing::info!("player not registered; playing offline");
            None
        }
        (None, _) => None,
    };

    let mut session = GameSession::new(repository, remote, config.bootstrap_timeout)?;
    let outcome = session.bootstrap().await;
    tracing::debug!(?outcome, "session ready");

    Ok(session)
}

/// Register this install with the backend and store the issued credentials.
/// The chosen name and avatar become the local profile's as well.
pub async fn register(
    config: &ClientConfig,
    name: &str,
    avatar: &str,
) -> Result<PlayerCredentials, ClientError> {
    let url = config.backend_url.as_deref().ok_or(SyncError::Offline)?;
    let repository = SqliteRepository::open(config.db_path())?;

    let registration = SyncClient::new(url).register(name, avatar).await?;
    let credentials = PlayerCredentials {
        player_id: registration.player_id,
        token: registration.token,
    };
    repository.save_credentials(&credentials)?;

    let mut state = repository.load_game_state()?.unwrap_or_default();
    state.player = PlayerProfile::restore(
        name.trim(),
        avatar,
        state.player.total_stars(),
        state.player.achievements().to_vec(),
    );
    repository.save_game_state(&state)?;

    tracing::info!(player_id = %credentials.player_id, "registered player");
    Ok(credentials)
}
