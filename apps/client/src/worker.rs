//! Background worker that pushes local changes to the remote store.
//!
//! Gameplay never waits on the network: mutations are enqueued here and
//! applied in order by a single task. Failures are logged and dropped.

use std::sync::Arc;

use speech_kids_core::{GameProgress, GameType};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::sync::{RemoteStore, SyncError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    SaveProgress { game: GameType, progress: GameProgress },
    AddAchievement(String),
    UpdateStars { total_stars: u32, level: u32 },
    UpdateProfile {
        name: Option<String>,
        avatar: Option<String>,
    },
}

impl SyncCommand {
    fn kind(&self) -> &'static str {
        match self {
            SyncCommand::SaveProgress { .. } => "save_progress",
            SyncCommand::AddAchievement(_) => "add_achievement",
            SyncCommand::UpdateStars { .. } => "update_stars",
            SyncCommand::UpdateProfile { .. } => "update_profile",
        }
    }
}

/// Handle for enqueueing commands. Dropping every handle stops the worker
/// once the queue is drained.
#[derive(Debug, Clone)]
pub struct SyncQueue {
    tx: mpsc::UnboundedSender<SyncCommand>,
}

impl SyncQueue {
    pub fn push(&self, command: SyncCommand) {
        if let Err(e) = self.tx.send(command) {
            tracing::warn!(command = e.0.kind(), "sync worker stopped; dropping command");
        }
    }
}

/// Spawn the worker on the current tokio runtime.
pub fn spawn_sync_worker<S: RemoteStore>(store: Arc<S>) -> (SyncQueue, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(run(store, rx));
    (SyncQueue { tx }, handle)
}

async fn run<S: RemoteStore>(store: Arc<S>, mut rx: mpsc::UnboundedReceiver<SyncCommand>) {
    while let Some(command) = rx.recv().await {
        let kind = command.kind();
        match apply(store.as_ref(), command).await {
            Ok(()) => tracing::debug!(command = kind, "synced"),
            Err(e) => tracing::warn!(command = kind, error = %e, "sync failed"),
        }
    }
    tracing::debug!("sync worker finished");
}

async fn apply<S: RemoteStore>(store: &S, command: SyncCommand) -> Result<(), SyncError> {
    match command {
        SyncCommand::SaveProgress { game, progress } => store.save_progress(game, progress).await,
        SyncCommand::AddAchievement(badge) => store.add_achievement(badge).await,
        SyncCommand::UpdateStars { total_stars, level } => {
            store.update_stars(total_stars, level).await
        }
        SyncCommand::UpdateProfile { name, avatar } => store.update_profile(name, avatar).await,
    }
}
