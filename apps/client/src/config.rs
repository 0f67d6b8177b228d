//! Client configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BOOTSTRAP_TIMEOUT_SECS: u64 = 10;
const DATA_DIR_NAME: &str = "speech-kids";
const DB_FILE_NAME: &str = "speech-kids.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL. `None` runs the game fully offline.
    pub backend_url: Option<String>,
    pub data_dir: PathBuf,
    pub bootstrap_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            data_dir: default_data_dir(),
            bootstrap_timeout: Duration::from_secs(DEFAULT_BOOTSTRAP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("SPEECH_KIDS_BACKEND_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let data_dir = lookup("SPEECH_KIDS_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let bootstrap_timeout = lookup("SPEECH_KIDS_BOOTSTRAP_TIMEOUT_SECS")
            .and_then(|secs| match secs.trim().parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    tracing::warn!(
                        value = %secs,
                        "ignoring invalid SPEECH_KIDS_BOOTSTRAP_TIMEOUT_SECS"
                    );
                    None
                }
            })
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_BOOTSTRAP_TIMEOUT_SECS));

        Self {
            backend_url,
            data_dir,
            bootstrap_timeout,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn is_offline(&self) -> bool {
        self.backend_url.is_none()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
