//! Error types for the boundary-crossing parts of the game.  The simulation
//! itself has no error paths.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("leaderboard data is malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// Initials must be exactly three uppercase ASCII letters
    #[error("invalid initials: {0:?}")]
    InvalidInitials(String),

    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),

    /// The worker thread has exited; no further calls can be served
    #[error("leaderboard worker is gone")]
    WorkerGone,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("audio device unavailable")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
