//! Error types for the movie-canopy library.

use std::path::PathBuf;

use thiserror::Error;

use super::{MovieId, UserId};

/// All errors that can occur in the movie-canopy library.
#[derive(Error, Debug)]
pub enum CanopyError {
    /// A rating record could not be parsed.
    #[error("Malformed rating record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// The same user rated the same movie more than once.
    #[error("User {user} rated movie {movie} more than once")]
    DuplicateRating { user: UserId, movie: MovieId },

    /// A similarity store line could not be parsed.
    #[error("Corrupt similarity store line {line}: {reason}")]
    CorruptStore { line: usize, reason: String },

    /// The similarity store has not been fully written yet.
    #[error("Similarity store not ready at {path}: {reason}")]
    StoreNotReady { path: PathBuf, reason: String },

    /// Configuration failed validation or could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A movie reached refinement without a canopy center.
    #[error("Movie {0} has no assigned center")]
    Unassigned(MovieId),

    /// The parallel executor could not be started.
    #[error("Executor error: {0}")]
    Executor(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for `ClusterConfig`.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CanopyError {
    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            CanopyError::Io(_) => 1,
            CanopyError::MalformedRecord { .. }
            | CanopyError::DuplicateRating { .. }
            | CanopyError::CorruptStore { .. }
            | CanopyError::StoreNotReady { .. } => 2,
            CanopyError::InvalidConfig(_) | CanopyError::Toml(_) => 3,
            _ => 5,
        }
    }
}

/// Convenience result type for movie-canopy operations.
pub type CanopyResult<T> = Result<T, CanopyError>;
