use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading artifacts or classifying text.
///
/// `Clone` so that a failed artifact load can be cached and handed back to
/// every later caller without touching the disk again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpamError {
    #[error("Input text is empty")]
    EmptyInput,

    #[error("Model artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("Invalid model artifact {}: {reason}", path.display())]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl SpamError {
    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SpamError::InvalidArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for input validation failures the caller should report back to
    /// the user rather than treat as a system fault.
    pub fn is_user_error(&self) -> bool {
        matches!(self, SpamError::EmptyInput)
    }

    /// True when the model artifacts could not be loaded.
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            SpamError::ArtifactNotFound { .. } | SpamError::InvalidArtifact { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SpamError>;
