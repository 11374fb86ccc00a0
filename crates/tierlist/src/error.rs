//! Error types for the tierlist library.

use std::path::PathBuf;
use thiserror::Error;

use crate::tier::Tier;

/// Main error type for tierlist operations.
#[derive(Debug, Error)]
pub enum TierlistError {
    /// Assign or skip attempted while no image is being shown.
    #[error("No current image to rate")]
    NoCurrentImage,

    /// Undo attempted with an empty action log.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// A tier move would leave the 1-5 range.
    #[error("Cannot move '{image}' from tier {from} by {delta}: tiers run from 1 to 5")]
    TierOutOfRange { image: String, from: Tier, delta: i8 },

    /// A tier move was requested for an image that has no tier.
    #[error("Image '{0}' has not been rated")]
    NotRated(String),

    /// A tier number outside 1-5.
    #[error("Invalid tier {0}: tiers run from 1 to 5")]
    InvalidTier(i64),

    /// An uploaded file failed the type or size checks.
    #[error("Upload rejected for '{file}': {reason}")]
    UploadRejected { file: String, reason: String },

    /// The object store could not be reached or answered with an error.
    #[error("Object store unavailable: {0}")]
    StoreUnavailable(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Saving or loading client state failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TierlistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TierlistError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error only means "nothing happened" and can be ignored by
    /// an interactive caller.
    pub fn is_no_op(&self) -> bool {
        matches!(
            self,
            TierlistError::NoCurrentImage | TierlistError::NothingToUndo
        )
    }
}

impl From<reqwest::Error> for TierlistError {
    fn from(err: reqwest::Error) -> Self {
        TierlistError::StoreUnavailable(err.to_string())
    }
}

/// Result type alias for tierlist operations.
pub type Result<T> = std::result::Result<T, TierlistError>;
