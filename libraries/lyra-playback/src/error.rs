//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue index outside the bounds of the queue
    #[error("Invalid queue index {index} (queue length {len})")]
    InvalidIndex { index: usize, len: usize },

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Transport failed to load a source
    #[error("Transport failed to load {uri}: {cause}")]
    TransportLoad { uri: String, cause: String },

    /// Transport rejected a command
    #[error("Transport error: {0}")]
    Transport(String),

    /// Volume was not a finite number
    #[error("Invalid volume: {0}")]
    InvalidVolume(f64),

    /// Lyric data could not be used
    #[error("Invalid lyrics: {0}")]
    InvalidLyrics(String),

    /// Configuration could not be parsed or validated
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for PlaybackError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
