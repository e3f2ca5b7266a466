//! Errors that cross the stream session boundary.

use thiserror::Error;

/// Playback orchestration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The software engine module could not be fetched.
    #[error("HLS engine unavailable: {0}")]
    Load(String),

    /// The descriptor has no usable URL for the requested stream type.
    #[error("no source available for stream type '{0}'")]
    SourceUnavailable(String),

    /// Fatal engine fault that the recovery table does not handle.
    #[error("unrecoverable error in HLS player: {0}")]
    Unrecoverable(String),

    /// The host's engine implementation failed an operation.
    #[error("engine error: {0}")]
    Engine(String),

    /// Neither native playback nor the software engine is available.
    #[error("HLS playback is not supported on this host")]
    Unsupported,

    /// A quality level or audio track the session does not offer.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// The media element stopped emitting events before it could play.
    #[error("media element closed before it could play")]
    MediaClosed,
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
