//! Error types for cantor.
//!
//! Each collaborator of the playback controller has its own error enum. None
//! of them cross the controller boundary: the controller logs them and
//! recovers locally.

use thiserror::Error;

use crate::audio::EngineHandle;

/// Failures reported by an [`AudioEngine`](crate::audio::AudioEngine).
#[derive(Error, Debug)]
pub enum EngineError {
    /// The audio bytes could not be fetched from the catalog service.
    #[error("failed to fetch {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    /// The fetched bytes are not a decodable audio stream.
    #[error("failed to decode {uri}: {reason}")]
    Decode { uri: String, reason: String },

    /// The audio output device is unavailable.
    #[error("audio output error: {0}")]
    Output(String),

    /// A seek could not be carried out.
    #[error("seek failed: {0}")]
    Seek(String),

    /// A newer seek or load superseded this one. Expected while scrubbing.
    #[error("seek interrupted")]
    SeekInterrupted,

    /// The handle does not belong to the resource currently loaded.
    #[error("unknown engine handle {0:?}")]
    UnknownHandle(EngineHandle),

    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while fetching the remote catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog endpoint {url} answered {status}")]
    Status { url: String, status: u16 },

    #[error("invalid catalog payload from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Failures of the local key-value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The stored document exists but is not a JSON object.
    #[error("storage file {0} is not a JSON object")]
    Corrupt(String),
}

/// Crate-level error, used by configuration and runtime setup.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience Result type using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
