//! The single-track audio engine capability the controller drives.

use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::error::EngineError;

use super::types::{LoadGeneration, PlaybackStatus};

/// Opaque handle to one loaded engine resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EngineHandle(pub u64);

/// A status update pushed by the engine, tagged with the generation of the
/// `load` it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineEvent {
    pub generation: LoadGeneration,
    pub status: PlaybackStatus,
}

/// Channel end an engine publishes its [`EngineEvent`]s on.
pub type StatusSender = Sender<EngineEvent>;

/// Plays one track at a time.
///
/// Implementations receive a [`StatusSender`] at construction and push
/// status updates through it; the controller discards any update whose
/// generation is not the one it last loaded.
pub trait AudioEngine {
    /// Load `uri` paused. Any status published for this resource must carry `generation`.
    fn load(&mut self, uri: &str, generation: LoadGeneration) -> Result<EngineHandle, EngineError>;

    fn play(&mut self, handle: EngineHandle) -> Result<(), EngineError>;

    fn pause(&mut self, handle: EngineHandle) -> Result<(), EngineError>;

    fn seek_to(&mut self, handle: EngineHandle, position: Duration) -> Result<(), EngineError>;

    /// Release the resource. Unloading an unknown handle is not an error.
    fn unload(&mut self, handle: EngineHandle) -> Result<(), EngineError>;

    /// Periodic hook for engines that poll their backend to publish status.
    fn tick(&mut self) {}
}
