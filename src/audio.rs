//! Audio engine capability and the value types shared with the controller.
//!
//! The controller only talks to the [`AudioEngine`] trait. [`RodioEngine`]
//! is the implementation used by the binary.

mod engine;
mod rodio_engine;
mod sink;
mod types;

pub use engine::{AudioEngine, EngineEvent, EngineHandle, StatusSender};
pub use rodio_engine::RodioEngine;
pub use types::{LoadGeneration, PlaybackStatus, RepeatMode, Transport};

#[cfg(test)]
mod tests;
