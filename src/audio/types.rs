//! Audio-related small value types.
//!
//! This module defines the repeat mode, the live transport status reported
//! by the engine and the load generation used to tag engine updates.

use std::fmt;
use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the end of the current queue.
    #[default]
    Off,
    /// Wrap around to the start of the current queue.
    RepeatAll,
    /// Restart the current track when it ends.
    RepeatOne,
}

impl RepeatMode {
    /// The mode that follows `self` in the `Off -> RepeatAll -> RepeatOne` cycle.
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::RepeatAll,
            RepeatMode::RepeatAll => RepeatMode::RepeatOne,
            RepeatMode::RepeatOne => RepeatMode::Off,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepeatMode::Off => "off",
            RepeatMode::RepeatAll => "repeat-all",
            RepeatMode::RepeatOne => "repeat-one",
        };
        f.write_str(s)
    }
}

/// Identifies which `play()` invocation an engine resource or status update
/// belongs to. Strictly increasing for the life of a controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadGeneration(u64);

impl LoadGeneration {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Live transport status of the engine for the currently loaded track.
///
/// `position` and `duration` only mean something while `is_loaded` is true.
/// `just_finished` is an edge: it is set on exactly one update per natural
/// end of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub position: Duration,
    /// Zero until the engine knows the length of the track.
    pub duration: Duration,
    pub is_buffering: bool,
    pub just_finished: bool,
    pub is_loaded: bool,
}

impl PlaybackStatus {
    /// Position as a fraction of the duration, `0.0` when the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Coarse view of the controller's state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Transport {
    /// Nothing loaded: no track was ever played, or the last load failed.
    #[default]
    Empty,
    /// A track is selected and the engine is still preparing it.
    Loading,
    Paused,
    Playing,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transport::Empty => "stopped",
            Transport::Loading => "loading",
            Transport::Paused => "paused",
            Transport::Playing => "playing",
        };
        f.write_str(s)
    }
}
