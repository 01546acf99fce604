//! cantor: a playback queue controller for a remote music catalog.
//!
//! The [`player::PlaybackController`] owns the queue (natural and shuffled
//! orderings, repeat mode, favorites) and drives an [`audio::AudioEngine`].
//! [`runtime::run`] wires it to the rodio engine, the HTTP catalog and a
//! line-based command loop.

pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod player;
pub mod runtime;
pub mod storage;

pub use error::{Error, Result};
