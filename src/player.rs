//! The playback queue controller.
//!
//! [`PlaybackController`] keeps the ordered track list, the current
//! position and the shuffle/repeat modes, and drives a single-track
//! [`AudioEngine`](crate::audio::AudioEngine) so that skipping, shuffling and
//! auto-advance behave the same however a track was chosen.

mod controller;
mod queue;

pub use controller::PlaybackController;
pub use queue::Queue;
