use std::collections::BTreeSet;
use std::time::Duration;

use log::{debug, info, trace, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{
    AudioEngine, EngineEvent, EngineHandle, LoadGeneration, PlaybackStatus, RepeatMode, Transport,
};
use crate::error::EngineError;
use crate::library::{Catalog, Filter, Track, natural_order};
use crate::storage::TrackCollections;

use super::queue::Queue;

/// Owns the queue and drives one [`AudioEngine`].
///
/// Every operation runs to completion on the caller's thread and never
/// returns an error: engine and storage failures are logged and the
/// controller carries on.
pub struct PlaybackController {
    engine: Box<dyn AudioEngine>,
    base_url: String,
    catalog: Catalog,
    filter: Option<Filter>,
    queue: Queue,
    repeat: RepeatMode,
    /// Key of the track most recently passed to `play`.
    active: Option<String>,
    handle: Option<EngineHandle>,
    generation: LoadGeneration,
    status: PlaybackStatus,
    load_failed: bool,
    stopped_at_end: bool,
    collections: TrackCollections,
    rng: StdRng,
}

impl PlaybackController {
    pub fn new(
        engine: Box<dyn AudioEngine>,
        collections: TrackCollections,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            base_url: base_url.into(),
            catalog: Catalog::default(),
            filter: None,
            queue: Queue::default(),
            repeat: RepeatMode::default(),
            active: None,
            handle: None,
            generation: LoadGeneration::default(),
            status: PlaybackStatus::default(),
            load_failed: false,
            stopped_at_end: false,
            collections,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Use a deterministic shuffle sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ---- catalog and queue selection ----

    /// Install a freshly fetched catalog. The filter is cleared and the
    /// queue rebuilt; the active track keeps playing.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.filter = None;
        self.rebuild_queue();
    }

    /// Recompute the natural ordering for `filter` (`None` = whole catalog).
    pub fn select_filter(&mut self, filter: Option<Filter>) {
        self.filter = filter;
        self.rebuild_queue();
    }

    fn rebuild_queue(&mut self) {
        let natural = natural_order(&self.catalog, self.filter.as_ref());
        let active = self.active_index();
        let pinned = active.filter(|i| natural.contains(i));

        self.queue.set_natural(natural);
        if self.queue.is_shuffled() {
            self.queue.shuffle(&mut self.rng, pinned);
        }
        self.queue.relocate(active);
    }

    fn active_index(&self) -> Option<usize> {
        self.active
            .as_deref()
            .and_then(|key| self.catalog.position(key))
    }

    // ---- transport ----

    /// Load and start the track with `key`. Unknown keys are ignored.
    pub fn play(&mut self, key: &str) {
        match self.catalog.position(key) {
            Some(index) => self.play_catalog_index(index),
            None => warn!("cannot play unknown track {key}"),
        }
    }

    /// Play the track at `position` of the active ordering.
    pub fn play_at(&mut self, position: usize) {
        match self.queue.get(position) {
            Some(index) => self.play_catalog_index(index),
            None => warn!("no track at queue position {position}"),
        }
    }

    fn play_catalog_index(&mut self, index: usize) {
        let Some(track) = self.catalog.get(index) else {
            return;
        };
        let uri = track.uri(&self.base_url);
        let name = track.name.clone();
        self.active = Some(track.key.clone());

        // Keep next/previous consistent with the track just chosen.
        let natural = natural_order(&self.catalog, self.filter.as_ref());
        self.queue.set_natural(natural);
        if self.queue.is_shuffled() && !self.queue.shuffle_matches_natural(index) {
            self.queue.shuffle(&mut self.rng, Some(index));
        }
        self.queue.relocate(Some(index));

        self.release();
        self.generation = self.generation.next();
        self.status = PlaybackStatus::default();
        self.load_failed = false;
        self.stopped_at_end = false;

        match self.engine.load(&uri, self.generation) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.status.is_loaded = true;
                match self.engine.play(handle) {
                    Ok(()) => self.status.is_playing = true,
                    Err(e) => warn!("failed to start {uri}: {e}"),
                }
                info!("now playing {name}");
            }
            Err(e) => {
                // The selection stays visible even though nothing plays.
                warn!("failed to load {uri}: {e}");
                self.load_failed = true;
            }
        }
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.engine.unload(handle) {
                warn!("failed to release {handle:?}: {e}");
            }
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if !self.status.is_loaded {
            return;
        }
        let Some(handle) = self.handle else {
            return;
        };

        if self.stopped_at_end {
            // The engine has drained the track; start it over.
            if let Some(index) = self.active_index() {
                self.play_catalog_index(index);
            }
            return;
        }

        if self.status.is_playing {
            match self.engine.pause(handle) {
                Ok(()) => self.status.is_playing = false,
                Err(e) => warn!("pause failed: {e}"),
            }
        } else {
            match self.engine.play(handle) {
                Ok(()) => self.status.is_playing = true,
                Err(e) => warn!("resume failed: {e}"),
            }
        }
    }

    /// Jump to `fraction` (clamped to `0..=1`) of the track's duration.
    pub fn seek(&mut self, fraction: f64) {
        if !self.status.is_loaded {
            return;
        }
        let Some(handle) = self.handle else {
            return;
        };

        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let target = self.status.duration.mul_f64(fraction);

        match self.engine.seek_to(handle, target) {
            Ok(()) => {
                self.status.position = target;
                self.stopped_at_end = false;
            }
            Err(EngineError::SeekInterrupted) => trace!("seek to {target:?} interrupted"),
            Err(e) => warn!("seek to {target:?} failed: {e}"),
        }
    }

    pub fn next(&mut self) {
        self.advance();
    }

    pub fn previous(&mut self) {
        if let Some(position) = self.previous_position() {
            self.play_at(position);
        }
    }

    /// Move to the next position; false when the end of the queue holds us.
    fn advance(&mut self) -> bool {
        match self.next_position() {
            Some(position) => {
                self.play_at(position);
                true
            }
            None => false,
        }
    }

    fn next_position(&self) -> Option<usize> {
        let len = self.queue.len();
        if len == 0 {
            return None;
        }
        let current = self.queue.current();
        if self.repeat == RepeatMode::RepeatOne {
            return Some(current.unwrap_or(0));
        }

        let next = current.map_or(0, |c| c + 1);
        if next < len {
            Some(next)
        } else if self.repeat == RepeatMode::RepeatAll {
            Some(0)
        } else {
            None
        }
    }

    fn previous_position(&self) -> Option<usize> {
        let len = self.queue.len();
        if len == 0 {
            return None;
        }
        let current = self.queue.current();
        if self.repeat == RepeatMode::RepeatOne {
            return Some(current.unwrap_or(0));
        }

        match current {
            Some(c) if c > 0 => Some(c - 1),
            _ if self.repeat == RepeatMode::RepeatAll => Some(len - 1),
            _ => None,
        }
    }

    pub fn toggle_shuffle(&mut self) {
        let active = self.active_index();
        if self.queue.is_shuffled() {
            self.queue.unshuffle();
        } else {
            self.queue.shuffle(&mut self.rng, active);
        }
        self.queue.relocate(active);
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.cycled();
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    // ---- engine status ----

    /// Apply one engine status update. Updates from an earlier load are dropped.
    pub fn dispatch(&mut self, event: EngineEvent) {
        if event.generation != self.generation {
            debug!(
                "discarding stale engine status from {:?} (current {:?})",
                event.generation, self.generation
            );
            return;
        }

        let just_finished = event.status.just_finished;
        self.status = PlaybackStatus {
            just_finished: false,
            ..event.status
        };
        if just_finished {
            self.on_track_finished();
        }
    }

    fn on_track_finished(&mut self) {
        match self.repeat {
            RepeatMode::RepeatOne => self.restart_current(),
            RepeatMode::RepeatAll => {
                self.advance();
            }
            // Shuffled playback keeps going round the shuffled queue.
            RepeatMode::Off if self.queue.is_shuffled() => {
                if !self.advance() && !self.queue.is_empty() {
                    self.play_at(0);
                }
            }
            RepeatMode::Off => {
                if !self.advance() {
                    self.stop_at_end();
                }
            }
        }
    }

    fn restart_current(&mut self) {
        let Some(handle) = self.handle else {
            return;
        };
        match self.engine.seek_to(handle, Duration::ZERO) {
            Ok(()) | Err(EngineError::SeekInterrupted) => {}
            Err(e) => warn!("could not rewind for repeat: {e}"),
        }
        match self.engine.play(handle) {
            Ok(()) => {
                self.status.position = Duration::ZERO;
                self.status.is_playing = true;
            }
            Err(e) => warn!("could not restart for repeat: {e}"),
        }
    }

    fn stop_at_end(&mut self) {
        self.status.is_playing = false;
        self.stopped_at_end = true;
        info!("end of queue");
    }

    /// Give the engine a chance to publish status.
    pub fn tick(&mut self) {
        self.engine.tick();
    }

    // ---- favorites and downloads ----

    pub fn favorites(&self) -> &BTreeSet<String> {
        self.collections.favorites()
    }

    pub fn is_favorite(&self, key: &str) -> bool {
        self.collections.is_favorite(key)
    }

    pub fn add_favorite(&mut self, key: &str) -> bool {
        self.collections.add_favorite(key)
    }

    pub fn remove_favorite(&mut self, key: &str) -> bool {
        self.collections.remove_favorite(key)
    }

    pub fn toggle_favorite(&mut self, key: &str) -> bool {
        self.collections.toggle_favorite(key)
    }

    pub fn downloaded(&self) -> &BTreeSet<String> {
        self.collections.downloaded()
    }

    pub fn is_downloaded(&self, key: &str) -> bool {
        self.collections.is_downloaded(key)
    }

    pub fn mark_downloaded(&mut self, key: &str) -> bool {
        self.collections.mark_downloaded(key)
    }

    pub fn unmark_downloaded(&mut self, key: &str) -> bool {
        self.collections.unmark_downloaded(key)
    }

    // ---- read access ----

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn transport(&self) -> Transport {
        if self.active.is_none() || self.load_failed {
            Transport::Empty
        } else if !self.status.is_loaded || self.status.is_buffering {
            Transport::Loading
        } else if self.status.is_playing {
            Transport::Playing
        } else {
            Transport::Paused
        }
    }

    /// Position of the active track in the active ordering.
    pub fn current_index(&self) -> Option<usize> {
        self.queue.current()
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.active_index().and_then(|i| self.catalog.get(i))
    }

    /// Tracks in the order `next` walks them.
    pub fn queue(&self) -> impl Iterator<Item = &Track> + '_ {
        self.queue
            .active()
            .iter()
            .filter_map(|&i| self.catalog.get(i))
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn is_shuffled(&self) -> bool {
        self.queue.is_shuffled()
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }
}
