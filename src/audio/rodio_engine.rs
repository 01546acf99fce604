use std::time::Duration;

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::EngineError;

use super::engine::{AudioEngine, EngineEvent, EngineHandle, StatusSender};
use super::sink::create_sink_at;
use super::types::{LoadGeneration, PlaybackStatus};

/// The resource behind the one live [`EngineHandle`].
struct Loaded {
    handle: EngineHandle,
    generation: LoadGeneration,
    uri: String,
    // Kept so seeking can rebuild the sink at an offset.
    bytes: Vec<u8>,
    sink: Sink,
    duration: Option<Duration>,
    // Where the current sink started inside the track.
    offset: Duration,
    playing: bool,
    finished_reported: bool,
}

impl Loaded {
    fn status(&self, just_finished: bool) -> PlaybackStatus {
        let duration = self.duration.unwrap_or_default();
        let mut position = self.offset + self.sink.get_pos();
        if !duration.is_zero() {
            position = position.min(duration);
        }
        PlaybackStatus {
            is_playing: self.playing && !self.sink.empty(),
            position,
            duration,
            is_buffering: false,
            just_finished,
            is_loaded: true,
        }
    }
}

/// [`AudioEngine`] backed by the default `rodio` output device.
///
/// Remote URIs are downloaded whole before decoding; anything else is read
/// as a local path. Status is published from [`AudioEngine::tick`], so the
/// output stream never leaves the thread that owns the engine.
pub struct RodioEngine {
    stream: OutputStream,
    http: reqwest::blocking::Client,
    status_tx: StatusSender,
    next_handle: u64,
    current: Option<Loaded>,
}

impl RodioEngine {
    pub fn new(status_tx: StatusSender, request_timeout: Duration) -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would land
        // in the middle of the command output.
        stream.log_on_drop(false);

        let http = reqwest::blocking::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| EngineError::Output(e.to_string()))?;

        Ok(Self {
            stream,
            http,
            status_tx,
            next_handle: 1,
            current: None,
        })
    }

    fn fetch(&self, uri: &str) -> Result<Vec<u8>, EngineError> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            let fetch_err = |e: reqwest::Error| EngineError::Fetch {
                uri: uri.to_string(),
                reason: e.to_string(),
            };
            let response = self
                .http
                .get(uri)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(fetch_err)?;
            let bytes = response.bytes().map_err(fetch_err)?;
            Ok(bytes.to_vec())
        } else {
            Ok(std::fs::read(uri)?)
        }
    }

    fn loaded_mut(&mut self, handle: EngineHandle) -> Result<&mut Loaded, EngineError> {
        match self.current.as_mut() {
            Some(l) if l.handle == handle => Ok(l),
            _ => Err(EngineError::UnknownHandle(handle)),
        }
    }

    fn publish(&self, generation: LoadGeneration, status: PlaybackStatus) {
        // The receiver only goes away during shutdown.
        let _ = self.status_tx.send(EngineEvent { generation, status });
    }

    fn publish_current(&self) {
        if let Some(l) = self.current.as_ref() {
            self.publish(l.generation, l.status(false));
        }
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, uri: &str, generation: LoadGeneration) -> Result<EngineHandle, EngineError> {
        let bytes = self.fetch(uri)?;
        let (sink, duration) = create_sink_at(&self.stream, uri, bytes.clone(), Duration::ZERO)?;

        if let Some(old) = self.current.take() {
            old.sink.stop();
        }

        let handle = EngineHandle(self.next_handle);
        self.next_handle += 1;
        debug!("loaded {uri} as {handle:?} ({generation:?})");

        self.current = Some(Loaded {
            handle,
            generation,
            uri: uri.to_string(),
            bytes,
            sink,
            duration,
            offset: Duration::ZERO,
            playing: false,
            finished_reported: false,
        });
        self.publish_current();
        Ok(handle)
    }

    fn play(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        let loaded = self.loaded_mut(handle)?;
        loaded.sink.play();
        loaded.playing = true;
        loaded.finished_reported = false;
        self.publish_current();
        Ok(())
    }

    fn pause(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        let loaded = self.loaded_mut(handle)?;
        loaded.sink.pause();
        loaded.playing = false;
        self.publish_current();
        Ok(())
    }

    fn seek_to(&mut self, handle: EngineHandle, position: Duration) -> Result<(), EngineError> {
        let stream = &self.stream;
        let loaded = match self.current.as_mut() {
            Some(l) if l.handle == handle => l,
            // A handle we issued earlier was superseded by a newer load.
            _ if handle.0 < self.next_handle => return Err(EngineError::SeekInterrupted),
            _ => return Err(EngineError::UnknownHandle(handle)),
        };

        // Scrubbing: rebuild the sink and skip into the track.
        let (sink, _) = create_sink_at(stream, &loaded.uri, loaded.bytes.clone(), position)
            .map_err(|e| EngineError::Seek(e.to_string()))?;
        loaded.sink.stop();
        if loaded.playing {
            sink.play();
        }
        loaded.sink = sink;
        loaded.offset = position;
        loaded.finished_reported = false;
        self.publish_current();
        Ok(())
    }

    fn unload(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        match self.current.take() {
            Some(l) if l.handle == handle => {
                l.sink.stop();
            }
            other => {
                if other.is_some() {
                    warn!("unload of {handle:?} ignored, another resource is loaded");
                }
                self.current = other;
            }
        }
        Ok(())
    }

    fn tick(&mut self) {
        let Some(loaded) = self.current.as_mut() else {
            return;
        };

        let just_finished = loaded.playing && loaded.sink.empty() && !loaded.finished_reported;
        if just_finished {
            loaded.finished_reported = true;
            loaded.playing = false;
        }
        let generation = loaded.generation;
        let status = loaded.status(just_finished);
        self.publish(generation, status);
    }
}
