//! Decoding fetched audio into paused `rodio` sinks.

use std::io::Cursor;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::EngineError;

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
///
/// Also returns the total duration when the decoder knows it.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    uri: &str,
    bytes: Vec<u8>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| EngineError::Decode {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    // Seeking rebuilds the sink and skips forward from the start.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
