use std::time::Duration;

use super::commands::{CommandError, ControlCmd, parse};
use super::event_loop::{
    CatalogRefresh, EventLoopState, announce_changes, format_time, handle_command, status_line,
};
use crate::audio::{AudioEngine, EngineHandle, LoadGeneration};
use crate::error::{CatalogError, EngineError};
use crate::library::{Catalog, CatalogEntry, CatalogSource, Track};
use crate::player::PlaybackController;
use crate::storage::{MemoryStore, TrackCollections};

struct SilentEngine;

impl AudioEngine for SilentEngine {
    fn load(&mut self, _uri: &str, generation: LoadGeneration) -> Result<EngineHandle, EngineError> {
        Ok(EngineHandle(generation.get()))
    }
    fn play(&mut self, _handle: EngineHandle) -> Result<(), EngineError> {
        Ok(())
    }
    fn pause(&mut self, _handle: EngineHandle) -> Result<(), EngineError> {
        Ok(())
    }
    fn seek_to(&mut self, _handle: EngineHandle, _position: Duration) -> Result<(), EngineError> {
        Ok(())
    }
    fn unload(&mut self, _handle: EngineHandle) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Serves one album, or nothing at all when `down`.
struct OneAlbum {
    down: bool,
}

fn entry(name: &str, key: &str) -> CatalogEntry {
    CatalogEntry {
        name: name.into(),
        key: key.into(),
        size: 0,
        last_modified: None,
    }
}

impl CatalogSource for OneAlbum {
    fn albums(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        if self.down {
            return Err(CatalogError::Status {
                url: "http://catalog/albums".into(),
                status: 503,
            });
        }
        Ok(vec![entry("Hymns", "album/Hymns/")])
    }
    fn artists(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        Ok(Vec::new())
    }
    fn album_tracks(&self, _album: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        Ok(vec![
            entry("Abide.mp3", "album/Hymns/Abide.mp3"),
            entry("Be Thou.mp3", "album/Hymns/Be Thou.mp3"),
            entry("cover.jpg", "album/Hymns/cover.jpg"),
        ])
    }
    fn artist_tracks(&self, _artist: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        Ok(Vec::new())
    }
}

fn controller() -> PlaybackController {
    let collections = TrackCollections::load(Box::new(MemoryStore::new()));
    let mut c = PlaybackController::new(Box::new(SilentEngine), collections, "http://catalog");
    c.replace_catalog(Catalog::new(vec![
        Track::from_key("album/Advent/Silent Night.mp3", "Silent Night.mp3").unwrap(),
        Track::from_key("album/Advent/O Come.mp3", "O Come.mp3").unwrap(),
        Track::from_key("artist/Choir/Gloria.mp3", "Gloria.mp3").unwrap(),
    ]));
    c
}

fn run_cmd(c: &mut PlaybackController, source: &OneAlbum, cmd: ControlCmd) -> (bool, String) {
    let refresh = CatalogRefresh {
        source,
        extension: "mp3",
    };
    let mut out = Vec::new();
    let quit = handle_command(cmd, c, &refresh, &mut out).unwrap();
    (quit, String::from_utf8(out).unwrap())
}

#[test]
fn parse_accepts_short_and_long_forms() {
    assert_eq!(parse("n").unwrap(), Some(ControlCmd::Next));
    assert_eq!(parse("  NEXT ").unwrap(), Some(ControlCmd::Next));
    assert_eq!(parse("b").unwrap(), Some(ControlCmd::Prev));
    assert_eq!(parse("p").unwrap(), Some(ControlCmd::PlayPause));
    assert_eq!(parse("play 3").unwrap(), Some(ControlCmd::PlayAt(3)));
    assert_eq!(parse("seek 0.5").unwrap(), Some(ControlCmd::Seek(0.5)));
    assert_eq!(
        parse("album Advent Songs").unwrap(),
        Some(ControlCmd::Album("Advent Songs".into()))
    );
    assert_eq!(
        parse("key album/Advent/O Come.mp3").unwrap(),
        Some(ControlCmd::PlayKey("album/Advent/O Come.mp3".into()))
    );
    assert_eq!(parse("q").unwrap(), Some(ControlCmd::Quit));
    assert_eq!(parse("   ").unwrap(), None);
}

#[test]
fn parse_rejects_bad_input() {
    assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".into())));
    assert_eq!(parse("album"), Err(CommandError::MissingArgument("album")));
    assert!(matches!(
        parse("play 0"),
        Err(CommandError::InvalidArgument { command: "play", .. })
    ));
    assert!(matches!(
        parse("seek half"),
        Err(CommandError::InvalidArgument { command: "seek", .. })
    ));
}

#[test]
fn play_uses_one_based_listing_positions() {
    let mut c = controller();
    let source = OneAlbum { down: false };

    let (quit, out) = run_cmd(&mut c, &source, ControlCmd::PlayAt(2));
    assert!(!quit);
    assert!(out.is_empty());
    assert_eq!(c.current_index(), Some(1));

    let (_, out) = run_cmd(&mut c, &source, ControlCmd::PlayAt(9));
    assert!(out.contains("no entry 9"));
    assert_eq!(c.current_index(), Some(1));

    let (_, out) = run_cmd(&mut c, &source, ControlCmd::List);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with('>'));
    assert!(lines[1].contains("O Come"));
}

#[test]
fn filters_report_queue_size() {
    let mut c = controller();
    let source = OneAlbum { down: false };

    let (_, out) = run_cmd(&mut c, &source, ControlCmd::Album("Advent".into()));
    assert_eq!(out.trim(), "album \"Advent\": 2 tracks");
    let (_, out) = run_cmd(&mut c, &source, ControlCmd::Search("glo".into()));
    assert_eq!(out.trim(), "search \"glo\": 1 tracks");
    let (_, out) = run_cmd(&mut c, &source, ControlCmd::All);
    assert_eq!(out.trim(), "all tracks: 3 tracks");
}

#[test]
fn fav_toggles_the_playing_track() {
    let mut c = controller();
    let source = OneAlbum { down: false };

    let (_, out) = run_cmd(&mut c, &source, ControlCmd::ToggleFavorite);
    assert_eq!(out.trim(), "nothing is playing");

    run_cmd(&mut c, &source, ControlCmd::PlayAt(3));
    let (_, out) = run_cmd(&mut c, &source, ControlCmd::ToggleFavorite);
    assert!(out.contains("added to favorites"));
    let (_, out) = run_cmd(&mut c, &source, ControlCmd::Favorites);
    assert_eq!(out.trim(), "artist/Choir/Gloria.mp3");

    run_cmd(&mut c, &source, ControlCmd::ToggleFavorite);
    let (_, out) = run_cmd(&mut c, &source, ControlCmd::Favorites);
    assert_eq!(out.trim(), "no favorites yet");
}

#[test]
fn refresh_replaces_the_catalog_or_keeps_it() {
    let mut c = controller();

    let (_, out) = run_cmd(&mut c, &OneAlbum { down: true }, ControlCmd::Refresh);
    assert!(out.contains("keeping the current one"));
    assert_eq!(c.catalog().len(), 3);

    let (_, out) = run_cmd(&mut c, &OneAlbum { down: false }, ControlCmd::Refresh);
    assert_eq!(out.trim(), "2 tracks");
    assert!(c.catalog().position("album/Hymns/Abide.mp3").is_some());
}

#[test]
fn quit_stops_the_loop() {
    let mut c = controller();
    let (quit, _) = run_cmd(&mut c, &OneAlbum { down: false }, ControlCmd::Quit);
    assert!(quit);
}

#[test]
fn changes_are_announced_once() {
    let mut c = controller();
    let mut state = EventLoopState::default();
    let mut out = Vec::new();

    announce_changes(&c, &mut state, &mut out).unwrap();
    assert!(out.is_empty());

    c.play_at(0);
    announce_changes(&c, &mut state, &mut out).unwrap();
    announce_changes(&c, &mut state, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("[playing] Silent Night"));
}

#[test]
fn status_line_shows_modes() {
    let mut c = controller();
    assert!(status_line(&c).starts_with("[stopped] -"));
    c.toggle_shuffle();
    c.toggle_repeat();
    let line = status_line(&c);
    assert!(line.ends_with("shuffle:on repeat:repeat-all"));
}

#[test]
fn time_is_minutes_and_seconds() {
    assert_eq!(format_time(Duration::ZERO), "00:00");
    assert_eq!(format_time(Duration::from_millis(185_900)), "03:05");
}
