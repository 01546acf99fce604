use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use log::info;

use crate::audio::{EngineEvent, Transport};
use crate::library::{CatalogSource, Filter};
use crate::player::PlaybackController;
use crate::runtime::commands::{ControlCmd, HELP};
use crate::runtime::startup::load_catalog;

/// Where `refresh` fetches the catalog from.
pub struct CatalogRefresh<'a> {
    pub source: &'a dyn CatalogSource,
    pub extension: &'a str,
}

/// Last state printed, so only changes get announced.
#[derive(Debug, Default)]
pub struct EventLoopState {
    last_key: Option<String>,
    last_transport: Transport,
}

/// Drive the controller until `quit` or until the command channel closes.
///
/// Waits up to `poll` for a command, then lets the engine publish status
/// and applies every pending engine event.
pub fn run(
    controller: &mut PlaybackController,
    refresh: &CatalogRefresh<'_>,
    poll: Duration,
    control_rx: &Receiver<ControlCmd>,
    status_rx: &Receiver<EngineEvent>,
) -> io::Result<()> {
    let mut state = EventLoopState::default();
    loop {
        match control_rx.recv_timeout(poll) {
            Ok(cmd) => {
                let mut out = io::stdout();
                if handle_command(cmd, controller, refresh, &mut out)? {
                    info!("quit requested");
                    return Ok(());
                }
                out.flush()?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }

        controller.tick();
        while let Ok(event) = status_rx.try_recv() {
            controller.dispatch(event);
        }

        announce_changes(controller, &mut state, &mut io::stdout())?;
    }
}

/// Print a now-playing line when the active track or transport state changes.
pub fn announce_changes<W: Write>(
    controller: &PlaybackController,
    state: &mut EventLoopState,
    out: &mut W,
) -> io::Result<()> {
    let key = controller.active_track().map(|t| t.key.clone());
    let transport = controller.transport();
    if key != state.last_key || transport != state.last_transport {
        state.last_key = key;
        state.last_transport = transport;
        if state.last_key.is_some() {
            writeln!(out, "{}", status_line(controller))?;
        }
    }
    Ok(())
}

/// Apply one command. Returns `true` when the loop should exit.
pub fn handle_command<W: Write>(
    cmd: ControlCmd,
    controller: &mut PlaybackController,
    refresh: &CatalogRefresh<'_>,
    out: &mut W,
) -> io::Result<bool> {
    match cmd {
        ControlCmd::Quit => return Ok(true),
        ControlCmd::Help => writeln!(out, "{HELP}")?,
        ControlCmd::List => list_queue(controller, out)?,
        ControlCmd::Status => writeln!(out, "{}", status_line(controller))?,
        ControlCmd::PlayAt(n) => {
            if n > controller.queue_len() {
                writeln!(out, "no entry {n}; the queue has {}", controller.queue_len())?;
            } else {
                controller.play_at(n - 1);
            }
        }
        ControlCmd::PlayKey(key) => {
            if controller.catalog().position(&key).is_none() {
                writeln!(out, "unknown track {key}")?;
            } else {
                controller.play(&key);
            }
        }
        ControlCmd::PlayPause => controller.toggle_play_pause(),
        ControlCmd::Next => controller.next(),
        ControlCmd::Prev => controller.previous(),
        ControlCmd::ToggleShuffle => {
            controller.toggle_shuffle();
            let s = if controller.is_shuffled() { "on" } else { "off" };
            writeln!(out, "shuffle {s}")?;
        }
        ControlCmd::ToggleRepeat => {
            controller.toggle_repeat();
            writeln!(out, "repeat {}", controller.repeat_mode())?;
        }
        ControlCmd::Seek(fraction) => controller.seek(fraction),
        ControlCmd::Album(name) => select(controller, Some(Filter::Album(name)), out)?,
        ControlCmd::Artist(name) => select(controller, Some(Filter::Artist(name)), out)?,
        ControlCmd::Search(query) => select(controller, Some(Filter::Search(query)), out)?,
        ControlCmd::All => select(controller, None, out)?,
        ControlCmd::ToggleFavorite => match controller.active_track().map(|t| t.key.clone()) {
            Some(key) => {
                let now = controller.toggle_favorite(&key);
                let verb = if now { "added to" } else { "removed from" };
                writeln!(out, "{key} {verb} favorites")?;
            }
            None => writeln!(out, "nothing is playing")?,
        },
        ControlCmd::Favorites => {
            if controller.favorites().is_empty() {
                writeln!(out, "no favorites yet")?;
            }
            for key in controller.favorites() {
                writeln!(out, "  {key}")?;
            }
        }
        ControlCmd::Refresh => match load_catalog(refresh.source, refresh.extension) {
            Some(catalog) => {
                controller.replace_catalog(catalog);
                writeln!(out, "{} tracks", controller.catalog().len())?;
            }
            None => writeln!(out, "catalog unavailable, keeping the current one")?,
        },
    }
    Ok(false)
}

fn select<W: Write>(
    controller: &mut PlaybackController,
    filter: Option<Filter>,
    out: &mut W,
) -> io::Result<()> {
    let label = filter.as_ref().map_or_else(|| "all tracks".to_string(), |f| f.to_string());
    controller.select_filter(filter);
    writeln!(out, "{label}: {} tracks", controller.queue_len())
}

fn list_queue<W: Write>(controller: &PlaybackController, out: &mut W) -> io::Result<()> {
    if controller.queue_len() == 0 {
        return writeln!(out, "queue is empty");
    }
    let current = controller.current_index();
    for (pos, track) in controller.queue().enumerate() {
        let marker = if current == Some(pos) { '>' } else { ' ' };
        let fav = if controller.is_favorite(&track.key) { '*' } else { ' ' };
        writeln!(out, "{marker}{fav}{:>4}  {}  ({})", pos + 1, track.name, track.origin)?;
    }
    Ok(())
}

pub fn status_line(controller: &PlaybackController) -> String {
    let status = controller.status();
    let track = controller
        .active_track()
        .map_or_else(|| "-".to_string(), |t| format!("{} ({})", t.name, t.origin));
    format!(
        "[{}] {track} {} / {}  shuffle:{} repeat:{}",
        controller.transport(),
        format_time(status.position),
        format_time(status.duration),
        if controller.is_shuffled() { "on" } else { "off" },
        controller.repeat_mode(),
    )
}

pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
