//! Line-oriented control commands read from stdin.

use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread;

use log::debug;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum ControlCmd {
    List,
    /// One-based position in the listing.
    PlayAt(usize),
    PlayKey(String),
    PlayPause,
    Next,
    Prev,
    ToggleShuffle,
    ToggleRepeat,
    Seek(f64),
    Album(String),
    Artist(String),
    Search(String),
    All,
    ToggleFavorite,
    Favorites,
    Status,
    Refresh,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument for `{command}`: {value}")]
    InvalidArgument { command: &'static str, value: String },
}

pub const HELP: &str = "\
commands:
  ls                 list the current queue
  play <n>           play entry n of the listing
  key <track-key>    play a track by catalog key
  p, pause           toggle play/pause
  n, next            next track
  b, prev            previous track
  s, shuffle         toggle shuffle
  r, repeat          cycle repeat mode (off, repeat-all, repeat-one)
  seek <0..1>        jump to a fraction of the track
  album <name>       queue one album
  artist <name>      queue one artist
  search <query>     queue tracks whose name matches
  all                queue the whole catalog
  fav                toggle favorite on the playing track
  favs               list favorites
  status             show what is playing
  refresh            fetch the catalog again
  q, quit            exit";

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<ControlCmd>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "ls" | "list" => ControlCmd::List,
        "play" => {
            let n = required("play", rest)?;
            match n.parse::<usize>() {
                Ok(n) if n >= 1 => ControlCmd::PlayAt(n),
                _ => {
                    return Err(CommandError::InvalidArgument {
                        command: "play",
                        value: n.to_string(),
                    });
                }
            }
        }
        "key" => ControlCmd::PlayKey(required("key", rest)?.to_string()),
        "p" | "pause" => ControlCmd::PlayPause,
        "n" | "next" => ControlCmd::Next,
        "b" | "prev" => ControlCmd::Prev,
        "s" | "shuffle" => ControlCmd::ToggleShuffle,
        "r" | "repeat" => ControlCmd::ToggleRepeat,
        "seek" => {
            let v = required("seek", rest)?;
            let fraction = v.parse::<f64>().map_err(|_| CommandError::InvalidArgument {
                command: "seek",
                value: v.to_string(),
            })?;
            ControlCmd::Seek(fraction)
        }
        "album" => ControlCmd::Album(required("album", rest)?.to_string()),
        "artist" => ControlCmd::Artist(required("artist", rest)?.to_string()),
        "search" => ControlCmd::Search(required("search", rest)?.to_string()),
        "all" => ControlCmd::All,
        "fav" => ControlCmd::ToggleFavorite,
        "favs" => ControlCmd::Favorites,
        "status" => ControlCmd::Status,
        "refresh" => ControlCmd::Refresh,
        "help" | "?" => ControlCmd::Help,
        "q" | "quit" | "exit" => ControlCmd::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

/// Read commands from stdin on a background thread. End of input sends `Quit`.
pub fn spawn_stdin_reader(tx: Sender<ControlCmd>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    debug!("stdin closed: {e}");
                    break;
                }
            };
            match parse(&line) {
                Ok(Some(cmd)) => {
                    if tx.send(cmd).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => println!("{e} (try `help`)"),
            }
        }
        let _ = tx.send(ControlCmd::Quit);
    });
}
