//! Line-based command console.
//!
//! Stdin is read on its own thread and handed to the owner loop over a
//! channel, so a blocking read never holds up event processing.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::engine::{PlaybackState, Snapshot, format_time};
use crate::playlist::Playlist;

pub const HELP: &str = "\
commands:
  play [N]      play track N (zero-based), or resume / play the selected track
  resume        same as `play` without an index
  pause         pause playback
  stop          stop playback
  seek P        jump to P percent of the track and play
  volume P      set volume to P percent
  next, prev    play the next / previous track
  shuffle       toggle shuffle
  add PATH      append a file to the playlist
  load DIR      replace the playlist with the WAV files in DIR
  clear         stop and empty the playlist
  list          show the playlist
  status        show the current state
  config        print the effective settings
  help          show this text
  quit          exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(Option<usize>),
    Pause,
    Stop,
    Seek(f64),
    Volume(f64),
    Next,
    Prev,
    Shuffle,
    Add(PathBuf),
    Load(PathBuf),
    Clear,
    List,
    Status,
    Config,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "play" | "p" if rest.is_empty() => Command::Play(None),
        "play" | "p" => Command::Play(Some(
            rest.parse()
                .map_err(|_| format!("not a track number: {rest}"))?,
        )),
        "resume" => Command::Play(None),
        "pause" => Command::Pause,
        "stop" => Command::Stop,
        "seek" => Command::Seek(percent(rest)?),
        "volume" | "vol" => Command::Volume(percent(rest)?),
        "next" | "n" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "shuffle" => Command::Shuffle,
        "add" => Command::Add(path(rest)?),
        "load" => Command::Load(path(rest)?),
        "clear" => Command::Clear,
        "list" | "ls" => Command::List,
        "status" => Command::Status,
        "config" => Command::Config,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(cmd))
}

fn percent(arg: &str) -> Result<f64, String> {
    let value = arg.trim_end_matches('%');
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("not a percentage: {arg}"))
}

fn path(arg: &str) -> Result<PathBuf, String> {
    if arg.is_empty() {
        Err("missing path".to_string())
    } else {
        Ok(PathBuf::from(arg))
    }
}

/// Spawn the stdin reader. The channel closes when stdin does.
pub fn spawn_reader() -> io::Result<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("allegro-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// One-line status, e.g. `▶ 2 Song 0:13 / 3:40 (6%)`.
pub fn status_line(snap: &Snapshot, playlist: &Playlist) -> String {
    let shuffle = if snap.shuffle { " [shuffle]" } else { "" };
    let icon = match snap.state {
        PlaybackState::Stopped => return format!("■ stopped{shuffle}"),
        PlaybackState::Playing => "▶",
        PlaybackState::Paused => "⏸",
    };
    let (index, name) = match snap.track_index.and_then(|i| playlist.get(i).map(|t| (i, t))) {
        Some((i, track)) => (i.to_string(), track.display.as_str()),
        None => ("-".to_string(), ""),
    };
    format!(
        "{icon} {index} {name} {} / {} ({}%) vol {}{shuffle}",
        format_time(snap.elapsed_seconds),
        format_time(snap.total_seconds),
        snap.progress_percent,
        snap.volume,
    )
}

/// Numbered playlist listing with a marker on the cursor.
pub fn listing(playlist: &Playlist) -> String {
    if playlist.is_empty() {
        return "playlist is empty".to_string();
    }
    playlist
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let marker = if playlist.current_index() == Some(i) {
                '>'
            } else {
                ' '
            };
            format!("{marker} {i:>3}  {}", t.display)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
