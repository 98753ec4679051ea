use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::audio::AudioDevice;
use crate::config;
use crate::engine::{PlaybackEngine, PlaybackState, Snapshot};
use crate::error::PlayerError;
use crate::library::{describe, scan};

use super::console::{self, Command, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Fields whose change is worth a fresh status line.
fn status_key(snap: &Snapshot) -> (PlaybackState, Option<usize>, bool) {
    (snap.state, snap.track_index, snap.shuffle)
}

/// Owner loop: waits for console lines with the configured poll interval,
/// applies device events on every pass and prints a status line whenever
/// the transport state changes. Returns when `quit` is entered or stdin closes.
pub fn run<D: AudioDevice, R: Rng, W: Write>(
    engine: &mut PlaybackEngine<D, R>,
    settings: &config::Settings,
    lines: &Receiver<String>,
    out: &mut W,
) -> io::Result<()> {
    let interval = Duration::from_millis(settings.console.poll_interval_ms.max(1));
    let mut last_key = status_key(&engine.snapshot());

    writeln!(out, "{}", console::status_line(&engine.snapshot(), engine.playlist()))?;

    loop {
        match lines.recv_timeout(interval) {
            Ok(line) => match console::parse(&line) {
                Ok(Some(cmd)) => {
                    if execute(engine, settings, cmd, out)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Ok(None) => {}
                Err(msg) => writeln!(out, "{msg}")?,
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("stdin closed");
                return Ok(());
            }
        }

        if let Err(e) = engine.process_device_events() {
            report(out, &e)?;
        }

        let snap = engine.snapshot();
        let key = status_key(&snap);
        if key != last_key {
            writeln!(out, "{}", console::status_line(&snap, engine.playlist()))?;
            last_key = key;
        }
    }
}

fn execute<D: AudioDevice, R: Rng, W: Write>(
    engine: &mut PlaybackEngine<D, R>,
    settings: &config::Settings,
    cmd: Command,
    out: &mut W,
) -> io::Result<Flow> {
    debug!(?cmd, "console command");
    let result = match cmd {
        Command::Play(Some(index)) => engine.play(index),
        Command::Play(None) => engine.play_current(),
        Command::Pause => {
            engine.pause();
            Ok(())
        }
        Command::Stop => {
            engine.stop();
            Ok(())
        }
        Command::Seek(percent) => engine.seek_to(percent),
        Command::Volume(percent) => {
            let result = engine.set_volume(percent);
            writeln!(out, "volume {}", engine.snapshot().volume)?;
            result
        }
        Command::Next => engine.next().map(|_| ()),
        Command::Prev => engine.previous().map(|_| ()),
        Command::Shuffle => {
            let on = engine.toggle_shuffle();
            writeln!(out, "shuffle {}", if on { "on" } else { "off" })?;
            Ok(())
        }
        Command::Add(path) => {
            let track = describe(&path);
            writeln!(out, "added {} as {}", track.display, engine.playlist().len())?;
            engine.add_track(track);
            Ok(())
        }
        Command::Load(dir) => {
            load_dir(engine, settings, &dir, out)?;
            Ok(())
        }
        Command::Clear => {
            engine.clear_playlist();
            writeln!(out, "playlist cleared")?;
            Ok(())
        }
        Command::List => {
            writeln!(out, "{}", console::listing(engine.playlist()))?;
            Ok(())
        }
        Command::Status => {
            writeln!(out, "{}", console::status_line(&engine.snapshot(), engine.playlist()))?;
            Ok(())
        }
        Command::Config => {
            match settings.to_toml() {
                Ok(text) => write!(out, "{text}")?,
                Err(e) => writeln!(out, "cannot render config: {e}")?,
            }
            Ok(())
        }
        Command::Help => {
            writeln!(out, "{HELP}")?;
            Ok(())
        }
        Command::Quit => return Ok(Flow::Quit),
    };

    if let Err(e) = result {
        report(out, &e)?;
    }
    Ok(Flow::Continue)
}

/// Replace the playlist with the contents of `dir`. An empty result keeps the
/// current playlist.
fn load_dir<D: AudioDevice, R: Rng, W: Write>(
    engine: &mut PlaybackEngine<D, R>,
    settings: &config::Settings,
    dir: &Path,
    out: &mut W,
) -> io::Result<()> {
    let tracks = scan(dir, &settings.library);
    if tracks.is_empty() {
        return writeln!(out, "no WAV files found in {}", dir.display());
    }
    let count = tracks.len();
    engine.load_tracks(tracks);
    writeln!(out, "loaded {count} track(s) from {}", dir.display())
}

fn report<W: Write>(out: &mut W, e: &PlayerError) -> io::Result<()> {
    if e.is_fatal() {
        writeln!(out, "error: {e}")
    } else {
        writeln!(out, "ignored: {e}")
    }
}
