//! Binary glue: settings, logging, the initial library scan and the console
//! loop around a `PlaybackEngine` on the default rodio output.

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::audio::RodioDevice;
use crate::engine::PlaybackEngine;
use crate::library::scan;

mod console;
mod event_loop;
mod logging;
mod settings;
mod startup;

/// Directory scanned when neither the command line nor the config names one.
pub const DEFAULT_MUSIC_DIR: &str = "music";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let settings = settings::load_settings();

    let dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.console.music_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MUSIC_DIR));

    let tracks = scan(&dir, &settings.library);
    if tracks.is_empty() {
        warn!(dir = %dir.display(), "no tracks found; use `load DIR` or `add FILE`");
    }

    let device = RodioDevice::open_default()?;
    let mut engine = PlaybackEngine::new(device, tracks);
    startup::apply_playback_defaults(&mut engine, &settings);
    info!(tracks = engine.playlist().len(), "ready");

    let lines = console::spawn_reader()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    event_loop::run(&mut engine, &settings, &lines, &mut out)?;

    engine.stop();
    Ok(())
}
