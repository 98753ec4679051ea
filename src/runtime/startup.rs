use rand::Rng;

use crate::audio::AudioDevice;
use crate::config;
use crate::engine::PlaybackEngine;

pub fn apply_playback_defaults<D: AudioDevice, R: Rng>(
    engine: &mut PlaybackEngine<D, R>,
    settings: &config::Settings,
) {
    engine.set_shuffle(settings.playback.shuffle);
    engine.set_auto_advance(settings.playback.auto_advance);
    // Nothing is open yet, so this only records the level for the first `play`.
    let _ = engine.set_volume(f64::from(settings.playback.volume));
}
