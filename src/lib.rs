//! allegro: a WAV playback engine with playlist navigation.
//!
//! `engine::PlaybackEngine` owns one playing track at a time and drives an
//! `audio::AudioDevice`; `playlist::Playlist` resolves sequential and shuffle
//! navigation; `library::scan` finds WAV files on disk. The `runtime` module
//! wraps all of it in a line-based console for the `allegro` binary.

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod library;
pub mod playlist;
pub mod runtime;

pub use error::{PlayerError, Result};
