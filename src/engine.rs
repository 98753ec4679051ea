//! Playback engine: one active track, transport operations and playlist
//! navigation.
//!
//! The engine is driven from a single owner thread. Device threads only talk
//! to it through the `DeviceEvent` channel, which the owner drains with
//! `process_device_events`. Display code reads state through `snapshot` and
//! the progress accessors, none of which mutate anything.

mod session;

use std::sync::mpsc::{self, Receiver, Sender};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::audio::{AudioDevice, AudioResource, DeviceEvent, EndOfStream};
use crate::error::{PlayerError, Result};
use crate::library::Track;
use crate::playlist::Playlist;

pub use session::{PlaybackState, Snapshot, format_time};
use session::Session;

/// Volume applied until the first `set_volume`.
pub const DEFAULT_VOLUME: f64 = 50.0;

pub struct PlaybackEngine<D: AudioDevice, R: Rng = StdRng> {
    device: D,
    playlist: Playlist,
    session: Session<D::Resource>,
    rng: R,
    auto_advance: bool,
    events_tx: Sender<DeviceEvent>,
    events_rx: Receiver<DeviceEvent>,
}

impl<D: AudioDevice> PlaybackEngine<D> {
    /// Create an engine whose shuffle draws from an OS-seeded generator.
    pub fn new(device: D, tracks: Vec<Track>) -> Self {
        Self::with_rng(device, tracks, StdRng::from_os_rng())
    }
}

impl<D: AudioDevice, R: Rng> PlaybackEngine<D, R> {
    /// Create an engine with an injected shuffle generator.
    pub fn with_rng(device: D, tracks: Vec<Track>, rng: R) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            device,
            playlist: Playlist::new(tracks),
            session: Session::new(DEFAULT_VOLUME),
            rng,
            auto_advance: true,
            events_tx,
            events_rx,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state
    }

    pub fn track_index(&self) -> Option<usize> {
        self.session.track_index
    }

    pub fn saved_frame_position(&self) -> Option<u64> {
        self.session.saved_frame
    }

    pub fn frame_count(&self) -> u64 {
        self.session.frame_count
    }

    pub fn volume(&self) -> f64 {
        self.session.gain_percent
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    /// Whether a finished track moves on to the next one (otherwise the engine stops).
    pub fn set_auto_advance(&mut self, auto_advance: bool) {
        self.auto_advance = auto_advance;
    }

    /// Current frame of the bound track, or 0 with nothing open.
    pub fn frame_position(&self) -> u64 {
        let Some(resource) = self.session.resource.as_ref() else {
            return 0;
        };
        let frame = match (self.session.state, self.session.saved_frame) {
            (PlaybackState::Paused, Some(saved)) => saved,
            _ => resource.frame_position(),
        };
        frame.min(self.session.frame_count)
    }

    /// Play track `index`.
    ///
    /// Resumes in place when `index` is the paused track; otherwise the old
    /// resource is closed and `index` starts from its first frame. Resuming a
    /// track paused on its last frame finishes it instead (advance or stop).
    /// On an open failure the engine is left `Stopped`.
    pub fn play(&mut self, index: usize) -> Result<()> {
        self.playlist.check(index)?;

        if self.session.state == PlaybackState::Paused && self.session.track_index == Some(index) {
            return self.resume_paused(index);
        }
        self.open_and_start(index)
    }

    /// Play the paused track, or the playlist cursor when stopped.
    pub fn play_current(&mut self) -> Result<()> {
        match self.session.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => match self.session.track_index {
                Some(index) => self.play(index),
                None => Err(PlayerError::invalid_index(None, self.playlist.len())),
            },
            PlaybackState::Stopped => match self.playlist.current_index() {
                Some(index) => self.play(index),
                None => Err(PlayerError::invalid_index(None, self.playlist.len())),
            },
        }
    }

    /// Suspend output and remember the position. Ignored unless playing.
    pub fn pause(&mut self) {
        if self.session.state != PlaybackState::Playing {
            return;
        }
        let Some(resource) = self.session.resource.as_mut() else {
            return;
        };
        let frame = resource.frame_position().min(self.session.frame_count);
        resource.suspend();
        self.session.saved_frame = Some(frame);
        self.session.state = PlaybackState::Paused;
        debug!(frame, "paused");
    }

    /// Close the resource and forget the bound track. The playlist cursor stays.
    pub fn stop(&mut self) {
        let was = self.session.state;
        self.release();
        self.session.reset();
        if was != PlaybackState::Stopped {
            info!("stopped");
        }
    }

    /// Jump to `percent` of the track and play from there, whatever the
    /// previous state. Ignored when nothing is open.
    pub fn seek_to(&mut self, percent: f64) -> Result<()> {
        let percent = clamp_percent(percent);
        let frame_count = self.session.frame_count;
        let Some(resource) = self.session.resource.as_mut() else {
            return Ok(());
        };
        if frame_count == 0 {
            return Ok(());
        }

        let target = (percent / 100.0 * frame_count as f64).round() as u64;
        resource.set_frame_position(target)?;
        resource.start();
        self.session.saved_frame = None;
        self.session.state = PlaybackState::Playing;
        debug!(percent, target, "seeked");
        Ok(())
    }

    /// Set the volume as 0-100 percent of the device gain range.
    ///
    /// The value is kept and re-applied on every `play`, even when no track
    /// is open right now.
    pub fn set_volume(&mut self, percent: f64) -> Result<()> {
        let percent = clamp_percent(percent);
        self.session.gain_percent = percent;
        let Some(resource) = self.session.resource.as_mut() else {
            return Ok(());
        };
        apply_gain(resource, percent).inspect_err(|e| warn!(%e, "volume not applied"))
    }

    pub fn progress_percent(&self) -> u8 {
        let frame_count = self.session.frame_count;
        if self.session.resource.is_none() || frame_count == 0 {
            return 0;
        }
        let percent = (self.frame_position() as f64 * 100.0 / frame_count as f64).round();
        percent.min(100.0) as u8
    }

    pub fn elapsed_seconds(&self) -> u64 {
        match self.session.sample_rate {
            0 => 0,
            rate => self.frame_position() / u64::from(rate),
        }
    }

    pub fn total_seconds(&self) -> u64 {
        match self.session.sample_rate {
            0 => 0,
            rate => self.session.frame_count / u64::from(rate),
        }
    }

    /// Play the track after the cursor (random one in shuffle mode) from its start.
    pub fn next(&mut self) -> Result<usize> {
        let index = self.playlist.resolve_next(&mut self.rng)?;
        self.open_and_start(index)?;
        Ok(index)
    }

    /// Play the track before the cursor from its start. Never shuffles.
    pub fn previous(&mut self) -> Result<usize> {
        let index = self.playlist.resolve_previous()?;
        self.open_and_start(index)?;
        Ok(index)
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        let shuffle = self.playlist.toggle_shuffle();
        info!(shuffle, "shuffle toggled");
        shuffle
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.playlist.set_shuffle(shuffle);
    }

    pub fn add_track(&mut self, track: Track) {
        debug!(path = %track.path.display(), "track added");
        self.playlist.add(track);
    }

    /// Stop playback and empty the playlist.
    pub fn clear_playlist(&mut self) {
        self.stop();
        self.playlist.clear();
    }

    /// Stop playback and replace the playlist content.
    pub fn load_tracks(&mut self, tracks: Vec<Track>) {
        self.stop();
        info!(count = tracks.len(), "playlist loaded");
        self.playlist.replace(tracks);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.session.state,
            track_index: self.session.track_index,
            current_index: self.playlist.current_index(),
            progress_percent: self.progress_percent(),
            elapsed_seconds: self.elapsed_seconds(),
            total_seconds: self.total_seconds(),
            shuffle: self.playlist.shuffle(),
            volume: self.session.gain_percent.round() as u8,
        }
    }

    /// Apply pending device notifications without blocking.
    ///
    /// Returns the index auto-advanced to, if any. Notifications from closed
    /// or replaced resources are dropped.
    pub fn process_device_events(&mut self) -> Result<Option<usize>> {
        let mut finished = false;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                DeviceEvent::EndOfStream { generation } => {
                    if self.is_live_end(generation) {
                        finished = true;
                    } else {
                        trace!(generation, "ignoring stale end-of-stream");
                    }
                }
            }
        }

        if !finished {
            return Ok(None);
        }
        self.finish_track()
    }

    /// The bound track played to its end: advance or stop.
    fn finish_track(&mut self) -> Result<Option<usize>> {
        if self.auto_advance {
            info!("track finished, advancing");
            self.next().map(Some)
        } else {
            info!("track finished");
            self.stop();
            Ok(None)
        }
    }

    fn is_live_end(&self, generation: u64) -> bool {
        if generation != self.session.generation || self.session.state != PlaybackState::Playing {
            return false;
        }
        // A seek after the source drained re-arms the resource; the end signal
        // raised before that no longer applies.
        self.session
            .resource
            .as_ref()
            .is_some_and(|r| r.frame_position() >= self.session.frame_count)
    }

    fn resume_paused(&mut self, index: usize) -> Result<()> {
        let saved = self.session.saved_frame;

        // Paused on the last frame: the end-of-stream signal was dropped
        // while paused, so there is nothing left to resume.
        if saved.is_some_and(|frame| frame >= self.session.frame_count) {
            debug!(index, "resumed at end of track");
            return self.finish_track().map(|_| ());
        }

        let Some(resource) = self.session.resource.as_mut() else {
            return self.open_and_start(index);
        };
        if let Some(frame) = saved {
            if resource.frame_position() != frame {
                resource.set_frame_position(frame)?;
            }
        }
        resource.start();
        self.session.saved_frame = None;
        self.session.state = PlaybackState::Playing;
        debug!(index, "resumed");
        Ok(())
    }

    fn open_and_start(&mut self, index: usize) -> Result<()> {
        self.release();

        let Some(track) = self.playlist.get(index).cloned() else {
            self.session.reset();
            return Err(PlayerError::invalid_index(Some(index), self.playlist.len()));
        };

        self.session.generation += 1;
        let on_end = EndOfStream::new(self.events_tx.clone(), self.session.generation);

        let mut resource = match self.device.open(&track, on_end) {
            Ok(resource) => resource,
            Err(e) => {
                warn!(path = %track.path.display(), %e, "failed to open track");
                self.session.reset();
                return Err(e);
            }
        };

        if let Err(e) = apply_gain(&mut resource, self.session.gain_percent) {
            debug!(%e, "volume not applied");
        }

        resource.start();
        let frame_count = resource.frame_count();
        let sample_rate = resource.sample_rate();
        self.session.bind(index, resource, frame_count, sample_rate);
        self.playlist.set_current(index)?;

        info!(index, track = %track.display, "playing");
        Ok(())
    }

    fn release(&mut self) {
        if let Some(mut resource) = self.session.resource.take() {
            resource.close();
        }
    }
}

impl<D: AudioDevice, R: Rng> Drop for PlaybackEngine<D, R> {
    fn drop(&mut self) {
        self.release();
    }
}

fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

fn apply_gain<A: AudioResource>(resource: &mut A, percent: f64) -> Result<()> {
    let range = resource.gain_range().ok_or(PlayerError::VolumeUnsupported)?;
    resource.set_gain(range.at_percent(percent))
}
