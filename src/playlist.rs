//! Ordered track list with a navigation cursor.
//!
//! The playlist only resolves indices; opening and closing audio is the
//! engine's job. Every navigation call on an empty playlist reports
//! `InvalidIndex` instead of panicking.

use rand::Rng;

use crate::error::{PlayerError, Result};
use crate::library::Track;

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
    shuffle: bool,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            current: None,
            shuffle: false,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    /// Flip the navigation policy and return the new value.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    /// Move the cursor to `index`.
    pub fn set_current(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.current = Some(index);
        Ok(())
    }

    /// Append a track. Content is not validated here.
    pub fn add(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }

    /// Swap the whole content for `tracks`, resetting the cursor.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.current = None;
    }

    /// Validate that `index` addresses a track.
    pub fn check(&self, index: usize) -> Result<()> {
        if index < self.tracks.len() {
            Ok(())
        } else {
            Err(PlayerError::invalid_index(Some(index), self.tracks.len()))
        }
    }

    /// Index that `next` should play.
    ///
    /// Shuffle picks uniformly from the whole list (the current track
    /// included). Sequential mode wraps from the last track to the first and
    /// treats a missing cursor as "before the first track".
    pub fn resolve_next<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
        let len = self.non_empty_len()?;
        if self.shuffle {
            return Ok(rng.random_range(0..len));
        }
        Ok(match self.current {
            Some(i) => (i + 1) % len,
            None => 0,
        })
    }

    /// Index that `previous` should play. Always sequential, even in shuffle mode.
    /// A missing cursor resolves to the last track.
    pub fn resolve_previous(&self) -> Result<usize> {
        let len = self.non_empty_len()?;
        Ok(match self.current {
            Some(i) => (i % len + len - 1) % len,
            None => len - 1,
        })
    }

    fn non_empty_len(&self) -> Result<usize> {
        if self.tracks.is_empty() {
            Err(PlayerError::invalid_index(self.current, 0))
        } else {
            Ok(self.tracks.len())
        }
    }
}
