use crate::error::{PlayerError, Result};
use crate::library::Track;

use super::types::{EndOfStream, GainRange};

/// An opened, playable track bound to an output device.
///
/// A freshly opened resource is suspended at frame 0.
pub trait AudioResource {
    /// Begin or continue sound output from the current frame.
    fn start(&mut self);
    /// Stop sound output, keeping the resource and its position.
    fn suspend(&mut self);
    /// Release the resource. Pending end-of-stream notifications are suppressed.
    fn close(&mut self);

    fn frame_position(&self) -> u64;
    fn set_frame_position(&mut self, frame: u64) -> Result<()>;
    fn frame_count(&self) -> u64;
    fn sample_rate(&self) -> u32;

    /// `None` when the resource has no gain control.
    fn gain_range(&self) -> Option<GainRange> {
        None
    }

    fn set_gain(&mut self, _gain: f32) -> Result<()> {
        Err(PlayerError::VolumeUnsupported)
    }
}

/// Opens tracks into resources.
pub trait AudioDevice {
    type Resource: AudioResource;

    /// Open `track`. The resource must call `on_end.notify()` (from any
    /// thread) when playback reaches the last frame.
    fn open(&self, track: &Track, on_end: EndOfStream) -> Result<Self::Resource>;
}
