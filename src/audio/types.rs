//! Small shared types for the audio layer: device events, the end-of-stream
//! handle given to resources, and gain ranges.

use std::sync::mpsc::Sender;

/// Notification raised by a device thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The resource opened for session `generation` played to its last frame.
    EndOfStream { generation: u64 },
}

/// Handle a resource uses to report that it reached the end of its data.
///
/// Safe to move into device threads; sending never blocks and a closed
/// receiver is ignored.
#[derive(Debug, Clone)]
pub struct EndOfStream {
    tx: Sender<DeviceEvent>,
    generation: u64,
}

impl EndOfStream {
    pub fn new(tx: Sender<DeviceEvent>, generation: u64) -> Self {
        Self { tx, generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn notify(&self) {
        let _ = self.tx.send(DeviceEvent::EndOfStream {
            generation: self.generation,
        });
    }
}

/// Native gain range of a resource, in whatever unit the device uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRange {
    pub min: f32,
    pub max: f32,
}

impl GainRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a 0-100 percentage linearly onto the range.
    pub fn at_percent(&self, percent: f64) -> f32 {
        let p = percent.clamp(0.0, 100.0) / 100.0;
        let gain = f64::from(self.min) + f64::from(self.max - self.min) * p;
        gain as f32
    }

    pub fn clamp(&self, gain: f32) -> f32 {
        gain.clamp(self.min, self.max)
    }
}
