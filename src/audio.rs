//! Audio device layer.
//!
//! The engine talks to audio through the `AudioDevice`/`AudioResource`
//! traits. `RodioDevice` is the real backend; it validates files with a
//! hound header probe before handing them to rodio. Device threads never touch
//! engine state: they report end-of-stream through an `EndOfStream` handle
//! that forwards a `DeviceEvent` over a channel.

mod resource;
mod rodio_device;
mod types;
mod wav;

pub use resource::{AudioDevice, AudioResource};
pub use rodio_device::{RodioDevice, RodioResource};
pub use types::{DeviceEvent, EndOfStream, GainRange};
pub use wav::{WavInfo, probe};
