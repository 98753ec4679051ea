//! rodio-backed output device.
//!
//! Each opened track gets its own paused `Sink` on the shared output stream.
//! A watcher thread blocks on `Sink::sleep_until_end` and reports the end of
//! the stream; an epoch counter keeps watchers of replaced or closed sources
//! from reporting.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, trace};

use crate::error::{PlayerError, Result};
use crate::library::Track;

use super::resource::{AudioDevice, AudioResource};
use super::types::{EndOfStream, GainRange};
use super::wav::{WavInfo, probe};

/// Gain range exposed by rodio resources, in decibels.
pub const GAIN_RANGE_DB: GainRange = GainRange::new(-80.0, 6.0206);

/// Convert a decibel gain to the linear amplitude factor rodio expects.
/// The bottom of the range is treated as silence.
pub(crate) fn db_to_amplitude(db: f32) -> f32 {
    if db <= GAIN_RANGE_DB.min {
        0.0
    } else {
        10f32.powf(db / 20.0)
    }
}

/// Counter shared by a resource and its watcher threads. Every `arm` hands
/// out a new ticket; re-arming or closing makes older tickets stale.
#[derive(Debug, Clone, Default)]
pub(super) struct WatchEpoch(Arc<AtomicU64>);

impl WatchEpoch {
    pub(super) fn arm(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(super) fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

/// Called by a watcher once its source drained. Only the newest ticket of a
/// still-open resource reports; returns whether it did.
pub(super) fn report_end(epoch: &WatchEpoch, ticket: u64, on_end: &EndOfStream) -> bool {
    if !epoch.is_current(ticket) {
        return false;
    }
    trace!(generation = on_end.generation(), "end of stream");
    on_end.notify();
    true
}

/// Frame shown for a sink. An empty sink has played everything queued.
pub(super) fn sink_frame(info: &WavInfo, drained: bool, pos: Duration) -> u64 {
    if drained {
        info.frame_count
    } else {
        info.duration_to_frame(pos)
    }
}

pub struct RodioDevice {
    stream: OutputStream,
}

impl RodioDevice {
    /// Open the system default output.
    pub fn open_default() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlayerError::DeviceUnavailable(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // interleave with console output.
        stream.log_on_drop(false);
        info!("audio output opened");
        Ok(Self { stream })
    }
}

impl AudioDevice for RodioDevice {
    type Resource = RodioResource;

    fn open(&self, track: &Track, on_end: EndOfStream) -> Result<RodioResource> {
        let info = probe(&track.path)?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();

        let resource = RodioResource {
            path: track.path.clone(),
            info,
            sink: Arc::new(sink),
            on_end,
            epoch: WatchEpoch::default(),
            closed: false,
        };
        resource.arm(Duration::ZERO)?;

        debug!(
            path = %track.path.display(),
            sample_rate = info.sample_rate,
            channels = info.channels,
            frames = info.frame_count,
            "opened track"
        );
        Ok(resource)
    }
}

pub struct RodioResource {
    path: PathBuf,
    info: WavInfo,
    sink: Arc<Sink>,
    on_end: EndOfStream,
    epoch: WatchEpoch,
    closed: bool,
}

impl RodioResource {
    /// Decode the file again and queue it on the sink at `start`.
    fn arm(&self, start: Duration) -> Result<()> {
        let file = File::open(&self.path).map_err(|e| PlayerError::io(&self.path, e))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| PlayerError::unsupported(&self.path, e.to_string()))?;
        self.sink.append(source);

        if !start.is_zero() {
            self.sink
                .try_seek(start)
                .map_err(|e| PlayerError::unsupported(&self.path, format!("seek failed: {e}")))?;
        }

        let ticket = self.epoch.arm();
        let epoch = self.epoch.clone();
        let sink = Arc::clone(&self.sink);
        let on_end = self.on_end.clone();

        thread::Builder::new()
            .name("allegro-eos".to_string())
            .spawn(move || {
                sink.sleep_until_end();
                report_end(&epoch, ticket, &on_end);
            })
            .map_err(|e| PlayerError::DeviceUnavailable(e.to_string()))?;

        Ok(())
    }
}

impl AudioResource for RodioResource {
    fn start(&mut self) {
        self.sink.play();
    }

    fn suspend(&mut self) {
        self.sink.pause();
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // Invalidate the watcher before stopping so it stays silent.
        self.epoch.invalidate();
        self.sink.stop();
    }

    fn frame_position(&self) -> u64 {
        sink_frame(&self.info, self.sink.empty(), self.sink.get_pos())
    }

    fn set_frame_position(&mut self, frame: u64) -> Result<()> {
        let target = self.info.frame_to_duration(frame.min(self.info.frame_count));
        if self.sink.empty() {
            // The previous source played out; queue a fresh one.
            return self.arm(target);
        }
        self.sink
            .try_seek(target)
            .map_err(|e| PlayerError::unsupported(&self.path, format!("seek failed: {e}")))
    }

    fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    fn sample_rate(&self) -> u32 {
        self.info.sample_rate
    }

    fn gain_range(&self) -> Option<GainRange> {
        Some(GAIN_RANGE_DB)
    }

    fn set_gain(&mut self, gain: f32) -> Result<()> {
        self.sink.set_volume(db_to_amplitude(GAIN_RANGE_DB.clamp(gain)));
        Ok(())
    }
}

impl Drop for RodioResource {
    fn drop(&mut self) {
        self.close();
    }
}
