//! WAV header probing.
//!
//! Files are checked with hound before rodio sees them so that unsupported
//! encodings and unreadable files surface as distinct errors, and so the
//! engine knows the frame count and sample rate up front.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use hound::WavReader;

use crate::error::{PlayerError, Result};

/// Stream parameters read from a WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Frames per channel.
    pub frame_count: u64,
}

impl WavInfo {
    pub fn frame_to_duration(&self, frame: u64) -> Duration {
        Duration::from_secs_f64(frame as f64 / f64::from(self.sample_rate))
    }

    pub fn duration_to_frame(&self, at: Duration) -> u64 {
        let frame = (at.as_secs_f64() * f64::from(self.sample_rate)).round() as u64;
        frame.min(self.frame_count)
    }

    pub fn duration(&self) -> Duration {
        self.frame_to_duration(self.frame_count)
    }
}

/// Read the header of `path`.
///
/// Failing to open or read the file is `Io`; a readable file that hound
/// cannot parse as PCM/float WAV is `UnsupportedFormat`.
pub fn probe(path: &Path) -> Result<WavInfo> {
    let file = File::open(path).map_err(|e| PlayerError::io(path, e))?;
    let reader = WavReader::new(BufReader::new(file)).map_err(|e| match e {
        // hound reports short reads as plain io errors; only a real OS
        // failure is an I/O problem.
        hound::Error::IoError(err) if err.raw_os_error().is_some() => PlayerError::io(path, err),
        other => PlayerError::unsupported(path, other.to_string()),
    })?;

    let spec = reader.spec();
    if spec.sample_rate == 0 || spec.channels == 0 {
        return Err(PlayerError::unsupported(
            path,
            format!(
                "invalid stream parameters ({} Hz, {} channels)",
                spec.sample_rate, spec.channels
            ),
        ));
    }

    Ok(WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        frame_count: u64::from(reader.duration()),
    })
}
