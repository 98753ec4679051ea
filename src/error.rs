//! Error types shared by the playlist, the audio device layer and the engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by transport and navigation operations.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Navigation or `play` with an index outside the playlist.
    #[error("invalid track index {index:?} (playlist has {len} tracks)")]
    InvalidIndex { index: Option<usize>, len: usize },

    /// The file exists but cannot be decoded as a supported WAV/PCM stream.
    #[error("unsupported audio format in {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// No output device, or the device refused to allocate a stream.
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The open resource exposes no gain control.
    #[error("volume control is not supported by the current audio resource")]
    VolumeUnsupported,
}

impl PlayerError {
    pub fn invalid_index(index: Option<usize>, len: usize) -> Self {
        Self::InvalidIndex { index, len }
    }

    pub fn unsupported(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns false for errors where the operation is simply ignored.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidIndex { .. } | Self::VolumeUnsupported)
    }
}

pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_and_volume_errors_are_not_fatal() {
        assert!(!PlayerError::invalid_index(Some(3), 2).is_fatal());
        assert!(!PlayerError::VolumeUnsupported.is_fatal());
        assert!(PlayerError::DeviceUnavailable("no device".into()).is_fatal());
        assert!(PlayerError::unsupported("/tmp/a.wav", "adpcm").is_fatal());
    }

    #[test]
    fn display_mentions_path_and_reason() {
        let err = PlayerError::unsupported("/tmp/a.wav", "compressed data");
        assert_eq!(
            err.to_string(),
            "unsupported audio format in /tmp/a.wav: compressed data"
        );

        let err = PlayerError::invalid_index(None, 0);
        assert_eq!(
            err.to_string(),
            "invalid track index None (playlist has 0 tracks)"
        );
    }
}
