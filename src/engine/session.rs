//! Session bookkeeping for the engine: transport state, the bound resource
//! and the read-only snapshot handed to pollers.

/// Transport state of the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The engine's record of the currently bound track.
///
/// `Stopped` always means no resource and no track; `Playing`/`Paused` always
/// mean an open resource bound to `track_index`.
pub(super) struct Session<A> {
    pub(super) track_index: Option<usize>,
    pub(super) state: PlaybackState,
    /// Frame captured by the last pause; only meaningful while `Paused`.
    pub(super) saved_frame: Option<u64>,
    pub(super) frame_count: u64,
    pub(super) sample_rate: u32,
    pub(super) gain_percent: f64,
    /// Identifies the resource opened last; tags its end-of-stream events.
    pub(super) generation: u64,
    pub(super) resource: Option<A>,
}

impl<A> Session<A> {
    pub(super) fn new(gain_percent: f64) -> Self {
        Self {
            track_index: None,
            state: PlaybackState::Stopped,
            saved_frame: None,
            frame_count: 0,
            sample_rate: 0,
            gain_percent,
            generation: 0,
            resource: None,
        }
    }

    pub(super) fn bind(&mut self, index: usize, resource: A, frame_count: u64, sample_rate: u32) {
        self.track_index = Some(index);
        self.state = PlaybackState::Playing;
        self.saved_frame = None;
        self.frame_count = frame_count;
        self.sample_rate = sample_rate;
        self.resource = Some(resource);
    }

    /// Forget the bound track. The caller closes the resource first.
    pub(super) fn reset(&mut self) {
        self.track_index = None;
        self.state = PlaybackState::Stopped;
        self.saved_frame = None;
        self.frame_count = 0;
        self.sample_rate = 0;
        self.resource = None;
    }
}

/// Everything a display needs, read in one non-blocking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub state: PlaybackState,
    /// Track bound to the session.
    pub track_index: Option<usize>,
    /// Playlist cursor; survives `stop`.
    pub current_index: Option<usize>,
    pub progress_percent: u8,
    pub elapsed_seconds: u64,
    pub total_seconds: u64,
    pub shuffle: bool,
    pub volume: u8,
}

/// Format whole seconds as `m:ss`.
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
