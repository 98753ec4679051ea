//! Track source: turns a music directory into playlist-ready `Track`s.
//!
//! Scanning never fails; a missing or unreadable directory yields an empty
//! list and the engine simply starts with an empty playlist.

mod model;
mod scan;

pub use model::Track;
pub use scan::{describe, scan};
