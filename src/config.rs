//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive playback
//! defaults, library scanning and the console, plus helpers to load it from disk.

mod load;
mod schema;

pub use schema::*;
