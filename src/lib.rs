//! Cantus — compiles a compact polyphonic music notation into 16-bit PCM.

pub mod audio;
pub mod config;
pub mod dsl;
pub mod effect;
pub mod instrument;
pub mod line;
pub mod score;
pub mod time;

/// Output sample rate in Hz. All frame counts are at this rate.
pub const SAMPLE_RATE: u32 = 44_100;
