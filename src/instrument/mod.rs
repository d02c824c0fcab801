//! Instruments — oscillator primitives, harmonic composition, and the named
//! preset bank used by the line interpreter.

pub mod bank;
pub mod harmonic;
pub mod oscillator;

pub use bank::Instrument;
pub use harmonic::{HarmonicSeries, Partial};
pub use oscillator::Waveform;

/// Common interface for everything that turns a pitch into samples.
///
/// `frame` counts from the start of the note being synthesized, so a
/// generator never sees absolute line time.
pub trait Generator: Send + Sync {
    /// Amplitude at `frame` for a tone of `freq` Hz. `freq <= 0` is silence.
    fn sample(&self, freq: f64, frame: usize) -> f64;
}
