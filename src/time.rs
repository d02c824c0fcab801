//! Musical time — beat-fraction durations and tempo-to-frame conversion.
//!
//! Durations are kept as exact integer fractions of a beat. Conversion to
//! frames happens only at the rendering boundary, where the current tempo
//! is known, and always truncates to a whole frame count.

use std::fmt;

use crate::SAMPLE_RATE;

/// Longest single event in frames: one hour.
pub const MAX_EVENT_FRAMES: usize = SAMPLE_RATE as usize * 60 * 60;

/// Frames in one beat at `bpm`, before truncation.
pub fn frames_per_beat(bpm: f64) -> f64 {
    SAMPLE_RATE as f64 * 60.0 / bpm
}

/// A duration measured in beats, written `{N}` or `{N/D}` in notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeatFraction {
    num: u32,
    den: u32,
}

impl BeatFraction {
    /// One beat, the duration of a note without a `{...}` suffix.
    pub const ONE: BeatFraction = BeatFraction { num: 1, den: 1 };

    /// No time at all. Commands take this long.
    pub const ZERO: BeatFraction = BeatFraction { num: 0, den: 1 };

    /// Create a fraction of a beat. Returns `None` for a zero denominator.
    pub fn new(num: u32, den: u32) -> Option<Self> {
        if den == 0 {
            None
        } else {
            Some(Self { num, den })
        }
    }

    /// Create a whole number of beats.
    pub fn whole(beats: u32) -> Self {
        Self { num: beats, den: 1 }
    }

    pub fn numerator(self) -> u32 {
        self.num
    }

    pub fn denominator(self) -> u32 {
        self.den
    }

    /// Length in beats as a float.
    pub fn as_beats(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Length in frames at the given tempo, truncated toward zero.
    ///
    /// `None` when the length is not finite or exceeds [`MAX_EVENT_FRAMES`].
    pub fn to_frames(self, bpm: f64) -> Option<usize> {
        let frames = self.as_beats() * frames_per_beat(bpm);
        if frames.is_finite() && frames <= MAX_EVENT_FRAMES as f64 {
            Some(frames as usize)
        } else {
            None
        }
    }
}

impl Default for BeatFraction {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for BeatFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
