//! Oscillator primitives — waveform generation from frequency and frame index.
//!
//! Every function is pure: the same `(freq, frame)` always yields the same
//! amplitude. A non-positive frequency is silence.

use std::f64::consts::PI;

use super::Generator;
use crate::SAMPLE_RATE;

/// Available waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Generator for Waveform {
    fn sample(&self, freq: f64, frame: usize) -> f64 {
        match self {
            Waveform::Sine => sine(freq, frame),
            Waveform::Square => square(freq, frame),
            Waveform::Sawtooth => sawtooth(freq, frame),
            Waveform::Triangle => triangle(freq, frame),
        }
    }
}

fn frames_per_cycle(freq: f64) -> f64 {
    SAMPLE_RATE as f64 / freq
}

pub fn sine(freq: f64, frame: usize) -> f64 {
    if freq <= 0.0 {
        return 0.0;
    }
    (2.0 * PI * frame as f64 * freq / SAMPLE_RATE as f64).sin()
}

/// Low for the first half of each cycle, high for the second.
pub fn square(freq: f64, frame: usize) -> f64 {
    if freq <= 0.0 {
        return 0.0;
    }
    if (frame as f64 / frames_per_cycle(freq)).fract() > 0.5 {
        1.0
    } else {
        -1.0
    }
}

pub fn sawtooth(freq: f64, frame: usize) -> f64 {
    if freq <= 0.0 {
        return 0.0;
    }
    (frame as f64 / frames_per_cycle(freq)).fract() * 2.0 - 1.0
}

/// Starts at -1, peaks at +1 mid-cycle.
pub fn triangle(freq: f64, frame: usize) -> f64 {
    if freq <= 0.0 {
        return 0.0;
    }
    let cycle = frames_per_cycle(freq);
    let phase = (frame as f64 % cycle) / cycle;
    if phase > 0.5 {
        4.0 * (1.0 - phase) - 1.0
    } else {
        4.0 * phase - 1.0
    }
}
