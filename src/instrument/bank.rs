//! Instrument bank — the fixed catalogue of named timbres selectable with
//! `(INST=name)`.

use std::fmt;

use super::harmonic::{HarmonicSeries, Partial};
use super::oscillator::{sawtooth, sine, square, triangle};
use super::{Generator, Waveform};

/// Slow gate applied to saw content (one swell every six seconds).
const GATE_HZ: f64 = 1.0 / 6.0;

/// Slow swell for `inst8`: one cycle every 8 beats at 125 bpm.
const SWELL_HZ: f64 = 125.0 / (8.0 * 60.0);

/// `inst2`: octave partials weighted 4^(1-m).
const DECAYING_OCTAVES: [Partial; 3] = [
    Partial::new(1.0, 1.0),
    Partial::new(2.0, 0.25),
    Partial::new(4.0, 1.0 / 64.0),
];

/// `inst9`: octave partials weighted 1/m.
const HALVING_OCTAVES: [Partial; 3] = [
    Partial::new(1.0, 1.0),
    Partial::new(2.0, 0.5),
    Partial::new(4.0, 0.25),
];

const INST2: HarmonicSeries<Waveform> =
    HarmonicSeries::from_static(Waveform::Sine, &DECAYING_OCTAVES);
const INST9: HarmonicSeries<Waveform> =
    HarmonicSeries::from_static(Waveform::Sine, &HALVING_OCTAVES);

/// A named instrument preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Instrument {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Inst1,
    Inst1NoSaws,
    Inst2,
    Inst3,
    Inst4,
    Inst5,
    Inst6,
    Inst7,
    Inst8,
    Inst8DoubledOctaveUp,
    Inst9,
    Inst10,
}

impl Instrument {
    /// Every preset, in catalogue order.
    pub const ALL: [Instrument; 16] = [
        Instrument::Sine,
        Instrument::Square,
        Instrument::Sawtooth,
        Instrument::Triangle,
        Instrument::Inst1,
        Instrument::Inst1NoSaws,
        Instrument::Inst2,
        Instrument::Inst3,
        Instrument::Inst4,
        Instrument::Inst5,
        Instrument::Inst6,
        Instrument::Inst7,
        Instrument::Inst8,
        Instrument::Inst8DoubledOctaveUp,
        Instrument::Inst9,
        Instrument::Inst10,
    ];

    /// Look up a preset by the name used in `(INST=...)`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|inst| inst.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::Sine => "sine",
            Instrument::Square => "square",
            Instrument::Sawtooth => "sawtooth",
            Instrument::Triangle => "triangle",
            Instrument::Inst1 => "inst1",
            Instrument::Inst1NoSaws => "inst1NoSaws",
            Instrument::Inst2 => "inst2",
            Instrument::Inst3 => "inst3",
            Instrument::Inst4 => "inst4",
            Instrument::Inst5 => "inst5",
            Instrument::Inst6 => "inst6",
            Instrument::Inst7 => "inst7",
            Instrument::Inst8 => "inst8",
            Instrument::Inst8DoubledOctaveUp => "inst8DoubledOctaveUp",
            Instrument::Inst9 => "inst9",
            Instrument::Inst10 => "inst10",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sub_octave_stack(freq: f64, frame: usize) -> f64 {
    sine(freq / 2.0, frame) + sine(freq, frame) + sine(2.0 * freq, frame)
}

fn gate(frame: usize) -> f64 {
    sine(GATE_HZ, frame).max(0.0)
}

fn inst8(freq: f64, t: usize) -> f64 {
    let swell = (triangle(SWELL_HZ, t) + 1.0) / 2.0;
    triangle(freq, t) + 0.5 * sawtooth(freq, t) * swell
}

impl Generator for Instrument {
    fn sample(&self, f: f64, t: usize) -> f64 {
        match self {
            Instrument::Sine | Instrument::Inst10 => sine(f, t),
            Instrument::Square => square(f, t),
            Instrument::Sawtooth => sawtooth(f, t),
            Instrument::Triangle => triangle(f, t),
            Instrument::Inst1 => {
                let saws = sawtooth(f / 2.0, t) + sawtooth(f, t) + sawtooth(2.0 * f, t);
                sub_octave_stack(f, t) + 0.1 * saws * gate(t)
            }
            Instrument::Inst1NoSaws => sub_octave_stack(f, t),
            Instrument::Inst2 => INST2.sample(f, t),
            Instrument::Inst3 => {
                let g = gate(t);
                let overtones: f64 = (2..=4)
                    .map(|m| sine(f * m as f64, t) * g / m as f64)
                    .sum();
                sine(f, t) + overtones
            }
            Instrument::Inst4 => {
                (triangle(f, t) + 0.25 * sine(2.0 * f, t) + 0.1 * sine(0.5 * f, t)) * 0.25
            }
            Instrument::Inst5 => sine(f, t) + 0.1 * square(f, t),
            Instrument::Inst6 => triangle(f, t) + sine(2.0 * f, t) + 0.25 * sawtooth(f, t),
            Instrument::Inst7 => {
                (sine(f, t)
                    + sine(2.0 * f, t)
                    + sine(3.0 * f, t)
                    + triangle(f, t)
                    + triangle(2.0 * f, t))
                    / 5.0
            }
            Instrument::Inst8 => inst8(f, t),
            Instrument::Inst8DoubledOctaveUp => inst8(f, t) + 0.5 * inst8(2.0 * f, t),
            Instrument::Inst9 => INST9.sample(f, t),
        }
    }
}
