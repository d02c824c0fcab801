//! Parsed notation — the events a line interpreter walks in order.

use crate::effect::{EffectId, Envelope};
use crate::time::BeatFraction;

/// A sounding unit: one note, a chord, or a rest (no frequencies).
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub freqs: Vec<f64>,
    pub duration: BeatFraction,
}

impl Note {
    pub fn rest(duration: BeatFraction) -> Self {
        Self {
            freqs: Vec::new(),
            duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.freqs.is_empty()
    }
}

/// An inline control command, `(KEY=value)` in notation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RemoveEffect(EffectId),
    SetEnvelope(Envelope),
    SetEcho { amplitude: f64, beat_delay: f64 },
    SetInstrument(String),
    SetTempoFactor(f64),
    SetDynamics(f64),
    SetCentOffset(f64),
}

/// One unit of a line, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Note(Note),
    Command(Command),
}

impl Event {
    /// Duration in beats. Commands take no time.
    pub fn duration(&self) -> BeatFraction {
        match self {
            Event::Note(note) => note.duration,
            Event::Command(_) => BeatFraction::ZERO,
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Event::Command(_))
    }
}
