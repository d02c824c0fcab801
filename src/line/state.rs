//! Per-line playback state: running tempo, dynamics, tuning, instrument,
//! effects, and the growing output buffer.

use log::trace;

use super::EventError;
use crate::dsl::{Command, Event, Note};
use crate::effect::{Echo, EffectSlots};
use crate::instrument::{Generator, Instrument};
use crate::time::frames_per_beat;

/// Mutable state of one line while it renders.
#[derive(Debug, Clone)]
pub struct LineState {
    base_tempo: f64,
    bpm: f64,
    dynamics: f64,
    cents: f64,
    instrument: Instrument,
    effects: EffectSlots,
    buffer: Vec<f64>,
}

impl LineState {
    pub fn new(base_tempo: f64) -> Self {
        Self {
            base_tempo,
            bpm: base_tempo,
            dynamics: 1.0,
            cents: 0.0,
            instrument: Instrument::default(),
            effects: EffectSlots::new(),
            buffer: Vec::new(),
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn frames_per_beat(&self) -> f64 {
        frames_per_beat(self.bpm)
    }

    pub fn dynamics(&self) -> f64 {
        self.dynamics
    }

    pub fn cents(&self) -> f64 {
        self.cents
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn effects(&self) -> &EffectSlots {
        &self.effects
    }

    pub fn buffer(&self) -> &[f64] {
        &self.buffer
    }

    pub fn into_buffer(self) -> Vec<f64> {
        self.buffer
    }

    /// Advance by one event.
    pub fn step(&mut self, event: &Event) -> Result<(), EventError> {
        match event {
            Event::Command(command) => self.execute(command),
            Event::Note(note) => self.play(note),
        }
    }

    /// Apply a command to the running state. Takes no time.
    pub fn execute(&mut self, command: &Command) -> Result<(), EventError> {
        match command {
            Command::SetTempoFactor(ratio) => {
                self.bpm = self.base_tempo * ratio;
                trace!("tempo {} bpm", self.bpm);
            }
            Command::SetDynamics(scale) => {
                self.dynamics = *scale;
                trace!("dynamics {scale}");
            }
            Command::SetCentOffset(cents) => {
                self.cents = *cents;
                trace!("cent offset {cents}");
            }
            Command::SetInstrument(name) => {
                self.instrument = Instrument::from_name(name)
                    .ok_or_else(|| EventError::UnknownInstrument(name.clone()))?;
                trace!("instrument {}", self.instrument);
            }
            Command::SetEnvelope(envelope) => {
                self.effects.set_envelope(*envelope);
                trace!("envelope {envelope:?}");
            }
            Command::SetEcho {
                amplitude,
                beat_delay,
            } => {
                let echo = Echo::new(
                    *amplitude,
                    *beat_delay,
                    self.frames_per_beat(),
                    self.buffer.len(),
                );
                trace!(
                    "echo {amplitude} every {} frames from {}",
                    echo.frame_delay(),
                    self.buffer.len()
                );
                self.effects.set_echo(echo);
            }
            Command::RemoveEffect(id) => {
                self.effects.remove(*id);
                trace!("removed {id}");
            }
        }
        Ok(())
    }

    /// Synthesize a note, chord or rest onto the end of the buffer, then run
    /// the active effects over it.
    ///
    /// Fails without touching the buffer when the note is too long to
    /// render at the current tempo.
    pub fn play(&mut self, note: &Note) -> Result<(), EventError> {
        let frames = note
            .duration
            .to_frames(self.bpm)
            .ok_or(EventError::TooLong {
                beats: note.duration,
                bpm: self.bpm,
            })?;
        let start = self.buffer.len();
        let shift = 2f64.powf(self.cents / 1200.0);
        let freqs: Vec<f64> = note.freqs.iter().map(|f| f * shift).collect();

        self.buffer.reserve(frames);
        for t in 0..frames {
            let sum: f64 = freqs
                .iter()
                .map(|&f| self.instrument.sample(f, t))
                .sum();
            self.buffer.push(sum * self.dynamics);
        }

        self.effects.apply(&mut self.buffer, start);
        Ok(())
    }
}
