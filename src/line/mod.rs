//! Lines — one voice of a score, parsed once and rendered to a sample buffer.

pub mod state;

pub use state::LineState;

use std::fmt;

use log::debug;

use crate::dsl::{Event, Notation, ParseError, PitchResolver};
use crate::time::{BeatFraction, MAX_EVENT_FRAMES};

/// An event that could not be carried out while rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum EventError {
    UnknownInstrument(String),
    /// The note or rest would run past [`MAX_EVENT_FRAMES`] at this tempo.
    TooLong { beats: BeatFraction, bpm: f64 },
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::UnknownInstrument(name) => write!(f, "unknown instrument '{name}'"),
            EventError::TooLong { beats, bpm } => write!(
                f,
                "{beats} beats at {bpm} bpm exceeds {MAX_EVENT_FRAMES} frames"
            ),
        }
    }
}

impl std::error::Error for EventError {}

/// A line failed to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderError {
    pub line: String,
    /// 0-based index of the failing event within the line.
    pub event: usize,
    pub cause: EventError,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (event {}): {}", self.line, self.event, self.cause)
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// A parsed line: its events and the tempo they play at.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    name: String,
    base_tempo: f64,
    events: Vec<Event>,
}

impl Line {
    pub fn new(name: impl Into<String>, base_tempo: f64, events: Vec<Event>) -> Self {
        Self {
            name: name.into(),
            base_tempo,
            events,
        }
    }

    /// Parse a composition string into a line.
    pub fn parse(
        name: impl Into<String>,
        source: &str,
        base_tempo: f64,
        resolver: &mut PitchResolver,
    ) -> Result<Self, ParseError> {
        let events = Notation::parse(source, resolver)?;
        Ok(Self::new(name, base_tempo, events))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_tempo(&self) -> f64 {
        self.base_tempo
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Walk every event in order and return the finished buffer.
    pub fn render(&self) -> Result<Vec<f64>, RenderError> {
        let mut state = LineState::new(self.base_tempo);
        let total = self.events.len();
        let mut reported = 0;

        for (index, event) in self.events.iter().enumerate() {
            state.step(event).map_err(|cause| RenderError {
                line: self.name.clone(),
                event: index,
                cause,
            })?;

            let tenths = (index + 1) * 10 / total;
            if tenths > reported {
                reported = tenths;
                debug!("{}: {}% rendered", self.name, tenths * 10);
            }
        }

        Ok(state.into_buffer())
    }
}
