//! Effects — note-scoped and line-scoped processing of a line's buffer.
//!
//! A line holds at most one effect per identity. The set is closed (an
//! envelope and an echo), so each identity gets a fixed slot.

pub mod echo;
pub mod envelope;

pub use echo::Echo;
pub use envelope::Envelope;

use std::fmt;

/// Effect applied from the triggering event's start offset forward.
pub trait NoteEffect {
    fn apply(&self, buffer: &mut [f64], start: usize);
}

/// Effect that may read and write samples before the current event,
/// bounded below by its own activation offset.
pub trait LineEffect {
    /// Buffer offset at which the effect was installed.
    fn activation(&self) -> usize;

    fn apply(&self, buffer: &mut [f64], start: usize);
}

/// Identity of an effect slot, as named by its command key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectId {
    Envelope,
    Echo,
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectId::Envelope => f.write_str("ADSR"),
            EffectId::Echo => f.write_str("ECHO"),
        }
    }
}

/// The active effects of one line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectSlots {
    envelope: Option<Envelope>,
    echo: Option<Echo>,
}

impl EffectSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an envelope, replacing any active one.
    pub fn set_envelope(&mut self, envelope: Envelope) {
        self.envelope = Some(envelope);
    }

    /// Install an echo, replacing any active one.
    pub fn set_echo(&mut self, echo: Echo) {
        self.echo = Some(echo);
    }

    /// Clear the slot for `id`. Clearing an empty slot is a no-op.
    pub fn remove(&mut self, id: EffectId) {
        match id {
            EffectId::Envelope => self.envelope = None,
            EffectId::Echo => self.echo = None,
        }
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    pub fn echo(&self) -> Option<&Echo> {
        self.echo.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.envelope.is_none() && self.echo.is_none()
    }

    /// Run note effects, then line effects, over `buffer` for an event
    /// that begins at `start`.
    pub fn apply(&self, buffer: &mut [f64], start: usize) {
        if let Some(envelope) = &self.envelope {
            envelope.apply(buffer, start);
        }
        if let Some(echo) = &self.echo {
            echo.apply(buffer, start);
        }
    }
}
