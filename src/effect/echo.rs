//! Echo — a feedback delay applied retroactively across a line's buffer.

use super::LineEffect;

/// Feedback delay set with `(ECHO=amplitude;beats)`.
///
/// The delay is fixed in frames when the echo is installed, using the
/// tempo in force at that moment. Later tempo changes do not move it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Echo {
    amplitude: f64,
    beat_delay: f64,
    frame_delay: usize,
    activation: usize,
}

impl Echo {
    /// Create an echo installed at buffer offset `activation` while the line
    /// runs at `frames_per_beat`.
    pub fn new(amplitude: f64, beat_delay: f64, frames_per_beat: f64, activation: usize) -> Self {
        Self {
            amplitude,
            beat_delay,
            frame_delay: (beat_delay * frames_per_beat) as usize,
            activation,
        }
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn beat_delay(&self) -> f64 {
        self.beat_delay
    }

    /// Delay in frames, truncated.
    pub fn frame_delay(&self) -> usize {
        self.frame_delay
    }
}

impl LineEffect for Echo {
    fn activation(&self) -> usize {
        self.activation
    }

    /// Feed back every source sample whose echo lands at or after `start`.
    ///
    /// Sources begin `frame_delay` frames before `start` (but never before
    /// the activation offset), so each echo is added exactly once across
    /// successive events and later sources already carry earlier echoes.
    fn apply(&self, buffer: &mut [f64], start: usize) {
        let k = self.frame_delay;
        let from = start.saturating_sub(k).max(self.activation);
        let to = buffer.len().saturating_sub(k);
        if from >= to {
            return;
        }
        for t in from..to {
            buffer[t + k] += self.amplitude * buffer[t];
        }
    }
}
