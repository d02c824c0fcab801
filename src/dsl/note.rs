//! Pitch resolution — converts "A4", "Bb3", "F#5-20" to frequencies in Hz.

use std::collections::HashMap;
use std::str::FromStr;

use super::error::ParseError;

/// Concert pitch of A4 in Hz.
pub const A4_HZ: f64 = 440.0;

/// Half-step offsets relative to A in the same octave, indexed by
/// `[letter][accidental]`. Letters run A..G; accidentals follow
/// [`Accidental`] order.
const HALF_STEPS: [[i32; 5]; 7] = [
    // nat, #, b, bb, x
    [0, 1, -1, -2, 2],    // A
    [2, -9, 1, 0, -8],    // B
    [-9, -8, 2, 1, -7],   // C
    [-7, -6, -8, -9, -5], // D
    [-5, -4, -6, -7, -3], // E
    [-4, -3, -4, -6, -2], // F
    [-2, -1, -3, -4, 0],  // G
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
    DoubleFlat,
    DoubleSharp,
}

/// A parsed pitch token: letter, accidental, octave, and cent offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PitchSpec {
    /// Letter index, A = 0 through G = 6.
    letter: u8,
    accidental: Accidental,
    octave: u8,
    cents: i32,
}

impl PitchSpec {
    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn cents(&self) -> i32 {
        self.cents
    }

    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    /// Half-step distance from A in the same octave.
    pub fn half_steps(&self) -> i32 {
        HALF_STEPS[self.letter as usize][self.accidental as usize]
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f64 {
        let cents = 1200 * (self.octave as i32 - 4) + 100 * self.half_steps() + self.cents;
        A4_HZ * 2.0f64.powf(cents as f64 / 1200.0)
    }
}

impl FromStr for PitchSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::pitch(format!("invalid pitch: '{s}'"), 0);
        let bytes = s.as_bytes();
        let mut i = 0;

        let letter = match bytes.first() {
            Some(c @ b'A'..=b'G') => c - b'A',
            _ => return Err(invalid()),
        };
        i += 1;

        let accidental = match &bytes[i..] {
            [b'b', b'b', ..] => {
                i += 2;
                Accidental::DoubleFlat
            }
            [b'b', ..] => {
                i += 1;
                Accidental::Flat
            }
            [b'#', ..] => {
                i += 1;
                Accidental::Sharp
            }
            [b'x', ..] => {
                i += 1;
                Accidental::DoubleSharp
            }
            _ => Accidental::Natural,
        };

        let octave = match bytes.get(i) {
            Some(c @ b'0'..=b'9') => c - b'0',
            _ => return Err(invalid()),
        };
        i += 1;

        let cents = match &bytes[i..] {
            [] => 0,
            [sign @ (b'+' | b'-'), digits @ ..]
                if (1..=2).contains(&digits.len()) && digits.iter().all(u8::is_ascii_digit) =>
            {
                let magnitude: i32 = s[i + 1..].parse().map_err(|_| invalid())?;
                if *sign == b'-' {
                    -magnitude
                } else {
                    magnitude
                }
            }
            _ => return Err(invalid()),
        };

        Ok(Self {
            letter,
            accidental,
            octave,
            cents,
        })
    }
}

/// Memoizing pitch-to-frequency resolver.
///
/// Each distinct token is parsed once; later lookups return the cached
/// frequency. Entries are never invalidated.
#[derive(Debug, Default)]
pub struct PitchResolver {
    cache: HashMap<String, f64>,
}

impl PitchResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a pitch token, or `"r"` for a rest (0 Hz).
    pub fn resolve(&mut self, token: &str) -> Result<f64, ParseError> {
        if let Some(&freq) = self.cache.get(token) {
            return Ok(freq);
        }
        let freq = if token == "r" {
            0.0
        } else {
            token.parse::<PitchSpec>()?.frequency()
        };
        self.cache.insert(token.to_string(), freq);
        Ok(freq)
    }

    /// Number of distinct tokens resolved so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
