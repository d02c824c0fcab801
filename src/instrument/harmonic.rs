//! Harmonic-series combinator — layers one oscillator shape at several
//! frequency multiples with individual weights.

use std::borrow::Cow;

use super::Generator;

/// One layer of a harmonic series: `weight × base(freq × ratio)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    pub ratio: f64,
    pub weight: f64,
}

impl Partial {
    pub const fn new(ratio: f64, weight: f64) -> Self {
        Self { ratio, weight }
    }
}

/// A composite generator summing weighted copies of `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicSeries<G> {
    base: G,
    partials: Cow<'static, [Partial]>,
}

impl<G: Generator> HarmonicSeries<G> {
    pub fn new(base: G, partials: Vec<Partial>) -> Self {
        Self {
            base,
            partials: Cow::Owned(partials),
        }
    }

    /// Build a series over a fixed partial table, without allocating.
    pub const fn from_static(base: G, partials: &'static [Partial]) -> Self {
        Self {
            base,
            partials: Cow::Borrowed(partials),
        }
    }

    pub fn partials(&self) -> &[Partial] {
        &self.partials
    }
}

impl<G: Generator> Generator for HarmonicSeries<G> {
    fn sample(&self, freq: f64, frame: usize) -> f64 {
        self.partials
            .iter()
            .map(|p| p.weight * self.base.sample(freq * p.ratio, frame))
            .sum()
    }
}
