//! Polyphonic mixdown — parallel line rendering, summation, peak
//! normalization, and 16-bit quantization.

use log::warn;
use rayon::prelude::*;

use crate::line::{Line, RenderError};
use crate::SAMPLE_RATE;

/// Frames summed per parallel work item.
const CHUNK_FRAMES: usize = SAMPLE_RATE as usize;

/// Render every line on the rayon pool. Output order matches `lines`.
pub fn render_lines(lines: &[Line]) -> Result<Vec<Vec<f64>>, RenderError> {
    lines.par_iter().map(Line::render).collect()
}

/// Sum buffers position-wise, treating frames past a buffer's end as
/// silence. Returns the sum and its peak absolute value.
pub fn sum_lines(buffers: &[Vec<f64>]) -> (Vec<f64>, f64) {
    let max_len = buffers.iter().map(Vec::len).max().unwrap_or(0);
    let mut mixed = vec![0.0; max_len];

    let peak = mixed
        .par_chunks_mut(CHUNK_FRAMES)
        .enumerate()
        .map(|(chunk_index, chunk)| {
            let offset = chunk_index * CHUNK_FRAMES;
            let mut local_peak = 0.0f64;
            for (i, out) in chunk.iter_mut().enumerate() {
                let t = offset + i;
                *out = buffers.iter().filter_map(|b| b.get(t)).sum();
                local_peak = local_peak.max(out.abs());
            }
            local_peak
        })
        .reduce(|| 0.0, f64::max);

    (mixed, peak)
}

/// Scale so the loudest sample has magnitude 1. A zero peak leaves the
/// buffer untouched.
pub fn normalize(samples: &mut [f64], peak: f64) {
    if peak > 0.0 {
        samples.par_iter_mut().for_each(|s| *s /= peak);
    }
}

/// Truncate a normalized sample to signed 16-bit.
#[inline]
pub fn quantize(sample: f64) -> i16 {
    ((sample * 32768.0) as i64).clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

/// Sum, normalize and quantize rendered lines.
pub fn mix(buffers: &[Vec<f64>]) -> Mixdown {
    let (mut mixed, peak) = sum_lines(buffers);

    if peak == 0.0 {
        if !mixed.is_empty() {
            warn!("mix of {} frames is silent", mixed.len());
        }
        return Mixdown {
            samples: vec![0; mixed.len()],
            peak,
        };
    }

    normalize(&mut mixed, peak);
    Mixdown {
        samples: mixed.par_iter().map(|&s| quantize(s)).collect(),
        peak,
    }
}

/// Finished mono PCM at [`SAMPLE_RATE`] plus what the mix measured.
#[derive(Debug, Clone, PartialEq)]
pub struct Mixdown {
    samples: Vec<i16>,
    peak: f64,
}

impl Mixdown {
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    /// Peak absolute value of the summed lines, before normalization.
    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn is_silent(&self) -> bool {
        self.peak == 0.0
    }

    pub fn frames(&self) -> usize {
        self.samples.len()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }
}
