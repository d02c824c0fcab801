//! ADSR envelope — a note effect shaping each event's samples.

use super::NoteEffect;

/// Attack-Decay-Sustain-Release envelope, set with `(ADSR=peak;a;d;r)`.
///
/// All time values are frame counts. The sustain level is fixed at 1.0;
/// `peak` is the level reached at the end of the attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub peak: f64,
    pub attack: usize,
    pub decay: usize,
    pub release: usize,
}

impl Envelope {
    pub fn new(peak: f64, attack: usize, decay: usize, release: usize) -> Self {
        Self {
            peak,
            attack,
            decay,
            release,
        }
    }

    /// Gain at `local` frames after the note started, with `until_end`
    /// frames left before the end of the buffer (at least 1).
    ///
    /// - During `[0, attack)`: linear ramp from 0 to `peak`.
    /// - During `[attack, attack+decay)`: linear ramp from `peak` to 1.
    /// - Within the last `release` frames of the buffer: linear ramp from 1 to 0.
    /// - Otherwise: 1.
    pub fn gain(&self, local: usize, until_end: usize) -> f64 {
        if local < self.attack {
            self.peak * (local as f64 / self.attack as f64)
        } else if local < self.attack + self.decay {
            let p = (local - self.attack) as f64 / self.decay as f64;
            (1.0 - p) * self.peak + p
        } else if until_end < self.release {
            let p = (self.release - until_end) as f64 / self.release as f64;
            1.0 - p
        } else {
            1.0
        }
    }
}

impl NoteEffect for Envelope {
    fn apply(&self, buffer: &mut [f64], start: usize) {
        let len = buffer.len();
        for (i, sample) in buffer.iter_mut().enumerate().skip(start) {
            *sample *= self.gain(i - start, len - i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_env() -> Envelope {
        Envelope::new(2.0, 100, 200, 50)
    }

    #[test]
    fn starts_at_zero() {
        assert_eq!(test_env().gain(0, 10_000), 0.0);
    }

    #[test]
    fn attack_ramps_toward_peak() {
        let env = test_env();
        assert!((env.gain(50, 10_000) - 1.0).abs() < 1e-12);
        assert!((env.gain(99, 10_000) - 1.98).abs() < 1e-12);
    }

    #[test]
    fn decay_starts_at_peak_and_lands_on_one() {
        let env = test_env();
        assert!((env.gain(100, 10_000) - 2.0).abs() < 1e-12);
        assert!((env.gain(200, 10_000) - 1.5).abs() < 1e-12);
        assert!((env.gain(300, 10_000) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sustain_holds_at_one() {
        assert_eq!(test_env().gain(5_000, 10_000), 1.0);
    }

    #[test]
    fn release_fades_to_zero_at_buffer_end() {
        let env = test_env();
        // 50 frames left: not yet releasing.
        assert_eq!(env.gain(1_000, 50), 1.0);
        assert!((env.gain(1_000, 25) - 0.5).abs() < 1e-12);
        assert!((env.gain(1_000, 1) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn all_zero_windows_are_identity() {
        let env = Envelope::new(1.0, 0, 0, 0);
        for (local, left) in [(0, 1), (0, 100), (37, 1), (500, 20)] {
            assert_eq!(env.gain(local, left), 1.0);
        }
    }

    #[test]
    fn apply_only_touches_samples_from_start() {
        let env = Envelope::new(1.0, 4, 0, 0);
        let mut buffer = vec![1.0; 8];
        env.apply(&mut buffer, 4);
        assert_eq!(buffer, vec![1.0, 1.0, 1.0, 1.0, 0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn apply_uses_note_local_time() {
        let env = Envelope::new(1.0, 2, 0, 0);
        let mut first = vec![1.0; 4];
        env.apply(&mut first, 0);
        let mut later = vec![1.0; 14];
        env.apply(&mut later, 10);
        assert_eq!(first, later[10..]);
    }

    #[test]
    fn apply_releases_at_tail() {
        let env = Envelope::new(1.0, 0, 0, 4);
        let mut buffer = vec![1.0; 6];
        env.apply(&mut buffer, 0);
        assert_eq!(buffer, vec![1.0, 1.0, 1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn apply_past_end_is_noop() {
        let env = test_env();
        let mut buffer = vec![0.5; 3];
        env.apply(&mut buffer, 3);
        assert_eq!(buffer, vec![0.5; 3]);
    }
}
