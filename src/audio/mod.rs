//! Audio output — mixing rendered lines down to PCM and writing WAV files.

pub mod mix;
pub mod wav;

pub use mix::{mix, render_lines, Mixdown};
pub use wav::{encode_wav, write_wav};
