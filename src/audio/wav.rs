//! WAV container output — mono 16-bit PCM via `hound`.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;

use crate::SAMPLE_RATE;

/// Format of every file this crate writes.
pub fn wav_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn write_samples<W: Write + Seek>(sink: W, samples: &[i16]) -> Result<(), hound::Error> {
    let mut writer = WavWriter::new(sink, wav_spec())?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

/// Write PCM to a WAV file, creating parent directories as needed.
pub fn write_wav(path: &Path, samples: &[i16]) -> Result<(), hound::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_samples(file, samples)?;
    info!("wrote {} frames to {}", samples.len(), path.display());
    Ok(())
}

/// Encode PCM as an in-memory WAV file.
pub fn encode_wav(samples: &[i16]) -> Result<Vec<u8>, hound::Error> {
    let mut bytes = Vec::new();
    write_samples(Cursor::new(&mut bytes), samples)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;

    #[test]
    fn header_is_mono_16_bit() {
        let bytes = encode_wav(&[0, 1, -1]).unwrap();
        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec(), wav_spec());
        assert_eq!(reader.len(), 3);
    }

    #[test]
    fn file_keeps_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.wav");
        let samples = vec![i16::MIN, -2, 0, 7, i16::MAX];
        write_wav(&path, &samples).unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        let read: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(read, samples);
    }

    #[test]
    fn empty_pcm_is_a_valid_file() {
        let bytes = encode_wav(&[]).unwrap();
        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.len(), 0);
    }
}
