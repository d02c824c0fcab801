//! Full pipeline integration tests — notation → lines → mixdown → WAV.

use std::io::Write;

use assert_approx_eq::assert_approx_eq;
use cantus::audio::{encode_wav, mix, write_wav};
use cantus::dsl::{Notation, PitchResolver};
use cantus::instrument::Instrument;
use cantus::line::Line;
use cantus::score::{Score, ScoreError};

fn render(source: &str, tempo: f64) -> Vec<f64> {
    Line::parse("test", source, tempo, &mut PitchResolver::new())
        .expect("parse failed")
        .render()
        .expect("render failed")
}

fn max_abs(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0, |m, s| m.max(s.abs()))
}

#[test]
fn note_then_rest_at_120() {
    let buffer = render("A4{2}r{1}", 120.0);
    assert_eq!(buffer.len(), 66150);
    assert!(buffer[..44100].iter().any(|&s| s != 0.0));
    assert!(buffer[44100..].iter().all(|&s| s == 0.0));
}

#[test]
fn unit_envelope_leaves_synthesis_unchanged() {
    assert_eq!(render("(ADSR=1;0;0;0)A4{1}", 120.0), render("A4{1}", 120.0));
}

#[test]
fn repeated_effect_commands_are_idempotent() {
    assert_eq!(
        render("(ADSR=2;500;500;500)(ECHO=0.4;0.5)C4 E4 G4", 110.0),
        render(
            "(ADSR=2;500;500;500)(ADSR=2;500;500;500)(ECHO=0.4;0.5)(ECHO=0.4;0.5)C4 E4 G4",
            110.0
        ),
    );
}

#[test]
fn malformed_effect_removes_it() {
    // Removing the echo means the second note is plain synthesis.
    let echoed = render("(ECHO=0.5;0.25)A4 (ECHO=off)A4", 120.0);
    let plain = render("A4 A4", 120.0);
    assert_eq!(echoed[22050..], plain[22050..]);
}

#[test]
fn echo_sounds_through_a_later_rest() {
    let buffer = render("(ECHO=0.5;0.5)A4{1/2}r{1}", 120.0);
    let note = render("A4{1/2}", 120.0);
    assert_eq!(buffer.len(), 33075);
    for t in [1, 250, 7000, 11024] {
        assert_approx_eq!(buffer[11025 + t], 0.5 * note[t]);
    }
}

#[test]
fn release_fades_each_note_to_silence() {
    let buffer = render("(ADSR=1;0;0;1000)A4 A4", 120.0);
    let plain = render("A4 A4", 120.0);
    // The last frame of the first note is down to 1/release.
    assert_approx_eq!(buffer[22049], plain[22049] / 1000.0);
    // Well before the release the note is untouched.
    assert_eq!(buffer[5000], plain[5000]);
}

#[test]
fn silent_line_does_not_change_the_mix() {
    let sounding = render("[C4 E4 G4]{2}", 120.0);
    let silent = render("r{4}", 120.0);
    let alone = mix(&[sounding.clone()]);
    let both = mix(&[silent, sounding.clone()]);

    assert_eq!(both.peak(), alone.peak());
    assert_approx_eq!(both.peak(), max_abs(&sounding));
    assert_eq!(both.frames(), 88200);
    assert_eq!(&both.samples()[..alone.frames()], alone.samples());
    assert!(both.samples()[alone.frames()..].iter().all(|&s| s == 0));
}

#[test]
fn mix_reaches_full_scale() {
    let mixdown = mix(&[render("A4", 120.0), render("(INST=inst5)E5{1/2}", 120.0)]);
    assert!(mixdown
        .samples()
        .iter()
        .any(|&s| s == i16::MAX || s == i16::MIN));
}

#[test]
fn silent_score_renders_zeros_of_full_length() {
    let score = Score::from_compositions([("r{2}", 120.0), ("r", 60.0)]).unwrap();
    let mixdown = score.render().unwrap();
    assert!(mixdown.is_silent());
    assert_eq!(mixdown.frames(), 44100);
    assert!(mixdown.samples().iter().all(|&s| s == 0));
}

#[test]
fn lines_render_independently() {
    let together = Score::from_compositions([
        ("(INST=square)(DYNAM=0.5)(CENTS=30)A3{1/2}", 120.0),
        ("B4{1/2}", 120.0),
    ])
    .unwrap()
    .render()
    .unwrap();
    let by_hand = mix(&[
        render("(INST=square)(DYNAM=0.5)(CENTS=30)A3{1/2}", 120.0),
        render("B4{1/2}", 120.0),
    ]);
    assert_eq!(together, by_hand);
}

#[test]
fn every_instrument_renders_finite_sound() {
    for instrument in Instrument::ALL {
        let buffer = render(&format!("(INST={instrument})C4{{1/4}}"), 120.0);
        assert_eq!(buffer.len(), 5512);
        assert!(buffer.iter().all(|s| s.is_finite()), "{instrument}");
        assert!(max_abs(&buffer) > 0.0, "{instrument}");
    }
}

#[test]
fn unknown_instrument_fails_render() {
    let score = Score::from_compositions([("A4", 120.0), ("A4 (INST=theremin)", 120.0)]).unwrap();
    match score.render() {
        Err(ScoreError::Render(e)) => {
            assert_eq!(e.line, "line 1");
            assert_eq!(e.event, 1);
        }
        other => panic!("expected render error, got {other:?}"),
    }
}

#[test]
fn score_file_to_wav() {
    let dir = tempfile::tempdir().unwrap();
    let score_path = dir.path().join("song.yaml");
    let mut file = std::fs::File::create(&score_path).unwrap();
    write!(
        file,
        r#"
tempo: 120
lines:
  - name: melody
    notation:
      - "(INST=inst4)"
      - repeat: 2
        parts: ["C4D4{{1/2}}r{{1/2}}"]
  - name: bass
    tempo: 60
    notation: "(DYNAM=1/2)C2"
"#
    )
    .unwrap();

    let score = Score::from_file(&score_path, 100.0).unwrap();
    assert_eq!(score.lines().len(), 2);
    let mixdown = score.render().unwrap();
    // melody: 2 × 2 beats at 120; bass: 1 beat at 60
    assert_eq!(mixdown.frames(), 88200);

    let wav_path = dir.path().join("out").join("song.wav");
    write_wav(&wav_path, mixdown.samples()).unwrap();

    let mut reader = hound::WavReader::open(&wav_path).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().sample_rate, 44100);
    assert_eq!(reader.spec().bits_per_sample, 16);
    let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(samples, mixdown.samples());
}

#[test]
fn in_memory_wav_matches_file() {
    let mixdown = Score::from_compositions([("A4{1/8}", 120.0)])
        .unwrap()
        .render()
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.wav");
    write_wav(&path, mixdown.samples()).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), encode_wav(mixdown.samples()).unwrap());
}

#[test]
fn chord_events_survive_parsing() {
    let mut resolver = PitchResolver::new();
    let events = Notation::parse("[C5 E5 G5]{2}", &mut resolver).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].duration().as_beats(), 2.0);
    assert_eq!(resolver.len(), 3);
}
