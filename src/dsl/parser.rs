//! Parser for the notation.
//!
//! Turns the scanner's token stream into [`Event`]s: attaches duration
//! suffixes, resolves pitches to frequencies, and decodes commands.

use std::iter::Peekable;
use std::vec::IntoIter;

use log::warn;

use super::ast::{Command, Event, Note};
use super::error::ParseError;
use super::note::PitchResolver;
use super::token::{Token, TokenKind};
use crate::effect::{EffectId, Envelope};
use crate::time::BeatFraction;

pub struct Parser<'r> {
    resolver: &'r mut PitchResolver,
}

impl<'r> Parser<'r> {
    pub fn new(resolver: &'r mut PitchResolver) -> Self {
        Self { resolver }
    }

    pub fn parse(&mut self, tokens: Vec<Token>) -> Result<Vec<Event>, ParseError> {
        let mut events = Vec::with_capacity(tokens.len());
        let mut tokens = tokens.into_iter().peekable();

        while let Some(token) = tokens.next() {
            let col = token.col;
            let event = match token.kind {
                TokenKind::Rest => Event::Note(Note::rest(duration_suffix(&mut tokens)?)),
                TokenKind::Note(pitch) => {
                    let freq = self.resolve(&pitch, col)?;
                    Event::Note(Note {
                        freqs: vec![freq],
                        duration: duration_suffix(&mut tokens)?,
                    })
                }
                TokenKind::Chord(pitches) => {
                    let freqs = pitches
                        .iter()
                        .map(|p| self.resolve(p, col))
                        .collect::<Result<Vec<_>, _>>()?;
                    Event::Note(Note {
                        freqs,
                        duration: duration_suffix(&mut tokens)?,
                    })
                }
                TokenKind::Duration { .. } => {
                    return Err(ParseError::parse(
                        "duration without a rest, note or chord",
                        col,
                    ));
                }
                TokenKind::Command { key, value } => {
                    Event::Command(parse_command(&key, &value, col)?)
                }
            };
            events.push(event);
        }

        Ok(events)
    }

    fn resolve(&mut self, pitch: &str, col: usize) -> Result<f64, ParseError> {
        self.resolver.resolve(pitch).map_err(|e| e.at(col))
    }
}

/// Consume a `{N/D}` suffix if one follows; otherwise one beat.
fn duration_suffix(tokens: &mut Peekable<IntoIter<Token>>) -> Result<BeatFraction, ParseError> {
    match tokens.next_if(|t| matches!(t.kind, TokenKind::Duration { .. })) {
        Some(Token {
            kind: TokenKind::Duration { num, den },
            col,
        }) => BeatFraction::new(num, den)
            .ok_or_else(|| ParseError::parse("duration denominator must not be zero", col)),
        _ => Ok(BeatFraction::ONE),
    }
}

/// Decode `(KEY=value)`.
///
/// Unusable ADSR or ECHO parameters turn into a removal of that effect.
/// Every other malformed command is an error.
pub fn parse_command(key: &str, value: &str, col: usize) -> Result<Command, ParseError> {
    match key {
        "ADSR" => Ok(parse_envelope(value)
            .map(Command::SetEnvelope)
            .unwrap_or_else(|| degrade(EffectId::Envelope, value))),
        "ECHO" => Ok(parse_echo(value).unwrap_or_else(|| degrade(EffectId::Echo, value))),
        "INST" => Ok(Command::SetInstrument(value.trim().to_string())),
        "TEMPO" => match parse_ratio(value) {
            Some(ratio) if ratio > 0.0 => Ok(Command::SetTempoFactor(ratio)),
            _ => Err(ParseError::parse(
                format!("TEMPO needs a positive ratio, got '{value}'"),
                col,
            )),
        },
        "DYNAM" => parse_ratio(value).map(Command::SetDynamics).ok_or_else(|| {
            ParseError::parse(format!("DYNAM needs a ratio, got '{value}'"), col)
        }),
        "CENTS" => value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .map(Command::SetCentOffset)
            .ok_or_else(|| ParseError::parse(format!("CENTS needs a number, got '{value}'"), col)),
        _ => Err(ParseError::parse(
            format!("unknown command key: '{key}'"),
            col,
        )),
    }
}

fn degrade(id: EffectId, value: &str) -> Command {
    warn!("{id} parameters '{value}' not understood, removing {id}");
    Command::RemoveEffect(id)
}

/// `peak;attack;decay;release`. Frame counts must be non-negative integers.
fn parse_envelope(value: &str) -> Option<Envelope> {
    let params: Vec<&str> = value.split(';').map(str::trim).collect();
    let [peak, attack, decay, release] = params.as_slice() else {
        return None;
    };
    let peak = peak.parse::<f64>().ok().filter(|p| p.is_finite())?;
    Some(Envelope::new(
        peak,
        attack.parse().ok()?,
        decay.parse().ok()?,
        release.parse().ok()?,
    ))
}

/// `amplitude;beats`
fn parse_echo(value: &str) -> Option<Command> {
    let params: Vec<&str> = value.split(';').map(str::trim).collect();
    let [amplitude, beat_delay] = params.as_slice() else {
        return None;
    };
    let amplitude = amplitude.parse::<f64>().ok().filter(|a| a.is_finite())?;
    let beat_delay = beat_delay
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)?;
    Some(Command::SetEcho {
        amplitude,
        beat_delay,
    })
}

/// `N` or `N/D` as a finite float.
fn parse_ratio(value: &str) -> Option<f64> {
    let mut parts = value.trim().split('/');
    let num: f64 = parts.next()?.trim().parse().ok()?;
    let den: f64 = match parts.next() {
        Some(d) => d.trim().parse().ok()?,
        None => 1.0,
    };
    if parts.next().is_some() || den == 0.0 {
        return None;
    }
    let ratio = num / den;
    ratio.is_finite().then_some(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::error::ErrorKind;
    use crate::dsl::lexer::Lexer;

    fn parse(src: &str) -> Result<Vec<Event>, ParseError> {
        let tokens = Lexer::new(src).tokenize()?;
        let mut resolver = PitchResolver::new();
        Parser::new(&mut resolver).parse(tokens)
    }

    fn command(src: &str) -> Command {
        match parse(src).unwrap().as_slice() {
            [Event::Command(c)] => c.clone(),
            other => panic!("expected one command, got {other:?}"),
        }
    }

    #[test]
    fn note_then_rest() {
        let events = parse("A4{2}r{1}").unwrap();
        assert_eq!(
            events,
            vec![
                Event::Note(Note {
                    freqs: vec![440.0],
                    duration: BeatFraction::whole(2),
                }),
                Event::Note(Note::rest(BeatFraction::ONE)),
            ]
        );
    }

    #[test]
    fn default_duration_is_one_beat() {
        let events = parse("A4 r").unwrap();
        assert!(events.iter().all(|e| e.duration() == BeatFraction::ONE));
    }

    #[test]
    fn fractional_duration_exact() {
        let events = parse("A4{3/4}").unwrap();
        assert_eq!(events[0].duration().as_beats(), 0.75);
    }

    #[test]
    fn zero_denominator_is_error() {
        let err = parse("A4{1/0}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert_eq!(err.col, 3);
    }

    #[test]
    fn chord_resolves_every_pitch() {
        let events = parse("[A3 A4 A5]{1/2}").unwrap();
        match &events[0] {
            Event::Note(note) => {
                assert_eq!(note.freqs.len(), 3);
                assert!((note.freqs[0] - 220.0).abs() < 1e-9);
                assert_eq!(note.freqs[1], 440.0);
                assert!((note.freqs[2] - 880.0).abs() < 1e-9);
                assert_eq!(note.duration, BeatFraction::new(1, 2).unwrap());
            }
            other => panic!("expected chord, got {other:?}"),
        }
    }

    #[test]
    fn events_in_source_order() {
        let events = parse("(DYNAM=0.5)C4(TEMPO=2)r").unwrap();
        assert_eq!(events.len(), 4);
        assert!(events[0].is_command());
        assert!(!events[1].is_command());
        assert!(events[2].is_command());
        assert!(matches!(&events[3], Event::Note(n) if n.is_rest()));
    }

    #[test]
    fn commands_take_no_time() {
        let events = parse("(CENTS=10)").unwrap();
        assert_eq!(events[0].duration(), BeatFraction::ZERO);
    }

    #[test]
    fn adsr_command() {
        assert_eq!(
            command("(ADSR=2;0;441;0)"),
            Command::SetEnvelope(Envelope::new(2.0, 0, 441, 0))
        );
    }

    #[test]
    fn adsr_degrades_to_removal() {
        for src in [
            "(ADSR=off)",
            "(ADSR=1;2;3)",
            "(ADSR=1;2;3;4;5)",
            "(ADSR=1;0.5;0;0)",
            "(ADSR=1;-1;0;0)",
            "(ADSR=x;0;0;0)",
        ] {
            assert_eq!(
                command(src),
                Command::RemoveEffect(EffectId::Envelope),
                "{src}"
            );
        }
    }

    #[test]
    fn echo_command() {
        assert_eq!(
            command("(ECHO=0.4;1/2)"),
            Command::RemoveEffect(EffectId::Echo)
        );
        assert_eq!(
            command("(ECHO=0.4;0.5)"),
            Command::SetEcho {
                amplitude: 0.4,
                beat_delay: 0.5
            }
        );
    }

    #[test]
    fn echo_degrades_to_removal() {
        for src in ["(ECHO=none)", "(ECHO=0.5)", "(ECHO=0.5;1;2)", "(ECHO=0.5;-1)"] {
            assert_eq!(command(src), Command::RemoveEffect(EffectId::Echo), "{src}");
        }
    }

    #[test]
    fn tempo_ratios() {
        assert_eq!(command("(TEMPO=2)"), Command::SetTempoFactor(2.0));
        assert_eq!(command("(TEMPO=1/4)"), Command::SetTempoFactor(0.25));
        assert_eq!(command("(TEMPO=3.6)"), Command::SetTempoFactor(3.6));
    }

    #[test]
    fn tempo_must_be_positive() {
        for src in ["(TEMPO=0)", "(TEMPO=-1)", "(TEMPO=1/0)", "(TEMPO=fast)"] {
            let err = parse(src).unwrap_err();
            assert_eq!(err.kind, ErrorKind::ParseError, "{src}");
            assert!(err.message.contains("TEMPO"));
        }
    }

    #[test]
    fn dynamics_ratios() {
        assert_eq!(command("(DYNAM=0.7)"), Command::SetDynamics(0.7));
        assert_eq!(command("(DYNAM=1/2)"), Command::SetDynamics(0.5));
        assert!(parse("(DYNAM=loud)").is_err());
        assert!(parse("(DYNAM=1/2/3)").is_err());
    }

    #[test]
    fn cent_offset() {
        assert_eq!(command("(CENTS=-30)"), Command::SetCentOffset(-30.0));
        assert_eq!(command("(CENTS=12.5)"), Command::SetCentOffset(12.5));
        assert!(parse("(CENTS=1/2)").is_err());
    }

    #[test]
    fn instrument_name_taken_verbatim() {
        assert_eq!(
            command("(INST=inst8DoubledOctaveUp)"),
            Command::SetInstrument("inst8DoubledOctaveUp".into())
        );
        // Names are checked when the command runs, not here.
        assert_eq!(
            command("(INST=nope)"),
            Command::SetInstrument("nope".into())
        );
    }

    #[test]
    fn unknown_key_is_fatal() {
        let err = parse("A4 (REVERB=1)").unwrap_err();
        assert_eq!(err.col, 4);
        assert!(err.message.contains("REVERB"));
    }

    #[test]
    fn shared_resolver_caches_across_parses() {
        let mut resolver = PitchResolver::new();
        let tokens = Lexer::new("A4 C4 A4").tokenize().unwrap();
        Parser::new(&mut resolver).parse(tokens).unwrap();
        let tokens = Lexer::new("[A4 C4]").tokenize().unwrap();
        Parser::new(&mut resolver).parse(tokens).unwrap();
        assert_eq!(resolver.len(), 2);
    }
}
