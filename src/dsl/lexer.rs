//! Scanner for the notation.
//!
//! Converts a composition string into a stream of [`Token`]s, left to
//! right. Whitespace separates units and is otherwise ignored; any other
//! character that cannot start a unit is an error.

use super::error::ParseError;
use super::token::{Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    /// Position just past the last rest, note or chord, while a duration
    /// suffix may still attach to it.
    unit_end: Option<usize>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            unit_end: None,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                break;
            };

            let token = match ch {
                'r' => self.lex_rest(),
                'A'..='G' => self.lex_note()?,
                '[' => self.lex_chord()?,
                '{' => self.lex_duration()?,
                '(' => self.lex_command()?,
                _ => {
                    return Err(ParseError::lex(
                        format!("unexpected character: '{ch}'"),
                        self.col(),
                    ));
                }
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        ch
    }

    fn col(&self) -> usize {
        self.pos + 1
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn lex_rest(&mut self) -> Token {
        let col = self.col();
        self.advance();
        self.unit_end = Some(self.pos);
        Token {
            kind: TokenKind::Rest,
            col,
        }
    }

    fn lex_note(&mut self) -> Result<Token, ParseError> {
        let col = self.col();
        let pitch = self.lex_pitch()?;
        self.unit_end = Some(self.pos);
        Ok(Token {
            kind: TokenKind::Note(pitch),
            col,
        })
    }

    /// Lex `<letter>[#|x|b|bb]<octave>[+N|-N]`, cents limited to two digits.
    fn lex_pitch(&mut self) -> Result<String, ParseError> {
        let col = self.col();
        let mut s = String::new();
        s.push(self.advance());

        match self.peek() {
            Some('#' | 'x') => s.push(self.advance()),
            Some('b') => {
                s.push(self.advance());
                if self.peek() == Some('b') {
                    s.push(self.advance());
                }
            }
            _ => {}
        }

        match self.peek() {
            Some(c) if c.is_ascii_digit() => s.push(self.advance()),
            _ => {
                return Err(ParseError::lex(
                    format!("expected octave digit after '{s}'"),
                    col,
                ));
            }
        }

        if matches!(self.peek(), Some('+' | '-'))
            && self.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            s.push(self.advance()); // sign
            s.push(self.advance());
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                s.push(self.advance());
            }
        }

        Ok(s)
    }

    fn lex_chord(&mut self) -> Result<Token, ParseError> {
        let col = self.col();
        self.advance(); // consume '['

        let mut pitches = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(']') => {
                    self.advance();
                    break;
                }
                Some('A'..='G') => pitches.push(self.lex_pitch()?),
                Some(c) => {
                    return Err(ParseError::lex(
                        format!("unexpected '{c}' inside chord"),
                        self.col(),
                    ));
                }
                None => return Err(ParseError::lex("unclosed chord", col)),
            }
        }

        if pitches.is_empty() {
            return Err(ParseError::lex("empty chord", col));
        }

        self.unit_end = Some(self.pos);
        Ok(Token {
            kind: TokenKind::Chord(pitches),
            col,
        })
    }

    fn lex_duration(&mut self) -> Result<Token, ParseError> {
        let col = self.col();
        if self.unit_end != Some(self.pos) {
            return Err(ParseError::lex(
                "duration must directly follow a rest, note or chord",
                col,
            ));
        }
        self.unit_end = None;
        self.advance(); // consume '{'

        let num = self.lex_integer(col)?;
        let den = if self.peek() == Some('/') {
            self.advance();
            self.lex_integer(col)?
        } else {
            1
        };

        if self.peek() != Some('}') {
            return Err(ParseError::lex("unclosed duration", col));
        }
        self.advance();

        Ok(Token {
            kind: TokenKind::Duration { num, den },
            col,
        })
    }

    fn lex_integer(&mut self, col: usize) -> Result<u32, ParseError> {
        let mut s = String::new();
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            s.push(self.advance());
        }
        if s.is_empty() {
            return Err(ParseError::lex("expected a number in duration", col));
        }
        s.parse()
            .map_err(|_| ParseError::lex(format!("duration out of range: {s}"), col))
    }

    fn lex_command(&mut self) -> Result<Token, ParseError> {
        let col = self.col();
        self.unit_end = None;
        self.advance(); // consume '('

        let mut key = String::new();
        while self.peek().is_some_and(|c| c.is_ascii_uppercase()) {
            key.push(self.advance());
        }
        if key.is_empty() {
            return Err(ParseError::lex("expected command key after '('", col));
        }
        if self.peek() != Some('=') {
            return Err(ParseError::lex(
                format!("expected '=' after command key '{key}'"),
                col,
            ));
        }
        self.advance(); // consume '='

        let mut value = String::new();
        while self.peek().is_some_and(|c| c != ')') {
            value.push(self.advance());
        }
        if self.peek().is_none() {
            return Err(ParseError::lex(format!("unclosed command '{key}'"), col));
        }
        self.advance(); // consume ')'

        if value.is_empty() {
            return Err(ParseError::lex(
                format!("missing value for command '{key}'"),
                col,
            ));
        }

        Ok(Token {
            kind: TokenKind::Command { key, value },
            col,
        })
    }
}
