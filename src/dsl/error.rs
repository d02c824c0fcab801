//! Error types for the notation parser.

use std::fmt;

/// An error that occurred while scanning or parsing a composition string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    /// 1-based column (in characters) where the offending unit begins.
    pub col: usize,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    LexError,
    ParseError,
    PitchError,
}

impl ParseError {
    pub fn lex(message: impl Into<String>, col: usize) -> Self {
        Self {
            message: message.into(),
            col,
            kind: ErrorKind::LexError,
        }
    }

    pub fn parse(message: impl Into<String>, col: usize) -> Self {
        Self {
            message: message.into(),
            col,
            kind: ErrorKind::ParseError,
        }
    }

    pub fn pitch(message: impl Into<String>, col: usize) -> Self {
        Self {
            message: message.into(),
            col,
            kind: ErrorKind::PitchError,
        }
    }

    /// Re-anchor the error at `col`.
    pub fn at(mut self, col: usize) -> Self {
        self.col = col;
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[col {}] {:?}: {}", self.col, self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}
