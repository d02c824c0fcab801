//! Notation front end — composition string → tokens → events.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod note;
pub mod parser;
pub mod token;

pub use ast::*;
pub use error::{ErrorKind, ParseError};
pub use note::{PitchResolver, PitchSpec};

use lexer::Lexer;
use parser::Parser;
use token::Token;

/// The notation parser.
///
/// Scans a composition string and parses it into [`Event`]s, resolving
/// pitches through a caller-owned [`PitchResolver`] so lines of one score
/// share a cache.
pub struct Notation;

impl Notation {
    /// Scan a composition string into tokens.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
        Lexer::new(source).tokenize()
    }

    /// Parse a composition string into events, in source order.
    pub fn parse(source: &str, resolver: &mut PitchResolver) -> Result<Vec<Event>, ParseError> {
        let tokens = Self::tokenize(source)?;
        Parser::new(resolver).parse(tokens)
    }
}
