//! Token types for the notation scanner.

/// A token produced by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based column of the token's first character.
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `r`
    Rest,
    /// A single pitch, e.g. `A4`, `Bb3`, `F#5-20`.
    Note(String),
    /// A bracketed group of pitches, e.g. `[C5 E5 G5]`.
    Chord(Vec<String>),
    /// `{N}` or `{N/D}` directly after a rest, note or chord.
    Duration { num: u32, den: u32 },
    /// `(KEY=value)`, value kept verbatim.
    Command { key: String, value: String },
}
