use std::fmt;

/// A source position: 1-based line/column plus absolute byte offset.
///
/// The teacher's `Location` only tracks line/column; `offset` is added here
/// because spec §3 requires it ("source position (line, column, absolute
/// offset)").
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// 0-based absolute byte offset into the source.
    pub offset: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Lex-time failure.
///
/// Per spec §4.2/§7 the lexer itself never fails: unrecognized input
/// produces an [`crate::TokenKind::Illegal`] token rather than this error.
/// `LexError` exists as the positioned-error payload attached to an
/// [`crate::TokenKind::Illegal`] token, for callers (the parser) that want
/// to report it.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message} at {position}")]
pub struct LexError {
    /// Human-readable description.
    pub message: String,
    /// Where in the source the problem was found.
    pub position: Position,
}
