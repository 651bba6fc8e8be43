use std::fmt;

use sqlens_core::Keyword;

use crate::error::Position;

/// A punctuation or operator token kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Punct {
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Period,
    /// `..`, the range separator in a procedural `FOR` loop bound.
    DotDot,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

impl fmt::Display for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Punct::Comma => ",",
            Punct::Semicolon => ";",
            Punct::Period => ".",
            Punct::DotDot => "..",
            Punct::LeftParen => "(",
            Punct::RightParen => ")",
        })
    }
}

/// A binary/unary operator token kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Op {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Asterisk,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `=`
    Eq,
    /// `<>` or `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `||`
    Concat,
    /// `::`
    DoubleColon,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Asterisk => "*",
            Op::Slash => "/",
            Op::Percent => "%",
            Op::Eq => "=",
            Op::NotEq => "<>",
            Op::Lt => "<",
            Op::LtEq => "<=",
            Op::Gt => ">",
            Op::GtEq => ">=",
            Op::Concat => "||",
            Op::DoubleColon => "::",
        })
    }
}

/// The kind of a scanned [`Token`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// A reserved or recognized word, per the active dialect.
    Keyword(Keyword),
    /// A plain or quoted identifier (`value` is the literal, already
    /// quote-stripped and un-escaped).
    Ident,
    /// An integer literal.
    Int,
    /// A floating-point literal (had a `.` and/or exponent).
    Float,
    /// A single-quoted string literal, or a PostgreSQL dollar-quoted string.
    Str,
    /// Punctuation: `, ; . ( )`.
    Punct(Punct),
    /// An operator.
    Op(Op),
    /// A character (or character sequence) this lexer could not classify.
    /// The parser reports these; the lexer itself never fails (spec §4.2).
    Illegal(String),
    /// End of input. Requesting another token after EOF yields EOF again.
    Eof,
}

/// A single scanned token: kind, literal text, and source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The token's classification.
    pub kind: TokenKind,
    /// The literal text of the token (quote-stripped for strings/quoted
    /// identifiers, verbatim otherwise).
    pub text: String,
    /// Where the token starts in the source.
    pub position: Position,
}

impl Token {
    /// Convenience constructor.
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Whether this token is the given keyword.
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(&self.kind, TokenKind::Keyword(k) if *k == kw)
    }

    /// Whether this token is the end-of-input marker.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Str => write!(f, "'{}'", self.text),
            TokenKind::Eof => f.write_str("<eof>"),
            _ => f.write_str(&self.text),
        }
    }
}
