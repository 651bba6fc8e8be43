use std::fmt;

/// A literal value appearing in an expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    /// `NULL`.
    Null,
    /// `TRUE` / `FALSE`.
    Boolean(bool),
    /// An integer literal, kept as text to avoid premature overflow/precision
    /// decisions — the type checker (C6) parses it when it needs a value.
    Int(String),
    /// A floating-point literal (had a `.` and/or exponent), kept as text.
    Float(String),
    /// A single-quoted string literal, already quote-stripped and unescaped.
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("NULL"),
            Literal::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Literal::Int(s) | Literal::Float(s) => f.write_str(s),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}
