use sqlens_lexer::Position;

/// An error produced while parsing a token stream into a statement.
///
/// The parser never panics: every place that would otherwise index out of
/// bounds or `unwrap()` an `Option` returns one of these variants instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The token stream ended where a token was still expected.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What the parser was looking for.
        expected: String,
    },
    /// A token was present but didn't fit the current production.
    #[error("unexpected token {found:?} at {position}, expected {expected}")]
    UnexpectedToken {
        /// A human-readable description of what was found.
        found: String,
        /// What the parser was looking for.
        expected: String,
        /// Where the unexpected token starts.
        position: Position,
    },
    /// The lexer produced an `Illegal` token inside the statement being
    /// parsed.
    #[error("invalid token {text:?} at {position}: {message}")]
    InvalidToken {
        /// The offending source text.
        text: String,
        /// The lexer's diagnostic message.
        message: String,
        /// Where the invalid token starts.
        position: Position,
    },
    /// A keyword or construct is recognized but not supported by the
    /// selected dialect.
    #[error("{construct} is not supported by the {dialect} dialect at {position}")]
    UnsupportedByDialect {
        /// The construct that was rejected, e.g. `"MERGE"`.
        construct: String,
        /// The dialect's display name.
        dialect: String,
        /// Where the construct starts.
        position: Position,
    },
}

impl ParseError {
    /// The position the error was raised at, when one is available.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::UnexpectedEof { .. } => None,
            ParseError::UnexpectedToken { position, .. }
            | ParseError::InvalidToken { position, .. }
            | ParseError::UnsupportedByDialect { position, .. } => Some(*position),
        }
    }
}

/// A recognizable statement boundary the recovery routine can resynchronize
/// on after a [`ParseError`] — either a terminating `;` or the first keyword
/// of a new statement.
pub(crate) fn is_recovery_point(text: &str) -> bool {
    matches!(
        text.to_ascii_uppercase().as_str(),
        "SELECT"
            | "INSERT"
            | "UPDATE"
            | "DELETE"
            | "MERGE"
            | "CREATE"
            | "DROP"
            | "ALTER"
            | "WITH"
            | "BEGIN"
            | "COMMIT"
            | "ROLLBACK"
            | "SAVEPOINT"
            | "RELEASE"
            | "EXPLAIN"
    )
}
