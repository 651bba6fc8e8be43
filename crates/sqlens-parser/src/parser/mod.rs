mod ddl;
mod dml;
mod expr;
mod procedural;
mod query;
mod transaction;
mod types;

use sqlens_ast::Statement;
use sqlens_core::{Dialect, Keyword};
use sqlens_lexer::{Lexer, Position, Punct, Token, TokenKind};

use crate::error::{is_recovery_point, ParseError};
use crate::peek::{multipeek, MultiPeek};

/// A recursive-descent parser over one dialect's token stream (C4).
///
/// The parser holds no backing copy of the source text: it consumes tokens
/// produced eagerly by the lexer and builds AST nodes directly, one
/// statement at a time.
pub struct Parser<'d> {
    pub(crate) dialect: &'d Dialect,
    tokens: MultiPeek<std::vec::IntoIter<Token>>,
}

impl<'d> Parser<'d> {
    /// Lexes `input` under `dialect` and prepares a parser over the result.
    pub fn new(dialect: &'d Dialect, input: &str) -> Self {
        let tokens = Lexer::new(dialect, input).tokenize();
        Parser {
            dialect,
            tokens: multipeek(tokens),
        }
    }

    fn peek(&mut self) -> &Token {
        // `tokenize` always appends a terminal `Eof`, so the stream never
        // runs dry: this unwrap cannot fail.
        self.tokens.peek().expect("token stream always ends in Eof")
    }

    fn peek_nth(&mut self, n: usize) -> Option<&Token> {
        self.tokens.reset_cursor();
        let mut last = None;
        for _ in 0..=n {
            last = self.tokens.peek_next();
        }
        self.tokens.reset_cursor();
        last
    }

    fn advance(&mut self) -> Token {
        self.tokens.next().expect("token stream always ends in Eof")
    }

    fn position(&mut self) -> Position {
        self.peek().position
    }

    fn is_eof(&mut self) -> bool {
        self.peek().is_eof()
    }

    fn check_illegal(&mut self) -> Result<(), ParseError> {
        if let TokenKind::Illegal(message) = &self.peek().kind {
            let message = message.clone();
            let token = self.advance();
            return Err(ParseError::InvalidToken {
                text: token.text,
                message,
                position: token.position,
            });
        }
        Ok(())
    }

    fn peek_keyword(&mut self) -> Option<Keyword> {
        match self.peek().kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    fn peek_keyword_nth(&mut self, n: usize) -> Option<Keyword> {
        match self.peek_nth(n).map(|t| &t.kind) {
            Some(TokenKind::Keyword(kw)) => Some(*kw),
            _ => None,
        }
    }

    fn peek_punct(&mut self) -> Option<Punct> {
        match self.peek().kind {
            TokenKind::Punct(p) => Some(p),
            _ => None,
        }
    }

    fn peek_op(&mut self) -> Option<sqlens_lexer::Op> {
        match self.peek().kind {
            TokenKind::Op(op) => Some(op),
            _ => None,
        }
    }

    fn consume_op(&mut self, op: sqlens_lexer::Op) -> bool {
        if self.peek_op() == Some(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_op(&mut self, op: sqlens_lexer::Op) -> Result<(), ParseError> {
        self.check_illegal()?;
        if self.consume_op(op) {
            Ok(())
        } else {
            let token = self.peek().clone();
            Err(ParseError::UnexpectedToken {
                found: token.text,
                expected: op.to_string(),
                position: token.position,
            })
        }
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind.clone()
    }

    /// Advances past the current token. Named call sites use this instead of
    /// the private [`Parser::advance`] only to read clearly at a keyword or
    /// word dispatch site where the token was already matched by `peek`.
    fn advance_keyword(&mut self) -> Token {
        self.advance()
    }

    fn advance_word(&mut self) -> Token {
        self.advance()
    }

    fn advance_text(&mut self) -> String {
        self.advance().text
    }

    /// Non-consuming case-insensitive check of the current token's text
    /// against `word`, whether it lexed as an identifier or a [`Keyword`].
    fn peek_word(&mut self, word: &str) -> bool {
        match &self.peek().kind {
            TokenKind::Ident => self.peek().text.eq_ignore_ascii_case(word),
            TokenKind::Keyword(kw) => kw.to_string().eq_ignore_ascii_case(word),
            _ => false,
        }
    }

    fn consume_keyword(&mut self, kw: Keyword) -> bool {
        if self.peek_keyword() == Some(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_punct(&mut self, p: Punct) -> bool {
        if self.peek_punct() == Some(p) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<(), ParseError> {
        self.check_illegal()?;
        if self.consume_keyword(kw) {
            Ok(())
        } else {
            let token = self.peek().clone();
            Err(ParseError::UnexpectedToken {
                found: token.text,
                expected: kw.to_string(),
                position: token.position,
            })
        }
    }

    /// Consumes the current token if its text matches `word` case
    /// insensitively, whether it lexed as an identifier or as a [`Keyword`]
    /// variant. Used for the handful of context-dependent words (`RENAME`,
    /// `CHECK`, `ANALYZE`, `TRANSACTION`, `MESSAGE_TEXT`, `SQLSTATE`) that
    /// the shared keyword table treats as plain identifiers rather than
    /// reserved words.
    fn consume_word(&mut self, word: &str) -> bool {
        let matches = match &self.peek().kind {
            TokenKind::Ident => self.peek().text.eq_ignore_ascii_case(word),
            TokenKind::Keyword(kw) => kw.to_string().eq_ignore_ascii_case(word),
            _ => false,
        };
        if matches {
            self.advance();
        }
        matches
    }

    fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        self.check_illegal()?;
        if self.consume_word(word) {
            Ok(())
        } else {
            let token = self.peek().clone();
            Err(ParseError::UnexpectedToken {
                found: token.text,
                expected: word.to_string(),
                position: token.position,
            })
        }
    }

    fn expect_punct(&mut self, p: Punct) -> Result<(), ParseError> {
        self.check_illegal()?;
        if self.consume_punct(p) {
            Ok(())
        } else {
            let token = self.peek().clone();
            Err(ParseError::UnexpectedToken {
                found: token.text,
                expected: p.to_string(),
                position: token.position,
            })
        }
    }

    fn parse_ident(&mut self) -> Result<sqlens_ast::Ident, ParseError> {
        self.check_illegal()?;
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Ident => {
                self.advance();
                Ok(sqlens_ast::Ident::new(token.text))
            }
            TokenKind::Keyword(_) => {
                // Many keywords double as identifiers in unambiguous
                // positions (column/table names); the caller already knows
                // an identifier is expected here.
                self.advance();
                Ok(sqlens_ast::Ident::new(token.text))
            }
            _ => Err(ParseError::UnexpectedToken {
                found: token.text,
                expected: "identifier".to_string(),
                position: token.position,
            }),
        }
    }

    fn parse_object_name(&mut self) -> Result<sqlens_ast::ObjectName, ParseError> {
        let mut parts = vec![self.parse_ident()?];
        while self.consume_punct(Punct::Period) {
            parts.push(self.parse_ident()?);
        }
        Ok(sqlens_ast::ObjectName(parts))
    }

    /// Parses one statement, consuming an optional trailing `;`.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let _span = tracing::debug_span!("parse_statement", position = ?self.position()).entered();
        self.check_illegal()?;
        let stmt = match self.peek_keyword() {
            Some(Keyword::SELECT) => Statement::from_query(query::parse_query(self)?),
            Some(Keyword::WITH) => Statement::With(dml::parse_with(self)?),
            Some(Keyword::INSERT) => Statement::Insert(dml::parse_insert(self)?),
            Some(Keyword::UPDATE) => Statement::Update(dml::parse_update(self)?),
            Some(Keyword::DELETE) => Statement::Delete(dml::parse_delete(self)?),
            Some(Keyword::MERGE) => Statement::Merge(dml::parse_merge(self)?),
            Some(Keyword::CREATE) => ddl::parse_create(self)?,
            Some(Keyword::DROP) => Statement::Drop(ddl::parse_drop(self)?),
            Some(Keyword::ALTER) => Statement::AlterTable(ddl::parse_alter_table(self)?),
            Some(Keyword::BEGIN) => Statement::Begin(transaction::parse_begin(self)?),
            Some(Keyword::START) => Statement::Begin(transaction::parse_begin(self)?),
            Some(Keyword::COMMIT) => Statement::Commit(transaction::parse_commit(self)?),
            Some(Keyword::ROLLBACK) => Statement::Rollback(transaction::parse_rollback(self)?),
            Some(Keyword::SAVEPOINT) => Statement::Savepoint(transaction::parse_savepoint(self)?),
            Some(Keyword::RELEASE) => Statement::Release(transaction::parse_release(self)?),
            Some(Keyword::EXPLAIN) => Statement::Explain(transaction::parse_explain(self)?),
            Some(_) => Statement::Procedural(procedural::parse_proc_stmt(self)?),
            None => {
                let token = self.peek().clone();
                return Err(ParseError::UnexpectedToken {
                    found: token.text,
                    expected: "statement".to_string(),
                    position: token.position,
                });
            }
        };
        self.consume_punct(Punct::Semicolon);
        Ok(stmt)
    }

    /// Skips tokens until a `;` at nesting depth 0, or the first keyword of
    /// a new statement at depth 0, so a later statement in the same script
    /// can still be parsed after an earlier one failed.
    ///
    /// Depth tracks `(`/`)` and `BEGIN`/`END` nesting the same way
    /// [`ddl::parse_opaque_body`] does: a failed parse inside a procedural
    /// block's body must skip every `;`-terminated statement nested inside
    /// that block, not resync on the first one.
    fn recover(&mut self) {
        let mut depth = 0i32;
        loop {
            if self.is_eof() {
                return;
            }
            if depth == 0 {
                if self.consume_punct(Punct::Semicolon) {
                    return;
                }
                if let TokenKind::Keyword(kw) = &self.peek().kind {
                    if is_recovery_point(&kw.to_string()) {
                        return;
                    }
                }
            }
            match self.peek_kind() {
                TokenKind::Punct(Punct::LeftParen) => depth += 1,
                TokenKind::Punct(Punct::RightParen) => depth = (depth - 1).max(0),
                TokenKind::Keyword(Keyword::BEGIN) => depth += 1,
                TokenKind::Keyword(Keyword::END) => depth = (depth - 1).max(0),
                _ => {}
            }
            self.advance();
        }
    }
}

/// Parses every statement in `input`, recovering after each failure so one
/// malformed statement doesn't prevent the rest of the script from being
/// recognized.
///
/// Returns the statements that parsed successfully alongside every error
/// encountered, in source order.
pub fn parse_script(dialect: &Dialect, input: &str) -> (Vec<Statement>, Vec<ParseError>) {
    let mut parser = Parser::new(dialect, input);
    let mut statements = Vec::new();
    let mut errors = Vec::new();
    while !parser.is_eof() {
        match parser.parse_statement() {
            Ok(stmt) => statements.push(stmt),
            Err(err) => {
                errors.push(err);
                parser.recover();
            }
        }
    }
    (statements, errors)
}

/// Parses exactly one statement from `input`.
pub fn parse_statement(dialect: &Dialect, input: &str) -> Result<Statement, ParseError> {
    Parser::new(dialect, input).parse_statement()
}
