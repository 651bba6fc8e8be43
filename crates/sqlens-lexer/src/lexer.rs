use std::iter::Peekable;
use std::str::Chars;

use sqlens_core::{Dialect, Keyword};

use crate::error::Position;
use crate::token::{Op, Punct, Token, TokenKind};

/// Character-stream to token-stream scanner (C2).
///
/// Single-threaded, deterministic, zero lookahead over the underlying
/// `Chars` iterator (the lexer peeks exactly one character at a time; the
/// one token of lookahead the parser needs is buffered by the parser, not
/// here). One `Lexer` owns one input; there is no shared mutable state, so
/// any number of lexers may run across threads in parallel (spec §5).
pub struct Lexer<'a> {
    dialect: &'a Dialect,
    iter: Peekable<Chars<'a>>,
    pos: Position,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer for `input`, scanning according to `dialect`.
    pub fn new(dialect: &'a Dialect, input: &'a str) -> Self {
        Self {
            dialect,
            iter: input.chars().peekable(),
            pos: Position {
                line: 1,
                column: 1,
                offset: 0,
            },
        }
    }

    /// Scans the entire input into a token vector, ending with exactly one
    /// [`TokenKind::Eof`]. Whitespace and comments are dropped (the parser
    /// never needs to see them). Never panics or returns an error: bad
    /// input surfaces as [`TokenKind::Illegal`] tokens (spec §4.2 rule 9,
    /// §7.1).
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut out = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.is_eof();
            out.push(tok);
            if is_eof {
                return out;
            }
        }
    }

    /// Scans and returns the next significant token, skipping whitespace
    /// and comments. Calling this again after EOF is idempotent.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, "", start),
        };

        if ch == '$' {
            if self.dialect.dollar_quoted {
                return self.scan_dollar_quoted(start);
            }
            self.advance();
            return Token::new(TokenKind::Illegal("$".into()), "$", start);
        }
        if ch == '\'' {
            return self.scan_string_literal(start);
        }
        if let Some(close) = self.dialect.is_identifier_quote(ch) {
            return self.scan_quoted_ident(start, close);
        }
        if is_ident_start(ch) {
            return self.scan_ident_or_keyword(start);
        }
        if ch.is_ascii_digit() || (ch == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            return self.scan_number(start);
        }
        self.scan_operator_or_punct(start)
    }

    // -- character-stream primitives -----------------------------------

    fn peek(&mut self) -> Option<char> {
        self.iter.peek().copied()
    }

    /// Peeks `n` characters ahead without consuming (n=0 is equivalent to
    /// `peek`). Only used for the handful of two-character lookaheads the
    /// scanner needs (e.g. a digit after a leading `.`).
    fn peek_at(&self, n: usize) -> Option<char> {
        self.iter.clone().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.iter.next()?;
        self.pos.offset += ch.len_utf8();
        if ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(ch)
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('-') if self.peek_at(1) == Some('-') => {
                    self.advance();
                    self.advance();
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    // Nested block comments are not supported (spec §4.2
                    // rule 1): the scan ends at the first `*/`.
                    loop {
                        match self.peek() {
                            None => break,
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }

    // -- token scanners ---------------------------------------------------

    fn scan_ident_or_keyword(&mut self, start: Position) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if is_ident_part(ch) {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        match Keyword::lookup(&text) {
            Some(kw) if self.dialect.is_keyword(&text) => {
                Token::new(TokenKind::Keyword(kw), text, start)
            }
            _ => Token::new(TokenKind::Ident, text, start),
        }
    }

    fn scan_quoted_ident(&mut self, start: Position, close: char) -> Token {
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    return Token::new(
                        TokenKind::Illegal("unterminated quoted identifier".into()),
                        text,
                        start,
                    );
                }
                Some(ch) if ch == close => {
                    self.advance();
                    if self.advance_if(close) {
                        // doubled close-quote escapes one
                        text.push(close);
                        continue;
                    }
                    return Token::new(TokenKind::Ident, text, start);
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn scan_string_literal(&mut self, start: Position) -> Token {
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    return Token::new(
                        TokenKind::Illegal("unterminated string literal".into()),
                        text,
                        start,
                    );
                }
                Some('\'') => {
                    self.advance();
                    if self.advance_if('\'') {
                        text.push('\'');
                        continue;
                    }
                    return Token::new(TokenKind::Str, text, start);
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Scans a PostgreSQL `$tag$ ... $tag$` dollar-quoted string (spec
    /// §4.2 rule 6). The scanner matches the first occurrence of the
    /// identical closing delimiter; it does not attempt any nesting logic
    /// for same-tag pairs.
    fn scan_dollar_quoted(&mut self, start: Position) -> Token {
        let opening = match self.read_dollar_delimiter() {
            Some(tag) => tag,
            None => {
                return Token::new(
                    TokenKind::Illegal("malformed dollar-quote tag".into()),
                    "$",
                    start,
                );
            }
        };

        let mut text = String::new();
        loop {
            if self.peek().is_none() {
                return Token::new(
                    TokenKind::Illegal("unterminated dollar-quoted string".into()),
                    text,
                    start,
                );
            }
            if self.peek() == Some('$') {
                let checkpoint = self.iter.clone();
                let checkpoint_pos = self.pos;
                if let Some(candidate) = self.read_dollar_delimiter() {
                    if candidate == opening {
                        return Token::new(TokenKind::Str, text, start);
                    }
                }
                // Not the matching delimiter: restore and consume one `$`
                // as ordinary content.
                self.iter = checkpoint;
                self.pos = checkpoint_pos;
                text.push('$');
                self.advance();
                continue;
            }
            let ch = self.peek().unwrap();
            text.push(ch);
            self.advance();
        }
    }

    /// Reads a `$tag$` delimiter (tag may be empty) starting at the current
    /// `$`. Returns the inner tag text, or `None` if this isn't a
    /// well-formed delimiter (no closing `$` before a non-tag character).
    fn read_dollar_delimiter(&mut self) -> Option<String> {
        debug_assert_eq!(self.peek(), Some('$'));
        self.advance();
        let mut tag = String::new();
        loop {
            match self.peek() {
                Some('$') => {
                    self.advance();
                    return Some(tag);
                }
                Some(ch) if is_ident_part(ch) => {
                    tag.push(ch);
                    self.advance();
                }
                _ => return None,
            }
        }
    }

    fn scan_number(&mut self, start: Position) -> Token {
        let mut text = String::new();
        let mut is_float = false;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            text.push(self.advance().unwrap());
        }
        if self.peek() == Some('.')
            && self
                .peek_at(1)
                .is_some_and(|c| c.is_ascii_digit() || text.is_empty())
        {
            is_float = true;
            text.push(self.advance().unwrap());
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                text.push(self.advance().unwrap());
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut lookahead = self.iter.clone();
            lookahead.next();
            let mut valid = false;
            if let Some(c) = lookahead.next() {
                if c == '+' || c == '-' {
                    valid = lookahead.next().is_some_and(|c| c.is_ascii_digit());
                } else {
                    valid = c.is_ascii_digit();
                }
            }
            if valid {
                is_float = true;
                text.push(self.advance().unwrap()); // e/E
                if matches!(self.peek(), Some('+') | Some('-')) {
                    text.push(self.advance().unwrap());
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    text.push(self.advance().unwrap());
                }
            }
        }
        Token::new(
            if is_float {
                TokenKind::Float
            } else {
                TokenKind::Int
            },
            text,
            start,
        )
    }

    fn scan_operator_or_punct(&mut self, start: Position) -> Token {
        let ch = self.advance().unwrap();
        macro_rules! tok {
            ($kind:expr) => {
                Token::new($kind, ch.to_string(), start)
            };
        }
        match ch {
            ',' => tok!(TokenKind::Punct(Punct::Comma)),
            ';' => tok!(TokenKind::Punct(Punct::Semicolon)),
            '.' if self.advance_if('.') => Token::new(TokenKind::Punct(Punct::DotDot), "..", start),
            '.' => tok!(TokenKind::Punct(Punct::Period)),
            '(' => tok!(TokenKind::Punct(Punct::LeftParen)),
            ')' => tok!(TokenKind::Punct(Punct::RightParen)),
            '+' => tok!(TokenKind::Op(Op::Plus)),
            '-' => tok!(TokenKind::Op(Op::Minus)),
            '*' => tok!(TokenKind::Op(Op::Asterisk)),
            '/' => tok!(TokenKind::Op(Op::Slash)),
            '%' => tok!(TokenKind::Op(Op::Percent)),
            '=' => tok!(TokenKind::Op(Op::Eq)),
            '!' if self.advance_if('=') => Token::new(TokenKind::Op(Op::NotEq), "!=", start),
            '<' if self.advance_if('>') => Token::new(TokenKind::Op(Op::NotEq), "<>", start),
            '<' if self.advance_if('=') => Token::new(TokenKind::Op(Op::LtEq), "<=", start),
            '<' => tok!(TokenKind::Op(Op::Lt)),
            '>' if self.advance_if('=') => Token::new(TokenKind::Op(Op::GtEq), ">=", start),
            '>' => tok!(TokenKind::Op(Op::Gt)),
            '|' if self.advance_if('|') => Token::new(TokenKind::Op(Op::Concat), "||", start),
            ':' if self.advance_if(':') => {
                Token::new(TokenKind::Op(Op::DoubleColon), "::", start)
            }
            other => Token::new(
                TokenKind::Illegal(other.to_string()),
                other.to_string(),
                start,
            ),
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlens_core::Dialect;

    fn kinds(sql: &str, dialect: &Dialect) -> Vec<TokenKind> {
        Lexer::new(dialect, sql)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexer_totality_reaches_eof_on_arbitrary_input() {
        for sql in [
            "",
            ";;;",
            "$$$",
            "'unterminated",
            "/* no close",
            "select",
            "@#!~",
        ] {
            let tokens = Lexer::new(&Dialect::postgresql(), sql).tokenize();
            assert!(matches!(tokens.last().unwrap().kind, TokenKind::Eof));
        }
    }

    #[test]
    fn dollar_quote_matches_inner_content_exactly() {
        let tokens = Lexer::new(&Dialect::postgresql(), "$$hello$world$$").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].text, "hello$world");
    }

    #[test]
    fn tagged_dollar_quote_round_trips() {
        let tokens = Lexer::new(&Dialect::postgresql(), "$tag$a $other$ b$tag$").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].text, "a $other$ b");
    }

    #[test]
    fn dollar_is_illegal_outside_postgres() {
        let tokens = Lexer::new(&Dialect::mysql(), "$$x$$").tokenize();
        assert!(matches!(tokens[0].kind, TokenKind::Illegal(_)));
    }

    #[test]
    fn mysql_backtick_identifier() {
        let tokens = Lexer::new(&Dialect::mysql(), "`my col`").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "my col");
    }

    #[test]
    fn keyword_vs_identifier() {
        let k = kinds("SELECT foo", &Dialect::mysql());
        assert!(matches!(k[0], TokenKind::Keyword(Keyword::SELECT)));
        assert!(matches!(k[1], TokenKind::Ident));
    }

    #[test]
    fn number_classification() {
        let k = kinds("42 3.14 1e10 2.5e-3", &Dialect::mysql());
        assert_eq!(k[0], TokenKind::Int);
        assert_eq!(k[1], TokenKind::Float);
        assert_eq!(k[2], TokenKind::Float);
        assert_eq!(k[3], TokenKind::Float);
    }

    #[test]
    fn line_and_block_comments_are_skipped() {
        let tokens = Lexer::new(&Dialect::mysql(), "-- comment\nSELECT /* x */ 1").tokenize();
        assert!(matches!(
            tokens[0].kind,
            TokenKind::Keyword(Keyword::SELECT)
        ));
        assert_eq!(tokens[1].kind, TokenKind::Int);
    }

    #[test]
    fn string_literal_escapes_doubled_quote() {
        let tokens = Lexer::new(&Dialect::mysql(), "'it''s'").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].text, "it's");
    }

    #[test]
    fn longest_match_operators() {
        let k = kinds("<= >= <> != || ::", &Dialect::mysql());
        assert_eq!(k[0], TokenKind::Op(Op::LtEq));
        assert_eq!(k[1], TokenKind::Op(Op::GtEq));
        assert_eq!(k[2], TokenKind::Op(Op::NotEq));
        assert_eq!(k[3], TokenKind::Op(Op::NotEq));
        assert_eq!(k[4], TokenKind::Op(Op::Concat));
        assert_eq!(k[5], TokenKind::Op(Op::DoubleColon));
    }
}
