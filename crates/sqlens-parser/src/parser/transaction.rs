use sqlens_ast::{BeginStmt, CommitStmt, ExplainStmt, ReleaseStmt, RollbackStmt, SavepointStmt};
use sqlens_core::Keyword;

use super::Parser;
use crate::error::ParseError;

pub(super) fn parse_begin(p: &mut Parser<'_>) -> Result<BeginStmt, ParseError> {
    if !p.consume_keyword(Keyword::BEGIN) {
        p.expect_keyword(Keyword::START)?;
    }
    p.consume_word("TRANSACTION");
    Ok(BeginStmt)
}

pub(super) fn parse_commit(p: &mut Parser<'_>) -> Result<CommitStmt, ParseError> {
    p.expect_keyword(Keyword::COMMIT)?;
    p.consume_word("TRANSACTION");
    Ok(CommitStmt)
}

pub(super) fn parse_rollback(p: &mut Parser<'_>) -> Result<RollbackStmt, ParseError> {
    p.expect_keyword(Keyword::ROLLBACK)?;
    let savepoint = if p.consume_keyword(Keyword::TO) {
        p.consume_keyword(Keyword::SAVEPOINT);
        Some(p.parse_ident()?)
    } else {
        None
    };
    Ok(RollbackStmt { savepoint })
}

pub(super) fn parse_savepoint(p: &mut Parser<'_>) -> Result<SavepointStmt, ParseError> {
    p.expect_keyword(Keyword::SAVEPOINT)?;
    Ok(SavepointStmt {
        name: p.parse_ident()?,
    })
}

pub(super) fn parse_release(p: &mut Parser<'_>) -> Result<ReleaseStmt, ParseError> {
    p.expect_keyword(Keyword::RELEASE)?;
    p.consume_keyword(Keyword::SAVEPOINT);
    Ok(ReleaseStmt {
        name: p.parse_ident()?,
    })
}

pub(super) fn parse_explain(p: &mut Parser<'_>) -> Result<ExplainStmt, ParseError> {
    p.expect_keyword(Keyword::EXPLAIN)?;
    let analyze = p.consume_word("ANALYZE");
    let statement = Box::new(p.parse_statement()?);
    Ok(ExplainStmt { analyze, statement })
}
