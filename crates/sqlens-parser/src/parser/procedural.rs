use sqlens_ast::{
    Assignment, CloseStmt, DeallocateStmt, DeclareStmt, FetchStmt, ForStmt, IfStmt, LoopStmt,
    OpenStmt, ProcStmt, RaiseStmt, RepeatStmt, SignalStmt, Statement, ThrowStmt, TryStmt,
    WhileStmt,
};
use sqlens_core::Keyword;
use sqlens_lexer::{Op, Punct, TokenKind};

use super::{ddl, dml, expr, query, transaction, types, Parser};
use crate::error::ParseError;

/// Parses one statement valid inside a procedure/function/trigger body —
/// either a control-flow construct or an ordinary nested SQL statement.
pub(super) fn parse_proc_stmt(p: &mut Parser<'_>) -> Result<ProcStmt, ParseError> {
    match p.peek_keyword() {
        Some(Keyword::IF) => Ok(ProcStmt::If(parse_if(p)?)),
        Some(Keyword::WHILE) => Ok(ProcStmt::While(parse_while(p)?)),
        Some(Keyword::LOOP) => Ok(ProcStmt::Loop(parse_loop(p)?)),
        Some(Keyword::FOR) => Ok(ProcStmt::For(parse_for(p)?)),
        Some(Keyword::REPEAT) => Ok(ProcStmt::Repeat(parse_repeat(p)?)),
        Some(Keyword::EXIT) => Ok(ProcStmt::Exit(parse_exit(p)?)),
        Some(Keyword::CONTINUE) => Ok(ProcStmt::Continue(parse_continue(p)?)),
        Some(Keyword::ITERATE) => Ok(ProcStmt::Continue(parse_iterate(p)?)),
        Some(Keyword::RETURN) => Ok(ProcStmt::Return(parse_return(p)?)),
        Some(Keyword::DECLARE) => Ok(ProcStmt::Declare(parse_declare(p)?)),
        Some(Keyword::OPEN) => Ok(ProcStmt::Open(parse_open(p)?)),
        Some(Keyword::FETCH) => Ok(ProcStmt::Fetch(parse_fetch(p)?)),
        Some(Keyword::CLOSE) => Ok(ProcStmt::Close(parse_close(p)?)),
        Some(Keyword::DEALLOCATE) => Ok(ProcStmt::Deallocate(parse_deallocate(p)?)),
        Some(Keyword::RAISE) => Ok(ProcStmt::Raise(parse_raise(p)?)),
        Some(Keyword::THROW) => Ok(ProcStmt::Throw(parse_throw(p)?)),
        Some(Keyword::SIGNAL) => Ok(ProcStmt::Signal(parse_signal(p)?)),
        Some(Keyword::BEGIN) => Ok(ProcStmt::Try(parse_try(p)?)),
        Some(Keyword::SET) => Ok(ProcStmt::Set(parse_set(p)?)),
        _ => parse_nested_statement(p),
    }
}

/// A bare SQL statement nested in a procedural body. Dispatches directly to
/// the same sub-parsers [`Parser::parse_statement`] uses, rather than
/// calling back into it, since its own fallback delegates here for anything
/// that isn't one of these keywords — going through `parse_statement` again
/// would recurse forever on a truly unrecognized leading keyword.
fn parse_nested_statement(p: &mut Parser<'_>) -> Result<ProcStmt, ParseError> {
    let stmt = match p.peek_keyword() {
        Some(Keyword::SELECT) => Statement::from_query(query::parse_query(p)?),
        Some(Keyword::WITH) => Statement::With(dml::parse_with(p)?),
        Some(Keyword::INSERT) => Statement::Insert(dml::parse_insert(p)?),
        Some(Keyword::UPDATE) => Statement::Update(dml::parse_update(p)?),
        Some(Keyword::DELETE) => Statement::Delete(dml::parse_delete(p)?),
        Some(Keyword::MERGE) => Statement::Merge(dml::parse_merge(p)?),
        Some(Keyword::CREATE) => ddl::parse_create(p)?,
        Some(Keyword::DROP) => Statement::Drop(ddl::parse_drop(p)?),
        Some(Keyword::ALTER) => Statement::AlterTable(ddl::parse_alter_table(p)?),
        Some(Keyword::START) => Statement::Begin(transaction::parse_begin(p)?),
        Some(Keyword::COMMIT) => Statement::Commit(transaction::parse_commit(p)?),
        Some(Keyword::ROLLBACK) => Statement::Rollback(transaction::parse_rollback(p)?),
        Some(Keyword::SAVEPOINT) => Statement::Savepoint(transaction::parse_savepoint(p)?),
        Some(Keyword::RELEASE) => Statement::Release(transaction::parse_release(p)?),
        Some(Keyword::EXPLAIN) => Statement::Explain(transaction::parse_explain(p)?),
        _ => {
            let token = p.peek().clone();
            return Err(ParseError::UnexpectedToken {
                found: token.text,
                expected: "a procedural statement".to_string(),
                position: token.position,
            });
        }
    };
    Ok(ProcStmt::Statement(Box::new(stmt)))
}

/// Parses statements up to (but not including) a keyword in `terminators`.
fn parse_block(p: &mut Parser<'_>, terminators: &[Keyword]) -> Result<Vec<ProcStmt>, ParseError> {
    let mut body = Vec::new();
    loop {
        if p.is_eof() {
            return Err(ParseError::UnexpectedEof {
                expected: "END".to_string(),
            });
        }
        if let Some(kw) = p.peek_keyword() {
            if terminators.contains(&kw) {
                break;
            }
        }
        body.push(parse_proc_stmt(p)?);
        p.consume_punct(Punct::Semicolon);
    }
    Ok(body)
}

fn at_block_boundary(p: &mut Parser<'_>) -> bool {
    if p.peek_punct() == Some(Punct::Semicolon) || p.is_eof() {
        return true;
    }
    matches!(
        p.peek_keyword(),
        Some(Keyword::END)
            | Some(Keyword::ELSE)
            | Some(Keyword::ELSIF)
            | Some(Keyword::ELSEIF)
            | Some(Keyword::UNTIL)
    )
}

/// Parses the `BEGIN ... END` body of a `CREATE PROCEDURE`/`CREATE FUNCTION`.
pub(super) fn parse_proc_body(p: &mut Parser<'_>) -> Result<Vec<ProcStmt>, ParseError> {
    p.expect_keyword(Keyword::BEGIN)?;
    let body = parse_block(p, &[Keyword::END])?;
    p.expect_keyword(Keyword::END)?;
    Ok(body)
}

fn parse_if(p: &mut Parser<'_>) -> Result<IfStmt, ParseError> {
    p.expect_keyword(Keyword::IF)?;
    let mut branches = Vec::new();

    let condition = expr::parse_expr(p)?;
    p.expect_keyword(Keyword::THEN)?;
    let body = parse_block(p, &[Keyword::ELSIF, Keyword::ELSEIF, Keyword::ELSE, Keyword::END])?;
    branches.push((condition, body));

    while p.consume_keyword(Keyword::ELSIF) || p.consume_keyword(Keyword::ELSEIF) {
        let condition = expr::parse_expr(p)?;
        p.expect_keyword(Keyword::THEN)?;
        let body = parse_block(p, &[Keyword::ELSIF, Keyword::ELSEIF, Keyword::ELSE, Keyword::END])?;
        branches.push((condition, body));
    }

    let else_body = if p.consume_keyword(Keyword::ELSE) {
        parse_block(p, &[Keyword::END])?
    } else {
        Vec::new()
    };

    p.expect_keyword(Keyword::END)?;
    p.consume_keyword(Keyword::IF);
    Ok(IfStmt {
        branches,
        else_body,
    })
}

fn parse_while(p: &mut Parser<'_>) -> Result<WhileStmt, ParseError> {
    p.expect_keyword(Keyword::WHILE)?;
    let condition = expr::parse_expr(p)?;
    p.expect_keyword(Keyword::DO)?;
    let body = parse_block(p, &[Keyword::END])?;
    p.expect_keyword(Keyword::END)?;
    p.consume_keyword(Keyword::WHILE);
    Ok(WhileStmt { condition, body })
}

fn parse_loop(p: &mut Parser<'_>) -> Result<LoopStmt, ParseError> {
    p.expect_keyword(Keyword::LOOP)?;
    let body = parse_block(p, &[Keyword::END])?;
    p.expect_keyword(Keyword::END)?;
    p.consume_keyword(Keyword::LOOP);
    Ok(LoopStmt { body })
}

/// `FOR ident IN [REVERSE] lo..hi [BY step] LOOP ... END LOOP`.
fn parse_for(p: &mut Parser<'_>) -> Result<ForStmt, ParseError> {
    p.expect_keyword(Keyword::FOR)?;
    let variable = p.parse_ident()?;
    p.expect_keyword(Keyword::IN)?;
    let reverse = p.consume_keyword(Keyword::REVERSE);
    let low = expr::parse_expr(p)?;
    p.expect_punct(Punct::DotDot)?;
    let high = expr::parse_expr(p)?;
    let step = if p.consume_keyword(Keyword::BY) {
        Some(expr::parse_expr(p)?)
    } else {
        None
    };
    p.expect_keyword(Keyword::LOOP)?;
    let body = parse_block(p, &[Keyword::END])?;
    p.expect_keyword(Keyword::END)?;
    p.consume_keyword(Keyword::LOOP);
    Ok(ForStmt {
        variable,
        reverse,
        low,
        high,
        step,
        body,
    })
}

fn parse_repeat(p: &mut Parser<'_>) -> Result<RepeatStmt, ParseError> {
    p.expect_keyword(Keyword::REPEAT)?;
    let body = parse_block(p, &[Keyword::UNTIL])?;
    p.expect_keyword(Keyword::UNTIL)?;
    let until = expr::parse_expr(p)?;
    p.consume_keyword(Keyword::END);
    p.consume_keyword(Keyword::REPEAT);
    Ok(RepeatStmt { body, until })
}

fn parse_exit(p: &mut Parser<'_>) -> Result<Option<sqlens_ast::Expr>, ParseError> {
    p.expect_keyword(Keyword::EXIT)?;
    if p.consume_keyword(Keyword::WHEN) {
        Ok(Some(expr::parse_expr(p)?))
    } else {
        Ok(None)
    }
}

fn parse_continue(p: &mut Parser<'_>) -> Result<Option<sqlens_ast::Expr>, ParseError> {
    p.expect_keyword(Keyword::CONTINUE)?;
    if p.consume_keyword(Keyword::WHEN) {
        Ok(Some(expr::parse_expr(p)?))
    } else {
        Ok(None)
    }
}

/// `ITERATE` (MySQL), the same "restart the enclosing loop" statement as
/// `CONTINUE [WHEN cond]`, just spelled differently.
fn parse_iterate(p: &mut Parser<'_>) -> Result<Option<sqlens_ast::Expr>, ParseError> {
    p.expect_keyword(Keyword::ITERATE)?;
    if p.consume_keyword(Keyword::WHEN) {
        Ok(Some(expr::parse_expr(p)?))
    } else {
        Ok(None)
    }
}

fn parse_set(p: &mut Parser<'_>) -> Result<Assignment, ParseError> {
    p.expect_keyword(Keyword::SET)?;
    dml::parse_assignment(p)
}

fn parse_return(p: &mut Parser<'_>) -> Result<Option<sqlens_ast::Expr>, ParseError> {
    p.expect_keyword(Keyword::RETURN)?;
    if at_block_boundary(p) {
        Ok(None)
    } else {
        Ok(Some(expr::parse_expr(p)?))
    }
}

fn parse_declare(p: &mut Parser<'_>) -> Result<DeclareStmt, ParseError> {
    p.expect_keyword(Keyword::DECLARE)?;
    let name = p.parse_ident()?;
    let data_type = types::parse_data_type(p)?;
    let default = if p.consume_keyword(Keyword::DEFAULT) || p.consume_op(Op::Eq) {
        Some(expr::parse_expr(p)?)
    } else {
        None
    };
    Ok(DeclareStmt {
        name,
        data_type,
        default,
    })
}

fn parse_open(p: &mut Parser<'_>) -> Result<OpenStmt, ParseError> {
    p.expect_keyword(Keyword::OPEN)?;
    Ok(OpenStmt {
        cursor: p.parse_ident()?,
    })
}

fn parse_fetch(p: &mut Parser<'_>) -> Result<FetchStmt, ParseError> {
    p.expect_keyword(Keyword::FETCH)?;
    let cursor = p.parse_ident()?;
    p.expect_keyword(Keyword::INTO)?;
    let mut into = vec![p.parse_ident()?];
    while p.consume_punct(Punct::Comma) {
        into.push(p.parse_ident()?);
    }
    Ok(FetchStmt { cursor, into })
}

fn parse_close(p: &mut Parser<'_>) -> Result<CloseStmt, ParseError> {
    p.expect_keyword(Keyword::CLOSE)?;
    Ok(CloseStmt {
        cursor: p.parse_ident()?,
    })
}

fn parse_deallocate(p: &mut Parser<'_>) -> Result<DeallocateStmt, ParseError> {
    p.expect_keyword(Keyword::DEALLOCATE)?;
    Ok(DeallocateStmt {
        cursor: p.parse_ident()?,
    })
}

fn parse_raise(p: &mut Parser<'_>) -> Result<RaiseStmt, ParseError> {
    p.expect_keyword(Keyword::RAISE)?;
    let message = expr::parse_expr(p)?;
    let mut args = Vec::new();
    while p.consume_punct(Punct::Comma) {
        args.push(expr::parse_expr(p)?);
    }
    Ok(RaiseStmt { message, args })
}

fn parse_throw(p: &mut Parser<'_>) -> Result<ThrowStmt, ParseError> {
    p.expect_keyword(Keyword::THROW)?;
    let mut args = Vec::new();
    if !at_block_boundary(p) {
        args.push(expr::parse_expr(p)?);
        while p.consume_punct(Punct::Comma) {
            args.push(expr::parse_expr(p)?);
        }
    }
    Ok(ThrowStmt { args })
}

fn parse_signal(p: &mut Parser<'_>) -> Result<SignalStmt, ParseError> {
    p.expect_keyword(Keyword::SIGNAL)?;
    p.expect_word("SQLSTATE")?;
    let token = p.peek().clone();
    if !matches!(token.kind, TokenKind::Str) {
        return Err(ParseError::UnexpectedToken {
            found: token.text,
            expected: "a SQLSTATE string literal".to_string(),
            position: token.position,
        });
    }
    p.advance_word();
    let sqlstate = token.text;
    let message = if p.consume_keyword(Keyword::SET) {
        p.expect_word("MESSAGE_TEXT")?;
        p.expect_op(Op::Eq)?;
        Some(expr::parse_expr(p)?)
    } else {
        None
    };
    Ok(SignalStmt { sqlstate, message })
}

fn parse_try(p: &mut Parser<'_>) -> Result<TryStmt, ParseError> {
    p.expect_keyword(Keyword::BEGIN)?;
    p.expect_keyword(Keyword::TRY)?;
    let try_body = parse_block(p, &[Keyword::END])?;
    p.expect_keyword(Keyword::END)?;
    p.expect_keyword(Keyword::TRY)?;
    p.expect_keyword(Keyword::BEGIN)?;
    p.expect_keyword(Keyword::CATCH)?;
    let catch_body = parse_block(p, &[Keyword::END])?;
    p.expect_keyword(Keyword::END)?;
    p.expect_keyword(Keyword::CATCH)?;
    Ok(TryStmt {
        try_body,
        catch_body,
    })
}
