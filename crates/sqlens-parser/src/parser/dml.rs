use sqlens_ast::{
    Assignment, Cte, DeleteStmt, InsertSource, InsertStmt, MergeAction, MergeClause,
    MergeMatchKind, MergeStmt, UpdateStmt, WithStmt,
};
use sqlens_core::Keyword;
use sqlens_lexer::Punct;

use super::{expr, query, Parser};
use crate::error::ParseError;

pub(super) fn parse_with(p: &mut Parser<'_>) -> Result<WithStmt, ParseError> {
    p.expect_keyword(Keyword::WITH)?;
    let recursive = p.consume_keyword(Keyword::RECURSIVE);

    let mut ctes = vec![parse_cte(p)?];
    while p.consume_punct(Punct::Comma) {
        ctes.push(parse_cte(p)?);
    }

    let body = Box::new(p.parse_statement()?);
    Ok(WithStmt {
        recursive,
        ctes,
        body,
    })
}

fn parse_cte(p: &mut Parser<'_>) -> Result<Cte, ParseError> {
    let name = p.parse_ident()?;
    let mut columns = Vec::new();
    if p.consume_punct(Punct::LeftParen) {
        columns.push(p.parse_ident()?);
        while p.consume_punct(Punct::Comma) {
            columns.push(p.parse_ident()?);
        }
        p.expect_punct(Punct::RightParen)?;
    }
    p.expect_keyword(Keyword::AS)?;
    p.expect_punct(Punct::LeftParen)?;
    let query = Box::new(query::parse_query(p)?);
    p.expect_punct(Punct::RightParen)?;
    Ok(Cte {
        name,
        columns,
        query,
    })
}

pub(super) fn parse_insert(p: &mut Parser<'_>) -> Result<InsertStmt, ParseError> {
    p.expect_keyword(Keyword::INSERT)?;
    p.expect_keyword(Keyword::INTO)?;
    let table = p.parse_object_name()?;

    let mut columns = Vec::new();
    if p.consume_punct(Punct::LeftParen) {
        columns.push(p.parse_ident()?);
        while p.consume_punct(Punct::Comma) {
            columns.push(p.parse_ident()?);
        }
        p.expect_punct(Punct::RightParen)?;
    }

    let source = if p.consume_keyword(Keyword::DEFAULT) {
        p.expect_keyword(Keyword::VALUES)?;
        InsertSource::DefaultValues
    } else if p.consume_keyword(Keyword::VALUES) {
        let mut rows = vec![parse_value_row(p)?];
        while p.consume_punct(Punct::Comma) {
            rows.push(parse_value_row(p)?);
        }
        InsertSource::Values(rows)
    } else {
        InsertSource::Query(Box::new(query::parse_query(p)?))
    };

    let returning = parse_returning(p)?;
    Ok(InsertStmt {
        table,
        columns,
        source,
        returning,
    })
}

fn parse_value_row(p: &mut Parser<'_>) -> Result<Vec<sqlens_ast::Expr>, ParseError> {
    p.expect_punct(Punct::LeftParen)?;
    let mut values = vec![expr::parse_expr(p)?];
    while p.consume_punct(Punct::Comma) {
        values.push(expr::parse_expr(p)?);
    }
    p.expect_punct(Punct::RightParen)?;
    Ok(values)
}

fn parse_returning(p: &mut Parser<'_>) -> Result<Vec<sqlens_ast::Expr>, ParseError> {
    if !p.consume_keyword(Keyword::RETURNING) {
        return Ok(Vec::new());
    }
    let mut items = vec![expr::parse_expr(p)?];
    while p.consume_punct(Punct::Comma) {
        items.push(expr::parse_expr(p)?);
    }
    Ok(items)
}

fn parse_assignments(p: &mut Parser<'_>) -> Result<Vec<Assignment>, ParseError> {
    let mut assignments = vec![parse_assignment(p)?];
    while p.consume_punct(Punct::Comma) {
        assignments.push(parse_assignment(p)?);
    }
    Ok(assignments)
}

pub(super) fn parse_assignment(p: &mut Parser<'_>) -> Result<Assignment, ParseError> {
    let column = p.parse_ident()?;
    p.expect_op(sqlens_lexer::Op::Eq)?;
    let value = expr::parse_expr(p)?;
    Ok(Assignment { column, value })
}

pub(super) fn parse_update(p: &mut Parser<'_>) -> Result<UpdateStmt, ParseError> {
    p.expect_keyword(Keyword::UPDATE)?;
    let table = p.parse_object_name()?;
    p.expect_keyword(Keyword::SET)?;
    let assignments = parse_assignments(p)?;
    let selection = if p.consume_keyword(Keyword::WHERE) {
        Some(expr::parse_expr(p)?)
    } else {
        None
    };
    let (order_by, limit) = parse_order_by_limit(p)?;
    let returning = parse_returning(p)?;
    Ok(UpdateStmt {
        table,
        assignments,
        selection,
        order_by,
        limit,
        returning,
    })
}

pub(super) fn parse_delete(p: &mut Parser<'_>) -> Result<DeleteStmt, ParseError> {
    p.expect_keyword(Keyword::DELETE)?;
    p.expect_keyword(Keyword::FROM)?;
    let table = p.parse_object_name()?;
    let selection = if p.consume_keyword(Keyword::WHERE) {
        Some(expr::parse_expr(p)?)
    } else {
        None
    };
    let (order_by, limit) = parse_order_by_limit(p)?;
    let returning = parse_returning(p)?;
    Ok(DeleteStmt {
        table,
        selection,
        order_by,
        limit,
        returning,
    })
}

/// Parses the trailing `[ORDER BY ...] [LIMIT n]` pair `UPDATE`/`DELETE`
/// allow after their `WHERE` clause, the same shape
/// [`query::parse_trailing_clauses`] parses for `SELECT`/set operations
/// (minus `OFFSET`, which no dialect in scope allows here).
fn parse_order_by_limit(
    p: &mut Parser<'_>,
) -> Result<(Vec<sqlens_ast::OrderByItem>, Option<sqlens_ast::Expr>), ParseError> {
    let mut order_by = Vec::new();
    if p.consume_keyword(Keyword::ORDER) {
        p.expect_keyword(Keyword::BY)?;
        order_by.push(expr::parse_order_by_item(p)?);
        while p.consume_punct(Punct::Comma) {
            order_by.push(expr::parse_order_by_item(p)?);
        }
    }
    let limit = if p.consume_keyword(Keyword::LIMIT) {
        Some(expr::parse_expr(p)?)
    } else {
        None
    };
    Ok((order_by, limit))
}

pub(super) fn parse_merge(p: &mut Parser<'_>) -> Result<MergeStmt, ParseError> {
    p.expect_keyword(Keyword::MERGE)?;
    p.expect_keyword(Keyword::INTO)?;
    let target = p.parse_object_name()?;
    let target_alias = if p.consume_keyword(Keyword::AS) {
        Some(p.parse_ident()?)
    } else if matches!(p.peek_kind(), sqlens_lexer::TokenKind::Ident) {
        Some(p.parse_ident()?)
    } else {
        None
    };

    p.expect_keyword(Keyword::USING)?;
    let source = query::parse_table_factor(p)?;
    p.expect_keyword(Keyword::ON)?;
    let on = expr::parse_expr(p)?;

    let mut clauses = Vec::new();
    while p.consume_keyword(Keyword::WHEN) {
        let match_kind = if p.consume_keyword(Keyword::NOT) {
            p.expect_keyword(Keyword::MATCHED)?;
            if p.consume_keyword(Keyword::BY) {
                if p.consume_keyword(Keyword::TARGET) {
                    MergeMatchKind::NotMatchedByTarget
                } else {
                    p.expect_keyword(Keyword::SOURCE)?;
                    MergeMatchKind::NotMatchedBySource
                }
            } else {
                MergeMatchKind::NotMatched
            }
        } else {
            p.expect_keyword(Keyword::MATCHED)?;
            MergeMatchKind::Matched
        };
        let condition = if p.consume_keyword(Keyword::AND) {
            Some(expr::parse_expr(p)?)
        } else {
            None
        };
        p.expect_keyword(Keyword::THEN)?;
        let action = parse_merge_action(p)?;
        clauses.push(MergeClause {
            match_kind,
            condition,
            action,
        });
    }

    Ok(MergeStmt {
        target,
        target_alias,
        source,
        on,
        clauses,
    })
}

fn parse_merge_action(p: &mut Parser<'_>) -> Result<MergeAction, ParseError> {
    if p.consume_keyword(Keyword::UPDATE) {
        p.expect_keyword(Keyword::SET)?;
        Ok(MergeAction::Update(parse_assignments(p)?))
    } else if p.consume_keyword(Keyword::DELETE) {
        Ok(MergeAction::Delete)
    } else {
        p.expect_keyword(Keyword::INSERT)?;
        let mut columns = Vec::new();
        if p.consume_punct(Punct::LeftParen) {
            columns.push(p.parse_ident()?);
            while p.consume_punct(Punct::Comma) {
                columns.push(p.parse_ident()?);
            }
            p.expect_punct(Punct::RightParen)?;
        }
        p.expect_keyword(Keyword::VALUES)?;
        let values = parse_value_row(p)?;
        Ok(MergeAction::Insert { columns, values })
    }
}
