use sqlens_ast::{
    Join, JoinKind, Query, SelectItem, SelectStmt, SetOperationStmt, SetOperator, TableFactor,
};
use sqlens_core::Keyword;
use sqlens_lexer::{Punct, TokenKind};

use super::{expr, Parser};
use crate::error::ParseError;

/// Parses a `SELECT` possibly combined with `UNION`/`INTERSECT`/`EXCEPT`,
/// plus a trailing `ORDER BY`/`LIMIT`/`OFFSET` that applies to the whole
/// chain (spec §4.4.2). Used both for top-level statements and for every
/// nested subquery/CTE/`IN (...)` body.
pub(super) fn parse_query(p: &mut Parser<'_>) -> Result<Query, ParseError> {
    let mut combined = Query::Select(Box::new(parse_select_body(p)?));

    loop {
        let op = if p.consume_keyword(Keyword::UNION) {
            SetOperator::Union
        } else if p.consume_keyword(Keyword::INTERSECT) {
            SetOperator::Intersect
        } else if p.consume_keyword(Keyword::EXCEPT) {
            SetOperator::Except
        } else if p.consume_word("MINUS") {
            // Oracle's name for EXCEPT.
            SetOperator::Except
        } else {
            break;
        };
        let all = p.consume_keyword(Keyword::ALL);
        let right = Query::Select(Box::new(parse_select_body(p)?));
        combined = Query::SetOperation(Box::new(SetOperationStmt {
            left: combined,
            op,
            all,
            right,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }));
    }

    let (order_by, limit, offset) = parse_trailing_clauses(p)?;
    if !order_by.is_empty() || limit.is_some() || offset.is_some() {
        match &mut combined {
            Query::Select(select) => {
                select.order_by = order_by;
                select.limit = limit;
                select.offset = offset;
            }
            Query::SetOperation(set_op) => {
                set_op.order_by = order_by;
                set_op.limit = limit;
                set_op.offset = offset;
            }
        }
    }

    Ok(combined)
}

fn parse_trailing_clauses(
    p: &mut Parser<'_>,
) -> Result<(Vec<sqlens_ast::OrderByItem>, Option<sqlens_ast::Expr>, Option<sqlens_ast::Expr>), ParseError>
{
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
    let offset = if p.consume_keyword(Keyword::OFFSET) {
        Some(expr::parse_expr(p)?)
    } else {
        None
    };
    Ok((order_by, limit, offset))
}

/// Parses a single `SELECT ... [FROM ...] [WHERE ...] [GROUP BY ...]
/// [HAVING ...]` body, without its trailing `ORDER BY`/`LIMIT`/`OFFSET` —
/// those belong to the enclosing [`Query`], not to any one arm of a
/// `UNION` chain.
pub(super) fn parse_select_body(p: &mut Parser<'_>) -> Result<SelectStmt, ParseError> {
    p.expect_keyword(Keyword::SELECT)?;
    let distinct = p.consume_keyword(Keyword::DISTINCT);
    if !distinct {
        p.consume_keyword(Keyword::ALL);
    }

    let top = if p.dialect.top && p.consume_keyword(Keyword::TOP) {
        Some(expr::parse_expr(p)?)
    } else {
        None
    };

    let mut projection = vec![parse_select_item(p)?];
    while p.consume_punct(Punct::Comma) {
        projection.push(parse_select_item(p)?);
    }

    let mut select = SelectStmt::new(projection);
    select.distinct = distinct;
    select.top = top;

    if p.consume_keyword(Keyword::FROM) {
        select.from = Some(parse_table_factor(p)?);
        select.joins = parse_joins(p)?;
    }
    if p.consume_keyword(Keyword::WHERE) {
        select.selection = Some(expr::parse_expr(p)?);
    }
    if p.consume_keyword(Keyword::GROUP) {
        p.expect_keyword(Keyword::BY)?;
        select.group_by.push(expr::parse_expr(p)?);
        while p.consume_punct(Punct::Comma) {
            select.group_by.push(expr::parse_expr(p)?);
        }
    }
    if p.consume_keyword(Keyword::HAVING) {
        select.having = Some(expr::parse_expr(p)?);
    }
    if p.consume_keyword(Keyword::FOR) {
        p.expect_keyword(Keyword::UPDATE)?;
        select.for_update = true;
    }

    Ok(select)
}

fn parse_select_item(p: &mut Parser<'_>) -> Result<SelectItem, ParseError> {
    let parsed = expr::parse_expr(p)?;
    match parsed {
        sqlens_ast::Expr::Wildcard => Ok(SelectItem::Wildcard),
        sqlens_ast::Expr::QualifiedWildcard(parts) => Ok(SelectItem::QualifiedWildcard(parts)),
        other => {
            let alias = if p.consume_keyword(Keyword::AS) {
                Some(p.parse_ident()?)
            } else if matches!(p.peek().kind, TokenKind::Ident) {
                Some(p.parse_ident()?)
            } else {
                None
            };
            Ok(match alias {
                Some(alias) => SelectItem::Aliased(other, alias),
                None => SelectItem::Expr(other),
            })
        }
    }
}

pub(super) fn parse_table_factor(p: &mut Parser<'_>) -> Result<TableFactor, ParseError> {
    if p.consume_punct(Punct::LeftParen) {
        let query = parse_query(p)?;
        p.expect_punct(Punct::RightParen)?;
        p.consume_keyword(Keyword::AS);
        let alias = p.parse_ident()?;
        return Ok(TableFactor::Derived {
            query: Box::new(query),
            alias,
        });
    }

    let name = p.parse_object_name()?;
    let alias = if p.consume_keyword(Keyword::AS) {
        Some(p.parse_ident()?)
    } else if matches!(p.peek().kind, TokenKind::Ident) {
        Some(p.parse_ident()?)
    } else {
        None
    };
    Ok(TableFactor::Table { name, alias })
}

fn parse_joins(p: &mut Parser<'_>) -> Result<Vec<Join>, ParseError> {
    let mut joins = Vec::new();
    loop {
        let kind = if p.consume_keyword(Keyword::INNER) {
            p.expect_keyword(Keyword::JOIN)?;
            JoinKind::Inner
        } else if p.consume_keyword(Keyword::LEFT) {
            p.consume_keyword(Keyword::OUTER);
            p.expect_keyword(Keyword::JOIN)?;
            JoinKind::Left
        } else if p.consume_keyword(Keyword::RIGHT) {
            p.consume_keyword(Keyword::OUTER);
            p.expect_keyword(Keyword::JOIN)?;
            JoinKind::Right
        } else if p.consume_keyword(Keyword::FULL) {
            p.consume_keyword(Keyword::OUTER);
            p.expect_keyword(Keyword::JOIN)?;
            JoinKind::Full
        } else if p.consume_keyword(Keyword::CROSS) {
            p.expect_keyword(Keyword::JOIN)?;
            JoinKind::Cross
        } else if p.consume_keyword(Keyword::JOIN) {
            JoinKind::Inner
        } else {
            break;
        };

        let relation = parse_table_factor(p)?;
        let on = if kind != JoinKind::Cross {
            p.expect_keyword(Keyword::ON)?;
            Some(expr::parse_expr(p)?)
        } else {
            None
        };
        joins.push(Join { relation, kind, on });
    }
    Ok(joins)
}
