use sqlens_ast::{
    BetweenExpr, BinaryExpr, BinaryOp, CaseExpr, CastExpr, ColumnRef, Expr, ExistsExpr, FrameBound,
    FrameUnit, FunctionCall, InExpr, InList, Literal, ObjectName, OrderByItem, OrderDirection,
    UnaryExpr, UnaryOp, WindowFrame, WindowSpec,
};
use sqlens_core::Keyword;
use sqlens_lexer::{Op, Punct, TokenKind};

use super::Parser;
use crate::error::ParseError;

const PREC_OR: u8 = 10;
const PREC_AND: u8 = 20;
const PREC_COMPARISON: u8 = 40;
const PREC_CONCAT: u8 = 50;
const PREC_ADDITIVE: u8 = 60;
const PREC_MULTIPLICATIVE: u8 = 70;
const PREC_UNARY: u8 = 80;

/// Boundary keywords that must stop a `CASE` branch's condition/result
/// expression from swallowing the clause that follows it: `WHEN`/`THEN` end
/// a result, `ELSE`/`END` close out the whole expression. Expression parsing
/// inside a `CASE` passes this set down so the ordinary Pratt loop yields as
/// soon as it sees one, rather than an operator-precedence miss silently
/// absorbing the next branch.
fn is_case_boundary(kw: Keyword) -> bool {
    matches!(kw, Keyword::WHEN | Keyword::THEN | Keyword::ELSE | Keyword::END)
}

pub(super) fn parse_expr(p: &mut Parser<'_>) -> Result<Expr, ParseError> {
    parse_expr_bp(p, 0)
}

fn parse_expr_bp(p: &mut Parser<'_>, min_bp: u8) -> Result<Expr, ParseError> {
    let mut left = parse_prefix(p)?;

    loop {
        p.check_illegal()?;
        if let Some(kw) = p.peek_keyword() {
            if is_case_boundary(kw) {
                break;
            }
        }

        let negated = p.peek_keyword() == Some(Keyword::NOT)
            && matches!(
                p.peek_keyword_nth(1),
                Some(Keyword::IN) | Some(Keyword::BETWEEN) | Some(Keyword::LIKE)
            );

        if PREC_COMPARISON >= min_bp
            && (negated || matches!(p.peek_keyword(), Some(Keyword::IN) | Some(Keyword::BETWEEN) | Some(Keyword::LIKE) | Some(Keyword::IS)))
        {
            if negated {
                p.expect_keyword(Keyword::NOT)?;
            }
            left = parse_comparison_tail(p, left, negated)?;
            continue;
        }

        let Some(op) = peek_binary_op(p) else { break };
        let (left_bp, right_bp) = binary_binding_power(op);
        if left_bp < min_bp {
            break;
        }
        consume_binary_op_token(p, op);
        let right = parse_expr_bp(p, right_bp)?;
        left = Expr::Binary(BinaryExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        });
    }

    Ok(left)
}

/// One of the comparison-level trailing constructs: `IS [NOT] ...`,
/// `[NOT] IN (...)`, `[NOT] BETWEEN ... AND ...`, `[NOT] LIKE ...`.
fn parse_comparison_tail(p: &mut Parser<'_>, left: Expr, negated: bool) -> Result<Expr, ParseError> {
    if p.consume_keyword(Keyword::IS) {
        let is_not = p.consume_keyword(Keyword::NOT);
        let right = parse_expr_bp(p, PREC_COMPARISON + 1)?;
        return Ok(Expr::Binary(BinaryExpr {
            left: Box::new(left),
            op: if is_not { BinaryOp::IsNot } else { BinaryOp::Is },
            right: Box::new(right),
        }));
    }
    if p.consume_keyword(Keyword::LIKE) {
        let right = parse_expr_bp(p, PREC_COMPARISON + 1)?;
        return Ok(Expr::Binary(BinaryExpr {
            left: Box::new(left),
            op: if negated { BinaryOp::NotLike } else { BinaryOp::Like },
            right: Box::new(right),
        }));
    }
    if p.consume_keyword(Keyword::BETWEEN) {
        let low = parse_expr_bp(p, PREC_COMPARISON + 1)?;
        p.expect_keyword(Keyword::AND)?;
        let high = parse_expr_bp(p, PREC_COMPARISON + 1)?;
        return Ok(Expr::Between(BetweenExpr {
            expr: Box::new(left),
            negated,
            low: Box::new(low),
            high: Box::new(high),
        }));
    }
    if p.consume_keyword(Keyword::IN) {
        p.expect_punct(Punct::LeftParen)?;
        let list = if p.peek_keyword() == Some(Keyword::SELECT) || p.peek_keyword() == Some(Keyword::WITH) {
            let query = super::query::parse_query(p)?;
            InList::Subquery(Box::new(query))
        } else {
            let mut exprs = vec![parse_expr_bp(p, 0)?];
            while p.consume_punct(Punct::Comma) {
                exprs.push(parse_expr_bp(p, 0)?);
            }
            InList::Exprs(exprs)
        };
        p.expect_punct(Punct::RightParen)?;
        return Ok(Expr::In(InExpr {
            expr: Box::new(left),
            negated,
            list,
        }));
    }
    unreachable!("caller only dispatches here when one of the above keywords was peeked")
}

fn peek_binary_op(p: &mut Parser<'_>) -> Option<BinaryOp> {
    if let Some(kw) = p.peek_keyword() {
        return match kw {
            Keyword::OR => Some(BinaryOp::Or),
            Keyword::AND => Some(BinaryOp::And),
            _ => None,
        };
    }
    match p.peek_op() {
        Some(Op::Eq) => Some(BinaryOp::Eq),
        Some(Op::NotEq) => Some(BinaryOp::NotEq),
        Some(Op::Lt) => Some(BinaryOp::Lt),
        Some(Op::LtEq) => Some(BinaryOp::LtEq),
        Some(Op::Gt) => Some(BinaryOp::Gt),
        Some(Op::GtEq) => Some(BinaryOp::GtEq),
        Some(Op::Concat) => Some(BinaryOp::Concat),
        Some(Op::Plus) => Some(BinaryOp::Plus),
        Some(Op::Minus) => Some(BinaryOp::Minus),
        Some(Op::Asterisk) => Some(BinaryOp::Multiply),
        Some(Op::Slash) => Some(BinaryOp::Divide),
        Some(Op::Percent) => Some(BinaryOp::Modulo),
        _ => None,
    }
}

fn consume_binary_op_token(p: &mut Parser<'_>, op: BinaryOp) {
    match op {
        BinaryOp::Or => {
            p.consume_keyword(Keyword::OR);
        }
        BinaryOp::And => {
            p.consume_keyword(Keyword::AND);
        }
        _ => {
            p.advance();
        }
    }
}

fn binary_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Or => (PREC_OR, PREC_OR + 1),
        BinaryOp::And => (PREC_AND, PREC_AND + 1),
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::Is
        | BinaryOp::IsNot
        | BinaryOp::Like
        | BinaryOp::NotLike => (PREC_COMPARISON, PREC_COMPARISON + 1),
        BinaryOp::Concat => (PREC_CONCAT, PREC_CONCAT + 1),
        BinaryOp::Plus | BinaryOp::Minus => (PREC_ADDITIVE, PREC_ADDITIVE + 1),
        BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => {
            (PREC_MULTIPLICATIVE, PREC_MULTIPLICATIVE + 1)
        }
    }
}

fn parse_prefix(p: &mut Parser<'_>) -> Result<Expr, ParseError> {
    p.check_illegal()?;

    if p.consume_keyword(Keyword::NOT) {
        let expr = parse_expr_bp(p, PREC_AND)?;
        return Ok(Expr::Unary(UnaryExpr {
            op: UnaryOp::Not,
            expr: Box::new(expr),
        }));
    }
    if p.consume_op(Op::Minus) {
        let expr = parse_expr_bp(p, PREC_UNARY)?;
        return Ok(Expr::Unary(UnaryExpr {
            op: UnaryOp::Minus,
            expr: Box::new(expr),
        }));
    }
    if p.consume_op(Op::Plus) {
        let expr = parse_expr_bp(p, PREC_UNARY)?;
        return Ok(Expr::Unary(UnaryExpr {
            op: UnaryOp::Plus,
            expr: Box::new(expr),
        }));
    }
    if p.consume_keyword(Keyword::EXISTS) {
        return parse_exists(p, false);
    }
    if p.peek_keyword() == Some(Keyword::NOT) && p.peek_keyword_nth(1) == Some(Keyword::EXISTS) {
        p.expect_keyword(Keyword::NOT)?;
        p.expect_keyword(Keyword::EXISTS)?;
        return parse_exists(p, true);
    }
    if p.consume_keyword(Keyword::CASE) {
        return parse_case(p);
    }
    if p.consume_keyword(Keyword::CAST) {
        return parse_cast(p);
    }
    if p.consume_punct(Punct::LeftParen) {
        if p.peek_keyword() == Some(Keyword::SELECT) || p.peek_keyword() == Some(Keyword::WITH) {
            let query = super::query::parse_query(p)?;
            p.expect_punct(Punct::RightParen)?;
            return parse_postfix(p, Expr::Subquery(Box::new(query)));
        }
        let inner = parse_expr_bp(p, 0)?;
        p.expect_punct(Punct::RightParen)?;
        return parse_postfix(p, Expr::Nested(Box::new(inner)));
    }
    if p.consume_op(Op::Asterisk) {
        return Ok(Expr::Wildcard);
    }

    match p.peek().kind.clone() {
        TokenKind::Int => {
            let text = p.advance().text;
            Ok(Expr::Literal(Literal::Int(text)))
        }
        TokenKind::Float => {
            let text = p.advance().text;
            Ok(Expr::Literal(Literal::Float(text)))
        }
        TokenKind::Str => {
            let text = p.advance().text;
            Ok(Expr::Literal(Literal::String(text)))
        }
        TokenKind::Keyword(Keyword::TRUE) => {
            p.advance();
            Ok(Expr::Literal(Literal::Boolean(true)))
        }
        TokenKind::Keyword(Keyword::FALSE) => {
            p.advance();
            Ok(Expr::Literal(Literal::Boolean(false)))
        }
        TokenKind::Keyword(Keyword::NULL) => {
            p.advance();
            Ok(Expr::Literal(Literal::Null))
        }
        TokenKind::Ident | TokenKind::Keyword(_) => parse_column_or_function(p),
        _ => {
            let token = p.peek().clone();
            Err(ParseError::UnexpectedToken {
                found: token.text,
                expected: "expression".to_string(),
                position: token.position,
            })
        }
    }
}

fn parse_postfix(p: &mut Parser<'_>, expr: Expr) -> Result<Expr, ParseError> {
    if p.consume_op(Op::DoubleColon) {
        let data_type = super::types::parse_data_type(p)?;
        return parse_postfix(
            p,
            Expr::Cast(CastExpr {
                expr: Box::new(expr),
                data_type,
            }),
        );
    }
    Ok(expr)
}

fn parse_exists(p: &mut Parser<'_>, negated: bool) -> Result<Expr, ParseError> {
    p.expect_punct(Punct::LeftParen)?;
    let query = super::query::parse_query(p)?;
    p.expect_punct(Punct::RightParen)?;
    Ok(Expr::Exists(ExistsExpr {
        negated,
        subquery: Box::new(query),
    }))
}

fn parse_cast(p: &mut Parser<'_>) -> Result<Expr, ParseError> {
    p.expect_punct(Punct::LeftParen)?;
    let expr = parse_expr_bp(p, 0)?;
    p.expect_keyword(Keyword::AS)?;
    let data_type = super::types::parse_data_type(p)?;
    p.expect_punct(Punct::RightParen)?;
    Ok(Expr::Cast(CastExpr {
        expr: Box::new(expr),
        data_type,
    }))
}

fn parse_case(p: &mut Parser<'_>) -> Result<Expr, ParseError> {
    let operand = if p.peek_keyword() == Some(Keyword::WHEN) {
        None
    } else {
        Some(Box::new(parse_expr_bp(p, 0)?))
    };
    let mut when_then = Vec::new();
    while p.consume_keyword(Keyword::WHEN) {
        let when = parse_expr_bp(p, 0)?;
        p.expect_keyword(Keyword::THEN)?;
        let then = parse_expr_bp(p, 0)?;
        when_then.push((when, then));
    }
    let else_result = if p.consume_keyword(Keyword::ELSE) {
        Some(Box::new(parse_expr_bp(p, 0)?))
    } else {
        None
    };
    p.expect_keyword(Keyword::END)?;
    Ok(Expr::Case(CaseExpr {
        operand,
        when_then,
        else_result,
    }))
}

fn parse_column_or_function(p: &mut Parser<'_>) -> Result<Expr, ParseError> {
    let first = p.parse_ident()?;
    let mut parts = vec![first];
    while p.peek_punct() == Some(Punct::Period) {
        p.advance();
        if p.consume_op(Op::Asterisk) {
            return Ok(Expr::QualifiedWildcard(parts));
        }
        parts.push(p.parse_ident()?);
    }

    if p.consume_punct(Punct::LeftParen) {
        return parse_function_call(p, ObjectName(parts));
    }

    parse_postfix(p, Expr::Column(ColumnRef { parts }))
}

fn parse_function_call(p: &mut Parser<'_>, name: ObjectName) -> Result<Expr, ParseError> {
    let distinct = p.consume_keyword(Keyword::DISTINCT);
    let mut args = Vec::new();
    if p.peek_punct() != Some(Punct::RightParen) {
        if !(args_is_bare_wildcard(p)) {
            args.push(parse_expr_bp(p, 0)?);
            while p.consume_punct(Punct::Comma) {
                args.push(parse_expr_bp(p, 0)?);
            }
        }
    }
    p.expect_punct(Punct::RightParen)?;

    let over = if p.consume_keyword(Keyword::OVER) {
        Some(parse_window_spec(p)?)
    } else {
        None
    };

    parse_postfix(
        p,
        Expr::Function(FunctionCall {
            name,
            args,
            distinct,
            over,
        }),
    )
}

fn args_is_bare_wildcard(p: &mut Parser<'_>) -> bool {
    if p.peek_op() == Some(Op::Asterisk) {
        p.advance();
        true
    } else {
        false
    }
}

fn parse_window_spec(p: &mut Parser<'_>) -> Result<WindowSpec, ParseError> {
    p.expect_punct(Punct::LeftParen)?;
    let mut spec = WindowSpec::default();
    if p.consume_keyword(Keyword::PARTITION) {
        p.expect_keyword(Keyword::BY)?;
        spec.partition_by.push(parse_expr_bp(p, 0)?);
        while p.consume_punct(Punct::Comma) {
            spec.partition_by.push(parse_expr_bp(p, 0)?);
        }
    }
    if p.consume_keyword(Keyword::ORDER) {
        p.expect_keyword(Keyword::BY)?;
        spec.order_by.push(parse_order_by_item(p)?);
        while p.consume_punct(Punct::Comma) {
            spec.order_by.push(parse_order_by_item(p)?);
        }
    }
    if let Some(unit) = parse_frame_unit(p) {
        spec.frame = Some(parse_window_frame(p, unit)?);
    }
    p.expect_punct(Punct::RightParen)?;
    Ok(spec)
}

fn parse_frame_unit(p: &mut Parser<'_>) -> Option<FrameUnit> {
    if p.consume_keyword(Keyword::ROWS) {
        Some(FrameUnit::Rows)
    } else if p.consume_keyword(Keyword::RANGE) {
        Some(FrameUnit::Range)
    } else {
        None
    }
}

fn parse_window_frame(p: &mut Parser<'_>, unit: FrameUnit) -> Result<WindowFrame, ParseError> {
    if p.consume_keyword(Keyword::BETWEEN) {
        let start = parse_frame_bound(p)?;
        p.expect_keyword(Keyword::AND)?;
        let end = parse_frame_bound(p)?;
        Ok(WindowFrame {
            unit,
            start,
            end: Some(end),
        })
    } else {
        let start = parse_frame_bound(p)?;
        Ok(WindowFrame {
            unit,
            start,
            end: None,
        })
    }
}

fn parse_frame_bound(p: &mut Parser<'_>) -> Result<FrameBound, ParseError> {
    if p.consume_keyword(Keyword::CURRENT) {
        p.expect_keyword(Keyword::ROW)?;
        return Ok(FrameBound::CurrentRow);
    }
    if p.consume_keyword(Keyword::UNBOUNDED) {
        return if p.consume_keyword(Keyword::PRECEDING) {
            Ok(FrameBound::UnboundedPreceding)
        } else {
            p.expect_keyword(Keyword::FOLLOWING)?;
            Ok(FrameBound::UnboundedFollowing)
        };
    }
    let token = p.peek().clone();
    let n: u64 = token.text.parse().map_err(|_| ParseError::UnexpectedToken {
        found: token.text.clone(),
        expected: "frame bound".to_string(),
        position: token.position,
    })?;
    p.advance();
    if p.consume_keyword(Keyword::PRECEDING) {
        Ok(FrameBound::Preceding(n))
    } else {
        p.expect_keyword(Keyword::FOLLOWING)?;
        Ok(FrameBound::Following(n))
    }
}

pub(super) fn parse_order_by_item(p: &mut Parser<'_>) -> Result<OrderByItem, ParseError> {
    let expr = parse_expr_bp(p, 0)?;
    let direction = if p.consume_keyword(Keyword::DESC) {
        OrderDirection::Desc
    } else {
        p.consume_keyword(Keyword::ASC);
        OrderDirection::Asc
    };
    Ok(OrderByItem { expr, direction })
}
