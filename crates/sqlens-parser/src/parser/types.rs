use sqlens_ast::DataType;
use sqlens_lexer::Punct;

use super::Parser;
use crate::error::ParseError;

/// Parses a syntactic type name and its optional size arguments, e.g.
/// `VARCHAR(255)`, `NUMERIC(10, 2)`, `INT`.
pub(super) fn parse_data_type(p: &mut Parser<'_>) -> Result<DataType, ParseError> {
    let name = p.parse_ident()?.value.to_ascii_uppercase();

    if !p.consume_punct(Punct::LeftParen) {
        return Ok(DataType::name(name));
    }

    let first = parse_size_arg(p)?;
    if p.consume_punct(Punct::Comma) {
        let second = parse_size_arg(p)?;
        p.expect_punct(Punct::RightParen)?;
        Ok(DataType::with_precision_scale(name, first, second))
    } else {
        p.expect_punct(Punct::RightParen)?;
        Ok(DataType::with_length(name, first))
    }
}

fn parse_size_arg(p: &mut Parser<'_>) -> Result<u64, ParseError> {
    let token = p.peek().clone();
    let n = token.text.parse().map_err(|_| ParseError::UnexpectedToken {
        found: token.text.clone(),
        expected: "integer".to_string(),
        position: token.position,
    })?;
    p.advance();
    Ok(n)
}
