use sqlens_ast::{
    AlterTableAction, AlterTableStmt, ColumnConstraint, ColumnDef, CreateFunctionStmt,
    CreateIndexStmt, CreateProcedureStmt, CreateTableStmt, CreateTriggerStmt, CreateViewStmt,
    DropStmt, ObjectType, Parameter, ReferentialAction, Statement, TableConstraint,
    TableConstraintKind, TriggerEvent, TriggerTiming,
};
use sqlens_core::Keyword;
use sqlens_lexer::Punct;

use super::{expr, procedural, query, types, Parser};
use crate::error::ParseError;

pub(super) fn parse_create(p: &mut Parser<'_>) -> Result<Statement, ParseError> {
    p.expect_keyword(Keyword::CREATE)?;

    if p.consume_keyword(Keyword::OR) {
        p.expect_keyword(Keyword::REPLACE)?;
        let materialized = p.consume_keyword(Keyword::MATERIALIZED);
        p.expect_keyword(Keyword::VIEW)?;
        return Ok(Statement::CreateView(parse_create_view_body(
            p,
            true,
            materialized,
        )?));
    }

    let unique = p.consume_keyword(Keyword::UNIQUE);
    if unique || p.peek_keyword() == Some(Keyword::INDEX) {
        p.expect_keyword(Keyword::INDEX)?;
        return Ok(Statement::CreateIndex(parse_create_index_body(p, unique)?));
    }

    if p.consume_keyword(Keyword::MATERIALIZED) {
        return Ok(Statement::CreateView(parse_create_view_body(
            p, false, true,
        )?));
    }

    match p.peek_keyword() {
        Some(Keyword::TABLE) => Ok(Statement::CreateTable(parse_create_table(p)?)),
        Some(Keyword::VIEW) => {
            p.advance_keyword();
            Ok(Statement::CreateView(parse_create_view_body(
                p, false, false,
            )?))
        }
        Some(Keyword::TRIGGER) => Ok(Statement::CreateTrigger(parse_create_trigger(p)?)),
        Some(Keyword::PROCEDURE) => Ok(Statement::CreateProcedure(parse_create_procedure(p)?)),
        Some(Keyword::FUNCTION) => Ok(Statement::CreateFunction(parse_create_function(p)?)),
        _ => {
            let token = p.peek().clone();
            Err(ParseError::UnexpectedToken {
                found: token.text,
                expected: "TABLE, INDEX, VIEW, TRIGGER, PROCEDURE, or FUNCTION".to_string(),
                position: token.position,
            })
        }
    }
}

fn parse_if_not_exists(p: &mut Parser<'_>) -> Result<bool, ParseError> {
    if p.consume_keyword(Keyword::IF) {
        p.expect_keyword(Keyword::NOT)?;
        p.expect_keyword(Keyword::EXISTS)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn parse_create_table(p: &mut Parser<'_>) -> Result<CreateTableStmt, ParseError> {
    p.expect_keyword(Keyword::TABLE)?;
    let if_not_exists = parse_if_not_exists(p)?;
    let name = p.parse_object_name()?;
    p.expect_punct(Punct::LeftParen)?;

    let mut columns = Vec::new();
    let mut constraints = Vec::new();
    loop {
        if is_table_constraint_start(p) {
            constraints.push(parse_table_constraint(p)?);
        } else {
            columns.push(parse_column_def(p)?);
        }
        if !p.consume_punct(Punct::Comma) {
            break;
        }
    }
    p.expect_punct(Punct::RightParen)?;

    Ok(CreateTableStmt {
        name,
        if_not_exists,
        columns,
        constraints,
    })
}

fn is_table_constraint_start(p: &mut Parser<'_>) -> bool {
    p.peek_keyword() == Some(Keyword::CONSTRAINT)
        || matches!(
            p.peek_keyword(),
            Some(Keyword::PRIMARY) | Some(Keyword::UNIQUE) | Some(Keyword::FOREIGN)
        )
        || p.peek_word("CHECK")
}

fn parse_table_constraint(p: &mut Parser<'_>) -> Result<TableConstraint, ParseError> {
    let name = if p.consume_keyword(Keyword::CONSTRAINT) {
        Some(p.parse_ident()?)
    } else {
        None
    };
    let kind = parse_table_constraint_kind(p)?;
    Ok(TableConstraint { name, kind })
}

fn parse_table_constraint_kind(p: &mut Parser<'_>) -> Result<TableConstraintKind, ParseError> {
    if p.consume_keyword(Keyword::PRIMARY) {
        p.expect_keyword(Keyword::KEY)?;
        Ok(TableConstraintKind::PrimaryKey(parse_paren_ident_list(p)?))
    } else if p.consume_keyword(Keyword::UNIQUE) {
        Ok(TableConstraintKind::Unique(parse_paren_ident_list(p)?))
    } else if p.consume_keyword(Keyword::FOREIGN) {
        p.expect_keyword(Keyword::KEY)?;
        let columns = parse_paren_ident_list(p)?;
        p.expect_keyword(Keyword::REFERENCES)?;
        let foreign_table = p.parse_object_name()?;
        let foreign_columns = parse_paren_ident_list(p)?;
        Ok(TableConstraintKind::ForeignKey {
            columns,
            foreign_table,
            foreign_columns,
        })
    } else {
        p.expect_word("CHECK")?;
        p.expect_punct(Punct::LeftParen)?;
        let predicate = expr::parse_expr(p)?;
        p.expect_punct(Punct::RightParen)?;
        Ok(TableConstraintKind::Check(predicate))
    }
}

/// Parses `CASCADE | SET NULL | SET DEFAULT | RESTRICT | NO ACTION`.
fn parse_referential_action(p: &mut Parser<'_>) -> Result<ReferentialAction, ParseError> {
    if p.consume_keyword(Keyword::CASCADE) {
        Ok(ReferentialAction::Cascade)
    } else if p.consume_keyword(Keyword::SET) {
        if p.consume_keyword(Keyword::NULL) {
            Ok(ReferentialAction::SetNull)
        } else {
            p.expect_keyword(Keyword::DEFAULT)?;
            Ok(ReferentialAction::SetDefault)
        }
    } else if p.consume_keyword(Keyword::RESTRICT) {
        Ok(ReferentialAction::Restrict)
    } else {
        p.expect_keyword(Keyword::NO)?;
        p.expect_keyword(Keyword::ACTION)?;
        Ok(ReferentialAction::NoAction)
    }
}

fn parse_paren_ident_list(p: &mut Parser<'_>) -> Result<Vec<sqlens_ast::Ident>, ParseError> {
    p.expect_punct(Punct::LeftParen)?;
    let mut idents = vec![p.parse_ident()?];
    while p.consume_punct(Punct::Comma) {
        idents.push(p.parse_ident()?);
    }
    p.expect_punct(Punct::RightParen)?;
    Ok(idents)
}

fn parse_column_def(p: &mut Parser<'_>) -> Result<ColumnDef, ParseError> {
    let name = p.parse_ident()?;
    let data_type = types::parse_data_type(p)?;
    let mut constraints = Vec::new();

    loop {
        if p.consume_keyword(Keyword::NOT) {
            p.expect_keyword(Keyword::NULL)?;
            constraints.push(ColumnConstraint::NotNull);
        } else if p.consume_keyword(Keyword::NULL) {
            constraints.push(ColumnConstraint::Null);
        } else if p.consume_keyword(Keyword::PRIMARY) {
            p.expect_keyword(Keyword::KEY)?;
            constraints.push(ColumnConstraint::PrimaryKey);
        } else if p.consume_keyword(Keyword::UNIQUE) {
            constraints.push(ColumnConstraint::Unique);
        } else if p.consume_keyword(Keyword::DEFAULT) {
            constraints.push(ColumnConstraint::Default(expr::parse_expr(p)?));
        } else if p.consume_keyword(Keyword::REFERENCES) {
            let table = p.parse_object_name()?;
            let column = if p.consume_punct(Punct::LeftParen) {
                let col = p.parse_ident()?;
                p.expect_punct(Punct::RightParen)?;
                Some(col)
            } else {
                None
            };
            let mut on_delete = None;
            let mut on_update = None;
            loop {
                if p.consume_keyword(Keyword::ON) {
                    if p.consume_keyword(Keyword::DELETE) {
                        on_delete = Some(parse_referential_action(p)?);
                    } else {
                        p.expect_keyword(Keyword::UPDATE)?;
                        on_update = Some(parse_referential_action(p)?);
                    }
                } else {
                    break;
                }
            }
            constraints.push(ColumnConstraint::References {
                table,
                column,
                on_delete,
                on_update,
            });
        } else if p.consume_keyword(Keyword::AUTO_INCREMENT)
            || p.consume_keyword(Keyword::AUTOINCREMENT)
            || p.consume_keyword(Keyword::IDENTITY)
            || p.consume_keyword(Keyword::SERIAL)
        {
            constraints.push(ColumnConstraint::AutoIncrement);
        } else if p.peek_word("CHECK") {
            p.advance_word();
            p.expect_punct(Punct::LeftParen)?;
            let predicate = expr::parse_expr(p)?;
            p.expect_punct(Punct::RightParen)?;
            constraints.push(ColumnConstraint::Check(predicate));
        } else {
            break;
        }
    }

    Ok(ColumnDef {
        name,
        data_type,
        constraints,
    })
}

fn parse_create_index_body(p: &mut Parser<'_>, unique: bool) -> Result<CreateIndexStmt, ParseError> {
    let if_not_exists = parse_if_not_exists(p)?;
    let name = p.parse_ident()?;
    p.expect_keyword(Keyword::ON)?;
    let table = p.parse_object_name()?;
    let columns = parse_paren_ident_list(p)?;
    Ok(CreateIndexStmt {
        name,
        table,
        columns,
        unique,
        if_not_exists,
    })
}

fn parse_create_view_body(
    p: &mut Parser<'_>,
    or_replace: bool,
    materialized: bool,
) -> Result<CreateViewStmt, ParseError> {
    p.expect_keyword(Keyword::VIEW)?;
    let name = p.parse_object_name()?;
    let mut columns = Vec::new();
    if p.consume_punct(Punct::LeftParen) {
        columns.push(p.parse_ident()?);
        while p.consume_punct(Punct::Comma) {
            columns.push(p.parse_ident()?);
        }
        p.expect_punct(Punct::RightParen)?;
    }
    p.expect_keyword(Keyword::AS)?;
    let query = Box::new(query::parse_query(p)?);
    Ok(CreateViewStmt {
        name,
        or_replace,
        materialized,
        columns,
        query,
    })
}

pub(super) fn parse_drop(p: &mut Parser<'_>) -> Result<DropStmt, ParseError> {
    p.expect_keyword(Keyword::DROP)?;
    let object_type = match p.peek_keyword() {
        Some(Keyword::TABLE) => {
            p.advance_keyword();
            ObjectType::Table
        }
        Some(Keyword::VIEW) => {
            p.advance_keyword();
            ObjectType::View
        }
        Some(Keyword::INDEX) => {
            p.advance_keyword();
            ObjectType::Index
        }
        Some(Keyword::PROCEDURE) => {
            p.advance_keyword();
            ObjectType::Procedure
        }
        Some(Keyword::FUNCTION) => {
            p.advance_keyword();
            ObjectType::Function
        }
        Some(Keyword::TRIGGER) => {
            p.advance_keyword();
            ObjectType::Trigger
        }
        Some(Keyword::DATABASE) => {
            p.advance_keyword();
            ObjectType::Database
        }
        Some(Keyword::SCHEMA) => {
            p.advance_keyword();
            ObjectType::Schema
        }
        Some(Keyword::MATERIALIZED) => {
            p.advance_keyword();
            p.expect_keyword(Keyword::VIEW)?;
            ObjectType::MaterializedView
        }
        _ => {
            let token = p.peek().clone();
            return Err(ParseError::UnexpectedToken {
                found: token.text,
                expected: "TABLE, VIEW, INDEX, PROCEDURE, FUNCTION, TRIGGER, DATABASE, SCHEMA, or MATERIALIZED VIEW".to_string(),
                position: token.position,
            });
        }
    };
    let if_exists = if p.consume_keyword(Keyword::IF) {
        p.expect_keyword(Keyword::EXISTS)?;
        true
    } else {
        false
    };
    let mut names = vec![p.parse_object_name()?];
    while p.consume_punct(Punct::Comma) {
        names.push(p.parse_object_name()?);
    }
    let cascade = p.consume_keyword(Keyword::CASCADE);
    Ok(DropStmt {
        object_type,
        if_exists,
        names,
        cascade,
    })
}

pub(super) fn parse_alter_table(p: &mut Parser<'_>) -> Result<AlterTableStmt, ParseError> {
    p.expect_keyword(Keyword::ALTER)?;
    p.expect_keyword(Keyword::TABLE)?;
    let name = p.parse_object_name()?;

    let action = if p.consume_keyword(Keyword::ADD) {
        if p.consume_keyword(Keyword::CONSTRAINT) {
            AlterTableAction::AddConstraint(parse_table_constraint(p)?)
        } else if p.consume_keyword(Keyword::PRIMARY) {
            p.expect_keyword(Keyword::KEY)?;
            AlterTableAction::AddPrimaryKey(parse_paren_ident_list(p)?)
        } else if p.consume_keyword(Keyword::UNIQUE) {
            AlterTableAction::AddUnique(parse_paren_ident_list(p)?)
        } else {
            p.consume_keyword(Keyword::COLUMN);
            AlterTableAction::AddColumn(parse_column_def(p)?)
        }
    } else if p.consume_keyword(Keyword::DROP) {
        if p.consume_keyword(Keyword::CONSTRAINT) {
            AlterTableAction::DropConstraint(p.parse_ident()?)
        } else {
            p.consume_keyword(Keyword::COLUMN);
            AlterTableAction::DropColumn(p.parse_ident()?)
        }
    } else if p.consume_keyword(Keyword::MODIFY) {
        p.consume_keyword(Keyword::COLUMN);
        AlterTableAction::ModifyColumn(parse_column_def(p)?)
    } else if p.consume_keyword(Keyword::CHANGE) {
        p.consume_keyword(Keyword::COLUMN);
        let old_name = p.parse_ident()?;
        let new_def = parse_column_def(p)?;
        AlterTableAction::ChangeColumn { old_name, new_def }
    } else if p.consume_word("RENAME") {
        if p.consume_keyword(Keyword::COLUMN) {
            let old_name = p.parse_ident()?;
            p.expect_keyword(Keyword::TO)?;
            let new_name = p.parse_ident()?;
            AlterTableAction::RenameColumn { old_name, new_name }
        } else {
            p.consume_keyword(Keyword::TO);
            AlterTableAction::RenameTable(p.parse_object_name()?)
        }
    } else {
        let token = p.peek().clone();
        return Err(ParseError::UnexpectedToken {
            found: token.text,
            expected: "ADD, DROP, MODIFY, CHANGE, or RENAME".to_string(),
            position: token.position,
        });
    };

    Ok(AlterTableStmt { name, action })
}

fn parse_trigger_event(p: &mut Parser<'_>) -> Result<TriggerEvent, ParseError> {
    if p.consume_keyword(Keyword::INSERT) {
        Ok(TriggerEvent::Insert)
    } else if p.consume_keyword(Keyword::UPDATE) {
        Ok(TriggerEvent::Update)
    } else if p.consume_keyword(Keyword::DELETE) {
        Ok(TriggerEvent::Delete)
    } else {
        let token = p.peek().clone();
        Err(ParseError::UnexpectedToken {
            found: token.text,
            expected: "INSERT, UPDATE, or DELETE".to_string(),
            position: token.position,
        })
    }
}

fn parse_create_trigger(p: &mut Parser<'_>) -> Result<CreateTriggerStmt, ParseError> {
    p.expect_keyword(Keyword::TRIGGER)?;
    let name = p.parse_ident()?;

    let timing = if p.consume_word("BEFORE") {
        TriggerTiming::Before
    } else if p.consume_word("AFTER") {
        TriggerTiming::After
    } else {
        p.expect_word("INSTEAD")?;
        p.expect_word("OF")?;
        TriggerTiming::InsteadOf
    };

    let mut events = vec![parse_trigger_event(p)?];
    while p.consume_keyword(Keyword::OR) {
        events.push(parse_trigger_event(p)?);
    }

    p.expect_keyword(Keyword::ON)?;
    let table = p.parse_object_name()?;

    p.consume_keyword(Keyword::FOR);
    p.consume_word("EACH");
    p.consume_keyword(Keyword::ROW);

    let body = parse_opaque_body(p)?;
    Ok(CreateTriggerStmt {
        name,
        timing,
        events,
        table,
        body,
    })
}

/// Captures a `BEGIN ... END` body verbatim as source text, tracking nested
/// `BEGIN`/`END` depth. Trigger bodies are out of grammar scope (spec §4.3.5
/// treats them as opaque); only statement-level recognition matters.
fn parse_opaque_body(p: &mut Parser<'_>) -> Result<String, ParseError> {
    p.expect_keyword(Keyword::BEGIN)?;
    let mut depth = 1u32;
    let mut parts = Vec::new();
    loop {
        if p.is_eof() {
            return Err(ParseError::UnexpectedEof {
                expected: "END".to_string(),
            });
        }
        match p.peek_keyword() {
            Some(Keyword::BEGIN) => depth += 1,
            Some(Keyword::END) => {
                depth -= 1;
                if depth == 0 {
                    p.advance_keyword();
                    break;
                }
            }
            _ => {}
        }
        parts.push(p.advance_text());
    }
    Ok(parts.join(" "))
}

fn parse_parameter(p: &mut Parser<'_>) -> Result<Parameter, ParseError> {
    let name = p.parse_ident()?;
    let data_type = types::parse_data_type(p)?;
    Ok(Parameter { name, data_type })
}

fn parse_parameter_list(p: &mut Parser<'_>) -> Result<Vec<Parameter>, ParseError> {
    let mut parameters = Vec::new();
    if p.consume_punct(Punct::LeftParen) {
        if p.peek_punct() != Some(Punct::RightParen) {
            parameters.push(parse_parameter(p)?);
            while p.consume_punct(Punct::Comma) {
                parameters.push(parse_parameter(p)?);
            }
        }
        p.expect_punct(Punct::RightParen)?;
    }
    Ok(parameters)
}

fn parse_create_procedure(p: &mut Parser<'_>) -> Result<CreateProcedureStmt, ParseError> {
    p.expect_keyword(Keyword::PROCEDURE)?;
    let name = p.parse_object_name()?;
    let parameters = parse_parameter_list(p)?;
    p.expect_keyword(Keyword::AS)?;
    let body = procedural::parse_proc_body(p)?;
    Ok(CreateProcedureStmt {
        name,
        parameters,
        body,
    })
}

fn parse_create_function(p: &mut Parser<'_>) -> Result<CreateFunctionStmt, ParseError> {
    p.expect_keyword(Keyword::FUNCTION)?;
    let name = p.parse_object_name()?;
    let parameters = parse_parameter_list(p)?;
    p.expect_word("RETURNS")?;
    let return_type = types::parse_data_type(p)?;
    p.expect_keyword(Keyword::AS)?;
    let body = procedural::parse_proc_body(p)?;
    Ok(CreateFunctionStmt {
        name,
        parameters,
        return_type,
        body,
    })
}
