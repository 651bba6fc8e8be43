//! # sqlens-schema
//!
//! The schema model, JSON loader, and type-checking validator (C5/C6):
//! loads a schema document, then walks a [`sqlens_ast::Statement`] against
//! it to produce a list of [`Diagnostic`]s. Validation never fails outright
//! — an unresolved reference is reported, not fatal — so a caller always
//! gets back a (possibly empty) diagnostic list rather than a `Result`.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod data_type;
mod loader;
mod model;
mod validator;

pub use data_type::{classify, DataType, TypeClass};
pub use loader::LoadError;
pub use model::{Column, ForeignKeyRef, Schema, Table};
pub use validator::{validate, validate_optional, Diagnostic, DiagnosticKind};

#[cfg(test)]
mod tests {
    use super::*;
    use sqlens_core::Dialect;
    use sqlens_parser::parse_statement;

    /// Spec §8 scenario 6: a schema missing a referenced column produces
    /// exactly one `COLUMN_NOT_FOUND` diagnostic naming it.
    #[test]
    fn scenario_missing_column_produces_one_diagnostic() {
        let schema = Schema::from_json(
            r#"{
                "name": "shop",
                "tables": [
                    {
                        "name": "users",
                        "columns": [
                            {"name": "id", "type": "INT", "primary_key": true},
                            {"name": "name", "type": "VARCHAR"}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let dialect = Dialect::postgresql();
        let stmt = parse_statement(&dialect, "SELECT id, invalid_col FROM users").unwrap();
        let diags = validate(&stmt, &schema);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::ColumnNotFound);
        assert_eq!(diags[0].column.as_deref(), Some("invalid_col"));
        assert_eq!(diags[0].table.as_deref(), Some("users"));
    }

    #[test]
    fn end_to_end_join_and_where_type_check() {
        let schema = Schema::from_json(
            r#"{
                "name": "shop",
                "tables": [
                    {"name": "users", "columns": [{"name": "id", "type": "INT"}]},
                    {
                        "name": "orders",
                        "columns": [
                            {"name": "id", "type": "INT"},
                            {"name": "user_id", "type": "INT"},
                            {"name": "total", "type": "NUMERIC"}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let dialect = Dialect::mysql();
        let stmt = parse_statement(
            &dialect,
            "SELECT u.id, o.total FROM users u JOIN orders o ON u.id = o.user_id WHERE o.total > 1000",
        )
        .unwrap();

        assert!(validate(&stmt, &schema).is_empty());
    }

    #[test]
    fn diagnostic_display_matches_kind_and_message() {
        let diag = Diagnostic {
            kind: DiagnosticKind::TableNotFound,
            message: "table 'ghosts' not found in schema".to_string(),
            table: Some("ghosts".to_string()),
            column: None,
        };
        assert_eq!(
            diag.to_string(),
            "[TABLE_NOT_FOUND] table 'ghosts' not found in schema"
        );
    }
}
