//! # sqlens
//!
//! SQLens is a dialect-aware SQL lexer, parser, schema validator, and
//! execution-plan analyzer. This crate re-exports the component crates and
//! adds three convenience entry points ([`parse`], [`validate`],
//! [`analyze_plan`]) that most callers reach for instead of wiring the
//! components together by hand.

#![deny(missing_docs)]
#![deny(unused_imports)]

pub use sqlens_ast as ast;
pub use sqlens_core as core;
pub use sqlens_lexer as lexer;
pub use sqlens_parser as parser;
pub use sqlens_plan as plan;
pub use sqlens_schema as schema;

use sqlens_ast::Statement;
use sqlens_parser::ParseError;
use sqlens_plan::{Analysis, PlanNode};
use sqlens_schema::{Diagnostic, Schema};

/// Parses a script of one or more statements under the named dialect (spec
/// §6: one of `mysql`, `postgresql`, `sqlserver`, `sqlite`, `oracle`; unknown
/// names fall back to SQL Server semantics).
///
/// Parsing does not stop at the first error: a statement that fails to parse
/// is recorded in the second element and the parser resynchronizes at the
/// next statement boundary, so one bad statement in a script does not hide
/// the rest.
pub fn parse(dialect_name: &str, sql: &str) -> (Vec<Statement>, Vec<ParseError>) {
    let dialect = sqlens_core::get(dialect_name);
    sqlens_parser::parse_script(&dialect, sql)
}

/// Validates a parsed statement against a loaded schema, returning every
/// diagnostic found (never an error — see [`sqlens_schema::validate`]).
pub fn validate(stmt: &Statement, schema: &Schema) -> Vec<Diagnostic> {
    sqlens_schema::validate(stmt, schema)
}

/// Analyzes a loaded execution plan, returning its performance score,
/// issues, recommendations, and bottlenecks.
pub fn analyze_plan(plan: &PlanNode) -> Analysis {
    sqlens_plan::analyze(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_validate_round_trip() {
        let schema = Schema::from_json(
            r#"{"name": "shop", "tables": [{"name": "users", "columns": [{"name": "id", "type": "INT"}]}]}"#,
        )
        .unwrap();
        let (stmts, errors) = parse("postgresql", "SELECT id, missing FROM users");
        assert!(errors.is_empty());
        let diags = validate(&stmts[0], &schema);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, sqlens_schema::DiagnosticKind::ColumnNotFound);
    }

    #[test]
    fn unknown_dialect_name_falls_back_to_sqlserver() {
        let (stmts, errors) = parse("not-a-real-dialect", "SELECT [id] FROM [users]");
        assert!(errors.is_empty());
        assert_eq!(stmts[0].kind(), "Select");
    }

    #[test]
    fn parse_script_recovers_after_a_bad_statement() {
        let (stmts, errors) = parse(
            "postgresql",
            "SELECT 1; NOT VALID SQL HERE; SELECT 2",
        );
        assert_eq!(stmts.len(), 2);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn analyze_plan_scores_a_clean_plan_at_100() {
        let plan = PlanNode::from_json(
            r#"{"Plan": {"Node Type": "Seq Scan", "Relation Name": "users", "Total Cost": 5.0, "Plan Rows": 10}}"#,
        )
        .unwrap();
        assert_eq!(analyze_plan(&plan).score, 100);
    }
}
