//! # sqlens-ast
//!
//! The abstract syntax tree shared by every SQLens dialect (C3). Every node
//! carries exactly what was parsed -- no resolved types, no schema
//! bindings -- so the same tree works whether or not a schema was ever
//! loaded for it.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod data_type;
mod expr;
mod ident;
mod literal;
mod query;
mod stmt;
mod utils;

pub use data_type::DataType;
pub use expr::{
    BetweenExpr, BinaryExpr, BinaryOp, CaseExpr, CastExpr, ColumnRef, Expr, ExistsExpr,
    FrameBound, FrameUnit, FunctionCall, InExpr, InList, OrderByItem, OrderDirection, UnaryExpr,
    UnaryOp, WindowFrame, WindowSpec,
};
pub use ident::{Ident, ObjectName};
pub use literal::Literal;
pub use query::{Join, JoinKind, Query, SelectItem, SelectStmt, SetOperationStmt, SetOperator, TableFactor};
pub use stmt::{
    ddl::{
        AlterTableAction, AlterTableStmt, ColumnConstraint, ColumnDef, CreateFunctionStmt,
        CreateIndexStmt, CreateProcedureStmt, CreateTableStmt, CreateTriggerStmt, CreateViewStmt,
        DropStmt, ObjectType, Parameter, ReferentialAction, TableConstraint, TableConstraintKind,
        TriggerEvent, TriggerTiming,
    },
    dml::{
        Assignment, Cte, DeleteStmt, InsertSource, InsertStmt, MergeAction, MergeClause,
        MergeStmt, UpdateStmt, WithStmt,
    },
    procedural::{
        CloseStmt, DeallocateStmt, DeclareStmt, FetchStmt, ForStmt, IfStmt, LoopStmt, OpenStmt,
        ProcStmt, RaiseStmt, RepeatStmt, SignalStmt, ThrowStmt, TryStmt, WhileStmt,
    },
    transaction::{BeginStmt, CommitStmt, ExplainStmt, ReleaseStmt, RollbackStmt, SavepointStmt},
    Statement,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_kind_is_stable_per_variant() {
        let stmt = Statement::Begin(BeginStmt);
        assert_eq!(stmt.kind(), "Begin");
        assert_eq!(stmt.to_string(), "BEGIN");
    }

    #[test]
    fn column_ref_reports_table_and_schema() {
        let unqualified = ColumnRef::new("id");
        assert_eq!(unqualified.table(), None);
        assert_eq!(unqualified.schema(), None);

        let qualified = ColumnRef {
            parts: vec![Ident::new("dbo"), Ident::new("users"), Ident::new("id")],
        };
        assert_eq!(qualified.table().unwrap().value, "users");
        assert_eq!(qualified.schema().unwrap().value, "dbo");
        assert_eq!(qualified.to_string(), "dbo.users.id");
    }

    #[test]
    fn quoted_ident_display_round_trips_bracket_quoting() {
        let ident = Ident::quoted("User", '[');
        assert_eq!(ident.to_string(), "[User]");
    }

    #[test]
    fn select_display_includes_only_present_clauses() {
        let select = SelectStmt::new(vec![SelectItem::Wildcard]);
        assert_eq!(select.to_string(), "SELECT *");
    }

    #[test]
    fn window_function_call_kind_differs_from_plain_call() {
        let plain = Expr::Function(FunctionCall {
            name: ObjectName(vec![Ident::new("COUNT")]),
            args: vec![Expr::Wildcard],
            distinct: false,
            over: None,
        });
        assert_eq!(plain.kind(), "FunctionCall");

        let windowed = Expr::Function(FunctionCall {
            name: ObjectName(vec![Ident::new("ROW_NUMBER")]),
            args: vec![],
            distinct: false,
            over: Some(WindowSpec::default()),
        });
        assert_eq!(windowed.kind(), "WindowFunctionCall");
    }

    #[test]
    fn literal_string_display_escapes_single_quotes() {
        let lit = Literal::String("O'Brien".to_string());
        assert_eq!(lit.to_string(), "'O''Brien'");
    }
}
