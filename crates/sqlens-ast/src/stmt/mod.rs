//! Statement-level AST nodes (spec §3, §4.4-§4.6).

pub mod ddl;
pub mod dml;
pub mod procedural;
pub mod transaction;

use std::fmt;

use crate::query::{Query, SelectStmt, SetOperationStmt};

pub use ddl::{
    AlterTableAction, AlterTableStmt, ColumnConstraint, ColumnDef, CreateFunctionStmt,
    CreateIndexStmt, CreateProcedureStmt, CreateTableStmt, CreateTriggerStmt, CreateViewStmt,
    DropStmt, ObjectType, Parameter, TableConstraint, TriggerEvent, TriggerTiming,
};
pub use dml::{
    Assignment, Cte, DeleteStmt, InsertSource, InsertStmt, MergeAction, MergeClause, MergeStmt,
    UpdateStmt, WithStmt,
};
pub use procedural::ProcStmt;
pub use transaction::{BeginStmt, CommitStmt, ExplainStmt, ReleaseStmt, RollbackStmt, SavepointStmt};

/// The root AST node: every parsed statement is exactly one of these
/// variants (spec §3 invariant a — the variant set partitions the space, a
/// statement can never match more than one).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// A single `SELECT`.
    Select(SelectStmt),
    /// A `UNION`/`INTERSECT`/`EXCEPT` combination of `SELECT`s.
    SetOperation(SetOperationStmt),
    /// `WITH ... <statement>`.
    With(WithStmt),
    /// `INSERT`.
    Insert(InsertStmt),
    /// `UPDATE`.
    Update(UpdateStmt),
    /// `DELETE`.
    Delete(DeleteStmt),
    /// `MERGE`.
    Merge(MergeStmt),
    /// `CREATE TABLE`.
    CreateTable(CreateTableStmt),
    /// `CREATE INDEX`.
    CreateIndex(CreateIndexStmt),
    /// `CREATE VIEW`.
    CreateView(CreateViewStmt),
    /// `CREATE TRIGGER`.
    CreateTrigger(CreateTriggerStmt),
    /// `CREATE PROCEDURE`.
    CreateProcedure(CreateProcedureStmt),
    /// `CREATE FUNCTION`.
    CreateFunction(CreateFunctionStmt),
    /// `DROP`.
    Drop(DropStmt),
    /// `ALTER TABLE`.
    AlterTable(AlterTableStmt),
    /// `BEGIN` / `START TRANSACTION`.
    Begin(BeginStmt),
    /// `COMMIT`.
    Commit(CommitStmt),
    /// `ROLLBACK`.
    Rollback(RollbackStmt),
    /// `SAVEPOINT`.
    Savepoint(SavepointStmt),
    /// `RELEASE SAVEPOINT`.
    Release(ReleaseStmt),
    /// `EXPLAIN`.
    Explain(ExplainStmt),
    /// A procedural control-flow statement appearing outside a
    /// procedure/function body, e.g. a bare `SET` or `DECLARE` in a script.
    Procedural(ProcStmt),
}

impl Statement {
    /// A stable discriminator string for this node's variant, matching the
    /// names used throughout the module documentation (`"Select"`,
    /// `"CreateTable"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "Select",
            Statement::SetOperation(_) => "SetOperation",
            Statement::With(_) => "With",
            Statement::Insert(_) => "Insert",
            Statement::Update(_) => "Update",
            Statement::Delete(_) => "Delete",
            Statement::Merge(_) => "Merge",
            Statement::CreateTable(_) => "CreateTable",
            Statement::CreateIndex(_) => "CreateIndex",
            Statement::CreateView(_) => "CreateView",
            Statement::CreateTrigger(_) => "CreateTrigger",
            Statement::CreateProcedure(_) => "CreateProcedure",
            Statement::CreateFunction(_) => "CreateFunction",
            Statement::Drop(_) => "Drop",
            Statement::AlterTable(_) => "AlterTable",
            Statement::Begin(_) => "Begin",
            Statement::Commit(_) => "Commit",
            Statement::Rollback(_) => "Rollback",
            Statement::Savepoint(_) => "Savepoint",
            Statement::Release(_) => "Release",
            Statement::Explain(_) => "Explain",
            Statement::Procedural(p) => p.kind(),
        }
    }

    /// Converts a [`Query`] into the equivalent top-level [`Statement`],
    /// used when the parser discovers a statement-level `SELECT`/set
    /// operation rather than one nested as a subquery.
    pub fn from_query(query: Query) -> Self {
        match query {
            Query::Select(select) => Statement::Select(*select),
            Query::SetOperation(set_op) => Statement::SetOperation(*set_op),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(s) => write!(f, "{s}"),
            Statement::SetOperation(s) => write!(f, "{s}"),
            Statement::With(s) => write!(f, "{s}"),
            Statement::Insert(s) => write!(f, "{s}"),
            Statement::Update(s) => write!(f, "{s}"),
            Statement::Delete(s) => write!(f, "{s}"),
            Statement::Merge(s) => write!(f, "{s}"),
            Statement::CreateTable(s) => write!(f, "{s}"),
            Statement::CreateIndex(s) => write!(f, "{s}"),
            Statement::CreateView(s) => write!(f, "{s}"),
            Statement::CreateTrigger(s) => write!(f, "{s}"),
            Statement::CreateProcedure(s) => write!(f, "{s}"),
            Statement::CreateFunction(s) => write!(f, "{s}"),
            Statement::Drop(s) => write!(f, "{s}"),
            Statement::AlterTable(s) => write!(f, "{s}"),
            Statement::Begin(s) => write!(f, "{s}"),
            Statement::Commit(s) => write!(f, "{s}"),
            Statement::Rollback(s) => write!(f, "{s}"),
            Statement::Savepoint(s) => write!(f, "{s}"),
            Statement::Release(s) => write!(f, "{s}"),
            Statement::Explain(s) => write!(f, "{s}"),
            Statement::Procedural(s) => write!(f, "{s}"),
        }
    }
}
