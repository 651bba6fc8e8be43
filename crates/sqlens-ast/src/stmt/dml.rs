use std::fmt;

use crate::expr::{Expr, OrderByItem};
use crate::ident::{Ident, ObjectName};
use crate::query::Query;
use crate::utils::display_comma_separated;

/// The source of values for an `INSERT`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InsertSource {
    /// `VALUES (...), (...), ...`.
    Values(Vec<Vec<Expr>>),
    /// `INSERT INTO t SELECT ...`.
    Query(Box<Query>),
    /// `INSERT INTO t DEFAULT VALUES` (SQL Server / SQLite / Postgres).
    DefaultValues,
}

/// `INSERT INTO table (cols) VALUES (...) | SELECT ... | DEFAULT VALUES`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertStmt {
    /// The target table.
    pub table: ObjectName,
    /// The explicit column list, if given.
    pub columns: Vec<Ident>,
    /// Where the inserted rows come from.
    pub source: InsertSource,
    /// A `RETURNING` projection (Postgres/SQLite/Oracle).
    pub returning: Vec<Expr>,
}

impl fmt::Display for InsertStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {}", self.table)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            display_comma_separated(f, &self.columns)?;
            f.write_str(")")?;
        }
        match &self.source {
            InsertSource::Values(rows) => {
                f.write_str(" VALUES ")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str("(")?;
                    display_comma_separated(f, row)?;
                    f.write_str(")")?;
                }
            }
            InsertSource::Query(q) => write!(f, " {q}")?,
            InsertSource::DefaultValues => f.write_str(" DEFAULT VALUES")?,
        }
        if !self.returning.is_empty() {
            f.write_str(" RETURNING ")?;
            display_comma_separated(f, &self.returning)?;
        }
        Ok(())
    }
}

/// One `column = expr` assignment in a `SET` clause.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// The assigned column.
    pub column: Ident,
    /// The new value.
    pub value: Expr,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.column, self.value)
    }
}

/// `UPDATE table SET col = expr, ... [WHERE ...] [ORDER BY ...] [LIMIT n]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateStmt {
    /// The target table.
    pub table: ObjectName,
    /// The `SET` assignments. Never empty.
    pub assignments: Vec<Assignment>,
    /// The `WHERE` predicate.
    pub selection: Option<Expr>,
    /// `ORDER BY` items (MySQL allows this to pair with `LIMIT` to bound
    /// which rows are updated).
    pub order_by: Vec<OrderByItem>,
    /// `LIMIT n`.
    pub limit: Option<Expr>,
    /// A `RETURNING` projection (Postgres/SQLite/Oracle).
    pub returning: Vec<Expr>,
}

impl fmt::Display for UpdateStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET ", self.table)?;
        display_comma_separated(f, &self.assignments)?;
        if let Some(selection) = &self.selection {
            write!(f, " WHERE {selection}")?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            display_comma_separated(f, &self.order_by)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if !self.returning.is_empty() {
            f.write_str(" RETURNING ")?;
            display_comma_separated(f, &self.returning)?;
        }
        Ok(())
    }
}

/// `DELETE FROM table [WHERE ...] [ORDER BY ...] [LIMIT n]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeleteStmt {
    /// The target table.
    pub table: ObjectName,
    /// The `WHERE` predicate.
    pub selection: Option<Expr>,
    /// `ORDER BY` items.
    pub order_by: Vec<OrderByItem>,
    /// `LIMIT n`.
    pub limit: Option<Expr>,
    /// A `RETURNING` projection (Postgres/SQLite/Oracle).
    pub returning: Vec<Expr>,
}

impl fmt::Display for DeleteStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;
        if let Some(selection) = &self.selection {
            write!(f, " WHERE {selection}")?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            display_comma_separated(f, &self.order_by)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if !self.returning.is_empty() {
            f.write_str(" RETURNING ")?;
            display_comma_separated(f, &self.returning)?;
        }
        Ok(())
    }
}

/// Whether a `MERGE` clause fires `WHEN MATCHED` or `WHEN NOT MATCHED`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergeMatchKind {
    /// `WHEN MATCHED`.
    Matched,
    /// `WHEN NOT MATCHED`, with no `BY TARGET`/`BY SOURCE` qualifier written.
    NotMatched,
    /// `WHEN NOT MATCHED BY TARGET` (a source row with no matching target
    /// row; the usual case engines mean by plain `NOT MATCHED`).
    NotMatchedByTarget,
    /// `WHEN NOT MATCHED BY SOURCE` (a target row with no matching source
    /// row, SQL Server/Postgres syntax for reaching unmatched target rows).
    NotMatchedBySource,
}

/// The action a `MERGE` clause performs when its match kind and optional
/// extra condition both hold.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergeAction {
    /// `UPDATE SET ...`.
    Update(Vec<Assignment>),
    /// `DELETE`.
    Delete,
    /// `INSERT (cols) VALUES (...)`.
    Insert {
        /// The inserted column list.
        columns: Vec<Ident>,
        /// The inserted values.
        values: Vec<Expr>,
    },
}

/// One `WHEN [NOT] MATCHED [AND cond] THEN action` clause.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeClause {
    /// Matched vs. not-matched.
    pub match_kind: MergeMatchKind,
    /// An extra `AND cond` condition, if present.
    pub condition: Option<Expr>,
    /// The action to take.
    pub action: MergeAction,
}

/// `MERGE INTO target USING source ON cond WHEN ... THEN ... [, ...]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeStmt {
    /// The table being merged into.
    pub target: ObjectName,
    /// The optional alias on the target.
    pub target_alias: Option<Ident>,
    /// The source table or subquery.
    pub source: crate::query::TableFactor,
    /// The join predicate.
    pub on: Expr,
    /// The `WHEN` clauses, evaluated in order.
    pub clauses: Vec<MergeClause>,
}

impl fmt::Display for MergeStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MERGE INTO {}", self.target)?;
        if let Some(alias) = &self.target_alias {
            write!(f, " AS {alias}")?;
        }
        write!(f, " USING {} ON {}", self.source, self.on)?;
        for clause in &self.clauses {
            f.write_str(" WHEN ")?;
            match clause.match_kind {
                MergeMatchKind::Matched => f.write_str("MATCHED")?,
                MergeMatchKind::NotMatched => f.write_str("NOT MATCHED")?,
                MergeMatchKind::NotMatchedByTarget => f.write_str("NOT MATCHED BY TARGET")?,
                MergeMatchKind::NotMatchedBySource => f.write_str("NOT MATCHED BY SOURCE")?,
            }
            if let Some(cond) = &clause.condition {
                write!(f, " AND {cond}")?;
            }
            f.write_str(" THEN ")?;
            match &clause.action {
                MergeAction::Update(assignments) => {
                    f.write_str("UPDATE SET ")?;
                    display_comma_separated(f, assignments)?;
                }
                MergeAction::Delete => f.write_str("DELETE")?,
                MergeAction::Insert { columns, values } => {
                    f.write_str("INSERT (")?;
                    display_comma_separated(f, columns)?;
                    f.write_str(") VALUES (")?;
                    display_comma_separated(f, values)?;
                    f.write_str(")")?;
                }
            }
        }
        Ok(())
    }
}

/// One `name [(cols)] AS (query)` common table expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cte {
    /// The CTE's name, bound for the scope of the enclosing statement.
    pub name: Ident,
    /// An explicit column list, if given.
    pub columns: Vec<Ident>,
    /// The CTE's query body.
    pub query: Box<Query>,
}

impl fmt::Display for Cte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            display_comma_separated(f, &self.columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS ({})", self.query)
    }
}

/// `WITH [RECURSIVE] cte, ... body`, where `body` is the statement the CTEs
/// are in scope for (a `SELECT`, or an `INSERT`/`UPDATE`/`DELETE` on engines
/// that allow writable CTEs).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithStmt {
    /// Whether `RECURSIVE` was written.
    pub recursive: bool,
    /// The CTE definitions, in declaration order.
    pub ctes: Vec<Cte>,
    /// The statement the CTEs are visible to.
    pub body: Box<super::Statement>,
}

impl fmt::Display for WithStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WITH ")?;
        if self.recursive {
            f.write_str("RECURSIVE ")?;
        }
        display_comma_separated(f, &self.ctes)?;
        write!(f, " {}", self.body)
    }
}
