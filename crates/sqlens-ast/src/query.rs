use std::fmt;

use crate::expr::{Expr, OrderByItem};
use crate::ident::{Ident, ObjectName};
use crate::utils::display_comma_separated;

/// A query body: either a single `SELECT` or a chain of them combined with
/// `UNION`/`INTERSECT`/`EXCEPT`.
///
/// This is the type subqueries, CTEs, and `IN (SELECT ...)` all nest on; the
/// top-level [`crate::Statement::Select`] and
/// [`crate::Statement::SetOperation`] variants wrap the same two shapes so a
/// reader sees them named directly in the statement kind, per spec §3.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Query {
    /// A single `SELECT`.
    Select(Box<SelectStmt>),
    /// A `UNION`/`INTERSECT`/`EXCEPT` of two query bodies.
    SetOperation(Box<SetOperationStmt>),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Select(s) => write!(f, "{s}"),
            Query::SetOperation(s) => write!(f, "{s}"),
        }
    }
}

/// `UNION` / `INTERSECT` / `EXCEPT`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetOperator {
    /// `UNION`
    Union,
    /// `INTERSECT`
    Intersect,
    /// `EXCEPT` (or `MINUS` on Oracle, normalized to `Except`).
    Except,
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SetOperator::Union => "UNION",
            SetOperator::Intersect => "INTERSECT",
            SetOperator::Except => "EXCEPT",
        })
    }
}

/// A binary combination of two query bodies. The parser left-associates a
/// chain of set operators, so a three-way `UNION` nests as
/// `((a UNION b) UNION c)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetOperationStmt {
    /// The left operand.
    pub left: Query,
    /// The combining operator.
    pub op: SetOperator,
    /// Whether `ALL` was written, suppressing duplicate elimination.
    pub all: bool,
    /// The right operand.
    pub right: Query,
    /// A trailing `ORDER BY` applying to the combined result.
    pub order_by: Vec<OrderByItem>,
    /// A trailing `LIMIT` applying to the combined result.
    pub limit: Option<Expr>,
    /// A trailing `OFFSET` applying to the combined result.
    pub offset: Option<Expr>,
}

impl fmt::Display for SetOperationStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.left, self.op)?;
        if self.all {
            f.write_str(" ALL")?;
        }
        write!(f, " {}", self.right)?;
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            display_comma_separated(f, &self.order_by)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if let Some(offset) = &self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        Ok(())
    }
}

/// A single projected item in a `SELECT` list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectItem {
    /// A bare expression, e.g. `a + b`.
    Expr(Expr),
    /// An aliased expression, e.g. `a + b AS total`.
    Aliased(Expr, Ident),
    /// `*`.
    Wildcard,
    /// `alias.*`.
    QualifiedWildcard(Vec<Ident>),
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectItem::Expr(e) => write!(f, "{e}"),
            SelectItem::Aliased(e, alias) => write!(f, "{e} AS {alias}"),
            SelectItem::Wildcard => f.write_str("*"),
            SelectItem::QualifiedWildcard(parts) => {
                crate::utils::display_separated(f, parts, ".")?;
                f.write_str(".*")
            }
        }
    }
}

/// A table reference appearing in `FROM` or after a `JOIN`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableFactor {
    /// A named table, optionally aliased.
    Table {
        /// The (possibly qualified) table name.
        name: ObjectName,
        /// An `AS alias` clause, if present.
        alias: Option<Ident>,
    },
    /// A parenthesized subquery, always aliased (required by every dialect
    /// in scope).
    Derived {
        /// The subquery body.
        query: Box<Query>,
        /// The mandatory alias.
        alias: Ident,
    },
}

impl fmt::Display for TableFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFactor::Table { name, alias } => {
                write!(f, "{name}")?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                Ok(())
            }
            TableFactor::Derived { query, alias } => write!(f, "({query}) AS {alias}"),
        }
    }
}

/// The join operator introducing a [`Join`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinKind {
    /// `INNER JOIN` / plain `JOIN`.
    Inner,
    /// `LEFT [OUTER] JOIN`.
    Left,
    /// `RIGHT [OUTER] JOIN`.
    Right,
    /// `FULL [OUTER] JOIN`.
    Full,
    /// `CROSS JOIN`.
    Cross,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        })
    }
}

/// A `JOIN` clause following the first table in a `FROM` list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Join {
    /// The right-hand side of the join.
    pub relation: TableFactor,
    /// The join operator.
    pub kind: JoinKind,
    /// The `ON` predicate. Always `None` for `CROSS JOIN`.
    pub on: Option<Expr>,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.relation)?;
        if let Some(on) = &self.on {
            write!(f, " ON {on}")?;
        }
        Ok(())
    }
}

/// A `SELECT` statement body (spec §3, §4.4).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectStmt {
    /// Whether `DISTINCT` was written.
    pub distinct: bool,
    /// SQL Server's `TOP n`, kept distinct from `LIMIT` since the two are
    /// mutually exclusive per dialect.
    pub top: Option<Expr>,
    /// The projection list. Never empty.
    pub projection: Vec<SelectItem>,
    /// The first table in `FROM`, if any (bodies like `SELECT 1` omit it).
    pub from: Option<TableFactor>,
    /// `JOIN` clauses following `from`.
    pub joins: Vec<Join>,
    /// The `WHERE` predicate.
    pub selection: Option<Expr>,
    /// `GROUP BY` expressions.
    pub group_by: Vec<Expr>,
    /// The `HAVING` predicate.
    pub having: Option<Expr>,
    /// `ORDER BY` items.
    pub order_by: Vec<OrderByItem>,
    /// `LIMIT n` (ANSI/MySQL/Postgres/SQLite spelling).
    pub limit: Option<Expr>,
    /// `OFFSET n`.
    pub offset: Option<Expr>,
    /// Whether a trailing `FOR UPDATE` was written, requesting row locks on
    /// the selected rows.
    pub for_update: bool,
}

impl SelectStmt {
    /// A minimal `SELECT` with only a projection list.
    pub fn new(projection: Vec<SelectItem>) -> Self {
        SelectStmt {
            distinct: false,
            top: None,
            projection,
            from: None,
            joins: Vec::new(),
            selection: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            for_update: false,
        }
    }
}

impl fmt::Display for SelectStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        if let Some(top) = &self.top {
            write!(f, "TOP {top} ")?;
        }
        display_comma_separated(f, &self.projection)?;
        if let Some(from) = &self.from {
            write!(f, " FROM {from}")?;
            for join in &self.joins {
                write!(f, " {join}")?;
            }
        }
        if let Some(selection) = &self.selection {
            write!(f, " WHERE {selection}")?;
        }
        if !self.group_by.is_empty() {
            f.write_str(" GROUP BY ")?;
            display_comma_separated(f, &self.group_by)?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {having}")?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            display_comma_separated(f, &self.order_by)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if let Some(offset) = &self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        if self.for_update {
            f.write_str(" FOR UPDATE")?;
        }
        Ok(())
    }
}
