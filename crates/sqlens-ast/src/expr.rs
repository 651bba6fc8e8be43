use std::fmt;

use crate::data_type::DataType;
use crate::ident::{Ident, ObjectName};
use crate::literal::Literal;
use crate::query::Query;
use crate::utils::display_comma_separated;

/// A SQL expression (spec §3, §4.3).
///
/// Every sub-expression is owned by exactly one parent — the AST is a tree,
/// not a DAG; a subquery expression owns an independent `Query` tree rather
/// than sharing one with its enclosing statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// A literal: int, float, string, bool, or null.
    Literal(Literal),
    /// A column reference, optionally qualified by table and/or schema.
    Column(ColumnRef),
    /// Bare `*`, as in `SELECT *` or `COUNT(*)`.
    Wildcard,
    /// `alias.*` or `schema.table.*`.
    QualifiedWildcard(Vec<Ident>),
    /// A parenthesized expression, e.g. `(a + b)`.
    Nested(Box<Expr>),
    /// A unary operation, e.g. `-x` or `NOT x`.
    Unary(UnaryExpr),
    /// A binary operation, e.g. `a + b` or `a AND b`.
    Binary(BinaryExpr),
    /// A function call, with an optional `OVER (...)` window clause. When
    /// `over` is present this is what spec §3 calls a WindowFunctionCall;
    /// [`Expr::kind`] reports the distinction without a separate variant.
    Function(FunctionCall),
    /// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
    Case(CaseExpr),
    /// `expr [NOT] IN (list)` or `expr [NOT] IN (subquery)`.
    In(InExpr),
    /// `[NOT] EXISTS (subquery)`.
    Exists(ExistsExpr),
    /// A parenthesized `SELECT` used where a scalar value is expected.
    Subquery(Box<Query>),
    /// `CAST(expr AS type)` or `expr::type`.
    Cast(CastExpr),
    /// `expr [NOT] BETWEEN low AND high`.
    Between(BetweenExpr),
}

impl Expr {
    /// A stable discriminator string for this node's variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "Literal",
            Expr::Column(_) => "ColumnReference",
            Expr::Wildcard | Expr::QualifiedWildcard(_) => "Wildcard",
            Expr::Nested(_) => "Nested",
            Expr::Unary(_) => "UnaryExpression",
            Expr::Binary(_) => "BinaryExpression",
            Expr::Function(f) if f.over.is_some() => "WindowFunctionCall",
            Expr::Function(_) => "FunctionCall",
            Expr::Case(_) => "CaseExpression",
            Expr::In(_) => "InExpression",
            Expr::Exists(_) => "ExistsExpression",
            Expr::Subquery(_) => "SubqueryExpression",
            Expr::Cast(_) => "Cast",
            Expr::Between(_) => "Between",
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Column(col) => write!(f, "{col}"),
            Expr::Wildcard => f.write_str("*"),
            Expr::QualifiedWildcard(parts) => {
                crate::utils::display_separated(f, parts, ".")?;
                f.write_str(".*")
            }
            Expr::Nested(e) => write!(f, "({e})"),
            Expr::Unary(u) => write!(f, "{u}"),
            Expr::Binary(b) => write!(f, "{b}"),
            Expr::Function(func) => write!(f, "{func}"),
            Expr::Case(c) => write!(f, "{c}"),
            Expr::In(i) => write!(f, "{i}"),
            Expr::Exists(e) => write!(f, "{e}"),
            Expr::Subquery(q) => write!(f, "({q})"),
            Expr::Cast(c) => write!(f, "{c}"),
            Expr::Between(b) => write!(f, "{b}"),
        }
    }
}

/// A (possibly qualified) column reference: `col`, `table.col`, or
/// `schema.table.col`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnRef {
    /// 1 to 3 parts, outermost-qualifier first, column name last.
    pub parts: Vec<Ident>,
}

impl ColumnRef {
    /// An unqualified column reference.
    pub fn new(column: impl Into<Ident>) -> Self {
        ColumnRef {
            parts: vec![column.into()],
        }
    }

    /// The column name itself (the last part).
    pub fn column(&self) -> &Ident {
        self.parts.last().expect("ColumnRef is never empty")
    }

    /// The table qualifier, if one was given.
    pub fn table(&self) -> Option<&Ident> {
        (self.parts.len() >= 2).then(|| &self.parts[self.parts.len() - 2])
    }

    /// The schema qualifier, if a fully-qualified `schema.table.col` was given.
    pub fn schema(&self) -> Option<&Ident> {
        (self.parts.len() == 3).then(|| &self.parts[0])
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::utils::display_separated(f, &self.parts, ".")
    }
}

/// Unary prefix operators.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    /// `NOT`
    Not,
    /// Unary `-`
    Minus,
    /// Unary `+`
    Plus,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Not => "NOT",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
        })
    }
}

/// A unary operation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnaryExpr {
    /// The operator.
    pub op: UnaryOp,
    /// The operand.
    pub expr: Box<Expr>,
}

impl fmt::Display for UnaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            UnaryOp::Not => write!(f, "NOT {}", self.expr),
            _ => write!(f, "{}{}", self.op, self.expr),
        }
    }
}

/// Binary infix operators, spanning every precedence level in spec §4.4.3.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    /// `OR`
    Or,
    /// `AND`
    And,
    /// `=`
    Eq,
    /// `<>` / `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `IS`
    Is,
    /// `IS NOT`
    IsNot,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `||`
    Concat,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Or => "OR",
            BinaryOp::And => "AND",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Is => "IS",
            BinaryOp::IsNot => "IS NOT",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::Concat => "||",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        })
    }
}

/// A binary operation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryExpr {
    /// Left-hand operand.
    pub left: Box<Expr>,
    /// The operator.
    pub op: BinaryOp,
    /// Right-hand operand.
    pub right: Box<Expr>,
}

impl fmt::Display for BinaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// `ORDER BY` direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderDirection {
    /// `ASC` (the default).
    Asc,
    /// `DESC`.
    Desc,
}

/// One `ORDER BY` item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderByItem {
    /// The ordering expression.
    pub expr: Expr,
    /// `ASC`/`DESC`, defaulting to `ASC` when not written.
    pub direction: OrderDirection,
}

impl fmt::Display for OrderByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if self.direction == OrderDirection::Desc {
            f.write_str(" DESC")?;
        }
        Ok(())
    }
}

/// `ROWS` or `RANGE` framing in a window spec.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameUnit {
    /// `ROWS`
    Rows,
    /// `RANGE`
    Range,
}

/// A window frame bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameBound {
    /// `UNBOUNDED PRECEDING`
    UnboundedPreceding,
    /// `n PRECEDING`
    Preceding(u64),
    /// `CURRENT ROW`
    CurrentRow,
    /// `n FOLLOWING`
    Following(u64),
    /// `UNBOUNDED FOLLOWING`
    UnboundedFollowing,
}

/// A window frame, e.g. `ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowFrame {
    /// `ROWS` or `RANGE`.
    pub unit: FrameUnit,
    /// The lower bound.
    pub start: FrameBound,
    /// The upper bound, if `BETWEEN ... AND ...` was written.
    pub end: Option<FrameBound>,
}

/// The `OVER (...)` clause of a window function call.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowSpec {
    /// `PARTITION BY` expressions.
    pub partition_by: Vec<Expr>,
    /// `ORDER BY` items.
    pub order_by: Vec<OrderByItem>,
    /// An optional frame clause.
    pub frame: Option<WindowFrame>,
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        if !self.partition_by.is_empty() {
            f.write_str("PARTITION BY ")?;
            display_comma_separated(f, &self.partition_by)?;
            wrote = true;
        }
        if !self.order_by.is_empty() {
            if wrote {
                f.write_str(" ")?;
            }
            f.write_str("ORDER BY ")?;
            display_comma_separated(f, &self.order_by)?;
        }
        Ok(())
    }
}

/// A function call, e.g. `COUNT(*)` or `ROW_NUMBER() OVER (...)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionCall {
    /// The (possibly qualified) function name.
    pub name: ObjectName,
    /// Argument expressions.
    pub args: Vec<Expr>,
    /// Whether `DISTINCT` preceded the arguments, e.g. `COUNT(DISTINCT x)`.
    pub distinct: bool,
    /// The `OVER (...)` clause, if this is a window function call.
    pub over: Option<WindowSpec>,
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        display_comma_separated(f, &self.args)?;
        f.write_str(")")?;
        if let Some(over) = &self.over {
            write!(f, " OVER ({over})")?;
        }
        Ok(())
    }
}

/// A `CASE` expression, optionally with a leading operand
/// (`CASE x WHEN ...` vs `CASE WHEN ...`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseExpr {
    /// The operand in `CASE operand WHEN ...`, if any.
    pub operand: Option<Box<Expr>>,
    /// `(condition, result)` pairs, one per `WHEN ... THEN ...` branch.
    pub when_then: Vec<(Expr, Expr)>,
    /// The `ELSE` result, if present.
    pub else_result: Option<Box<Expr>>,
}

impl fmt::Display for CaseExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CASE")?;
        if let Some(operand) = &self.operand {
            write!(f, " {operand}")?;
        }
        for (when, then) in &self.when_then {
            write!(f, " WHEN {when} THEN {then}")?;
        }
        if let Some(else_result) = &self.else_result {
            write!(f, " ELSE {else_result}")?;
        }
        f.write_str(" END")
    }
}

/// The right-hand side of an `IN` expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InList {
    /// `IN (expr, expr, ...)`.
    Exprs(Vec<Expr>),
    /// `IN (SELECT ...)`.
    Subquery(Box<Query>),
}

/// `expr [NOT] IN (...)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InExpr {
    /// The probed expression.
    pub expr: Box<Expr>,
    /// Whether this is `NOT IN`.
    pub negated: bool,
    /// The list or subquery being tested against.
    pub list: InList,
}

impl fmt::Display for InExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}IN (", self.expr, if self.negated { "NOT " } else { "" })?;
        match &self.list {
            InList::Exprs(exprs) => display_comma_separated(f, exprs)?,
            InList::Subquery(q) => write!(f, "{q}")?,
        }
        f.write_str(")")
    }
}

/// `[NOT] EXISTS (subquery)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExistsExpr {
    /// Whether this is `NOT EXISTS`.
    pub negated: bool,
    /// The probed subquery.
    pub subquery: Box<Query>,
}

impl fmt::Display for ExistsExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}EXISTS ({})",
            if self.negated { "NOT " } else { "" },
            self.subquery
        )
    }
}

/// `CAST(expr AS type)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastExpr {
    /// The expression being cast.
    pub expr: Box<Expr>,
    /// The target type.
    pub data_type: DataType,
}

impl fmt::Display for CastExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAST({} AS {})", self.expr, self.data_type)
    }
}

/// `expr [NOT] BETWEEN low AND high`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BetweenExpr {
    /// The probed expression.
    pub expr: Box<Expr>,
    /// Whether this is `NOT BETWEEN`.
    pub negated: bool,
    /// Lower bound.
    pub low: Box<Expr>,
    /// Upper bound.
    pub high: Box<Expr>,
}

impl fmt::Display for BetweenExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}BETWEEN {} AND {}",
            self.expr,
            if self.negated { "NOT " } else { "" },
            self.low,
            self.high
        )
    }
}
