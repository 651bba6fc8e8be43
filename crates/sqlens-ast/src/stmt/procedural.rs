use std::fmt;

use crate::expr::Expr;
use crate::ident::Ident;
use crate::stmt::dml::Assignment;
use crate::utils::display_comma_separated;

/// `IF cond THEN ... [ELSIF cond THEN ...] [ELSE ...] END IF`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfStmt {
    /// `(condition, body)` pairs: the leading `IF` and any `ELSIF` branches.
    pub branches: Vec<(Expr, Vec<ProcStmt>)>,
    /// The trailing `ELSE` body, if present.
    pub else_body: Vec<ProcStmt>,
}

/// `WHILE cond DO ... END WHILE`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhileStmt {
    /// The loop condition, tested before each iteration.
    pub condition: Expr,
    /// The loop body.
    pub body: Vec<ProcStmt>,
}

/// An unconditional `LOOP ... END LOOP`, exited only via [`ProcStmt::Exit`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopStmt {
    /// The loop body.
    pub body: Vec<ProcStmt>,
}

/// `FOR ident IN [REVERSE] lo..hi [BY step] LOOP ... END LOOP`, a numeric
/// range loop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForStmt {
    /// The loop variable, bound to each value in the range in turn.
    pub variable: Ident,
    /// Whether `REVERSE` was written: the variable counts down from `high`
    /// to `low` instead of up from `low` to `high`.
    pub reverse: bool,
    /// The range's lower bound.
    pub low: Expr,
    /// The range's upper bound.
    pub high: Expr,
    /// The `BY step` increment, if given. Defaults to 1 when absent.
    pub step: Option<Expr>,
    /// The loop body.
    pub body: Vec<ProcStmt>,
}

/// `REPEAT ... UNTIL cond END REPEAT` — body runs at least once.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepeatStmt {
    /// The loop body.
    pub body: Vec<ProcStmt>,
    /// The exit condition, tested after each iteration.
    pub until: Expr,
}

/// `DECLARE name type [:= default]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclareStmt {
    /// The declared variable's name.
    pub name: Ident,
    /// Its declared type.
    pub data_type: crate::data_type::DataType,
    /// Its initial value, if given.
    pub default: Option<Expr>,
}

/// `OPEN cursor`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenStmt {
    /// The cursor being opened.
    pub cursor: Ident,
}

/// `FETCH cursor INTO vars`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchStmt {
    /// The cursor being read.
    pub cursor: Ident,
    /// The variables receiving the fetched row.
    pub into: Vec<Ident>,
}

/// `CLOSE cursor`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CloseStmt {
    /// The cursor being closed.
    pub cursor: Ident,
}

/// `DEALLOCATE cursor`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeallocateStmt {
    /// The cursor being deallocated.
    pub cursor: Ident,
}

/// `RAISE [level] message [, args]` (Postgres/PL-style).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaiseStmt {
    /// The raised message expression.
    pub message: Expr,
    /// Additional format arguments.
    pub args: Vec<Expr>,
}

/// `THROW [number, message, state]` (SQL Server).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThrowStmt {
    /// The error number, message, and state, if given explicitly; a bare
    /// `THROW` re-raises the caught error.
    pub args: Vec<Expr>,
}

/// `SIGNAL SQLSTATE value [SET MESSAGE_TEXT = msg]` (MySQL).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalStmt {
    /// The five-character SQLSTATE value.
    pub sqlstate: String,
    /// The `MESSAGE_TEXT` override, if given.
    pub message: Option<Expr>,
}

/// `BEGIN TRY ... END TRY BEGIN CATCH ... END CATCH` (SQL Server).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TryStmt {
    /// The protected body.
    pub try_body: Vec<ProcStmt>,
    /// The handler body.
    pub catch_body: Vec<ProcStmt>,
}

/// A statement valid inside a procedure/function/trigger body (spec §3,
/// procedural control flow). Kept as a separate sum type from
/// [`super::Statement`] since these forms are only meaningful nested inside
/// a `BEGIN ... END` block, never as a standalone top-level statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcStmt {
    /// A plain SQL statement nested in the body (`SELECT`, `INSERT`, ...).
    Statement(Box<super::Statement>),
    /// `IF ... THEN ... END IF`.
    If(IfStmt),
    /// `WHILE ... DO ... END WHILE`.
    While(WhileStmt),
    /// `LOOP ... END LOOP`.
    Loop(LoopStmt),
    /// `FOR ... IN [REVERSE] lo..hi [BY step] LOOP ... END LOOP`.
    For(ForStmt),
    /// `REPEAT ... UNTIL ... END REPEAT`.
    Repeat(RepeatStmt),
    /// `EXIT [WHEN cond]`.
    Exit(Option<Expr>),
    /// `CONTINUE [WHEN cond]`.
    Continue(Option<Expr>),
    /// `RETURN [expr]`.
    Return(Option<Expr>),
    /// `DECLARE name type [:= default]`.
    Declare(DeclareStmt),
    /// `OPEN cursor`.
    Open(OpenStmt),
    /// `FETCH cursor INTO vars`.
    Fetch(FetchStmt),
    /// `CLOSE cursor`.
    Close(CloseStmt),
    /// `DEALLOCATE cursor`.
    Deallocate(DeallocateStmt),
    /// `RAISE ...`.
    Raise(RaiseStmt),
    /// `THROW ...`.
    Throw(ThrowStmt),
    /// `SIGNAL ...`.
    Signal(SignalStmt),
    /// `BEGIN TRY ... END TRY BEGIN CATCH ... END CATCH`.
    Try(TryStmt),
    /// `SET var = expr`, assigning a declared variable.
    Set(Assignment),
}

impl ProcStmt {
    /// A stable discriminator string for this node's variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcStmt::Statement(_) => "Statement",
            ProcStmt::If(_) => "If",
            ProcStmt::While(_) => "While",
            ProcStmt::Loop(_) => "Loop",
            ProcStmt::For(_) => "For",
            ProcStmt::Repeat(_) => "Repeat",
            ProcStmt::Exit(_) => "Exit",
            ProcStmt::Continue(_) => "Continue",
            ProcStmt::Return(_) => "Return",
            ProcStmt::Declare(_) => "Declare",
            ProcStmt::Open(_) => "Open",
            ProcStmt::Fetch(_) => "Fetch",
            ProcStmt::Close(_) => "Close",
            ProcStmt::Deallocate(_) => "Deallocate",
            ProcStmt::Raise(_) => "Raise",
            ProcStmt::Throw(_) => "Throw",
            ProcStmt::Signal(_) => "Signal",
            ProcStmt::Try(_) => "Try",
            ProcStmt::Set(_) => "Set",
        }
    }
}

fn fmt_body(f: &mut fmt::Formatter<'_>, body: &[ProcStmt]) -> fmt::Result {
    for stmt in body {
        write!(f, " {stmt};")?;
    }
    Ok(())
}

impl fmt::Display for ProcStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcStmt::Statement(s) => write!(f, "{s}"),
            ProcStmt::If(stmt) => {
                let mut branches = stmt.branches.iter();
                if let Some((cond, body)) = branches.next() {
                    write!(f, "IF {cond} THEN")?;
                    fmt_body(f, body)?;
                }
                for (cond, body) in branches {
                    write!(f, " ELSIF {cond} THEN")?;
                    fmt_body(f, body)?;
                }
                if !stmt.else_body.is_empty() {
                    f.write_str(" ELSE")?;
                    fmt_body(f, &stmt.else_body)?;
                }
                f.write_str(" END IF")
            }
            ProcStmt::While(stmt) => {
                write!(f, "WHILE {} DO", stmt.condition)?;
                fmt_body(f, &stmt.body)?;
                f.write_str(" END WHILE")
            }
            ProcStmt::Loop(stmt) => {
                f.write_str("LOOP")?;
                fmt_body(f, &stmt.body)?;
                f.write_str(" END LOOP")
            }
            ProcStmt::For(stmt) => {
                write!(f, "FOR {} IN ", stmt.variable)?;
                if stmt.reverse {
                    f.write_str("REVERSE ")?;
                }
                write!(f, "{}..{}", stmt.low, stmt.high)?;
                if let Some(step) = &stmt.step {
                    write!(f, " BY {step}")?;
                }
                f.write_str(" LOOP")?;
                fmt_body(f, &stmt.body)?;
                f.write_str(" END LOOP")
            }
            ProcStmt::Repeat(stmt) => {
                f.write_str("REPEAT")?;
                fmt_body(f, &stmt.body)?;
                write!(f, " UNTIL {} END REPEAT", stmt.until)
            }
            ProcStmt::Exit(cond) => {
                f.write_str("EXIT")?;
                if let Some(cond) = cond {
                    write!(f, " WHEN {cond}")?;
                }
                Ok(())
            }
            ProcStmt::Continue(cond) => {
                f.write_str("CONTINUE")?;
                if let Some(cond) = cond {
                    write!(f, " WHEN {cond}")?;
                }
                Ok(())
            }
            ProcStmt::Return(expr) => {
                f.write_str("RETURN")?;
                if let Some(expr) = expr {
                    write!(f, " {expr}")?;
                }
                Ok(())
            }
            ProcStmt::Declare(stmt) => {
                write!(f, "DECLARE {} {}", stmt.name, stmt.data_type)?;
                if let Some(default) = &stmt.default {
                    write!(f, " := {default}")?;
                }
                Ok(())
            }
            ProcStmt::Open(stmt) => write!(f, "OPEN {}", stmt.cursor),
            ProcStmt::Fetch(stmt) => {
                write!(f, "FETCH {} INTO ", stmt.cursor)?;
                display_comma_separated(f, &stmt.into)
            }
            ProcStmt::Close(stmt) => write!(f, "CLOSE {}", stmt.cursor),
            ProcStmt::Deallocate(stmt) => write!(f, "DEALLOCATE {}", stmt.cursor),
            ProcStmt::Raise(stmt) => {
                write!(f, "RAISE {}", stmt.message)?;
                for arg in &stmt.args {
                    write!(f, ", {arg}")?;
                }
                Ok(())
            }
            ProcStmt::Throw(stmt) => {
                f.write_str("THROW")?;
                if !stmt.args.is_empty() {
                    f.write_str(" ")?;
                    display_comma_separated(f, &stmt.args)?;
                }
                Ok(())
            }
            ProcStmt::Signal(stmt) => {
                write!(f, "SIGNAL SQLSTATE '{}'", stmt.sqlstate)?;
                if let Some(message) = &stmt.message {
                    write!(f, " SET MESSAGE_TEXT = {message}")?;
                }
                Ok(())
            }
            ProcStmt::Try(stmt) => {
                f.write_str("BEGIN TRY")?;
                fmt_body(f, &stmt.try_body)?;
                f.write_str(" END TRY BEGIN CATCH")?;
                fmt_body(f, &stmt.catch_body)?;
                f.write_str(" END CATCH")
            }
            ProcStmt::Set(assignment) => write!(f, "SET {assignment}"),
        }
    }
}
