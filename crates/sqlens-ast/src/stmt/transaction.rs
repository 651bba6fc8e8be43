use std::fmt;

use crate::ident::Ident;

/// `BEGIN` / `START TRANSACTION`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeginStmt;

impl fmt::Display for BeginStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BEGIN")
    }
}

/// `COMMIT`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitStmt;

impl fmt::Display for CommitStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("COMMIT")
    }
}

/// `ROLLBACK [TO SAVEPOINT name]`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollbackStmt {
    /// The savepoint to roll back to, if given.
    pub savepoint: Option<Ident>,
}

impl fmt::Display for RollbackStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ROLLBACK")?;
        if let Some(name) = &self.savepoint {
            write!(f, " TO SAVEPOINT {name}")?;
        }
        Ok(())
    }
}

/// `SAVEPOINT name`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavepointStmt {
    /// The new savepoint's name.
    pub name: Ident,
}

impl fmt::Display for SavepointStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SAVEPOINT {}", self.name)
    }
}

/// `RELEASE SAVEPOINT name`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReleaseStmt {
    /// The savepoint being released.
    pub name: Ident,
}

impl fmt::Display for ReleaseStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RELEASE SAVEPOINT {}", self.name)
    }
}

/// `EXPLAIN [ANALYZE] stmt`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplainStmt {
    /// Whether `ANALYZE` was written (Postgres/MySQL), requesting the
    /// statement actually run and report real timings.
    pub analyze: bool,
    /// The explained statement.
    pub statement: Box<super::Statement>,
}

impl fmt::Display for ExplainStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EXPLAIN ")?;
        if self.analyze {
            f.write_str("ANALYZE ")?;
        }
        write!(f, "{}", self.statement)
    }
}
