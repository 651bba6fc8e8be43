use std::fmt;

use crate::data_type::DataType;
use crate::expr::Expr;
use crate::ident::{Ident, ObjectName};
use crate::utils::display_comma_separated;

/// A per-column constraint attached directly in a column definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnConstraint {
    /// `NOT NULL`.
    NotNull,
    /// `NULL` (explicit).
    Null,
    /// `PRIMARY KEY`.
    PrimaryKey,
    /// `UNIQUE`.
    Unique,
    /// `DEFAULT expr`.
    Default(Expr),
    /// `REFERENCES table (col) [ON DELETE action] [ON UPDATE action]`.
    References {
        /// The referenced table.
        table: ObjectName,
        /// The referenced column, if named explicitly.
        column: Option<Ident>,
        /// The `ON DELETE` action, if given.
        on_delete: Option<ReferentialAction>,
        /// The `ON UPDATE` action, if given.
        on_update: Option<ReferentialAction>,
    },
    /// An auto-increment / identity marker, spelled per dialect
    /// (`AUTO_INCREMENT`, `AUTOINCREMENT`, `IDENTITY`, ...).
    AutoIncrement,
    /// `CHECK (expr)`.
    Check(Expr),
}

/// The action a foreign key takes on its referenced row's deletion or
/// update (`ON DELETE`/`ON UPDATE`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferentialAction {
    /// `CASCADE`.
    Cascade,
    /// `SET NULL`.
    SetNull,
    /// `SET DEFAULT`.
    SetDefault,
    /// `RESTRICT`.
    Restrict,
    /// `NO ACTION`.
    NoAction,
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
        })
    }
}

/// One column definition in a `CREATE TABLE`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDef {
    /// The column name.
    pub name: Ident,
    /// The declared type.
    pub data_type: DataType,
    /// Inline constraints, in source order.
    pub constraints: Vec<ColumnConstraint>,
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        for constraint in &self.constraints {
            f.write_str(" ")?;
            match constraint {
                ColumnConstraint::NotNull => f.write_str("NOT NULL")?,
                ColumnConstraint::Null => f.write_str("NULL")?,
                ColumnConstraint::PrimaryKey => f.write_str("PRIMARY KEY")?,
                ColumnConstraint::Unique => f.write_str("UNIQUE")?,
                ColumnConstraint::Default(e) => write!(f, "DEFAULT {e}")?,
                ColumnConstraint::References {
                    table,
                    column,
                    on_delete,
                    on_update,
                } => {
                    write!(f, "REFERENCES {table}")?;
                    if let Some(col) = column {
                        write!(f, " ({col})")?;
                    }
                    if let Some(action) = on_delete {
                        write!(f, " ON DELETE {action}")?;
                    }
                    if let Some(action) = on_update {
                        write!(f, " ON UPDATE {action}")?;
                    }
                }
                ColumnConstraint::AutoIncrement => f.write_str("AUTO_INCREMENT")?,
                ColumnConstraint::Check(e) => write!(f, "CHECK ({e})")?,
            }
        }
        Ok(())
    }
}

/// The kind of a table-level constraint, not tied to a single column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableConstraintKind {
    /// `PRIMARY KEY (cols)`.
    PrimaryKey(Vec<Ident>),
    /// `UNIQUE (cols)`.
    Unique(Vec<Ident>),
    /// `FOREIGN KEY (cols) REFERENCES table (cols)`.
    ForeignKey {
        /// The local columns.
        columns: Vec<Ident>,
        /// The referenced table.
        foreign_table: ObjectName,
        /// The referenced columns.
        foreign_columns: Vec<Ident>,
    },
    /// `CHECK (expr)`.
    Check(Expr),
}

impl fmt::Display for TableConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableConstraintKind::PrimaryKey(cols) => {
                f.write_str("PRIMARY KEY (")?;
                display_comma_separated(f, cols)?;
                f.write_str(")")
            }
            TableConstraintKind::Unique(cols) => {
                f.write_str("UNIQUE (")?;
                display_comma_separated(f, cols)?;
                f.write_str(")")
            }
            TableConstraintKind::ForeignKey {
                columns,
                foreign_table,
                foreign_columns,
            } => {
                f.write_str("FOREIGN KEY (")?;
                display_comma_separated(f, columns)?;
                write!(f, ") REFERENCES {foreign_table} (")?;
                display_comma_separated(f, foreign_columns)?;
                f.write_str(")")
            }
            TableConstraintKind::Check(e) => write!(f, "CHECK ({e})"),
        }
    }
}

/// A table-level constraint, optionally named (`CONSTRAINT name ...`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableConstraint {
    /// The constraint's name, if given explicitly.
    pub name: Option<Ident>,
    /// What the constraint requires.
    pub kind: TableConstraintKind,
}

impl fmt::Display for TableConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {name} ")?;
        }
        write!(f, "{}", self.kind)
    }
}

/// `CREATE TABLE [IF NOT EXISTS] name (cols, constraints)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateTableStmt {
    /// The new table's name.
    pub name: ObjectName,
    /// Whether `IF NOT EXISTS` was written.
    pub if_not_exists: bool,
    /// The column definitions.
    pub columns: Vec<ColumnDef>,
    /// Table-level constraints.
    pub constraints: Vec<TableConstraint>,
}

impl fmt::Display for CreateTableStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE TABLE ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{} (", self.name)?;
        display_comma_separated(f, &self.columns)?;
        if !self.constraints.is_empty() {
            f.write_str(", ")?;
            display_comma_separated(f, &self.constraints)?;
        }
        f.write_str(")")
    }
}

/// The kind of object a `DROP` statement targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectType {
    /// `DROP TABLE`.
    Table,
    /// `DROP VIEW`.
    View,
    /// `DROP INDEX`.
    Index,
    /// `DROP PROCEDURE`.
    Procedure,
    /// `DROP FUNCTION`.
    Function,
    /// `DROP TRIGGER`.
    Trigger,
    /// `DROP DATABASE`.
    Database,
    /// `DROP SCHEMA`.
    Schema,
    /// `DROP MATERIALIZED VIEW`.
    MaterializedView,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectType::Table => "TABLE",
            ObjectType::View => "VIEW",
            ObjectType::Index => "INDEX",
            ObjectType::Procedure => "PROCEDURE",
            ObjectType::Function => "FUNCTION",
            ObjectType::Trigger => "TRIGGER",
            ObjectType::Database => "DATABASE",
            ObjectType::Schema => "SCHEMA",
            ObjectType::MaterializedView => "MATERIALIZED VIEW",
        })
    }
}

/// `DROP <object-type> [IF EXISTS] name, ... [CASCADE]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropStmt {
    /// What kind of object is being dropped.
    pub object_type: ObjectType,
    /// Whether `IF EXISTS` was written.
    pub if_exists: bool,
    /// The object names to drop.
    pub names: Vec<ObjectName>,
    /// Whether `CASCADE` was written, dropping dependent objects too.
    pub cascade: bool,
}

impl fmt::Display for DropStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP {}", self.object_type)?;
        if self.if_exists {
            f.write_str(" IF EXISTS")?;
        }
        f.write_str(" ")?;
        display_comma_separated(f, &self.names)?;
        if self.cascade {
            f.write_str(" CASCADE")?;
        }
        Ok(())
    }
}

/// One action within an `ALTER TABLE`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlterTableAction {
    /// `ADD COLUMN col-def`.
    AddColumn(ColumnDef),
    /// `DROP COLUMN name`.
    DropColumn(Ident),
    /// `RENAME TO new-name`.
    RenameTable(ObjectName),
    /// `RENAME COLUMN old TO new`.
    RenameColumn {
        /// The existing column name.
        old_name: Ident,
        /// Its new name.
        new_name: Ident,
    },
    /// `ADD CONSTRAINT constraint`.
    AddConstraint(TableConstraint),
    /// `MODIFY [COLUMN] col-def` (MySQL), redefining a column in place.
    ModifyColumn(ColumnDef),
    /// `CHANGE [COLUMN] old new-def` (MySQL), renaming and redefining a
    /// column in one step.
    ChangeColumn {
        /// The column's existing name.
        old_name: Ident,
        /// Its new name and definition.
        new_def: ColumnDef,
    },
    /// `DROP CONSTRAINT name`.
    DropConstraint(Ident),
    /// `ADD PRIMARY KEY (cols)`.
    AddPrimaryKey(Vec<Ident>),
    /// `ADD UNIQUE (cols)`.
    AddUnique(Vec<Ident>),
}

impl fmt::Display for AlterTableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlterTableAction::AddColumn(col) => write!(f, "ADD COLUMN {col}"),
            AlterTableAction::DropColumn(name) => write!(f, "DROP COLUMN {name}"),
            AlterTableAction::RenameTable(name) => write!(f, "RENAME TO {name}"),
            AlterTableAction::RenameColumn { old_name, new_name } => {
                write!(f, "RENAME COLUMN {old_name} TO {new_name}")
            }
            AlterTableAction::AddConstraint(c) => write!(f, "ADD {c}"),
            AlterTableAction::ModifyColumn(col) => write!(f, "MODIFY COLUMN {col}"),
            AlterTableAction::ChangeColumn { old_name, new_def } => {
                write!(f, "CHANGE COLUMN {old_name} {new_def}")
            }
            AlterTableAction::DropConstraint(name) => write!(f, "DROP CONSTRAINT {name}"),
            AlterTableAction::AddPrimaryKey(cols) => {
                f.write_str("ADD PRIMARY KEY (")?;
                display_comma_separated(f, cols)?;
                f.write_str(")")
            }
            AlterTableAction::AddUnique(cols) => {
                f.write_str("ADD UNIQUE (")?;
                display_comma_separated(f, cols)?;
                f.write_str(")")
            }
        }
    }
}

/// `ALTER TABLE name action`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlterTableStmt {
    /// The table being altered.
    pub name: ObjectName,
    /// The action to apply.
    pub action: AlterTableAction,
}

impl fmt::Display for AlterTableStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALTER TABLE {} {}", self.name, self.action)
    }
}

/// `CREATE [UNIQUE] INDEX [IF NOT EXISTS] name ON table (cols)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateIndexStmt {
    /// The index's name.
    pub name: Ident,
    /// The indexed table.
    pub table: ObjectName,
    /// The indexed columns, in order.
    pub columns: Vec<Ident>,
    /// Whether `UNIQUE` was written.
    pub unique: bool,
    /// Whether `IF NOT EXISTS` was written.
    pub if_not_exists: bool,
}

impl fmt::Display for CreateIndexStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.unique {
            f.write_str("UNIQUE ")?;
        }
        f.write_str("INDEX ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{} ON {} (", self.name, self.table)?;
        display_comma_separated(f, &self.columns)?;
        f.write_str(")")
    }
}

/// `CREATE [OR REPLACE] VIEW name AS query`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateViewStmt {
    /// The view's name.
    pub name: ObjectName,
    /// Whether `OR REPLACE` was written.
    pub or_replace: bool,
    /// Whether `MATERIALIZED` was written.
    pub materialized: bool,
    /// An explicit column list, if given.
    pub columns: Vec<Ident>,
    /// The view's defining query.
    pub query: Box<crate::query::Query>,
}

impl fmt::Display for CreateViewStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.or_replace {
            f.write_str("OR REPLACE ")?;
        }
        if self.materialized {
            f.write_str("MATERIALIZED ")?;
        }
        write!(f, "VIEW {}", self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            display_comma_separated(f, &self.columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS {}", self.query)
    }
}

/// The moment a trigger fires, relative to the triggering statement.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerTiming {
    /// `BEFORE`.
    Before,
    /// `AFTER`.
    After,
    /// `INSTEAD OF`.
    InsteadOf,
}

/// The statement kind a trigger fires on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEvent {
    /// `INSERT`.
    Insert,
    /// `UPDATE`.
    Update,
    /// `DELETE`.
    Delete,
}

/// `CREATE TRIGGER name {BEFORE|AFTER|INSTEAD OF} event ON table ...`.
///
/// The trigger body is opaque: spec scope ends at statement-level recognition,
/// the body's own statements are parsed as a nested [`super::Statement`] only
/// when it is a single recognizable statement, otherwise kept as source text.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateTriggerStmt {
    /// The trigger's name.
    pub name: Ident,
    /// When it fires.
    pub timing: TriggerTiming,
    /// What it fires on.
    pub events: Vec<TriggerEvent>,
    /// The table it is attached to.
    pub table: ObjectName,
    /// The trigger body, as written.
    pub body: String,
}

impl fmt::Display for CreateTriggerStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE TRIGGER {} ", self.name)?;
        f.write_str(match self.timing {
            TriggerTiming::Before => "BEFORE",
            TriggerTiming::After => "AFTER",
            TriggerTiming::InsteadOf => "INSTEAD OF",
        })?;
        f.write_str(" ")?;
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                f.write_str(" OR ")?;
            }
            f.write_str(match event {
                TriggerEvent::Insert => "INSERT",
                TriggerEvent::Update => "UPDATE",
                TriggerEvent::Delete => "DELETE",
            })?;
        }
        write!(f, " ON {} {}", self.table, self.body)
    }
}

/// One formal parameter of a procedure or function.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    /// The parameter's name.
    pub name: Ident,
    /// Its declared type.
    pub data_type: DataType,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)
    }
}

/// `CREATE PROCEDURE name (params) AS body`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateProcedureStmt {
    /// The procedure's name.
    pub name: ObjectName,
    /// Its formal parameters.
    pub parameters: Vec<Parameter>,
    /// The procedure body, as a sequence of nested statements.
    pub body: Vec<super::procedural::ProcStmt>,
}

impl fmt::Display for CreateProcedureStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE PROCEDURE {} (", self.name)?;
        display_comma_separated(f, &self.parameters)?;
        f.write_str(") AS BEGIN")?;
        for stmt in &self.body {
            write!(f, " {stmt};")?;
        }
        f.write_str(" END")
    }
}

/// `CREATE FUNCTION name (params) RETURNS type AS body`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateFunctionStmt {
    /// The function's name.
    pub name: ObjectName,
    /// Its formal parameters.
    pub parameters: Vec<Parameter>,
    /// Its declared return type.
    pub return_type: DataType,
    /// The function body, as a sequence of nested statements.
    pub body: Vec<super::procedural::ProcStmt>,
}

impl fmt::Display for CreateFunctionStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE FUNCTION {} (", self.name)?;
        display_comma_separated(f, &self.parameters)?;
        write!(f, ") RETURNS {} AS BEGIN", self.return_type)?;
        for stmt in &self.body {
            write!(f, " {stmt};")?;
        }
        f.write_str(" END")
    }
}
