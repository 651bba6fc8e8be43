use std::collections::HashMap;
use std::fmt;

use crate::data_type::DataType;

/// A foreign key reference, stored as a bare name pair rather than an
/// owning pointer into another `Table` (Design Notes §9: "the schema FK
/// graph is potentially cyclic... store FKs as name pairs resolved at
/// lookup time"). Resolution happens in [`Schema::resolve_foreign_key`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ForeignKeyRef {
    /// The referenced table's name, as declared.
    pub table: String,
    /// The referenced column's name, as declared.
    pub column: String,
}

/// One column of a [`Table`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Column {
    /// The column name, original case preserved for display.
    pub name: String,
    /// The declared type.
    pub data_type: DataType,
    /// Whether `NULL` is permitted.
    pub nullable: bool,
    /// Whether this column is (part of) the table's primary key.
    pub primary_key: bool,
    /// Whether a `UNIQUE` constraint applies.
    pub unique: bool,
    /// A column-level foreign key, if declared inline.
    pub foreign_key: Option<ForeignKeyRef>,
    /// The declared `DEFAULT` expression text, if any.
    pub default: Option<String>,
}

/// A table in a [`Schema`].
///
/// Columns are looked up case-insensitively (spec §8 "identifier
/// case-insensitivity": lookup is case-insensitive, display preserves
/// original case) via an internal lowercased-key index alongside the
/// original-order column list.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    /// The table name, original case preserved.
    pub name: String,
    columns: Vec<Column>,
    column_index: HashMap<String, usize>,
    /// Declared index names.
    pub indexes: Vec<String>,
    /// Table-level foreign keys (a local column paired with a referenced
    /// table/column), in addition to any column-level `foreign_key`.
    pub foreign_keys: Vec<(String, ForeignKeyRef)>,
}

impl Table {
    /// Builds a table from its columns, indexing them case-insensitively.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        indexes: Vec<String>,
        foreign_keys: Vec<(String, ForeignKeyRef)>,
    ) -> Self {
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.to_ascii_lowercase(), i))
            .collect();
        Table {
            name: name.into(),
            columns,
            column_index,
            indexes,
            foreign_keys,
        }
    }

    /// Looks up a column by name, case-insensitively.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.columns[i])
    }

    /// All columns, in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A loaded schema document (spec §3, §4.5, §6): a named collection of
/// tables, looked up case-insensitively.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    /// The schema's name, as declared.
    pub name: String,
    tables: Vec<Table>,
    table_index: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from its tables, indexing them case-insensitively.
    pub fn new(name: impl Into<String>, tables: Vec<Table>) -> Self {
        let table_index = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.to_ascii_lowercase(), i))
            .collect();
        Schema {
            name: name.into(),
            tables,
            table_index,
        }
    }

    /// Looks up a table by name, case-insensitively.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.table_index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.tables[i])
    }

    /// All tables, in declaration order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Resolves a foreign key reference against this schema, returning the
    /// referenced table and column if both exist.
    pub fn resolve_foreign_key<'a>(
        &'a self,
        fk: &ForeignKeyRef,
    ) -> Option<(&'a Table, &'a Column)> {
        let table = self.table(&fk.table)?;
        let column = table.column(&fk.column)?;
        Some((table, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;

    fn column(name: &str, type_name: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: DataType::new(type_name, true),
            nullable: true,
            primary_key: false,
            unique: false,
            foreign_key: None,
            default: None,
        }
    }

    #[test]
    fn table_lookup_is_case_insensitive_and_preserves_display_case() {
        let table = Table::new(
            "Users",
            vec![column("Id", "INT"), column("Email", "VARCHAR")],
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(table.column("EMAIL").unwrap().name, "Email");
        assert_eq!(table.to_string(), "Users");
    }

    #[test]
    fn schema_lookup_is_case_insensitive() {
        let schema = Schema::new(
            "shop",
            vec![Table::new("Orders", vec![column("Id", "INT")], Vec::new(), Vec::new())],
        );
        assert!(schema.table("orders").is_some());
        assert!(schema.table("ORDERS").is_some());
        assert!(schema.table("missing").is_none());
    }
}
