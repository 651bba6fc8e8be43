use serde::Deserialize;

use crate::data_type::DataType;
use crate::model::{Column, ForeignKeyRef, Schema, Table};

/// Errors loading a schema document (spec §6, §7: "loader validates FK
/// targets; dangling FKs produce a load-time error").
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document wasn't valid JSON, or didn't match the expected shape.
    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),
    /// A foreign key (column-level or table-level) names a table or column
    /// that doesn't exist anywhere in the document.
    #[error(
        "dangling foreign key: {table}.{column} references {fk_table}.{fk_column}, which does not exist"
    )]
    DanglingForeignKey {
        /// The table declaring the foreign key.
        table: String,
        /// The column declaring the foreign key (empty for a table-level
        /// FK with no single owning column).
        column: String,
        /// The referenced table name.
        fk_table: String,
        /// The referenced column name.
        fk_column: String,
    },
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct SchemaDoc {
    name: String,
    #[serde(default)]
    tables: Vec<TableDoc>,
}

#[derive(Deserialize)]
struct TableDoc {
    name: String,
    #[serde(default)]
    columns: Vec<ColumnDoc>,
    #[serde(default)]
    indexes: Vec<String>,
    #[serde(default)]
    foreign_keys: Vec<TableForeignKeyDoc>,
}

#[derive(Deserialize)]
struct ColumnDoc {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    length: Option<u64>,
    #[serde(default)]
    precision: Option<u64>,
    #[serde(default)]
    scale: Option<u64>,
    #[serde(default = "default_true")]
    nullable: bool,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    foreign_key: Option<ForeignKeyDoc>,
    #[serde(default)]
    default: Option<String>,
}

#[derive(Deserialize)]
struct ForeignKeyDoc {
    fk_table: String,
    fk_column: String,
}

#[derive(Deserialize)]
struct TableForeignKeyDoc {
    column: String,
    fk_table: String,
    fk_column: String,
}

impl Schema {
    /// Parses a schema document (spec §6) and validates every foreign key
    /// target, column-level and table-level, against the tables declared
    /// in the same document.
    pub fn from_json(text: &str) -> Result<Schema, LoadError> {
        let doc: SchemaDoc = serde_json::from_str(text)?;
        tracing::debug!(schema = %doc.name, tables = doc.tables.len(), "loaded schema document");

        let mut tables = Vec::with_capacity(doc.tables.len());
        for table_doc in &doc.tables {
            let columns = table_doc
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data_type: {
                        let _ = (c.length, c.precision, c.scale);
                        DataType::new(c.type_name.clone(), c.nullable)
                    },
                    nullable: c.nullable,
                    primary_key: c.primary_key,
                    unique: c.unique,
                    foreign_key: c.foreign_key.as_ref().map(|fk| ForeignKeyRef {
                        table: fk.fk_table.clone(),
                        column: fk.fk_column.clone(),
                    }),
                    default: c.default.clone(),
                })
                .collect();
            let foreign_keys = table_doc
                .foreign_keys
                .iter()
                .map(|fk| {
                    (
                        fk.column.clone(),
                        ForeignKeyRef {
                            table: fk.fk_table.clone(),
                            column: fk.fk_column.clone(),
                        },
                    )
                })
                .collect();
            tables.push(Table::new(
                table_doc.name.clone(),
                columns,
                table_doc.indexes.clone(),
                foreign_keys,
            ));
        }

        let schema = Schema::new(doc.name, tables);
        validate_foreign_keys(&schema)?;
        Ok(schema)
    }
}

fn validate_foreign_keys(schema: &Schema) -> Result<(), LoadError> {
    for table in schema.tables() {
        for column in table.columns() {
            if let Some(fk) = &column.foreign_key {
                if schema.resolve_foreign_key(fk).is_none() {
                    return Err(LoadError::DanglingForeignKey {
                        table: table.name.clone(),
                        column: column.name.clone(),
                        fk_table: fk.table.clone(),
                        fk_column: fk.column.clone(),
                    });
                }
            }
        }
        for (column, fk) in &table.foreign_keys {
            if schema.resolve_foreign_key(fk).is_none() {
                return Err(LoadError::DanglingForeignKey {
                    table: table.name.clone(),
                    column: column.clone(),
                    fk_table: fk.table.clone(),
                    fk_column: fk.column.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_well_formed_schema_document() {
        let json = r#"{
            "name": "shop",
            "tables": [
                {
                    "name": "users",
                    "columns": [
                        {"name": "id", "type": "INT", "nullable": false, "primary_key": true},
                        {"name": "email", "type": "VARCHAR", "length": 255, "unique": true}
                    ]
                },
                {
                    "name": "orders",
                    "columns": [
                        {"name": "id", "type": "INT", "primary_key": true},
                        {
                            "name": "user_id",
                            "type": "INT",
                            "foreign_key": {"fk_table": "users", "fk_column": "id"}
                        }
                    ]
                }
            ]
        }"#;
        let schema = Schema::from_json(json).unwrap();
        assert!(schema.table("users").is_some());
        let orders = schema.table("ORDERS").unwrap();
        let user_id = orders.column("user_id").unwrap();
        assert!(user_id.foreign_key.is_some());
    }

    #[test]
    fn dangling_foreign_key_is_a_load_error() {
        let json = r#"{
            "name": "shop",
            "tables": [
                {
                    "name": "orders",
                    "columns": [
                        {
                            "name": "user_id",
                            "type": "INT",
                            "foreign_key": {"fk_table": "users", "fk_column": "id"}
                        }
                    ]
                }
            ]
        }"#;
        let err = Schema::from_json(json).unwrap_err();
        assert!(matches!(err, LoadError::DanglingForeignKey { .. }));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = Schema::from_json("not json").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
