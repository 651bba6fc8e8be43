//! # sqlens-parser
//!
//! The dialect-aware recursive-descent parser (C4): turns a dialect plus
//! source text into [`sqlens_ast::Statement`] trees, using one concrete
//! [`sqlens_core::Dialect`] descriptor rather than a family of per-dialect
//! parser types.
//!
//! [`parse_statement`] parses exactly one statement; [`parse_script`] parses
//! every statement in a longer script and recovers after each failure so one
//! malformed statement doesn't block the rest.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod error;
mod parser;
mod peek;

pub use error::ParseError;
pub use parser::{parse_script, parse_statement, Parser};

#[cfg(test)]
mod tests {
    use sqlens_core::Dialect;

    use super::*;

    #[test]
    fn parses_simple_select() {
        let dialect = Dialect::postgresql();
        let stmt = parse_statement(&dialect, "SELECT a, b FROM t WHERE a > 1").unwrap();
        assert_eq!(stmt.kind(), "Select");
        assert_eq!(
            stmt.to_string(),
            "SELECT a, b FROM t WHERE a > 1"
        );
    }

    #[test]
    fn parses_join_and_order_by() {
        let dialect = Dialect::mysql();
        let stmt = parse_statement(
            &dialect,
            "SELECT u.id, o.total FROM users AS u INNER JOIN orders AS o ON u.id = o.user_id ORDER BY o.total DESC LIMIT 10",
        )
        .unwrap();
        assert_eq!(stmt.kind(), "Select");
    }

    #[test]
    fn parses_union_with_trailing_order_by() {
        let dialect = Dialect::postgresql();
        let stmt =
            parse_statement(&dialect, "SELECT a FROM t1 UNION SELECT a FROM t2 ORDER BY a")
                .unwrap();
        assert_eq!(stmt.kind(), "SetOperation");
    }

    #[test]
    fn parses_cte_and_subquery() {
        let dialect = Dialect::postgresql();
        let stmt = parse_statement(
            &dialect,
            "WITH recent AS (SELECT id FROM orders WHERE total > 100) SELECT * FROM recent WHERE id IN (SELECT id FROM users)",
        )
        .unwrap();
        assert_eq!(stmt.kind(), "With");
    }

    #[test]
    fn parses_insert_update_delete() {
        let dialect = Dialect::sqlserver();
        assert_eq!(
            parse_statement(&dialect, "INSERT INTO t (a, b) VALUES (1, 2)")
                .unwrap()
                .kind(),
            "Insert"
        );
        assert_eq!(
            parse_statement(&dialect, "UPDATE t SET a = 1 WHERE b = 2")
                .unwrap()
                .kind(),
            "Update"
        );
        assert_eq!(
            parse_statement(&dialect, "DELETE FROM t WHERE b = 2")
                .unwrap()
                .kind(),
            "Delete"
        );
    }

    #[test]
    fn parses_create_table_with_constraints() {
        let dialect = Dialect::postgresql();
        let stmt = parse_statement(
            &dialect,
            "CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR(255) NOT NULL, FOREIGN KEY (id) REFERENCES other (id))",
        )
        .unwrap();
        assert_eq!(stmt.kind(), "CreateTable");
    }

    #[test]
    fn parses_named_table_constraint_and_referential_actions() {
        let dialect = Dialect::postgresql();
        let stmt = parse_statement(
            &dialect,
            "CREATE TABLE t (id INT, parent_id INT REFERENCES t (id) ON DELETE CASCADE ON UPDATE SET NULL, CONSTRAINT pk PRIMARY KEY (id))",
        )
        .unwrap();
        assert_eq!(stmt.kind(), "CreateTable");
    }

    #[test]
    fn parses_alter_table_modify_change_and_drop_constraint() {
        let dialect = Dialect::mysql();
        for sql in [
            "ALTER TABLE t MODIFY COLUMN name VARCHAR(10)",
            "ALTER TABLE t CHANGE name full_name VARCHAR(10)",
            "ALTER TABLE t DROP CONSTRAINT pk",
            "ALTER TABLE t ADD PRIMARY KEY (id)",
            "ALTER TABLE t ADD UNIQUE (email)",
        ] {
            let stmt = parse_statement(&dialect, sql).unwrap();
            assert_eq!(stmt.kind(), "AlterTable");
        }
    }

    #[test]
    fn parses_drop_with_object_types_and_cascade() {
        let dialect = Dialect::postgresql();
        for sql in [
            "DROP DATABASE shop",
            "DROP SCHEMA shop CASCADE",
            "DROP MATERIALIZED VIEW v",
        ] {
            let stmt = parse_statement(&dialect, sql).unwrap();
            assert_eq!(stmt.kind(), "Drop");
        }
    }

    #[test]
    fn parses_create_materialized_view() {
        let dialect = Dialect::postgresql();
        let stmt = parse_statement(
            &dialect,
            "CREATE OR REPLACE MATERIALIZED VIEW v AS SELECT id FROM t",
        )
        .unwrap();
        assert_eq!(stmt.kind(), "CreateView");
    }

    #[test]
    fn parses_case_expression_without_overconsuming() {
        let dialect = Dialect::postgresql();
        let stmt = parse_statement(
            &dialect,
            "SELECT CASE WHEN a > 1 THEN 'big' WHEN a > 0 THEN 'small' ELSE 'none' END FROM t",
        )
        .unwrap();
        assert_eq!(stmt.kind(), "Select");
    }

    #[test]
    fn parses_window_function() {
        let dialect = Dialect::postgresql();
        let stmt = parse_statement(
            &dialect,
            "SELECT ROW_NUMBER() OVER (PARTITION BY dept ORDER BY salary DESC) FROM employees",
        )
        .unwrap();
        assert_eq!(stmt.kind(), "Select");
    }

    #[test]
    fn parses_create_procedure_body() {
        let dialect = Dialect::mysql();
        let stmt = parse_statement(
            &dialect,
            "CREATE PROCEDURE p (x INT) AS BEGIN IF x > 0 THEN DECLARE y INT; END IF; END",
        )
        .unwrap();
        assert_eq!(stmt.kind(), "CreateProcedure");
    }

    #[test]
    fn recovers_after_a_malformed_statement() {
        let dialect = Dialect::postgresql();
        let (statements, errors) =
            parse_script(&dialect, "SELECT 1 FROM; SELECT 2 FROM t");
        assert_eq!(statements.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn rejects_invalid_token_without_panicking() {
        let dialect = Dialect::postgresql();
        let err = parse_statement(&dialect, "SELECT 1 FROM t WHERE a = #").unwrap_err();
        assert!(matches!(err, ParseError::InvalidToken { .. }));
    }
}
