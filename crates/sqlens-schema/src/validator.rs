use std::collections::HashMap;
use std::fmt;

use sqlens_ast::{
    BinaryOp, ColumnRef, DeleteStmt, Expr, InList, InsertSource, InsertStmt, Literal, Query,
    SelectItem, SelectStmt, SetOperationStmt, Statement, TableFactor, UnaryOp, UpdateStmt,
    WithStmt,
};

use crate::data_type::TypeClass;
use crate::model::{Column, Schema, Table};

/// The kind of a semantic [`Diagnostic`] (spec §4.5).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DiagnosticKind {
    /// A `FROM`/`JOIN`/DML target table isn't in the schema.
    TableNotFound,
    /// A column reference doesn't resolve against any table in scope.
    ColumnNotFound,
    /// An expression's inferred type class doesn't match the column or
    /// context it's used in.
    TypeMismatch,
    /// An `INSERT ... VALUES` row's arity doesn't match the column list.
    ColumnCountMismatch,
    /// A `WHERE`/`HAVING`/`ON` expression doesn't infer to boolean.
    NonBooleanExpression,
    /// No schema was available to validate against.
    SchemaNotLoaded,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::TableNotFound => "TABLE_NOT_FOUND",
            DiagnosticKind::ColumnNotFound => "COLUMN_NOT_FOUND",
            DiagnosticKind::TypeMismatch => "TYPE_MISMATCH",
            DiagnosticKind::ColumnCountMismatch => "COLUMN_COUNT_MISMATCH",
            DiagnosticKind::NonBooleanExpression => "NON_BOOLEAN_EXPRESSION",
            DiagnosticKind::SchemaNotLoaded => "SCHEMA_NOT_LOADED",
        })
    }
}

/// A single semantic finding (spec §4.5, §6): never fatal, always collected
/// into a list alongside whatever else validation produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    /// The kind of problem found.
    pub kind: DiagnosticKind,
    /// A human-readable description.
    pub message: String,
    /// The table the diagnostic concerns, if applicable.
    pub table: Option<String>,
    /// The column the diagnostic concerns, if applicable.
    pub column: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Diagnostic {
    fn table_not_found(table: impl Into<String>) -> Self {
        let table = table.into();
        Diagnostic {
            kind: DiagnosticKind::TableNotFound,
            message: format!("table '{table}' not found in schema"),
            table: Some(table),
            column: None,
        }
    }

    fn column_not_found(column: impl Into<String>, table: Option<String>) -> Self {
        let column = column.into();
        let message = match &table {
            Some(t) => format!("column '{column}' not found in table '{t}'"),
            None => format!("column '{column}' not found"),
        };
        Diagnostic {
            kind: DiagnosticKind::ColumnNotFound,
            message,
            table,
            column: Some(column),
        }
    }

    fn type_mismatch(table: String, column: String, expected: TypeClass, found: TypeClass) -> Self {
        Diagnostic {
            kind: DiagnosticKind::TypeMismatch,
            message: format!(
                "column '{column}' expects a {expected} value, found a {found} expression"
            ),
            table: Some(table),
            column: Some(column),
        }
    }

    fn column_count_mismatch(table: String, expected: usize, found: usize) -> Self {
        Diagnostic {
            kind: DiagnosticKind::ColumnCountMismatch,
            message: format!("expected {expected} values, found {found}"),
            table: Some(table),
            column: None,
        }
    }

    fn non_boolean_expression(context: &str) -> Self {
        Diagnostic {
            kind: DiagnosticKind::NonBooleanExpression,
            message: format!("{context} expression does not evaluate to a boolean"),
            table: None,
            column: None,
        }
    }

    /// A diagnostic reporting that no schema was available to validate
    /// against (see [`validate_optional`]).
    pub fn schema_not_loaded() -> Self {
        Diagnostic {
            kind: DiagnosticKind::SchemaNotLoaded,
            message: "no schema was loaded; validation skipped".to_string(),
            table: None,
            column: None,
        }
    }
}

/// The tables visible while validating one `SELECT` body: alias (or bare
/// table name when unaliased) to the resolved schema table.
struct Scope<'a> {
    aliases: HashMap<String, &'a Table>,
}

impl<'a> Scope<'a> {
    fn empty() -> Self {
        Scope {
            aliases: HashMap::new(),
        }
    }

    fn single(table: &'a Table) -> Self {
        let mut aliases = HashMap::new();
        aliases.insert(table.name.to_ascii_lowercase(), table);
        Scope { aliases }
    }

    /// Resolves a (possibly qualified) column reference. An unqualified
    /// reference is accepted only if it names a column in exactly one
    /// visible table — an ambiguous bare reference is treated as
    /// unresolved rather than guessed at.
    fn resolve_column(&self, column_ref: &ColumnRef) -> Option<&'a Column> {
        let name = &column_ref.column().value;
        if let Some(qualifier) = column_ref.table() {
            self.aliases
                .get(&qualifier.value.to_ascii_lowercase())
                .and_then(|table| table.column(name))
        } else {
            let mut found = None;
            for table in self.aliases.values() {
                if let Some(column) = table.column(name) {
                    if found.is_some() {
                        return None;
                    }
                    found = Some(column);
                }
            }
            found
        }
    }
}

/// Walks `stmt` against `schema`, returning every diagnostic found (spec
/// §4.5). Never fails: an unresolvable reference is reported, not fatal.
pub fn validate(stmt: &Statement, schema: &Schema) -> Vec<Diagnostic> {
    let _span = tracing::debug_span!("validate", kind = stmt.kind()).entered();
    match stmt {
        Statement::Select(select) => validate_select(select, schema),
        Statement::SetOperation(set_op) => validate_set_operation(set_op, schema),
        Statement::With(with) => validate_with(with, schema),
        Statement::Insert(insert) => validate_insert(insert, schema),
        Statement::Update(update) => validate_update(update, schema),
        Statement::Delete(delete) => validate_delete(delete, schema),
        _ => Vec::new(),
    }
}

/// Like [`validate`], but for callers that may not have a schema loaded at
/// all (as opposed to a schema that simply lacks the referenced table) —
/// returns a single [`DiagnosticKind::SchemaNotLoaded`] diagnostic in that
/// case instead of running any checks.
pub fn validate_optional(stmt: &Statement, schema: Option<&Schema>) -> Vec<Diagnostic> {
    match schema {
        Some(schema) => validate(stmt, schema),
        None => vec![Diagnostic::schema_not_loaded()],
    }
}

fn validate_query(query: &Query, schema: &Schema) -> Vec<Diagnostic> {
    match query {
        Query::Select(select) => validate_select(select, schema),
        Query::SetOperation(set_op) => validate_set_operation(set_op, schema),
    }
}

fn validate_set_operation(set_op: &SetOperationStmt, schema: &Schema) -> Vec<Diagnostic> {
    let mut diags = validate_query(&set_op.left, schema);
    diags.extend(validate_query(&set_op.right, schema));
    diags
}

fn validate_with(with: &WithStmt, schema: &Schema) -> Vec<Diagnostic> {
    // CTE-defined names are not added to the visible scope for the outer
    // query (spec §4.5, §9 open question — left unresolved as observed).
    let mut diags = Vec::new();
    for cte in &with.ctes {
        diags.extend(validate_query(&cte.query, schema));
    }
    diags.extend(validate(&with.body, schema));
    diags
}

fn build_scope<'a>(select: &SelectStmt, schema: &'a Schema, diags: &mut Vec<Diagnostic>) -> Scope<'a> {
    let mut scope = Scope::empty();
    if let Some(from) = &select.from {
        add_table_factor(from, schema, &mut scope, diags);
    }
    for join in &select.joins {
        add_table_factor(&join.relation, schema, &mut scope, diags);
    }
    scope
}

fn add_table_factor<'a>(
    factor: &TableFactor,
    schema: &'a Schema,
    scope: &mut Scope<'a>,
    diags: &mut Vec<Diagnostic>,
) {
    match factor {
        TableFactor::Table { name, alias } => {
            let key = alias
                .as_ref()
                .map(|a| a.value.clone())
                .unwrap_or_else(|| name.base().value.clone());
            match schema.table(&name.base().value) {
                Some(table) => {
                    scope.aliases.insert(key.to_ascii_lowercase(), table);
                }
                None => diags.push(Diagnostic::table_not_found(name.to_string())),
            }
        }
        TableFactor::Derived { query, .. } => {
            // A derived table's own projection isn't attributed back to
            // schema columns (spec §9 open question); only its body is
            // validated, independently of the outer scope.
            diags.extend(validate_query(query, schema));
        }
    }
}

fn validate_select(select: &SelectStmt, schema: &Schema) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let scope = build_scope(select, schema, &mut diags);

    for item in &select.projection {
        match item {
            SelectItem::Expr(expr) | SelectItem::Aliased(expr, _) => {
                check_columns(expr, &scope, schema, &mut diags);
            }
            SelectItem::Wildcard | SelectItem::QualifiedWildcard(_) => {}
        }
    }

    for join in &select.joins {
        if let Some(on) = &join.on {
            check_boolean(on, &scope, schema, "JOIN ON", &mut diags);
        }
    }
    if let Some(selection) = &select.selection {
        check_boolean(selection, &scope, schema, "WHERE", &mut diags);
    }
    for expr in &select.group_by {
        check_columns(expr, &scope, schema, &mut diags);
    }
    if let Some(having) = &select.having {
        check_boolean(having, &scope, schema, "HAVING", &mut diags);
    }
    for item in &select.order_by {
        check_columns(&item.expr, &scope, schema, &mut diags);
    }

    diags
}

fn validate_insert(insert: &InsertStmt, schema: &Schema) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let Some(table) = schema.table(&insert.table.base().value) else {
        diags.push(Diagnostic::table_not_found(insert.table.to_string()));
        return diags;
    };

    let columns: Vec<&Column> = if !insert.columns.is_empty() {
        insert
            .columns
            .iter()
            .filter_map(|ident| match table.column(&ident.value) {
                Some(column) => Some(column),
                None => {
                    diags.push(Diagnostic::column_not_found(
                        ident.value.clone(),
                        Some(table.name.clone()),
                    ));
                    None
                }
            })
            .collect()
    } else {
        table.columns().iter().collect()
    };

    match &insert.source {
        InsertSource::DefaultValues => {}
        InsertSource::Query(query) => diags.extend(validate_query(query, schema)),
        InsertSource::Values(rows) => {
            let scope = Scope::empty();
            for row in rows {
                if row.len() != columns.len() {
                    diags.push(Diagnostic::column_count_mismatch(
                        table.name.clone(),
                        columns.len(),
                        row.len(),
                    ));
                    continue;
                }
                for (value, column) in row.iter().zip(columns.iter()) {
                    check_columns(value, &scope, schema, &mut diags);
                    if let Some(found) = infer_type(value, &scope, schema) {
                        if !column.data_type.is_compatible_with(found) {
                            if let Some(expected) = column.data_type.class {
                                diags.push(Diagnostic::type_mismatch(
                                    table.name.clone(),
                                    column.name.clone(),
                                    expected,
                                    found,
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    diags
}

fn validate_update(update: &UpdateStmt, schema: &Schema) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let Some(table) = schema.table(&update.table.base().value) else {
        diags.push(Diagnostic::table_not_found(update.table.to_string()));
        return diags;
    };
    let scope = Scope::single(table);

    for assignment in &update.assignments {
        match table.column(&assignment.column.value) {
            Some(column) => {
                check_columns(&assignment.value, &scope, schema, &mut diags);
                if let Some(found) = infer_type(&assignment.value, &scope, schema) {
                    if !column.data_type.is_compatible_with(found) {
                        if let Some(expected) = column.data_type.class {
                            diags.push(Diagnostic::type_mismatch(
                                table.name.clone(),
                                column.name.clone(),
                                expected,
                                found,
                            ));
                        }
                    }
                }
            }
            None => diags.push(Diagnostic::column_not_found(
                assignment.column.value.clone(),
                Some(table.name.clone()),
            )),
        }
    }

    if let Some(selection) = &update.selection {
        check_boolean(selection, &scope, schema, "WHERE", &mut diags);
    }

    diags
}

fn validate_delete(delete: &DeleteStmt, schema: &Schema) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let Some(table) = schema.table(&delete.table.base().value) else {
        diags.push(Diagnostic::table_not_found(delete.table.to_string()));
        return diags;
    };
    let scope = Scope::single(table);

    if let Some(selection) = &delete.selection {
        check_boolean(selection, &scope, schema, "WHERE", &mut diags);
    }

    diags
}

/// Recursively checks every column reference inside `expr` against `scope`,
/// recording a [`DiagnosticKind::ColumnNotFound`] for each that doesn't
/// resolve. Nested subqueries (`IN (SELECT ...)`, `EXISTS (...)`, scalar
/// subqueries) are validated independently against `schema`, not against
/// the enclosing scope (spec §9 open question on correlated references).
fn check_columns(expr: &Expr, scope: &Scope<'_>, schema: &Schema, diags: &mut Vec<Diagnostic>) {
    match expr {
        Expr::Column(column_ref) => {
            if scope.resolve_column(column_ref).is_none() {
                diags.push(Diagnostic::column_not_found(
                    column_ref.column().value.clone(),
                    column_ref.table().map(|t| t.value.clone()),
                ));
            }
        }
        Expr::Literal(_) | Expr::Wildcard | Expr::QualifiedWildcard(_) => {}
        Expr::Nested(inner) => check_columns(inner, scope, schema, diags),
        Expr::Unary(unary) => check_columns(&unary.expr, scope, schema, diags),
        Expr::Binary(binary) => {
            check_columns(&binary.left, scope, schema, diags);
            check_columns(&binary.right, scope, schema, diags);
        }
        Expr::Function(call) => {
            for arg in &call.args {
                check_columns(arg, scope, schema, diags);
            }
        }
        Expr::Cast(cast) => check_columns(&cast.expr, scope, schema, diags),
        Expr::Case(case) => {
            if let Some(operand) = &case.operand {
                check_columns(operand, scope, schema, diags);
            }
            for (when, then) in &case.when_then {
                check_columns(when, scope, schema, diags);
                check_columns(then, scope, schema, diags);
            }
            if let Some(else_result) = &case.else_result {
                check_columns(else_result, scope, schema, diags);
            }
        }
        Expr::Between(between) => {
            check_columns(&between.expr, scope, schema, diags);
            check_columns(&between.low, scope, schema, diags);
            check_columns(&between.high, scope, schema, diags);
        }
        Expr::In(in_expr) => {
            check_columns(&in_expr.expr, scope, schema, diags);
            match &in_expr.list {
                InList::Exprs(exprs) => {
                    for e in exprs {
                        check_columns(e, scope, schema, diags);
                    }
                }
                InList::Subquery(query) => diags.extend(validate_query(query, schema)),
            }
        }
        Expr::Exists(exists) => diags.extend(validate_query(&exists.subquery, schema)),
        Expr::Subquery(query) => diags.extend(validate_query(query, schema)),
    }
}

fn check_boolean(
    expr: &Expr,
    scope: &Scope<'_>,
    schema: &Schema,
    context: &str,
    diags: &mut Vec<Diagnostic>,
) {
    check_columns(expr, scope, schema, diags);
    if let Some(class) = infer_type(expr, scope, schema) {
        if class != TypeClass::Boolean {
            diags.push(Diagnostic::non_boolean_expression(context));
        }
    }
}

/// Infers the compatibility class of `expr`, per the rules in spec §4.5.
/// Returns `None` when the expression's type can't be determined (an
/// unresolved column, `NULL`, a wildcard, or an unrecognized function) —
/// callers treat `None` as "can't check", not as an error.
fn infer_type(expr: &Expr, scope: &Scope<'_>, schema: &Schema) -> Option<TypeClass> {
    match expr {
        Expr::Literal(Literal::Int(_)) | Expr::Literal(Literal::Float(_)) => {
            Some(TypeClass::Numeric)
        }
        Expr::Literal(Literal::String(_)) => Some(TypeClass::String),
        Expr::Literal(Literal::Boolean(_)) => Some(TypeClass::Boolean),
        Expr::Literal(Literal::Null) => None,
        Expr::Column(column_ref) => scope
            .resolve_column(column_ref)
            .and_then(|column| column.data_type.class),
        Expr::Nested(inner) => infer_type(inner, scope, schema),
        Expr::Unary(unary) => match unary.op {
            UnaryOp::Not => Some(TypeClass::Boolean),
            UnaryOp::Minus | UnaryOp::Plus => infer_type(&unary.expr, scope, schema),
        },
        Expr::Binary(binary) => match binary.op {
            BinaryOp::Or
            | BinaryOp::And
            | BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::Is
            | BinaryOp::IsNot
            | BinaryOp::Like
            | BinaryOp::NotLike => Some(TypeClass::Boolean),
            BinaryOp::Concat => Some(TypeClass::String),
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Multiply | BinaryOp::Divide
            | BinaryOp::Modulo => Some(TypeClass::Numeric),
        },
        Expr::Function(call) => infer_function(&call.name.base().value, &call.args, scope, schema),
        Expr::Cast(cast) => crate::data_type::classify(&cast.data_type.name),
        Expr::Case(case) => case
            .when_then
            .iter()
            .find_map(|(_, then)| infer_type(then, scope, schema))
            .or_else(|| {
                case.else_result
                    .as_ref()
                    .and_then(|e| infer_type(e, scope, schema))
            }),
        Expr::Between(_) | Expr::In(_) | Expr::Exists(_) => Some(TypeClass::Boolean),
        Expr::Wildcard | Expr::QualifiedWildcard(_) | Expr::Subquery(_) => None,
    }
}

fn infer_function(
    name: &str,
    args: &[Expr],
    scope: &Scope<'_>,
    schema: &Schema,
) -> Option<TypeClass> {
    match name.to_ascii_uppercase().as_str() {
        "COUNT" | "SUM" | "AVG" => Some(TypeClass::Numeric),
        "MAX" | "MIN" => args.first().and_then(|a| infer_type(a, scope, schema)),
        "UPPER" | "LOWER" | "TRIM" | "CONCAT" | "SUBSTRING" => Some(TypeClass::String),
        "NOW" | "CURRENT_TIMESTAMP" | "CURRENT_DATE" => Some(TypeClass::Temporal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::model::Table;
    use sqlens_core::Dialect;
    use sqlens_parser::parse_statement;

    fn sample_schema() -> Schema {
        let users = Table::new(
            "users",
            vec![
                Column {
                    name: "id".into(),
                    data_type: DataType::new("INT", false),
                    nullable: false,
                    primary_key: true,
                    unique: false,
                    foreign_key: None,
                    default: None,
                },
                Column {
                    name: "name".into(),
                    data_type: DataType::new("VARCHAR", true),
                    nullable: true,
                    primary_key: false,
                    unique: false,
                    foreign_key: None,
                    default: None,
                },
            ],
            Vec::new(),
            Vec::new(),
        );
        Schema::new("shop", vec![users])
    }

    fn parse(sql: &str) -> Statement {
        let dialect = Dialect::postgresql();
        parse_statement(&dialect, sql).unwrap()
    }

    #[test]
    fn flags_missing_table() {
        let schema = sample_schema();
        let stmt = parse("SELECT id FROM missing");
        let diags = validate(&stmt, &schema);
        assert!(diags.iter().any(|d| d.kind == DiagnosticKind::TableNotFound));
    }

    #[test]
    fn flags_missing_column() {
        let schema = sample_schema();
        let stmt = parse("SELECT id, invalid_col FROM users");
        let diags = validate(&stmt, &schema);
        assert_eq!(
            diags
                .iter()
                .filter(|d| d.kind == DiagnosticKind::ColumnNotFound)
                .count(),
            1
        );
        let diag = diags
            .iter()
            .find(|d| d.kind == DiagnosticKind::ColumnNotFound)
            .unwrap();
        assert_eq!(diag.column.as_deref(), Some("invalid_col"));
        assert_eq!(diag.table.as_deref(), Some("users"));
    }

    #[test]
    fn accepts_a_well_formed_select() {
        let schema = sample_schema();
        let stmt = parse("SELECT u.id, u.name FROM users u WHERE u.id > 1");
        let diags = validate(&stmt, &schema);
        assert!(diags.is_empty());
    }

    #[test]
    fn flags_non_boolean_where_clause() {
        let schema = sample_schema();
        let stmt = parse("SELECT id FROM users WHERE id");
        let diags = validate(&stmt, &schema);
        assert!(diags
            .iter()
            .any(|d| d.kind == DiagnosticKind::NonBooleanExpression));
    }

    #[test]
    fn flags_insert_arity_mismatch() {
        let schema = sample_schema();
        let stmt = parse("INSERT INTO users (id, name) VALUES (1)");
        let diags = validate(&stmt, &schema);
        assert!(diags
            .iter()
            .any(|d| d.kind == DiagnosticKind::ColumnCountMismatch));
    }

    #[test]
    fn flags_insert_type_mismatch() {
        let schema = sample_schema();
        let stmt = parse("INSERT INTO users (id, name) VALUES ('not a number', 'bob')");
        let diags = validate(&stmt, &schema);
        assert!(diags.iter().any(|d| d.kind == DiagnosticKind::TypeMismatch));
    }

    #[test]
    fn no_schema_produces_schema_not_loaded() {
        let stmt = parse("SELECT 1");
        let diags = validate_optional(&stmt, None);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::SchemaNotLoaded);
    }
}
