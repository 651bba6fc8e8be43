use std::fmt;

/// The four type-compatibility equivalence classes used by the validator
/// (spec §3, §4.5): two columns/expressions type-check against each other
/// iff they share a class, regardless of their exact syntactic type name.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TypeClass {
    /// `INT`, `NUMERIC`, `FLOAT`, ...
    Numeric,
    /// `VARCHAR`, `CHAR`, `TEXT`, ...
    String,
    /// `DATE`, `TIME`, `TIMESTAMP`, ...
    Temporal,
    /// `BOOLEAN`/`BOOL`/`BIT`.
    Boolean,
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeClass::Numeric => "NUMERIC",
            TypeClass::String => "STRING",
            TypeClass::Temporal => "TEMPORAL",
            TypeClass::Boolean => "BOOLEAN",
        })
    }
}

/// A resolved column type: the syntactic name as declared, its
/// compatibility class, and whether the column accepts `NULL`.
///
/// This is distinct from [`sqlens_ast::DataType`], which only records what
/// was written in source; this type additionally carries the nullable flag
/// and the class the validator actually checks against.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataType {
    /// The type name as declared in the schema document, e.g. `"VARCHAR"`.
    pub name: String,
    /// The compatibility class this name maps to, if recognized.
    pub class: Option<TypeClass>,
    /// Whether the column accepts `NULL`.
    pub nullable: bool,
}

impl DataType {
    /// Builds a [`DataType`] from a syntactic type name, classifying it via
    /// [`classify`].
    pub fn new(name: impl Into<String>, nullable: bool) -> Self {
        let name = name.into();
        let class = classify(&name);
        DataType {
            name,
            class,
            nullable,
        }
    }

    /// Whether `self` and `other` may be compared/assigned to one another.
    /// An unrecognized type name (`class` is `None`) is never flagged
    /// incompatible — the validator can't classify it, so it stays silent
    /// rather than guess.
    pub fn is_compatible_with(&self, other: TypeClass) -> bool {
        match self.class {
            Some(class) => class == other,
            None => true,
        }
    }
}

/// Classifies a syntactic type name into one of the four equivalence
/// classes. Matching is case-insensitive and covers the common spellings
/// across the five built-in dialects; an unrecognized name yields `None`
/// rather than a guess.
pub fn classify(name: &str) -> Option<TypeClass> {
    let upper = name.to_ascii_uppercase();
    let upper = upper.as_str();
    match upper {
        "INT" | "INTEGER" | "SMALLINT" | "BIGINT" | "TINYINT" | "NUMERIC" | "DECIMAL"
        | "FLOAT" | "REAL" | "DOUBLE" | "DOUBLE PRECISION" | "MONEY" | "NUMBER" => {
            Some(TypeClass::Numeric)
        }
        "VARCHAR" | "CHAR" | "NVARCHAR" | "NCHAR" | "TEXT" | "CLOB" | "STRING" | "VARCHAR2" => {
            Some(TypeClass::String)
        }
        "DATE" | "TIME" | "TIMESTAMP" | "DATETIME" | "DATETIME2" | "TIMESTAMPTZ" => {
            Some(TypeClass::Temporal)
        }
        "BOOLEAN" | "BOOL" | "BIT" => Some(TypeClass::Boolean),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_names_case_insensitively() {
        assert_eq!(classify("varchar"), Some(TypeClass::String));
        assert_eq!(classify("INT"), Some(TypeClass::Numeric));
        assert_eq!(classify("Timestamp"), Some(TypeClass::Temporal));
        assert_eq!(classify("BIT"), Some(TypeClass::Boolean));
    }

    #[test]
    fn unrecognized_name_is_compatible_with_anything() {
        let unknown = DataType::new("GEOGRAPHY", true);
        assert!(unknown.is_compatible_with(TypeClass::Numeric));
        assert!(unknown.is_compatible_with(TypeClass::Boolean));
    }

    #[test]
    fn recognized_name_rejects_other_classes() {
        let varchar = DataType::new("VARCHAR", true);
        assert!(varchar.is_compatible_with(TypeClass::String));
        assert!(!varchar.is_compatible_with(TypeClass::Numeric));
    }
}
