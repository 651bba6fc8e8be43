use std::fmt;

/// A syntactic data type as it appears in a `CAST`, a column definition, or a
/// function signature: a name plus whichever size arguments followed it.
///
/// This is deliberately not the schema's semantic `DataType` (which adds a
/// nullable flag and a compatibility class) — the AST only records what was
/// written, the schema model decides what it means.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataType {
    /// The type name as written, e.g. `"VARCHAR"`, `"NUMERIC"`, `"INT"`.
    pub name: String,
    /// A single size argument, e.g. the `10` in `VARCHAR(10)`.
    pub length: Option<u64>,
    /// The first argument of a two-argument type, e.g. the `10` in
    /// `NUMERIC(10, 2)`.
    pub precision: Option<u64>,
    /// The second argument of a two-argument type, e.g. the `2` in
    /// `NUMERIC(10, 2)`.
    pub scale: Option<u64>,
}

impl DataType {
    /// A bare type name with no size arguments.
    pub fn name(name: impl Into<String>) -> Self {
        DataType {
            name: name.into(),
            length: None,
            precision: None,
            scale: None,
        }
    }

    /// A type name with a single size argument, e.g. `VARCHAR(255)`.
    pub fn with_length(name: impl Into<String>, length: u64) -> Self {
        DataType {
            name: name.into(),
            length: Some(length),
            precision: None,
            scale: None,
        }
    }

    /// A type name with precision and scale, e.g. `NUMERIC(10, 2)`.
    pub fn with_precision_scale(name: impl Into<String>, precision: u64, scale: u64) -> Self {
        DataType {
            name: name.into(),
            length: None,
            precision: Some(precision),
            scale: Some(scale),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(len) = self.length {
            write!(f, "({len})")?;
        } else if let (Some(p), Some(s)) = (self.precision, self.scale) {
            write!(f, "({p}, {s})")?;
        } else if let Some(p) = self.precision {
            write!(f, "({p})")?;
        }
        Ok(())
    }
}
