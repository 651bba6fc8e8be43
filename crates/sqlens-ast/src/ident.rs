use std::fmt;

/// An identifier, decomposed into its value and quote style.
///
/// Display preserves the original case and quoting; equality and hashing
/// compare case-sensitively on `value` — callers that need the spec's
/// case-insensitive comparison (table/column lookup) lowercase explicitly,
/// which is exactly what [`crate::SchemaKey`]-style lookups in
/// `sqlens-schema` do.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    /// The identifier text, without surrounding quotes.
    pub value: String,
    /// The quote character this identifier was written with, if any.
    pub quote: Option<char>,
}

impl Ident {
    /// An unquoted identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Ident {
            value: value.into(),
            quote: None,
        }
    }

    /// A quoted identifier.
    pub fn quoted(value: impl Into<String>, quote: char) -> Self {
        Ident {
            value: value.into(),
            quote: Some(quote),
        }
    }

    /// Case-insensitive comparison key, as used for schema lookups.
    pub fn to_lowercase(&self) -> String {
        self.value.to_ascii_lowercase()
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Ident::new(value)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quote {
            None => f.write_str(&self.value),
            Some(q) => write!(f, "{q}{}{}", self.value, closing_quote(q)),
        }
    }
}

fn closing_quote(open: char) -> char {
    match open {
        '[' => ']',
        other => other,
    }
}

/// A possibly multi-part name: `table`, `schema.table`, or
/// `schema.table.column`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectName(pub Vec<Ident>);

impl ObjectName {
    /// The last (unqualified) part of the name, e.g. the table name in
    /// `schema.table`.
    pub fn base(&self) -> &Ident {
        self.0.last().expect("ObjectName is never empty")
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::utils::display_separated(f, &self.0, ".")
    }
}
