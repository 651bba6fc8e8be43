//! The shared SQL keyword set.
//!
//! All five dialects draw from one flat keyword table; a dialect does not
//! get its own `Keyword` type (the teacher's `usql-core` defines one
//! per-dialect enum via `define_keyword!`). Whether a given keyword is
//! *reserved* for a dialect is a property of the [`Dialect`](crate::Dialect)
//! descriptor, not of the keyword enum itself.

use core::fmt;

macro_rules! define_keywords {
    ($($ident:ident),* $(,)?) => {
        /// A recognized SQL keyword, shared across all dialects.
        #[allow(non_camel_case_types)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum Keyword {
            $($ident),*
        }

        /// `(uppercase spelling, variant)` pairs, sorted by spelling so that
        /// [`Keyword::lookup`] can binary-search them.
        static KEYWORDS: &[(&str, Keyword)] = &[
            $((stringify!($ident), Keyword::$ident)),*
        ];
    };
}

define_keywords! {
    ACTION, ADD, ALL, ALTER, AND, ANY, AS, ASC,
    AUTOINCREMENT, AUTO_INCREMENT, BEGIN, BETWEEN, BY, CASCADE, CASE, CAST,
    CATCH, CHANGE, CLOSE, COLUMN, COMMIT, CONSTRAINT, CONTINUE, CREATE,
    CROSS, CURRENT, CURRENT_DATE, CURRENT_TIMESTAMP, DATABASE, DEALLOCATE, DECLARE, DEFAULT,
    DELETE, DESC, DISTINCT, DO, DROP, ELSE, ELSEIF, ELSIF,
    END, ESCAPE, EXCEPT, EXISTS, EXIT, EXPLAIN, FALSE, FETCH,
    FOLLOWING, FOR, FOREIGN, FROM, FULL, FUNCTION, GROUP, HAVING,
    IDENTITY, IF, IN, INDEX, INNER, INSERT, INTERSECT, INTO,
    IS, ITERATE, JOIN, KEY, LEFT, LIKE, LIMIT, LOOP,
    MATCHED, MATERIALIZED, MERGE, MODIFY, NO, NOT, NULL, OFFSET,
    ON, OPEN, OR, ORDER, OUTER, OVER, PARTITION, PRECEDING,
    PRIMARY, PROCEDURE, RAISE, RANGE, RECURSIVE, REFERENCES, RELEASE, REPEAT,
    REPLACE, RESTRICT, RETURN, RETURNING, REVERSE, RIGHT, ROLLBACK, ROW,
    ROWNUM, ROWS, SAVEPOINT, SCHEMA, SELECT, SERIAL, SET, SIGNAL,
    SOURCE, START, STEP, TABLE, TARGET, THEN, THROW, TO, TOP, TRIGGER,
    TRUE, TRY, UNBOUNDED, UNION, UNIQUE, UNTIL, UPDATE, USING,
    VALUES, VIEW, WHEN, WHERE, WHILE, WITH,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (text, _) = KEYWORDS
            .iter()
            .find(|(_, kw)| kw == self)
            .expect("every Keyword variant has a KEYWORDS entry");
        f.write_str(text)
    }
}

impl Keyword {
    /// Looks up a keyword by its (case-insensitive) spelling.
    ///
    /// Returns `None` for ordinary identifiers. This does not consult any
    /// dialect's reserved-word set — the caller decides whether the match
    /// should be treated as a keyword or as a plain identifier.
    pub fn lookup(word: &str) -> Option<Keyword> {
        let upper = word.to_ascii_uppercase();
        KEYWORDS
            .binary_search_by(|(text, _)| text.cmp(&upper.as_str()))
            .ok()
            .map(|idx| KEYWORDS[idx].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_table_is_sorted() {
        for pair in KEYWORDS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Keyword::lookup("select"), Some(Keyword::SELECT));
        assert_eq!(Keyword::lookup("SeLeCt"), Some(Keyword::SELECT));
        assert_eq!(Keyword::lookup("not_a_keyword"), None);
    }

    #[test]
    fn display_round_trips_spelling() {
        assert_eq!(Keyword::AUTO_INCREMENT.to_string(), "AUTO_INCREMENT");
    }
}
