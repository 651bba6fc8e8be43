//! # sqlens-core
//!
//! Core types shared by the rest of the SQLens toolkit: the keyword table
//! and the dialect registry (C1). Everything here is pure data -- no
//! parsing, no I/O, no per-dialect generics -- so it can be shared `'static`
//! across as many parallel parser instances as the caller likes.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod dialect;
mod keyword;

pub use self::{
    dialect::{get, AutoIncrementSyntax, Dialect, DialectName, ParameterMarker},
    keyword::Keyword,
};
