//! SQL script splitter aware of runtime delimiters, procedural blocks,
//! dialect quoting and executable comments.
#![warn(missing_docs)]

pub mod dialect;
pub mod lexer;
pub mod parser;

pub use lexer::sql::{split, Error, Parser};
