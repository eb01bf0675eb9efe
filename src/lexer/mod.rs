//! Script tokenizer and splitter

pub mod scan;
pub mod sql;

pub use scan::{Pos, Reader, ScanError};
