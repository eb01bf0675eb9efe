use std::error;
use std::fmt;
use std::io;

use crate::lexer::scan::{Pos, ScanError};

/// Depth counter which went below zero
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Depth {
    /// Parenthesis nesting
    Parens,
    /// Procedural block nesting
    Block,
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parens => f.write_str("parenthesis"),
            Self::Block => f.write_str("block"),
        }
    }
}

/// Script scanning errors
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// I/O Error
    Io(io::Error),
    /// Missing quote or double-quote or backtick
    UnterminatedLiteral(Option<Pos>),
    /// Missing `*/`
    UnterminatedBlockComment(Option<Pos>),
    /// End of input reached inside a procedural block
    UnterminatedBlock(u32, Option<Pos>),
    /// Unbalanced `)` or block terminator
    NegativeDepth(Depth, Option<Pos>),
    /// `DELIMITER` directive without a value
    EmptyDelimiter(Option<Pos>),
}

fn at(pos: &Option<Pos>) -> String {
    match pos {
        Some(pos) => format!(" at {pos}"),
        None => String::new(),
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(ref err) => err.fmt(f),
            Self::UnterminatedLiteral(pos) => {
                write!(f, "non-terminated literal{}", at(pos))
            }
            Self::UnterminatedBlockComment(pos) => {
                write!(f, "non-terminated block comment{}", at(pos))
            }
            Self::UnterminatedBlock(depth, pos) => {
                write!(f, "{depth} non-terminated block(s){}", at(pos))
            }
            Self::NegativeDepth(depth, pos) => {
                write!(f, "negative {depth} depth{}", at(pos))
            }
            Self::EmptyDelimiter(pos) => write!(f, "empty delimiter{}", at(pos)),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl Error {
    /// Where the error occurred
    pub fn pos(&self) -> Option<Pos> {
        match *self {
            Self::Io(_) => None,
            Self::UnterminatedLiteral(pos) => pos,
            Self::UnterminatedBlockComment(pos) => pos,
            Self::UnterminatedBlock(_, pos) => pos,
            Self::NegativeDepth(_, pos) => pos,
            Self::EmptyDelimiter(pos) => pos,
        }
    }
}

impl ScanError for Error {
    fn position(&mut self, p: Pos) {
        let pos = match *self {
            Self::Io(_) => return,
            Self::UnterminatedLiteral(ref mut pos) => pos,
            Self::UnterminatedBlockComment(ref mut pos) => pos,
            Self::UnterminatedBlock(_, ref mut pos) => pos,
            Self::NegativeDepth(_, ref mut pos) => pos,
            Self::EmptyDelimiter(ref mut pos) => pos,
        };
        // the innermost location is the most precise one
        if pos.is_none() {
            *pos = Some(p);
        }
    }
}
