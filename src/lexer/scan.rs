//! Lookahead reader over a script.
//!
//! Adaptation of the growable-buffer scanner: instead of handing byte slices
//! to a split function, the reader exposes peek/consume primitives so that
//! dialect hooks can drive it directly.

use log::debug;
use memchr::{memchr2, memchr3, memmem};

use std::error::Error;
use std::fmt;
use std::io;

/// Position in the input: byte offset, 1-based line and 1-based column
/// (counted in chars, not bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    /// byte offset in input
    pub offset: usize,
    /// line number
    pub line: u64,
    /// column number
    pub column: usize,
}

impl Pos {
    /// Position of the first char of an input
    pub const fn start() -> Pos {
        Pos {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line: {}, column: {}", self.line, self.column)
    }
}

/// Error which can be located in the input
pub trait ScanError: Error + From<io::Error> + Sized {
    /// Set the position where the error occurred, if not already set
    fn position(&mut self, p: Pos);
}

/// Character source with arbitrary lookahead.
///
/// All returned slices borrow from the input.
pub struct Reader<'input> {
    input: &'input str,
    /// current byte offset
    offset: usize,
    /// current line number
    line: u64,
    /// current column number (char offset, not byte offset)
    column: usize,
}

impl<'input> Reader<'input> {
    /// Constructor
    pub fn new(input: &'input str) -> Reader<'input> {
        Reader {
            input,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current position
    pub fn position(&self) -> Pos {
        Pos {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Unprocessed input
    pub fn remaining(&self) -> &'input [u8] {
        &self.input.as_bytes()[self.offset..]
    }

    /// Byte at `n` positions ahead, `None` past the end
    pub fn peek(&self, n: usize) -> Option<u8> {
        self.remaining().get(n).copied()
    }

    /// First byte ahead which is not ASCII whitespace
    pub fn peek_non_whitespace(&self) -> Option<u8> {
        self.remaining()
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .copied()
    }

    /// Check if the unprocessed input starts with `prefix`
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// Input text between two byte offsets
    pub fn slice(&self, start: usize, end: usize) -> &'input str {
        &self.input[start..end]
    }

    /// Consume `amt` bytes of the input.
    pub fn consume(&mut self, amt: usize) {
        debug!(target: "scanner", "consume({})", amt);
        let end = self.offset + amt;
        debug_assert!(end <= self.input.len());
        debug_assert!(self.input.is_char_boundary(end));
        for byte in &self.input.as_bytes()[self.offset..end] {
            if *byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if *byte & 0xC0 != 0x80 {
                // UTF-8 continuation bytes do not start a new char
                self.column += 1;
            }
        }
        self.offset = end;
    }

    /// Consume and return the next `amt` bytes
    pub fn read(&mut self, amt: usize) -> &'input str {
        let start = self.offset;
        self.consume(amt);
        self.slice(start, self.offset)
    }

    /// Consume the next char whatever its encoded length
    pub fn read_char(&mut self) -> &'input str {
        let len = self.input[self.offset..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        self.read(len)
    }

    /// Consume bytes while `f` holds
    pub fn read_while<F: Fn(u8) -> bool>(&mut self, f: F) -> &'input str {
        let len = self
            .remaining()
            .iter()
            .position(|&b| !f(b))
            .unwrap_or_else(|| self.remaining().len());
        self.read(len)
    }

    /// Consume up to (but excluding) the end of the current line
    pub fn read_until_end_of_line(&mut self) -> &'input str {
        let data = self.remaining();
        let len = memchr2(b'\n', b'\r', data).unwrap_or(data.len());
        self.read(len)
    }

    /// Consume up to (but excluding) `pattern`.
    ///
    /// Returns `None`, without consuming anything, when `pattern` is missing.
    pub fn read_until_excluding(&mut self, pattern: &[u8]) -> Option<&'input str> {
        let len = memmem::find(self.remaining(), pattern)?;
        Some(self.read(len))
    }

    /// Consume up to (but excluding) the first unescaped `terminator`.
    ///
    /// A byte following `escape` is skipped. With `self_escape`, a doubled
    /// `terminator` stands for itself.
    /// Returns `None`, without consuming anything, when no terminator is found.
    pub fn read_until_excluding_with_escape(
        &mut self,
        terminator: u8,
        self_escape: bool,
        escape: Option<u8>,
    ) -> Option<&'input str> {
        let data = self.remaining();
        let esc = escape.unwrap_or(terminator);
        let mut i = 0;
        let end = loop {
            // `esc == terminator` when there is no escape char
            let j = i + memchr3(terminator, esc, terminator, &data[i..])?;
            if escape.is_some() && data[j] == esc {
                i = j + 2;
            } else if self_escape && data.get(j + 1) == Some(&terminator) {
                i = j + 2;
            } else {
                break j;
            }
            if i >= data.len() {
                return None;
            }
        };
        Some(self.read(end))
    }
}

impl<'input> fmt::Debug for Reader<'input> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("offset", &self.offset)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}
