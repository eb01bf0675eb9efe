//! Scanning state and scan output
use bitflags::bitflags;
use log::{debug, warn};

use crate::lexer::sql::{Depth, Error};

mod span;
mod stmt;

pub use span::{Span, Spanned};
pub use stmt::Statement;

bitflags! {
    /// Scan options
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ScanFlags: u8 {
        /// Scan version-gated comments (like `/*!50003 ... */`) as statement text
        const EXECUTE_DIRECTIVE_COMMENTS = 0x01;
        /// Fail instead of clamping when a depth would become negative
        const STRICT_DEPTH = 0x02;
        /// `"` quotes identifiers instead of strings (MySQL `ANSI_QUOTES` mode)
        const ANSI_QUOTES = 0x04;
    }
}

impl Default for ScanFlags {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::EXECUTE_DIRECTIVE_COMMENTS | Self::STRICT_DEPTH
        } else {
            Self::EXECUTE_DIRECTIVE_COMMENTS
        }
    }
}

/// Options set before a scan
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Initial delimiter, the dialect default when `None`
    pub delimiter: Option<String>,
    /// Scan options
    pub flags: ScanFlags,
}

/// Mutable state of one script scan.
///
/// Never shared between scans.
#[derive(Debug)]
pub struct Context {
    delimiter: String,
    default_delimiter: String,
    parens_depth: u32,
    block_depth: u32,
    in_statement: bool,
    flags: ScanFlags,
}

impl Context {
    /// Constructor
    pub fn new(default_delimiter: &str, flags: ScanFlags) -> Context {
        Context {
            delimiter: default_delimiter.to_owned(),
            default_delimiter: default_delimiter.to_owned(),
            parens_depth: 0,
            block_depth: 0,
            in_statement: false,
            flags,
        }
    }

    /// Active delimiter
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
    /// Replace the active delimiter
    pub fn set_delimiter(&mut self, delimiter: &str) {
        debug!(target: "parser", "delimiter: {:?} -> {:?}", self.delimiter, delimiter);
        delimiter.clone_into(&mut self.delimiter);
    }
    /// Restore the script-wide default delimiter
    pub fn reset_delimiter(&mut self) {
        if self.delimiter != self.default_delimiter {
            debug!(target: "parser", "reset delimiter to {:?}", self.default_delimiter);
            self.delimiter.clone_from(&self.default_delimiter);
        }
    }

    /// Current parenthesis nesting
    pub fn parens_depth(&self) -> u32 {
        self.parens_depth
    }
    /// On `(`
    pub fn increase_parens_depth(&mut self) {
        self.parens_depth += 1;
    }
    /// On `)`
    pub fn decrease_parens_depth(&mut self) -> Result<(), Error> {
        self.parens_depth = self.decrease(self.parens_depth, Depth::Parens)?;
        Ok(())
    }

    /// Current procedural block nesting
    pub fn block_depth(&self) -> u32 {
        self.block_depth
    }
    /// Enter a block
    pub fn increase_block_depth(&mut self) {
        self.block_depth += 1;
        debug!(target: "parser", "block depth: {}", self.block_depth);
    }
    /// Leave a block
    pub fn decrease_block_depth(&mut self) -> Result<(), Error> {
        self.block_depth = self.decrease(self.block_depth, Depth::Block)?;
        debug!(target: "parser", "block depth: {}", self.block_depth);
        Ok(())
    }

    fn decrease(&self, depth: u32, which: Depth) -> Result<u32, Error> {
        match depth.checked_sub(1) {
            Some(depth) => Ok(depth),
            None if self.flags.contains(ScanFlags::STRICT_DEPTH) => {
                Err(Error::NegativeDepth(which, None))
            }
            None => {
                warn!(target: "parser", "negative {} depth clamped to 0", which);
                Ok(0)
            }
        }
    }

    /// `true` once the current statement holds something other than comments
    pub fn in_statement(&self) -> bool {
        self.in_statement
    }
    pub(crate) fn set_in_statement(&mut self, in_statement: bool) {
        self.in_statement = in_statement;
    }

    /// Scan options
    pub fn flags(&self) -> ScanFlags {
        self.flags
    }
    /// Whether `"` quotes identifiers
    pub fn ansi_quotes(&self) -> bool {
        self.flags.contains(ScanFlags::ANSI_QUOTES)
    }
}

#[cfg(test)]
mod test {
    use super::{Context, ScanFlags};
    use crate::lexer::sql::{Depth, Error};

    #[test]
    fn strict_depth() {
        let mut ctx = Context::new(";", ScanFlags::STRICT_DEPTH);
        ctx.increase_block_depth();
        ctx.decrease_block_depth().unwrap();
        assert!(matches!(
            ctx.decrease_block_depth(),
            Err(Error::NegativeDepth(Depth::Block, None))
        ));
        assert!(matches!(
            ctx.decrease_parens_depth(),
            Err(Error::NegativeDepth(Depth::Parens, None))
        ));
    }

    #[test]
    fn clamped_depth() {
        let mut ctx = Context::new(";", ScanFlags::empty());
        ctx.decrease_block_depth().unwrap();
        assert_eq!(ctx.block_depth(), 0);
        ctx.decrease_parens_depth().unwrap();
        assert_eq!(ctx.parens_depth(), 0);
    }

    #[test]
    fn delimiter() {
        let mut ctx = Context::new(";", ScanFlags::default());
        ctx.set_delimiter("//");
        assert_eq!(ctx.delimiter(), "//");
        ctx.reset_delimiter();
        assert_eq!(ctx.delimiter(), ";");
    }
}
