use crate::dialect::{Token, TokenType};
use crate::lexer::scan::Pos;
use crate::parser::{Span, Spanned};

/// Tokens between two delimiters at block depth 0.
///
/// Leading comments are kept, the terminating delimiter is not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement<'input> {
    tokens: Vec<Token<'input>>,
    delimiter: Option<String>,
    sql: &'input str,
    raw: &'input str,
    start: Pos,
    end: Pos,
}

impl<'input> Statement<'input> {
    pub(crate) fn new(
        tokens: Vec<Token<'input>>,
        delimiter: Option<String>,
        sql: &'input str,
        raw: &'input str,
        start: Pos,
        end: Pos,
    ) -> Statement<'input> {
        debug_assert!(!tokens.is_empty());
        Statement {
            tokens,
            delimiter,
            sql,
            raw,
            start,
            end,
        }
    }

    /// Tokens in source order
    pub fn tokens(&self) -> &[Token<'input>] {
        &self.tokens
    }
    /// Give up ownership of the tokens
    pub fn into_tokens(self) -> Vec<Token<'input>> {
        self.tokens
    }
    /// Delimiter which terminated this statement,
    /// `None` for a last statement ended by the end of input
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }
    /// Source text without the delimiter
    pub fn sql(&self) -> &'input str {
        self.sql
    }
    /// Source text including the delimiter
    pub fn raw(&self) -> &'input str {
        self.raw
    }
    /// Position of the first token
    pub fn start(&self) -> Pos {
        self.start
    }
    /// Position just after the delimiter (or the last token)
    pub fn end(&self) -> Pos {
        self.end
    }
    /// First token which is not a comment
    pub fn first_keyword(&self) -> Option<&Token<'input>> {
        self.tokens
            .iter()
            .find(|t| t.token_type() != TokenType::Comment)
    }
}

impl Spanned for Statement<'_> {
    fn span(&self) -> Span {
        Span {
            start: self.start.offset,
            end: self.end.offset,
        }
    }
}
