//! Script splitting engine.
//!
//! Tokens are scanned one by one, the dialect being consulted at each
//! decision point, and grouped into statements ended by the current
//! delimiter at block depth 0.
pub use fallible_iterator::FallibleIterator;
use log::debug;
use std::borrow::Cow;
use std::io::Read;

use crate::dialect::{self, Dialect, Token, TokenType};
use crate::lexer::scan::{Pos, Reader, ScanError};
use crate::parser::{Config, Context, ScanFlags, Span, Spanned, Statement};

mod error;
#[cfg(test)]
mod test;

pub use error::{Depth, Error};

/// Read a whole script.
///
/// An I/O failure is reported before a single statement is scanned.
pub fn read_script<R: Read>(mut input: R) -> Result<String, Error> {
    let mut script = String::new();
    input.read_to_string(&mut script)?;
    Ok(script)
}

/// Statement splitter for one script
pub struct Parser<'input, D: Dialect> {
    dialect: D,
    reader: Reader<'input>,
    ctx: Context,
    /// end of the last token
    last_end: Pos,
    /// EOF or error reached
    done: bool,
}

impl<'input, D: Dialect> Parser<'input, D> {
    /// Constructor with default options
    pub fn new(input: &'input str, dialect: D) -> Parser<'input, D> {
        Self::with_config(input, dialect, Config::default())
    }

    /// Constructor
    pub fn with_config(input: &'input str, dialect: D, config: Config) -> Parser<'input, D> {
        let delimiter = config
            .delimiter
            .as_deref()
            .unwrap_or_else(|| dialect.default_delimiter());
        let ctx = Context::new(delimiter, config.flags);
        Parser {
            dialect,
            reader: Reader::new(input),
            ctx,
            last_end: Pos::start(),
            done: false,
        }
    }

    /// Current position in the input
    pub fn position(&self) -> Pos {
        self.reader.position()
    }

    /// Scanning state
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Active dialect
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Scan the next token, whitespace is skipped.
    ///
    /// Block depth is not tracked at this level.
    pub fn next_token(&mut self) -> Result<Token<'input>, Error> {
        self.reader.read_while(|b| b.is_ascii_whitespace());
        let start = self.reader.position();
        let token = self.read_token(start).map_err(|mut err| {
            err.position(start);
            err
        })?;
        debug!(target: "scanner", "{:?} {:?} at {}", token.token_type(), token.raw(), start);
        if token.token_type() != TokenType::Eof {
            self.last_end = self.reader.position();
        }
        Ok(token)
    }

    fn read_token(&mut self, start: Pos) -> Result<Token<'input>, Error> {
        let reader = &mut self.reader;
        let ctx = &mut self.ctx;
        let dialect = &self.dialect;
        let peek = reader.remaining();
        let Some(&c) = peek.first() else {
            return Ok(Token::new(TokenType::Eof, start, None, "", ctx.parens_depth()));
        };
        if dialect.alternative_string_literal_quote(ctx) == Some(c) {
            return dialect.handle_alternative_string_literal(reader, ctx, start);
        }
        if c == b'\'' {
            return dialect.handle_string_literal(reader, ctx, start);
        }
        if c == b'(' {
            let depth = ctx.parens_depth();
            ctx.increase_parens_depth();
            return Ok(symbol(reader, start, depth));
        }
        if c == b')' {
            ctx.decrease_parens_depth()?;
            // same depth as the matching `(`
            return Ok(symbol(reader, start, ctx.parens_depth()));
        }
        if c == dialect.identifier_quote() || dialect.alternative_identifier_quote(ctx) == Some(c)
        {
            return dialect::quoted_identifier(reader, ctx, start);
        }
        if dialect.is_single_line_comment(peek, ctx, start.column) {
            reader.read_until_end_of_line();
            return Ok(Token::scanned(
                reader,
                TokenType::Comment,
                start,
                None,
                ctx.parens_depth(),
            ));
        }
        if reader.starts_with(b"/*") {
            if ctx.flags().contains(ScanFlags::EXECUTE_DIRECTIVE_COMMENTS)
                && dialect.is_comment_directive(peek)
            {
                return dialect.handle_comment_directive(reader, ctx, start);
            }
            return dialect::block_comment(reader, ctx, start);
        }
        if dialect::is_delimiter(peek, ctx) {
            let delimiter = reader.read(ctx.delimiter().len());
            return Ok(Token::new(
                TokenType::Delimiter,
                start,
                Some(Cow::Borrowed(delimiter)),
                delimiter,
                ctx.parens_depth(),
            ));
        }
        if c.is_ascii_digit() {
            let number = read_part(reader, ctx, |b| {
                b.is_ascii_alphanumeric() || b == b'.' || b == b'_'
            });
            return Ok(Token::new(
                TokenType::Numeric,
                start,
                Some(Cow::Borrowed(number)),
                number,
                ctx.parens_depth(),
            ));
        }
        if dialect.is_keyword_start(c) {
            let word = read_part(reader, ctx, |b| dialect.is_keyword_part(b));
            return dialect.handle_keyword(reader, ctx, start, word);
        }
        Ok(symbol(reader, start, ctx.parens_depth()))
    }

    fn next_statement(&mut self) -> Result<Option<Statement<'input>>, Error> {
        self.dialect.reset_delimiter(&mut self.ctx);
        self.ctx.set_in_statement(false);
        let mut tokens: Vec<Token<'input>> = Vec::new();
        loop {
            let token = self.next_token()?;
            match token.token_type() {
                TokenType::Eof => {
                    self.done = true;
                    if self.ctx.block_depth() > 0 {
                        return Err(Error::UnterminatedBlock(
                            self.ctx.block_depth(),
                            Some(token.pos()),
                        ));
                    }
                    if !self.ctx.in_statement() {
                        // nothing or only comments
                        return Ok(None);
                    }
                    return Ok(Some(self.statement(tokens, None)));
                }
                TokenType::NewDelimiter => {
                    debug!(target: "parser", "new delimiter {:?} at {}", token.text(), token.pos());
                    // comments before the directive belong to no statement
                    tokens.clear();
                    continue;
                }
                TokenType::Delimiter if self.ctx.block_depth() == 0 => {
                    if !self.ctx.in_statement() {
                        debug!(target: "parser", "empty statement at {}", token.pos());
                        tokens.clear();
                        continue;
                    }
                    return Ok(Some(self.statement(tokens, Some(token.raw().to_owned()))));
                }
                TokenType::Keyword => {
                    self.dialect
                        .adjust_block_depth(&mut self.ctx, &tokens, &token, &self.reader)
                        .map_err(|mut err| {
                            err.position(token.pos());
                            err
                        })?;
                }
                _ => {}
            }
            if token.token_type() != TokenType::Comment {
                self.ctx.set_in_statement(true);
            }
            tokens.push(token);
        }
    }

    fn statement(
        &self,
        tokens: Vec<Token<'input>>,
        delimiter: Option<String>,
    ) -> Statement<'input> {
        let start = tokens[0].pos();
        let span = tokens
            .iter()
            .fold(Span::empty(), |span, token| span.union(&token.span()));
        let end = self.last_end;
        let sql = self.reader.slice(span.start, span.end);
        let raw = self.reader.slice(start.offset, end.offset);
        debug!(target: "parser", "statement from {} to {}, delimiter: {:?}",
            start, end, delimiter);
        Statement::new(tokens, delimiter, sql, raw, start, end)
    }
}

impl<'input, D: Dialect> FallibleIterator for Parser<'input, D> {
    type Item = Statement<'input>;
    type Error = Error;

    fn next(&mut self) -> Result<Option<Statement<'input>>, Error> {
        if self.done {
            return Ok(None);
        }
        let result = self.next_statement();
        if result.is_err() {
            // no recovery inside a script
            self.done = true;
        }
        result
    }
}

/// Split `input` into statements
pub fn split<D: Dialect>(input: &str, dialect: D) -> Result<Vec<Statement<'_>>, Error> {
    Parser::new(input, dialect).collect()
}

fn symbol<'input>(reader: &mut Reader<'input>, start: Pos, parens_depth: u32) -> Token<'input> {
    let symbol = reader.read_char();
    Token::new(
        TokenType::Symbol,
        start,
        Some(Cow::Borrowed(symbol)),
        symbol,
        parens_depth,
    )
}

/// Consume the first byte then bytes while `f` holds,
/// stopping before the delimiter (`a$$` with `$$` as delimiter).
/// A word delimiter never cuts a word (`CATEGORY` with `GO`).
fn read_part<'input, F: Fn(u8) -> bool>(
    reader: &mut Reader<'input>,
    ctx: &Context,
    f: F,
) -> &'input str {
    let data = reader.remaining();
    let delimiter = ctx.delimiter().as_bytes();
    let inside_word = !delimiter.is_empty() && !dialect::is_word_delimiter(ctx);
    let mut len = 1;
    while let Some(&b) = data.get(len) {
        if !f(b) || (inside_word && data[len..].starts_with(delimiter)) {
            break;
        }
        len += 1;
    }
    reader.read(len)
}
