//! SQL dialects: token model, keyword table and the hooks a dialect overrides
use std::borrow::Cow;

use uncased::UncasedStr;

use crate::lexer::scan::{Pos, Reader};
use crate::lexer::sql::Error;
use crate::parser::{Context, Span, Spanned};

mod mysql;

pub use mysql::MySql;

include!(concat!(env!("OUT_DIR"), "/keywords.rs"));

/// Token classes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Word found in the keyword table
    Keyword,
    /// Any other word, quoted or not
    Identifier,
    /// String literal
    String,
    /// Number literal
    Numeric,
    /// Operator, parenthesis or any other punctuation
    Symbol,
    /// Single-line or multi-line comment
    Comment,
    /// Comment whose content is statement text (`/*!50003 ... */`)
    MultiLineCommentDirective,
    /// Current delimiter
    Delimiter,
    /// Delimiter redefinition directive
    NewDelimiter,
    /// End of input
    Eof,
}

/// One scanned lexical unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'input> {
    token_type: TokenType,
    pos: Pos,
    text: Option<Cow<'input, str>>,
    raw: &'input str,
    parens_depth: u32,
}

impl<'input> Token<'input> {
    /// Constructor
    pub fn new(
        token_type: TokenType,
        pos: Pos,
        text: Option<Cow<'input, str>>,
        raw: &'input str,
        parens_depth: u32,
    ) -> Token<'input> {
        Token {
            token_type,
            pos,
            text,
            raw,
            parens_depth,
        }
    }

    /// Token spanning from `start` to the current `reader` position
    pub fn scanned(
        reader: &Reader<'input>,
        token_type: TokenType,
        start: Pos,
        text: Option<Cow<'input, str>>,
        parens_depth: u32,
    ) -> Token<'input> {
        let raw = reader.slice(start.offset, reader.position().offset);
        Self::new(token_type, start, text, raw, parens_depth)
    }

    /// Token class
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }
    /// Position of the first char
    pub fn pos(&self) -> Pos {
        self.pos
    }
    /// Normalized text: upper case keyword, unquoted identifier, ...
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
    /// Source text
    pub fn raw(&self) -> &'input str {
        self.raw
    }
    /// Parenthesis depth when the token started
    pub fn parens_depth(&self) -> u32 {
        self.parens_depth
    }
    /// Check both class and normalized text
    pub fn is(&self, token_type: TokenType, text: &str) -> bool {
        self.token_type == token_type && self.text() == Some(text)
    }
    /// Keyword or identifier
    pub fn is_word(&self) -> bool {
        matches!(self.token_type, TokenType::Keyword | TokenType::Identifier)
    }
}

impl Spanned for Token<'_> {
    fn span(&self) -> Span {
        Span {
            start: self.pos.offset,
            end: self.pos.offset + self.raw.len(),
        }
    }
}

/// Canonical spelling of `word` if it is a keyword
pub fn keyword(word: &str) -> Option<&'static str> {
    if word.len() > MAX_KEYWORD_LEN || !word.is_ascii() {
        return None;
    }
    KEYWORDS.get(UncasedStr::new(word)).copied()
}

/// Case insensitive keyword comparison
pub fn keyword_is(expected: &str, word: &str) -> bool {
    expected.eq_ignore_ascii_case(word)
}

/// Check if `b` can start an unquoted word
pub fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b > b'\x7F'
}

/// Check if `b` can be part of an unquoted word
pub fn is_identifier_continue(b: u8) -> bool {
    b == b'$' || b.is_ascii_alphanumeric() || b == b'_' || b > b'\x7F'
}

/// Check if the active delimiter is a word (`GO`), which only matches
/// a whole word
pub fn is_word_delimiter(ctx: &Context) -> bool {
    ctx.delimiter()
        .as_bytes()
        .first()
        .is_some_and(|&b| is_identifier_start(b) || b.is_ascii_digit())
}

/// Check if the active delimiter is ahead
///
/// `GO` matches in `GO\n` but not in `GOAL`.
pub fn is_delimiter(peek: &[u8], ctx: &Context) -> bool {
    let delimiter = ctx.delimiter().as_bytes();
    if delimiter.is_empty() || !peek.starts_with(delimiter) {
        return false;
    }
    match (delimiter.last(), peek.get(delimiter.len())) {
        (Some(&last), Some(&next)) => {
            !(is_identifier_continue(last) && is_identifier_continue(next))
        }
        _ => true,
    }
}

/// ANSI single-line comment
pub fn is_single_line_comment(peek: &[u8]) -> bool {
    peek.starts_with(b"--")
}

/// Keyword or identifier token for a bare word
pub fn keyword_token<'i>(
    reader: &Reader<'i>,
    ctx: &Context,
    start: Pos,
    word: &'i str,
) -> Token<'i> {
    let (token_type, text) = match keyword(word) {
        Some(kw) => (TokenType::Keyword, Cow::Borrowed(kw)),
        None => (TokenType::Identifier, Cow::Borrowed(word)),
    };
    Token::scanned(reader, token_type, start, Some(text), ctx.parens_depth())
}

/// String literal starting at the quote ahead.
///
/// Content is not kept: only its extent matters for splitting.
pub fn string_literal<'i>(
    reader: &mut Reader<'i>,
    ctx: &Context,
    start: Pos,
    self_escape: bool,
    escape: Option<u8>,
) -> Result<Token<'i>, Error> {
    let quote = reader.remaining()[0];
    reader.consume(1);
    if reader
        .read_until_excluding_with_escape(quote, self_escape, escape)
        .is_none()
    {
        return Err(Error::UnterminatedLiteral(None));
    }
    reader.consume(1);
    Ok(Token::scanned(
        reader,
        TokenType::String,
        start,
        None,
        ctx.parens_depth(),
    ))
}

/// Quoted identifier starting at the quote ahead, doubled quote as escape
pub fn quoted_identifier<'i>(
    reader: &mut Reader<'i>,
    ctx: &Context,
    start: Pos,
) -> Result<Token<'i>, Error> {
    let quote = reader.remaining()[0];
    reader.consume(1);
    let name = reader
        .read_until_excluding_with_escape(quote, true, None)
        .ok_or(Error::UnterminatedLiteral(None))?;
    reader.consume(1);
    let q = char::from(quote);
    let text = if name.contains(q) {
        Cow::Owned(name.replace(&format!("{q}{q}"), &q.to_string()))
    } else {
        Cow::Borrowed(name)
    };
    Ok(Token::scanned(
        reader,
        TokenType::Identifier,
        start,
        Some(text),
        ctx.parens_depth(),
    ))
}

/// `/* ... */` comment
pub fn block_comment<'i>(
    reader: &mut Reader<'i>,
    ctx: &Context,
    start: Pos,
) -> Result<Token<'i>, Error> {
    reader.consume(2);
    reader
        .read_until_excluding(b"*/")
        .ok_or(Error::UnterminatedBlockComment(None))?;
    reader.consume(2);
    Ok(Token::scanned(
        reader,
        TokenType::Comment,
        start,
        None,
        ctx.parens_depth(),
    ))
}

/// Comment whose inner text is live statement content
pub fn comment_directive<'i>(
    reader: &mut Reader<'i>,
    ctx: &Context,
    start: Pos,
) -> Result<Token<'i>, Error> {
    reader.consume(2);
    let text = reader
        .read_until_excluding(b"*/")
        .ok_or(Error::UnterminatedBlockComment(None))?;
    reader.consume(2);
    Ok(Token::scanned(
        reader,
        TokenType::MultiLineCommentDirective,
        start,
        Some(Cow::Borrowed(text)),
        ctx.parens_depth(),
    ))
}

/// Closest previous token at the same parenthesis depth, comments skipped
pub fn previous_token<'a, 'i>(
    tokens: &'a [Token<'i>],
    parens_depth: u32,
) -> Option<&'a Token<'i>> {
    tokens
        .iter()
        .rev()
        .filter(|t| t.parens_depth() == parens_depth)
        .find(|t| t.token_type() != TokenType::Comment)
}

/// Check the text of the closest previous token at the same parenthesis depth
pub fn last_token_is(tokens: &[Token<'_>], parens_depth: u32, text: &str) -> bool {
    previous_token(tokens, parens_depth).is_some_and(|t| t.text() == Some(text))
}

/// Word sequence `head w{min_gap,max_gap} tail...` ending at the current keyword,
/// like `CREATE TABLE IF NOT EXISTS`.
#[derive(Debug)]
pub struct GuardPhrase {
    head: &'static str,
    min_gap: usize,
    max_gap: usize,
    tail: &'static [&'static str],
}

impl GuardPhrase {
    /// Constructor
    pub const fn new(
        head: &'static str,
        min_gap: usize,
        max_gap: usize,
        tail: &'static [&'static str],
    ) -> GuardPhrase {
        GuardPhrase {
            head,
            min_gap,
            max_gap,
            tail,
        }
    }

    /// Match over the words of `tokens` followed by `keyword`
    pub fn matches(&self, tokens: &[Token<'_>], keyword: &Token<'_>) -> bool {
        let mut words: Vec<&str> = tokens
            .iter()
            .filter(|t| t.is_word())
            .filter_map(Token::text)
            .collect();
        words.extend(keyword.text());
        if !words.ends_with(self.tail) {
            return false;
        }
        let before = words.len() - self.tail.len();
        (self.min_gap..=self.max_gap)
            .filter_map(|gap| before.checked_sub(gap + 1))
            .any(|i| words[i] == self.head)
    }
}

/// Decision points of the scanning engine.
///
/// Every method has the generic SQL behaviour as default.
pub trait Dialect {
    /// Delimiter used when a script does not say otherwise
    fn default_delimiter(&self) -> &str {
        ";"
    }

    /// Identifier quote
    fn identifier_quote(&self) -> u8 {
        b'"'
    }

    /// Second identifier quote
    fn alternative_identifier_quote(&self, _ctx: &Context) -> Option<u8> {
        None
    }

    /// Second string literal quote, in addition to `'`
    fn alternative_string_literal_quote(&self, _ctx: &Context) -> Option<u8> {
        None
    }

    /// Check if `b` starts a keyword or an unquoted identifier
    fn is_keyword_start(&self, b: u8) -> bool {
        is_identifier_start(b)
    }

    /// Check if `b` continues a keyword or an unquoted identifier
    fn is_keyword_part(&self, b: u8) -> bool {
        is_identifier_continue(b)
    }

    /// Check if a single-line comment starts at `peek` (found at column `col`)
    fn is_single_line_comment(&self, peek: &[u8], _ctx: &Context, _col: usize) -> bool {
        is_single_line_comment(peek)
    }

    /// Check if the `/*` comment at `peek` holds statement text
    fn is_comment_directive(&self, _peek: &[u8]) -> bool {
        false
    }

    /// Scan a comment accepted by [`Dialect::is_comment_directive`]
    fn handle_comment_directive<'i>(
        &self,
        reader: &mut Reader<'i>,
        ctx: &Context,
        start: Pos,
    ) -> Result<Token<'i>, Error> {
        comment_directive(reader, ctx, start)
    }

    /// Turn a bare word (already consumed) into a token
    fn handle_keyword<'i>(
        &self,
        reader: &mut Reader<'i>,
        ctx: &mut Context,
        start: Pos,
        word: &'i str,
    ) -> Result<Token<'i>, Error> {
        Ok(keyword_token(reader, ctx, start, word))
    }

    /// Scan a `'` string literal
    fn handle_string_literal<'i>(
        &self,
        reader: &mut Reader<'i>,
        ctx: &Context,
        start: Pos,
    ) -> Result<Token<'i>, Error> {
        string_literal(reader, ctx, start, true, None)
    }

    /// Scan a string literal quoted by [`Dialect::alternative_string_literal_quote`]
    fn handle_alternative_string_literal<'i>(
        &self,
        reader: &mut Reader<'i>,
        ctx: &Context,
        start: Pos,
    ) -> Result<Token<'i>, Error> {
        string_literal(reader, ctx, start, true, None)
    }

    /// Called before each statement
    fn reset_delimiter(&self, ctx: &mut Context) {
        ctx.reset_delimiter();
    }

    /// Called after each keyword with the tokens of the statement so far.
    /// `reader` is positioned just after `keyword`.
    fn adjust_block_depth<'i>(
        &self,
        _ctx: &mut Context,
        _tokens: &[Token<'i>],
        _keyword: &Token<'i>,
        _reader: &Reader<'i>,
    ) -> Result<(), Error> {
        Ok(())
    }
}

/// ANSI SQL without procedural blocks
#[derive(Clone, Copy, Debug, Default)]
pub struct Generic;

impl Dialect for Generic {}
