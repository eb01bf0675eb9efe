//! MySQL / MariaDB scripts, as understood by the `mysql` command-line client
use std::borrow::Cow;

use log::debug;

use super::{
    is_delimiter, is_single_line_comment, keyword_is, keyword_token, last_token_is,
    string_literal, Dialect, GuardPhrase, Token, TokenType,
};
use crate::lexer::scan::{Pos, Reader};
use crate::lexer::sql::Error;
use crate::parser::Context;

const ALTERNATIVE_SINGLE_LINE_COMMENT: u8 = b'#';

// These words increase the block depth, unless preceded by END
// (END has already decreased it).
// See: https://dev.mysql.com/doc/refman/8.0/en/flow-control-statements.html
const CONTROL_FLOW_KEYWORDS: [&str; 5] = ["IF", "LOOP", "CASE", "REPEAT", "WHILE"];

// Same spelling for a function: `IF(cond, a, b)`, `REPEAT(str, count)`
const FUNCTION_KEYWORDS: [&str; 2] = ["IF", "REPEAT"];

static CREATE_IF_NOT_EXISTS: GuardPhrase =
    GuardPhrase::new("CREATE", 1, 2, &["IF", "NOT", "EXISTS"]);
static DROP_IF_EXISTS: GuardPhrase = GuardPhrase::new("DROP", 1, 2, &["IF", "EXISTS"]);

/// MySQL dialect
///
/// - `DELIMITER xyz` changes the delimiter until the next `DELIMITER`.
/// - `` ` `` quotes identifiers, `"` quotes strings (unless `ANSI_QUOTES`).
/// - `#` starts a comment, unless it is the delimiter.
/// - `/*!50003 ... */` is executable.
/// - `BEGIN ... END` and flow control statements are blocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn identifier_quote(&self) -> u8 {
        b'`'
    }

    fn alternative_identifier_quote(&self, ctx: &Context) -> Option<u8> {
        if ctx.ansi_quotes() {
            Some(b'"')
        } else {
            None
        }
    }

    fn alternative_string_literal_quote(&self, ctx: &Context) -> Option<u8> {
        if ctx.ansi_quotes() {
            None
        } else {
            Some(b'"')
        }
    }

    fn is_single_line_comment(&self, peek: &[u8], ctx: &Context, _col: usize) -> bool {
        is_single_line_comment(peek)
            // `DELIMITER #` wins over the comment
            || (peek.first() == Some(&ALTERNATIVE_SINGLE_LINE_COMMENT)
                && !is_delimiter(peek, ctx))
    }

    fn is_comment_directive(&self, peek: &[u8]) -> bool {
        peek.len() >= 8 && peek.starts_with(b"/*!") && peek[3..8].iter().all(u8::is_ascii_digit)
    }

    fn handle_keyword<'i>(
        &self,
        reader: &mut Reader<'i>,
        ctx: &mut Context,
        start: Pos,
        word: &'i str,
    ) -> Result<Token<'i>, Error> {
        // like the `mysql` client, only at the start of a statement
        if !ctx.in_statement() && keyword_is("DELIMITER", word) {
            let text = reader.read_until_end_of_line().trim();
            if text.is_empty() {
                return Err(Error::EmptyDelimiter(None));
            }
            ctx.set_delimiter(text);
            return Ok(Token::scanned(
                reader,
                TokenType::NewDelimiter,
                start,
                Some(Cow::Borrowed(text)),
                ctx.parens_depth(),
            ));
        }
        Ok(keyword_token(reader, ctx, start, word))
    }

    fn handle_string_literal<'i>(
        &self,
        reader: &mut Reader<'i>,
        ctx: &Context,
        start: Pos,
    ) -> Result<Token<'i>, Error> {
        string_literal(reader, ctx, start, true, Some(b'\\'))
    }

    fn handle_alternative_string_literal<'i>(
        &self,
        reader: &mut Reader<'i>,
        ctx: &Context,
        start: Pos,
    ) -> Result<Token<'i>, Error> {
        string_literal(reader, ctx, start, true, Some(b'\\'))
    }

    fn reset_delimiter(&self, _ctx: &mut Context) {
        // delimiter changes survive beyond a single statement
    }

    fn adjust_block_depth<'i>(
        &self,
        ctx: &mut Context,
        tokens: &[Token<'i>],
        keyword: &Token<'i>,
        reader: &Reader<'i>,
    ) -> Result<(), Error> {
        let Some(text) = keyword.text() else {
            return Ok(());
        };
        let parens_depth = keyword.parens_depth();

        if FUNCTION_KEYWORDS.contains(&text) && reader.peek(0) == Some(b'(') {
            // function call, not a block
            return Ok(());
        }
        let result = if ctx.block_depth() > 0
            && text == "EXISTS"
            && reader.peek_non_whitespace() == Some(b'(')
            && tokens.last().is_some_and(|t| t.text() == Some("IF"))
        {
            // IF EXISTS(SELECT ...): leave the block entered by the preceding IF
            ctx.decrease_block_depth()
        } else if text == "BEGIN"
            || (CONTROL_FLOW_KEYWORDS.contains(&text)
                && !last_token_is(tokens, parens_depth, "END"))
        {
            ctx.increase_block_depth();
            Ok(())
        } else if text == "END"
            || CREATE_IF_NOT_EXISTS.matches(tokens, keyword)
            || DROP_IF_EXISTS.matches(tokens, keyword)
        {
            ctx.decrease_block_depth()
        } else {
            Ok(())
        };
        debug!(target: "parser", "{} -> block depth {}", text, ctx.block_depth());
        result
    }
}
