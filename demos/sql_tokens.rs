use std::env;
use std::fs::read_to_string;

use sqlscript::dialect::{MySql, TokenType};
use sqlscript::lexer::sql::Parser;

/// Tokenize specified files (and do some checks)
fn main() {
    env_logger::init();
    let args = env::args();
    for arg in args.skip(1) {
        let script = match read_to_string(&arg) {
            Ok(script) => script,
            Err(err) => {
                eprintln!("Err: {err} in {arg}");
                continue;
            }
        };
        let mut parser = Parser::new(&script, MySql);
        loop {
            match parser.next_token() {
                Err(err) => {
                    eprintln!("Err: {err} in {arg}");
                    break;
                }
                Ok(token) => match token.token_type() {
                    TokenType::Eof => break,
                    TokenType::Keyword => {
                        debug_assert!(token
                            .text()
                            .is_some_and(|text| text.eq_ignore_ascii_case(token.raw())))
                    }
                    TokenType::Symbol => debug_assert_eq!(token.raw().chars().count(), 1),
                    TokenType::Numeric => {
                        debug_assert!(token.raw().starts_with(|c: char| c.is_ascii_digit()))
                    }
                    TokenType::NewDelimiter => {
                        println!("delimiter {:?} at {}", token.text(), token.pos())
                    }
                    _ => {
                        println!(
                            "{:?} {:?} at {} (parens: {})",
                            token.token_type(),
                            token.raw(),
                            token.pos(),
                            token.parens_depth()
                        );
                    }
                },
            }
        }
    }
}
