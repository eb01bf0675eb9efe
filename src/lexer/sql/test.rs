use fallible_iterator::FallibleIterator;
use std::io;

use super::{read_script, split, Depth, Error, Parser};
use crate::dialect::{Generic, MySql, TokenType};
use crate::lexer::scan::Pos;
use crate::parser::{Config, ScanFlags};

fn sqls<'a>(stmts: &[crate::parser::Statement<'a>]) -> Vec<&'a str> {
    stmts.iter().map(|s| s.sql()).collect()
}

fn with_flags(flags: ScanFlags) -> Config {
    Config {
        delimiter: None,
        flags,
    }
}

#[test]
fn delimiters_outside_quotes_and_comments() {
    let sql = "SELECT 1;\nSELECT ';' AS s; -- ; not here\nSELECT /* ; */ 3;\n";
    let stmts = split(sql, Generic).unwrap();
    assert_eq!(
        sqls(&stmts),
        [
            "SELECT 1",
            "SELECT ';' AS s",
            "-- ; not here\nSELECT /* ; */ 3"
        ]
    );
    assert!(stmts.iter().all(|s| s.delimiter() == Some(";")));
}

#[test]
fn last_statement_without_delimiter() {
    let stmts = split("SELECT 'it''s;'; SELECT 2", Generic).unwrap();
    assert_eq!(sqls(&stmts), ["SELECT 'it''s;'", "SELECT 2"]);
    assert_eq!(stmts[1].delimiter(), None);
}

#[test]
fn empty_statements_are_skipped() {
    let stmts = split(";; -- only a comment\n; SELECT 1;;", Generic).unwrap();
    assert_eq!(sqls(&stmts), ["SELECT 1"]);
    assert!(split("  -- nothing\n", Generic).unwrap().is_empty());
}

#[test]
fn token_depths() {
    let mut parser = Parser::new("a(b) 'x' -- c", Generic);
    let mut tokens = Vec::new();
    loop {
        let token = parser.next_token().unwrap();
        if token.token_type() == TokenType::Eof {
            break;
        }
        tokens.push((token.token_type(), token.text().map(str::to_owned), token.parens_depth()));
    }
    assert_eq!(
        tokens,
        [
            (TokenType::Identifier, Some("a".to_owned()), 0),
            (TokenType::Symbol, Some("(".to_owned()), 0),
            (TokenType::Identifier, Some("b".to_owned()), 1),
            (TokenType::Symbol, Some(")".to_owned()), 0),
            (TokenType::String, None, 0),
            (TokenType::Comment, None, 0),
        ]
    );
}

#[test]
fn delimiter_directive() {
    let sql = "DELIMITER //
CREATE PROCEDURE p()
BEGIN
  SELECT 1;
END//
SELECT 2//
DELIMITER ;
SELECT 3;
";
    let stmts = split(sql, MySql).unwrap();
    assert_eq!(stmts.len(), 3);
    assert_eq!(
        stmts[0].sql(),
        "CREATE PROCEDURE p()\nBEGIN\n  SELECT 1;\nEND"
    );
    assert_eq!(
        stmts.iter().map(|s| s.delimiter()).collect::<Vec<_>>(),
        [Some("//"), Some("//"), Some(";")]
    );
    assert_eq!(stmts[2].sql(), "SELECT 3");
}

#[test]
fn dollar_delimiter() {
    let sql = "DELIMITER $$
CREATE FUNCTION f() RETURNS INT BEGIN RETURN 1; END$$
DELIMITER ;
";
    let stmts = split(sql, MySql).unwrap();
    assert_eq!(
        sqls(&stmts),
        ["CREATE FUNCTION f() RETURNS INT BEGIN RETURN 1; END"]
    );
    assert_eq!(stmts[0].delimiter(), Some("$$"));
}

#[test]
fn procedure_is_one_statement() {
    let mut parser = Parser::new(
        "CREATE PROCEDURE p() BEGIN SELECT 1; SELECT 2; END;",
        MySql,
    );
    let stmt = parser.next().unwrap().unwrap();
    assert_eq!(stmt.sql(), "CREATE PROCEDURE p() BEGIN SELECT 1; SELECT 2; END");
    assert_eq!(parser.context().block_depth(), 0);
    assert!(parser.next().unwrap().is_none());
}

#[test]
fn if_block_and_if_function() {
    let sql = "CREATE PROCEDURE p(x INT) BEGIN \
               IF (x > 0) THEN SELECT 1; END IF; \
               SELECT IF(x, 1, 2); \
               END;\nSELECT 3;";
    let stmts = split(sql, MySql).unwrap();
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[1].sql(), "SELECT 3");

    let stmts = split("SELECT IF(a, 1, 2); SELECT REPEAT('ab', 3); SELECT 3;", MySql).unwrap();
    assert_eq!(stmts.len(), 3);
}

#[test]
fn loops_and_case() {
    let sql = "CREATE PROCEDURE p() BEGIN
  l: LOOP LEAVE l; END LOOP l;
  WHILE 1 DO SELECT 1; END WHILE;
  REPEAT SELECT 1; UNTIL 1 END REPEAT;
  CASE 1 WHEN 1 THEN SELECT 1; ELSE SELECT 2; END CASE;
END;
SELECT CASE WHEN a THEN 1 ELSE 2 END FROM t;
SELECT 3;";
    let stmts = split(sql, MySql).unwrap();
    assert_eq!(stmts.len(), 3);
    assert_eq!(stmts[2].sql(), "SELECT 3");
}

#[test]
fn guard_phrases_do_not_open_blocks() {
    let sql = "CREATE TABLE IF NOT EXISTS t (id INT);
CREATE TEMPORARY TABLE IF NOT EXISTS u (id INT);
DROP TABLE IF EXISTS t;
SELECT 1;";
    let mut parser = Parser::new(sql, MySql);
    let mut count = 0;
    while parser.next().unwrap().is_some() {
        assert_eq!(parser.context().block_depth(), 0);
        count += 1;
    }
    assert_eq!(count, 4);
}

#[test]
fn hash_comment() {
    let stmts = split("SELECT 1 # comment ;\n;\nSELECT 2;", MySql).unwrap();
    assert_eq!(sqls(&stmts), ["SELECT 1 # comment ;", "SELECT 2"]);
}

#[test]
fn hash_delimiter() {
    let stmts = split("DELIMITER #\nSELECT 1#\nSELECT 2#\n", MySql).unwrap();
    assert_eq!(sqls(&stmts), ["SELECT 1", "SELECT 2"]);
    assert_eq!(stmts[1].delimiter(), Some("#"));
}

#[test]
fn mysql_escapes() {
    let stmts = split(r#"SELECT 'a\';b'; SELECT "x\"; y";"#, MySql).unwrap();
    assert_eq!(sqls(&stmts), [r"SELECT 'a\';b'", r#"SELECT "x\"; y""#]);
}

#[test]
fn quoted_identifiers() {
    let stmts = split("SELECT `a;b` FROM `t``x`;", MySql).unwrap();
    let tokens = stmts[0].tokens();
    assert_eq!(tokens[1].token_type(), TokenType::Identifier);
    assert_eq!(tokens[1].text(), Some("a;b"));
    assert_eq!(tokens[3].text(), Some("t`x"));
    assert_eq!(tokens[3].raw(), "`t``x`");
}

#[test]
fn ansi_quotes() {
    let sql = "SELECT \"a;b\" FROM t;";
    let stmts = split(sql, MySql).unwrap();
    assert_eq!(stmts[0].tokens()[1].token_type(), TokenType::String);

    let mut parser = Parser::with_config(sql, MySql, with_flags(ScanFlags::ANSI_QUOTES));
    let stmt = parser.next().unwrap().unwrap();
    assert_eq!(stmt.tokens()[1].token_type(), TokenType::Identifier);
    assert_eq!(stmt.tokens()[1].text(), Some("a;b"));
}

#[test]
fn delimiter_word_inside_statement() {
    let stmts = split("SELECT delimiter FROM t;", MySql).unwrap();
    assert_eq!(stmts.len(), 1);
    assert!(stmts[0].tokens()[1].is(TokenType::Keyword, "DELIMITER"));
}

#[test]
fn empty_delimiter() {
    let r = split("DELIMITER   \nSELECT 1;", MySql);
    assert!(matches!(r, Err(Error::EmptyDelimiter(Some(pos))) if pos == Pos::start()));
}

#[test]
fn comment_directive() {
    let sql = "/*!40101 SET NAMES utf8 */;\n";
    let stmts = split(sql, MySql).unwrap();
    assert_eq!(stmts.len(), 1);
    let token = &stmts[0].tokens()[0];
    assert_eq!(token.token_type(), TokenType::MultiLineCommentDirective);
    assert_eq!(token.text(), Some("!40101 SET NAMES utf8 "));

    let parser = Parser::with_config(sql, MySql, with_flags(ScanFlags::empty()));
    assert_eq!(parser.count().unwrap(), 0);
}

#[test]
fn generic_dialect() {
    let stmts = split("SELECT \"a;b\" # x;", Generic).unwrap();
    let types: Vec<_> = stmts[0].tokens().iter().map(|t| t.token_type()).collect();
    assert_eq!(
        types,
        [
            TokenType::Keyword,
            TokenType::Identifier,
            TokenType::Symbol,
            TokenType::Identifier
        ]
    );
    // no procedural blocks
    assert_eq!(split("BEGIN; SELECT 1; END;", Generic).unwrap().len(), 3);
}

#[test]
fn configured_delimiter() {
    let config = Config {
        delimiter: Some("GO".to_owned()),
        flags: ScanFlags::default(),
    };
    let parser = Parser::with_config("SELECT 1\nGO\nSELECT 2\nGO\n", Generic, config);
    let stmts: Vec<_> = parser.collect().unwrap();
    assert_eq!(sqls(&stmts), ["SELECT 1", "SELECT 2"]);
    assert_eq!(stmts[0].delimiter(), Some("GO"));
}

#[test]
fn word_delimiter_matches_whole_words() {
    let config = Config {
        delimiter: Some("GO".to_owned()),
        flags: ScanFlags::default(),
    };
    let script = "SELECT CATEGORY FROM t\nGO\nSELECT GOAL, ALGO\nGO\nSELECT 1 GO";
    let parser = Parser::with_config(script, Generic, config);
    let stmts: Vec<_> = parser.collect().unwrap();
    assert_eq!(
        sqls(&stmts),
        ["SELECT CATEGORY FROM t", "SELECT GOAL, ALGO", "SELECT 1"]
    );
}

#[test]
fn delimiter_directive_with_word() {
    let script = "DELIMITER go\nSELECT category FROM t go\nSELECT ago, 1 go\n";
    let stmts = split(script, MySql).unwrap();
    assert_eq!(sqls(&stmts), ["SELECT category FROM t", "SELECT ago, 1"]);
    assert_eq!(stmts[1].delimiter(), Some("go"));
}

#[test]
fn statement_positions() {
    let stmts = split("SELECT 1;\n\n  SELECT 2;", Generic).unwrap();
    assert_eq!(
        stmts[1].start(),
        Pos {
            offset: 13,
            line: 3,
            column: 3
        }
    );
    assert_eq!(
        stmts[1].end(),
        Pos {
            offset: 22,
            line: 3,
            column: 12
        }
    );
    assert_eq!(stmts[1].raw(), "SELECT 2;");
}

#[test]
fn unterminated_literal() {
    let r = split("SELECT 'abc", MySql);
    assert!(matches!(
        r,
        Err(Error::UnterminatedLiteral(Some(Pos {
            offset: 7,
            line: 1,
            column: 8
        })))
    ));

    let mut parser = Parser::new("SELECT 1;\nSELECT `abc", MySql);
    assert!(parser.next().unwrap().is_some());
    let err = parser.next().unwrap_err();
    assert_eq!(
        err.pos(),
        Some(Pos {
            offset: 17,
            line: 2,
            column: 8
        })
    );
    // no recovery
    assert!(parser.next().unwrap().is_none());
}

#[test]
fn unterminated_block_comment() {
    let r = split("SELECT 1 /* never closed", Generic);
    assert!(matches!(
        r,
        Err(Error::UnterminatedBlockComment(Some(Pos { column: 10, .. })))
    ));
}

#[test]
fn unterminated_block() {
    let r = split("CREATE PROCEDURE p() BEGIN SELECT 1;", MySql);
    assert!(matches!(r, Err(Error::UnterminatedBlock(1, Some(_)))));
}

#[test]
fn negative_depth() {
    let strict = with_flags(ScanFlags::STRICT_DEPTH);
    let mut parser = Parser::with_config("SELECT 1);", Generic, strict.clone());
    assert!(matches!(
        parser.next(),
        Err(Error::NegativeDepth(
            Depth::Parens,
            Some(Pos {
                offset: 8,
                line: 1,
                column: 9
            })
        ))
    ));
    let mut parser = Parser::with_config("END;", MySql, strict);
    assert!(matches!(
        parser.next(),
        Err(Error::NegativeDepth(Depth::Block, Some(Pos { offset: 0, .. })))
    ));

    let parser = Parser::with_config("END; SELECT 1;", MySql, with_flags(ScanFlags::empty()));
    assert_eq!(parser.count().unwrap(), 2);
}

struct Failing;

impl io::Read for Failing {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "boom"))
    }
}

#[test]
fn reader_failure() {
    assert!(matches!(read_script(Failing), Err(Error::Io(_))));
    assert_eq!(read_script("SELECT 1;".as_bytes()).unwrap(), "SELECT 1;");
}
