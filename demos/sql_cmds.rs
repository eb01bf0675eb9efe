use fallible_iterator::FallibleIterator;
use std::env;
use std::fs::File;

use sqlscript::dialect::MySql;
use sqlscript::lexer::sql::{read_script, Error, Parser};

/// Split specified files and print all statements.
fn main() {
    env_logger::init();
    let args = env::args();
    for arg in args.skip(1) {
        println!("{arg}");
        let script = match File::open(&arg).map_err(Error::from).and_then(read_script) {
            Ok(script) => script,
            Err(err) => {
                eprintln!("Err: {err} in {arg}");
                continue;
            }
        };
        let mut parser = Parser::new(&script, MySql);
        loop {
            match parser.next() {
                Ok(None) => break,
                Err(err) => {
                    eprintln!("Err: {err} in {arg}");
                    break;
                }
                Ok(Some(stmt)) => {
                    println!(
                        "-- {}..{} {:?}",
                        stmt.start(),
                        stmt.end(),
                        stmt.delimiter()
                    );
                    println!("{}", stmt.sql());
                }
            }
        }
    }
}
