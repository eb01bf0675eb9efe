use std::env;
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;

use uncased::UncasedStr;

/// Words recognized as keywords by every dialect.
/// Any other bare word is scanned as an identifier.
const KEYWORDS: &[&str] = &[
    "ACCESSIBLE", "ADD", "AFTER", "ALGORITHM", "ALL", "ALTER", "ANALYZE", "AND", "AS", "ASC",
    "BEFORE", "BEGIN", "BETWEEN", "BY", "CALL", "CASCADE", "CASE", "CHANGE", "CHARACTER",
    "CHECK", "CLOSE", "COLLATE", "COLUMN", "COMMIT", "CONDITION", "CONSTRAINT", "CONTINUE",
    "CREATE", "CROSS", "CURSOR", "DATABASE", "DECLARE", "DEFAULT", "DEFINER", "DELETE",
    "DELIMITER", "DESC", "DETERMINISTIC", "DISTINCT", "DO", "DROP", "EACH", "ELSE", "ELSEIF",
    "END", "EVENT", "EXISTS", "EXIT", "FETCH", "FOR", "FOREIGN", "FROM", "FUNCTION", "GRANT",
    "GROUP", "HANDLER", "HAVING", "IF", "IGNORE", "IN", "INDEX", "INNER", "INOUT", "INSERT",
    "INTO", "IS", "ITERATE", "JOIN", "KEY", "LEAVE", "LEFT", "LIKE", "LIMIT", "LOOP", "MODIFY",
    "NOT", "NULL", "OF", "ON", "OPEN", "OR", "ORDER", "OUT", "OUTER", "PRIMARY", "PROCEDURE",
    "REFERENCES", "RENAME", "REPEAT", "REPLACE", "RETURN", "RETURNS", "REVOKE", "RIGHT",
    "ROLLBACK", "SCHEMA", "SELECT", "SET", "SIGNAL", "SQLEXCEPTION", "SQLSTATE", "START",
    "TABLE", "TEMPORARY", "THEN", "TO", "TRANSACTION", "TRIGGER", "TRUNCATE", "UNION",
    "UNIQUE", "UNTIL", "UPDATE", "USE", "USING", "VALUES", "VIEW", "WHEN", "WHERE", "WHILE",
    "WITH",
];

fn write_keywords(out: &mut impl Write) -> Result<()> {
    // values are Rust literals for the canonical (upper case) spelling
    let values: Vec<String> = KEYWORDS.iter().map(|k| format!("{k:?}")).collect();
    let mut builder = phf_codegen::Map::<&UncasedStr>::new();
    for (keyword, value) in KEYWORDS.iter().zip(values.iter()) {
        builder.entry(UncasedStr::new(keyword), value.as_str());
    }
    writeln!(
        out,
        "static KEYWORDS: ::phf::Map<&'static UncasedStr, &'static str> = \n{};",
        builder.build()
    )?;
    let max_len = KEYWORDS.iter().map(|k| k.len()).max().unwrap_or(0);
    writeln!(out, "/// Length of the longest keyword")?;
    writeln!(out, "pub(crate) const MAX_KEYWORD_LEN: usize = {max_len};")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir).join("keywords.rs");
    let mut out = BufWriter::new(File::create(out_path)?);
    write_keywords(&mut out)?;
    out.flush()?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
