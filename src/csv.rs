// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

/// Minimal CSV/TSV parser (quotes + CRLF tolerant).
/// Blank lines are skipped; a leading UTF-8 BOM is ignored.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                push_row(&mut rows, &mut row);
            }
            _ => field.push(ch),
        }
    }

    // Trailing row without a final newline (also flushes unterminated quotes).
    row.push(field);
    push_row(&mut rows, &mut row);

    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
    if row.len() == 1 && row[0].is_empty() {
        row.clear();
    } else {
        rows.push(take(row));
    }
}

/// Split off the header row. The first row is always the header, as long as
/// it names a `key` column; otherwise the table is not ours.
pub fn split_header(mut rows: Vec<Vec<String>>, key: &str) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    if rows.is_empty() || !rows[0].iter().any(|h| h == key) {
        return None;
    }
    let header = rows.remove(0);
    Some((header, rows))
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_crlf_and_skips_blank_lines() {
        let text = "\u{feff},id,name\r\n0,1,\"Doe, John\"\r\n\r\n1,2,\"say \"\"hi\"\"\"\n";
        let rows = parse_rows(text, ',');
        assert_eq!(rows, vec![
            row!["", "id", "name"],
            row!["0", "1", "Doe, John"],
            row!["1", "2", "say \"hi\""],
        ]);
    }

    #[test]
    fn trailing_row_without_newline_is_kept() {
        let rows = parse_rows("a,b\n1,2", ',');
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], row!["1", "2"]);
    }

    #[test]
    fn all_empty_row_survives() {
        // A row of empty cells is still a row; only truly blank lines vanish.
        let rows = parse_rows("a,b\n,\n", ',');
        assert_eq!(rows, vec![row!["a", "b"], row!["", ""]]);
    }

    #[test]
    fn header_needs_key_column() {
        let rows = vec![row!["", "id"], row!["0", "7"]];
        let (h, body) = split_header(rows, "id").unwrap();
        assert_eq!(h, row!["", "id"]);
        assert_eq!(body.len(), 1);
        assert!(split_header(vec![row!["x", "y"]], "id").is_none());
    }

    #[test]
    fn writer_quotes_only_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["", "a,b", "plain", "q\"x"][..], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), ",\"a,b\",plain,\"q\"\"x\"\n");
    }
}
