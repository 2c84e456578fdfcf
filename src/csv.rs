// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delim {
    #[default]
    Csv,
    Tsv,
}

impl Delim {
    pub fn sep(self) -> char {
        match self { Delim::Csv => ',', Delim::Tsv => '\t' }
    }

    /// Pick by file extension; anything but `.tsv` is CSV.
    pub fn for_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => Delim::Tsv,
            _ => Delim::Csv,
        }
    }
}

/* ---------------- Parsing ---------------- */

/// Minimal CSV/TSV parser (quotes + CRLF tolerant). Blank lines are skipped.
/// Each row comes with the 1-based line it starts on.
pub fn parse_rows(text: &str, sep: char) -> Vec<(usize, Vec<String>)> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut row_line = 1usize;
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
                flush(&mut row, row_line, &mut rows);
                line += 1;
                row_line = line;
            }
            '\n' => {
                line += 1;
                field.push(ch);
            }
            _ => field.push(ch),
        }
    }

    // Trailing row without a newline, even if quotes were unterminated.
    row.push(field);
    flush(&mut row, row_line, &mut rows);

    rows
}

fn flush(row: &mut Vec<String>, at: usize, rows: &mut Vec<(usize, Vec<String>)>) {
    if row.len() == 1 && row[0].is_empty() {
        row.clear();
    } else {
        rows.push((at, take(row)));
    }
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
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

pub fn rows_to_string(rows: &[Vec<String>], headers: Option<&[String]>, sep: char) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if let Some(h) = headers {
        let _ = write_row(&mut buf, h, sep);
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_survive_a_round_trip() {
        let rows = vec![vec![s!("a,b"), s!("say \"hi\""), s!("plain")]];
        let text = rows_to_string(&rows, None, ',');
        assert_eq!(text, "\"a,b\",\"say \"\"hi\"\"\",plain\n");
        assert_eq!(parse_rows(&text, ','), vec![(1, rows[0].clone())]);
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let rows = parse_rows("the\t0.05\r\n\r\npikachu\t0.0001", '\t');
        assert_eq!(rows, vec![
            (1, vec![s!("the"), s!("0.05")]),
            (3, vec![s!("pikachu"), s!("0.0001")]),
        ]);
    }
}
