//! Tab-separated attribute tables.
//!
//! The first record names the columns. Fields may be double-quoted, with
//! `""` standing for a literal quote; quoted fields may span lines.

use std::fmt;

use crate::feature::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsvError {
    UnterminatedQuote { line: usize },
}

impl fmt::Display for TsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsvError::UnterminatedQuote { line } => {
                write!(f, "unterminated quoted field starting on line {line}")
            }
        }
    }
}

impl std::error::Error for TsvError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsvTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl TsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn parse_table(input: &str) -> Result<TsvTable, TsvError> {
    let mut records = records(input)?.into_iter();
    let Some(columns) = records.next() else {
        return Ok(TsvTable::default());
    };

    let rows = records
        .map(|record| {
            let mut cells = record.into_iter();
            columns
                .iter()
                .map(|column| (column.clone(), cells.next().unwrap_or_default()))
                .collect::<Row>()
        })
        .collect();

    Ok(TsvTable { columns, rows })
}

pub fn parse_rows(input: &str) -> Result<Vec<Row>, TsvError> {
    parse_table(input).map(|table| table.rows)
}

fn records(input: &str) -> Result<Vec<Vec<String>>, TsvError> {
    let mut out = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;
    // Whether anything has been read since the last record break.
    let mut dirty = false;
    let mut field_start = true;

    while let Some(c) = chars.next() {
        match c {
            '"' if field_start => {
                let start = line;
                loop {
                    match chars.next() {
                        Some('"') if chars.peek() == Some(&'"') => {
                            chars.next();
                            field.push('"');
                        }
                        Some('"') => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            field.push(c);
                        }
                        None => return Err(TsvError::UnterminatedQuote { line: start }),
                    }
                }
                dirty = true;
                field_start = false;
            }
            '\t' => {
                record.push(std::mem::take(&mut field));
                dirty = true;
                field_start = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                finish(&mut out, &mut record, &mut field, dirty);
                dirty = false;
                field_start = true;
            }
            c => {
                field.push(c);
                dirty = true;
                field_start = false;
            }
        }
    }
    finish(&mut out, &mut record, &mut field, dirty);
    Ok(out)
}

fn finish(out: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String, dirty: bool) {
    if !dirty {
        return;
    }
    record.push(std::mem::take(field));
    out.push(std::mem::take(record));
}

#[cfg(test)]
mod tests {
    use super::{TsvError, parse_rows, parse_table};
    use pretty_assertions::assert_eq;

    #[test]
    fn header_names_columns() {
        let table = parse_table("iso_n3\tname\teconomy\n004\tAfghanistan\t7. Least developed region\n")
            .expect("parse");
        assert_eq!(table.columns, vec!["iso_n3", "name", "economy"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0]["iso_n3"], "004");
        assert_eq!(table.rows[0]["economy"], "7. Least developed region");
    }

    #[test]
    fn handles_crlf_and_blank_lines() {
        let rows = parse_rows("a\tb\r\n1\t2\r\n\r\n3\t4\r\n\r\n").expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["a"], "3");
        assert_eq!(rows[1]["b"], "4");
    }

    #[test]
    fn missing_cells_are_empty() {
        let rows = parse_rows("a\tb\tc\n1\n").expect("parse");
        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["b"], "");
        assert_eq!(rows[0]["c"], "");
    }

    #[test]
    fn quoted_fields_keep_tabs_and_quotes() {
        let rows = parse_rows("name\tnote\n\"Côte d'Ivoire\"\t\"says \"\"hi\"\"\tand\nmore\"\n")
            .expect("parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Côte d'Ivoire");
        assert_eq!(rows[0]["note"], "says \"hi\"\tand\nmore");
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert_eq!(parse_rows("").expect("parse"), Vec::new());
        assert_eq!(parse_rows("a\tb\n").expect("parse"), Vec::new());
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert_eq!(
            parse_rows("a\n1\n\"open\n"),
            Err(TsvError::UnterminatedQuote { line: 3 })
        );
    }
}
