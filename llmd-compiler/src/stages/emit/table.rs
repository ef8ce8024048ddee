//! Table classification and encoding.
//!
//! Parsed tables are encoded three ways. A two-column table whose first
//! column reads like identifiers becomes plain key-value pairs (`property`);
//! a wider table with the same first-column shape keeps its row structure in
//! packed values (`keyed_multi`); everything else is written row by row
//! (`raw`). Cells within one record are joined with U+00A6 `¦`.

use super::batch::KvBatch;
use super::inline;
use super::scope::key_name;
use crate::options::CompileOptions;
use std::collections::HashSet;

/// Record-internal field separator.
pub const FIELD_SEP: char = '\u{00A6}';

/// Second-column headers too generic to be worth a `:_col=` declaration.
const GENERIC_HEADERS: &[&str] = &[
    "value",
    "description",
    "details",
    "info",
    "notes",
    "default",
    "type",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Property,
    KeyedMulti,
    Raw,
}

fn is_informative_header(header: &str) -> bool {
    !header.is_empty() && !GENERIC_HEADERS.contains(&header.trim().to_lowercase().as_str())
}

/// An identifier-like cell starts with a letter, `.` or `-` and splits into
/// at most four words.
fn is_identifier_like(cell: &str) -> bool {
    cell.starts_with(|c: char| c.is_ascii_alphabetic() || c == '.' || c == '-')
        && cell.split_whitespace().count() <= 4
}

/// Classify parsed rows. Any violation in a data row demotes the table.
pub fn classify(rows: &[Vec<String>]) -> TableKind {
    if rows.len() < 2 {
        return TableKind::Raw;
    }
    let columns = rows[0].len();
    if columns < 2 || rows[1..].iter().any(|r| r.len() != columns) {
        return TableKind::Raw;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for row in &rows[1..] {
        let cell = row[0].trim();
        if !seen.insert(cell) || !is_identifier_like(cell) {
            return TableKind::Raw;
        }
    }

    if columns == 2 {
        TableKind::Property
    } else {
        TableKind::KeyedMulti
    }
}

const BOOL_FOLD: &[(&str, &str)] = &[
    ("yes", "Y"),
    ("no", "N"),
    ("true", "T"),
    ("false", "F"),
    ("enabled", "Y"),
    ("disabled", "N"),
];

fn fold_bool(value: &str) -> Option<&'static str> {
    let lowered = value.trim().to_lowercase();
    BOOL_FOLD
        .iter()
        .find(|(from, _)| *from == lowered)
        .map(|(_, to)| *to)
}

/// Column indexes (never the first) where every data cell is a boolean word.
fn boolean_columns(rows: &[Vec<String>], enabled: bool) -> HashSet<usize> {
    let mut columns = HashSet::new();
    if !enabled || rows.len() < 2 {
        return columns;
    }
    for c in 1..rows[0].len() {
        let all_bool = rows[1..]
            .iter()
            .all(|r| fold_bool(r.get(c).map_or("", |s| s.as_str())).is_some());
        if all_bool {
            columns.insert(c);
        }
    }
    columns
}

pub struct TableWriter<'a> {
    opts: &'a CompileOptions,
    bool_compress: bool,
}

impl<'a> TableWriter<'a> {
    pub fn new(opts: &'a CompileOptions) -> Self {
        TableWriter {
            opts,
            bool_compress: opts.bool_compress && opts.compression >= 2,
        }
    }

    fn render(&self, text: &str) -> String {
        inline::render(text, self.opts.compression, self.opts.keep_urls)
    }

    fn render_cell(&self, cell: &str, column: usize, bool_cols: &HashSet<usize>) -> String {
        let text = self.render(cell);
        if bool_cols.contains(&column) {
            if let Some(folded) = fold_bool(&text) {
                return folded.to_string();
            }
        }
        text
    }

    /// Encode one table, writing attribute/raw lines to `out` and key-value
    /// pairs into the caller's batch.
    pub fn write(&self, rows: &[Vec<String>], out: &mut Vec<String>, batch: &mut KvBatch) {
        let kind = classify(rows);
        let bool_cols = boolean_columns(rows, self.bool_compress);

        match kind {
            TableKind::Property => {
                if rows[0].len() >= 2 && is_informative_header(&rows[0][1]) {
                    let header = key_name(&rows[0][1]);
                    if !header.is_empty() {
                        out.push(format!(":_col={}", header));
                    }
                }
                for row in &rows[1..] {
                    let key = key_name(&row[0]);
                    let value = self.render_cell(&row[1], 1, &bool_cols);
                    if key.is_empty() {
                        out.push(format!("{}{}{}", self.render(&row[0]), FIELD_SEP, value));
                    } else {
                        batch.push(key, value);
                    }
                }
            }
            TableKind::KeyedMulti => {
                out.push(format!(":_cols={}", join_headers(&rows[0])));
                for row in &rows[1..] {
                    let key = key_name(&row[0]);
                    if key.is_empty() {
                        out.push(self.join_row(row, &bool_cols));
                    } else {
                        let values: Vec<String> = row[1..]
                            .iter()
                            .enumerate()
                            .map(|(i, c)| self.render_cell(c, i + 1, &bool_cols))
                            .collect();
                        batch.push(key, values.join(&FIELD_SEP.to_string()));
                    }
                }
            }
            TableKind::Raw => {
                if rows.first().is_some_and(|h| h.len() >= 2) {
                    out.push(format!(":_cols={}", join_headers(&rows[0])));
                }
                for row in rows.iter().skip(1) {
                    out.push(self.join_row(row, &bool_cols));
                }
            }
        }
    }

    fn join_row(&self, row: &[String], bool_cols: &HashSet<usize>) -> String {
        row.iter()
            .enumerate()
            .map(|(i, c)| self.render_cell(c, i, bool_cols))
            .collect::<Vec<_>>()
            .join(&FIELD_SEP.to_string())
    }
}

fn join_headers(header: &[String]) -> String {
    header
        .iter()
        .map(|h| key_name(h))
        .collect::<Vec<_>>()
        .join(&FIELD_SEP.to_string())
}
