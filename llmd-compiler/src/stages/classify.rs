//! Stage 2: line classification.
//!
//! A single left-to-right pass turns the protected line stream into the flat
//! IR. Classification is first-match-wins in a fixed precedence order: blank,
//! thematic break (skipped), block placeholder, heading, table, unordered
//! item, ordered item, key-value, paragraph. Only tables and paragraphs
//! consume more than one line.

use crate::ir::Node;
use once_cell::sync::Lazy;
use regex::Regex;

static THEMATIC_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*_]{3,}$").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static BLOCK_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\u{27E6}BLOCK:(\d+)\u{27E7}$").unwrap());
static UNORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)([-*+])\s+(.+)$").unwrap());
static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)(\d+)\.\s+(.+)$").unwrap());
// A key is a short letter-led phrase; URLs are excluded separately so
// "https://host: 8080" prose is not captured.
static KEY_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9 _-]{0,63})\s*:\s+(.+)$").unwrap());
static TABLE_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|?[\s:-]+\|").unwrap());

fn is_url_lead(trimmed: &str) -> bool {
    trimmed.starts_with("http://") || trimmed.starts_with("https://")
}

fn is_key_value(trimmed: &str) -> bool {
    KEY_VALUE.is_match(trimmed) && !is_url_lead(trimmed)
}

/// Would this line start a construct of its own? Paragraph merging stops here.
fn is_structural(line: &str) -> bool {
    let t = line.trim();
    t.is_empty()
        || HEADING.is_match(t)
        || UNORDERED_ITEM.is_match(t)
        || ORDERED_ITEM.is_match(t)
        || BLOCK_REF.is_match(t)
        || t.contains('|')
        || is_key_value(t)
}

fn is_table_delimiter(trimmed: &str) -> bool {
    TABLE_DELIMITER.is_match(trimmed) && trimmed.contains("---")
}

/// Split a pipe row into trimmed cells, discarding the empty edge cells a
/// leading or trailing `|` produces.
fn split_row(row: &str) -> Vec<String> {
    let mut cells: Vec<String> = row.split('|').map(|c| c.trim().to_string()).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

fn list_depth(indent: &str) -> usize {
    indent.len() / 2
}

/// Classify the protected lines into IR nodes.
pub fn classify_lines(lines: &[String]) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut i = 0;
    let n = lines.len();

    while i < n {
        let line = &lines[i];
        let t = line.trim();

        if t.is_empty() {
            nodes.push(Node::Blank);
            i += 1;
            continue;
        }

        if THEMATIC_BREAK.is_match(t) {
            i += 1;
            continue;
        }

        if let Some(caps) = BLOCK_REF.captures(t) {
            // The placeholder digits fit usize by construction; a forged
            // oversized index falls through to paragraph text.
            if let Ok(index) = caps[1].parse::<usize>() {
                nodes.push(Node::BlockRef { index });
                i += 1;
                continue;
            }
        }

        if let Some(caps) = HEADING.captures(t) {
            nodes.push(Node::Heading {
                level: caps[1].len(),
                text: caps[2].trim().to_string(),
            });
            i += 1;
            continue;
        }

        if t.contains('|') && i + 1 < n && is_table_delimiter(lines[i + 1].trim()) {
            let mut rows = vec![split_row(t)];
            i += 2;
            while i < n && lines[i].contains('|') && !lines[i].trim().is_empty() {
                rows.push(split_row(lines[i].trim()));
                i += 1;
            }
            nodes.push(Node::Table { rows });
            continue;
        }

        if let Some(caps) = UNORDERED_ITEM.captures(line) {
            nodes.push(Node::ListItem {
                depth: list_depth(&caps[1]),
                text: caps[3].trim().to_string(),
                ordered: false,
            });
            i += 1;
            continue;
        }

        if let Some(caps) = ORDERED_ITEM.captures(line) {
            nodes.push(Node::ListItem {
                depth: list_depth(&caps[1]),
                text: caps[3].trim().to_string(),
                ordered: true,
            });
            i += 1;
            continue;
        }

        if !is_url_lead(t) {
            if let Some(caps) = KEY_VALUE.captures(t) {
                nodes.push(Node::KeyValue {
                    key: caps[1].to_string(),
                    value: caps[2].trim().to_string(),
                });
                i += 1;
                continue;
            }
        }

        // Paragraph: merge following lines until something structural starts.
        let mut merged = vec![t.to_string()];
        i += 1;
        while i < n && !is_structural(&lines[i]) {
            merged.push(lines[i].trim().to_string());
            i += 1;
        }
        nodes.push(Node::Paragraph {
            text: merged.join(" "),
        });
    }

    nodes
}
