//! Stage 5: compression passes.
//!
//! Passes are cumulative: level 0 cleans whitespace, level 1 re-runs the
//! cleanup (structural batching already happened in emission), level 2
//! rewrites tokens. Every pass leaves block payloads untouched by tracking
//! the `<<<`/`>>>` delimiters, and level 2 additionally skips scope lines,
//! block-type headers, metadata (`~`) and relation (`→`/`←`/`=`) lines.

use crate::options::CompileOptions;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::collections::HashSet;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RULE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*_]{3,}$").unwrap());

fn is_open(line: &str) -> bool {
    line == "<<<"
}

fn is_close(line: &str) -> bool {
    line == ">>>"
}

/// c0: collapse whitespace runs, trim, drop empty and horizontal-rule lines.
pub fn pass_c0(lines: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut in_payload = false;
    for line in lines {
        if in_payload {
            out.push(line.clone());
            if is_close(line) {
                in_payload = false;
            }
            continue;
        }
        if is_open(line) {
            in_payload = true;
            out.push(line.clone());
            continue;
        }
        let cleaned = WHITESPACE_RUN.replace_all(line, " ");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() || RULE_LINE.is_match(cleaned) {
            continue;
        }
        out.push(cleaned.to_string());
    }
    out
}

/// c1: structural compaction happens in emission; the pass itself is another
/// whitespace sweep.
pub fn pass_c1(lines: &[String]) -> Vec<String> {
    pass_c0(lines)
}

/// Compiled token-rewrite tables for one c2 run.
struct Rewriter {
    // (pattern, replacement), longest source phrase first
    phrases: Vec<(Regex, String)>,
    // (digits-adjacent pattern, standalone pattern, replacement)
    units: Vec<(Regex, Regex, String)>,
    stopwords: HashSet<String>,
    protected: HashSet<String>,
}

/// Sort map entries by source length descending so longer phrases win; ties
/// break lexicographically to keep the pass deterministic regardless of the
/// map's iteration order.
fn sorted_entries(map: &std::collections::HashMap<String, String>) -> Vec<(&String, &String)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    entries
}

impl Rewriter {
    fn new(opts: &CompileOptions) -> Self {
        let phrases = sorted_entries(&opts.phrase_map)
            .into_iter()
            .map(|(phrase, replacement)| {
                let pattern = Regex::new(&format!("(?i){}", regex::escape(phrase)))
                    .expect("escaped phrase is a valid pattern");
                (pattern, replacement.clone())
            })
            .collect();

        let units = sorted_entries(&opts.units)
            .into_iter()
            .map(|(unit, replacement)| {
                let with_number = Regex::new(&format!(r"(?i)(\d+)\s+{}", regex::escape(unit)))
                    .expect("escaped unit is a valid pattern");
                let standalone = Regex::new(&format!("(?i){}", regex::escape(unit)))
                    .expect("escaped unit is a valid pattern");
                (with_number, standalone, replacement.clone())
            })
            .collect();

        Rewriter {
            phrases,
            units,
            stopwords: opts.stopwords.iter().map(|w| w.to_lowercase()).collect(),
            protected: opts.protect_words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    fn rewrite_phrases(&self, body: &str) -> String {
        let mut body = body.to_string();
        for (pattern, replacement) in &self.phrases {
            body = pattern
                .replace_all(&body, NoExpand(replacement))
                .into_owned();
        }
        body
    }

    fn rewrite_units(&self, body: &str) -> String {
        let mut body = body.to_string();
        for (with_number, standalone, replacement) in &self.units {
            body = with_number
                .replace_all(&body, |caps: &regex::Captures| {
                    format!("{}{}", &caps[1], replacement)
                })
                .into_owned();
            body = standalone
                .replace_all(&body, NoExpand(replacement))
                .into_owned();
        }
        body
    }

    /// Drop tokens whose letter-only lowercase core is a stopword, unless the
    /// core is protected. Tokens without a letter core always survive.
    fn drop_stopwords(&self, body: &str) -> String {
        body.split_whitespace()
            .filter(|token| {
                let core: String = token
                    .to_lowercase()
                    .chars()
                    .filter(|c| c.is_ascii_lowercase())
                    .collect();
                core.is_empty() || self.protected.contains(&core) || !self.stopwords.contains(&core)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Remove a bare terminal period, sparing ellipses and common abbreviations.
fn strip_terminal_period(line: &str) -> &str {
    if !line.ends_with('.') || line.ends_with("...") {
        return line;
    }
    let lowered = line.to_lowercase();
    if lowered.ends_with("e.g.") || lowered.ends_with("i.e.") || lowered.ends_with("etc.") {
        return line;
    }
    &line[..line.len() - 1]
}

/// c2: token-level rewrites on text, list and attribute lines.
pub fn pass_c2(lines: &[String], opts: &CompileOptions) -> Vec<String> {
    let rewriter = Rewriter::new(opts);
    let mut out = Vec::with_capacity(lines.len());
    let mut in_payload = false;

    for line in lines {
        if in_payload {
            out.push(line.clone());
            if is_close(line) {
                in_payload = false;
            }
            continue;
        }
        if is_open(line) {
            in_payload = true;
            out.push(line.clone());
            continue;
        }
        if line.starts_with("::")
            || line.starts_with('@')
            || line.starts_with('~')
            || line.starts_with('\u{2192}')
            || line.starts_with('\u{2190}')
            || line.starts_with('=')
        {
            out.push(line.clone());
            continue;
        }

        let (prefix, body) = match line.strip_prefix(':') {
            Some(rest) => (":", rest),
            None => match line.strip_prefix('-') {
                Some(rest) => ("-", rest),
                None => ("", line.as_str()),
            },
        };

        let mut body = rewriter.rewrite_phrases(body);
        body = rewriter.rewrite_units(&body);
        if prefix != ":" {
            body = rewriter.drop_stopwords(&body);
        }
        let rebuilt = format!("{}{}", prefix, body);
        out.push(strip_terminal_period(&rebuilt).to_string());
    }

    out
}
