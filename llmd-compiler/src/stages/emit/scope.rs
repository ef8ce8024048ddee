//! Heading stack and name normalization.
//!
//! The stack holds the chain of open headings with strictly increasing
//! levels; a new heading pops everything at its own level or deeper before
//! being pushed. Scope names keep letters, digits, `_` and `-`; whitespace
//! runs become `_`. Keys are the lowercase variant with edge hyphens removed.

use crate::options::ScopeMode;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_SCOPE_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());
static NON_KEY_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_-]").unwrap());

/// Normalize heading text into a scope name. Lowercased from compression 2.
pub fn scope_name(text: &str, compression: u8) -> String {
    let s = WHITESPACE_RUN.replace_all(text.trim(), "_");
    let s = NON_SCOPE_CHAR.replace_all(&s, "");
    if compression >= 2 {
        s.to_lowercase()
    } else {
        s.into_owned()
    }
}

/// Normalize a key (KV line key, table first cell, column header).
pub fn key_name(text: &str) -> String {
    let s = text.trim().to_lowercase();
    let s = WHITESPACE_RUN.replace_all(&s, "_");
    let s = NON_KEY_CHAR.replace_all(&s, "");
    s.trim_matches('-').to_string()
}

/// The chain of currently open headings, outermost first.
#[derive(Debug, Default)]
pub struct ScopeStack {
    entries: Vec<(usize, String)>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a heading, closing everything at its level or deeper, and return
    /// the resolved scope name for the given mode.
    pub fn descend(&mut self, level: usize, name: String, mode: ScopeMode) -> String {
        while self.entries.last().is_some_and(|(l, _)| *l >= level) {
            self.entries.pop();
        }
        self.entries.push((level, name));
        match mode {
            ScopeMode::Flat => self.entries.last().map(|(_, n)| n.clone()).unwrap_or_default(),
            ScopeMode::Concat | ScopeMode::Stacked => self
                .entries
                .iter()
                .map(|(_, n)| n.as_str())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_name_keeps_case_below_c2() {
        assert_eq!(scope_name("Hello World", 0), "Hello_World");
        assert_eq!(scope_name("Hello World", 1), "Hello_World");
    }

    #[test]
    fn test_scope_name_lowercases_at_c2() {
        assert_eq!(scope_name("API Reference!", 2), "api_reference");
    }

    #[test]
    fn test_scope_name_drops_punctuation() {
        assert_eq!(scope_name("??", 2), "");
    }

    #[test]
    fn test_key_name() {
        assert_eq!(key_name("Max Connections"), "max_connections");
        assert_eq!(key_name("my-key"), "my-key");
        assert_eq!(key_name("-edge-"), "edge");
        assert_eq!(key_name("Key (special)"), "key_special");
    }

    #[test]
    fn test_descend_pops_same_and_deeper_levels() {
        let mut stack = ScopeStack::new();
        assert_eq!(stack.descend(2, "a".into(), ScopeMode::Concat), "a");
        assert_eq!(stack.descend(3, "b".into(), ScopeMode::Concat), "a_b");
        // A sibling at level 2 pops both entries before pushing.
        assert_eq!(stack.descend(2, "c".into(), ScopeMode::Concat), "c");
    }

    #[test]
    fn test_flat_mode_uses_newest_name_only() {
        let mut stack = ScopeStack::new();
        stack.descend(1, "outer".into(), ScopeMode::Flat);
        assert_eq!(stack.descend(2, "inner".into(), ScopeMode::Flat), "inner");
    }
}
