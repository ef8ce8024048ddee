//! Resolved compiler configuration.
//!
//! `CompileOptions` is the record the pipeline consumes. Loading and layering
//! (defaults file, user file, CLI overrides) live in the `llmd-config` crate;
//! this type only defines the recognized knobs and their defaults, and
//! deserializes partial documents by filling absent fields with those
//! defaults. Unknown keys are ignored.

use serde::Deserialize;
use std::collections::HashMap;

/// How a heading is turned into the emitted `@scope` name.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    /// Only the newest heading's normalized name.
    #[default]
    Flat,
    /// All open headings joined with `_`, outermost first.
    Concat,
    /// Currently identical to `concat`.
    Stacked,
}

/// Every knob the core recognizes, with its default.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileOptions {
    /// Compression level 0..=2. Governs which passes run and whether scope
    /// names are lowercased.
    #[serde(default = "default_compression")]
    pub compression: u8,

    #[serde(default)]
    pub scope_mode: ScopeMode,

    /// Keep `text<url>` link forms at compression 2 (always kept below 2).
    #[serde(default)]
    pub keep_urls: bool,

    /// Split paragraphs at sentence boundaries (compression 2 only).
    #[serde(default)]
    pub sentence_split: bool,

    /// Re-emit the active scope after every N content lines. 0 disables.
    #[serde(default)]
    pub anchor_every: usize,

    /// Maximum key=value pairs per emitted attribute line.
    #[serde(default = "default_max_kv_per_line")]
    pub max_kv_per_line: usize,

    #[serde(default = "default_true")]
    pub prefix_extraction: bool,

    #[serde(default = "default_min_prefix_len")]
    pub min_prefix_len: usize,

    #[serde(default = "default_min_prefix_pct")]
    pub min_prefix_pct: f64,

    /// Collapse all-boolean table columns to single letters.
    #[serde(default = "default_true")]
    pub bool_compress: bool,

    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,

    /// Words never removed by stopword filtering, negations above all.
    #[serde(default = "default_protect_words")]
    pub protect_words: Vec<String>,

    /// Literal phrase rewrites applied at compression 2, longest source first.
    #[serde(default = "default_phrase_map")]
    pub phrase_map: HashMap<String, String>,

    /// Unit spellings folded into suffix form at compression 2.
    #[serde(default = "default_units")]
    pub units: HashMap<String, String>,
}

fn default_compression() -> u8 {
    2
}

fn default_max_kv_per_line() -> usize {
    4
}

fn default_min_prefix_len() -> usize {
    6
}

fn default_min_prefix_pct() -> f64 {
    0.6
}

fn default_true() -> bool {
    true
}

fn default_stopwords() -> Vec<String> {
    [
        "the", "a", "an", "and", "really", "just", "that", "is", "are", "was", "were", "of", "in",
        "on", "at", "for", "with", "by", "from", "to",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_protect_words() -> Vec<String> {
    ["no", "not", "never", "must", "should", "may"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_phrase_map() -> HashMap<String, String> {
    [
        ("in order to", "to"),
        ("as well as", "\u{00A6}"),
        ("due to", "because"),
        ("is able to", "can"),
        ("is used to", ""),
        ("is responsible for", "handles"),
        ("refers to", "="),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_units() -> HashMap<String, String> {
    [
        ("requests per minute", "/m"),
        ("milliseconds", "ms"),
        ("seconds", "s"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            compression: default_compression(),
            scope_mode: ScopeMode::Flat,
            keep_urls: false,
            sentence_split: false,
            anchor_every: 0,
            max_kv_per_line: default_max_kv_per_line(),
            prefix_extraction: true,
            min_prefix_len: default_min_prefix_len(),
            min_prefix_pct: default_min_prefix_pct(),
            bool_compress: true,
            stopwords: default_stopwords(),
            protect_words: default_protect_words(),
            phrase_map: default_phrase_map(),
            units: default_units(),
        }
    }
}
