//! Stage 0: source normalization.
//!
//! Everything downstream assumes NFKC text split into LF-separated logical
//! lines with no trailing spaces or tabs. CR and CRLF are folded to LF first
//! so the split is identical across platforms.

use unicode_normalization::UnicodeNormalization;

/// Normalize a source string into logical lines.
pub fn logical_lines(source: &str) -> Vec<String> {
    let text: String = source.nfkc().collect();
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    text.split('\n')
        .map(|line| line.trim_end_matches([' ', '\t']).to_string())
        .collect()
}
