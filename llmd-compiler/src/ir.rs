//! Flat intermediate representation.
//!
//! The classifier produces an ordered sequence of `Node`s, not a tree; heading
//! nesting is reconstructed later by the emitter's scope stack. The variant
//! set is closed, so a single match in the emitter covers the whole language.

/// One classified source construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Heading {
        /// 1..=6, the number of `#` markers.
        level: usize,
        text: String,
    },
    /// One or more source lines merged with single spaces.
    Paragraph { text: String },
    ListItem {
        /// Source indent divided by 2, floored.
        depth: usize,
        text: String,
        /// Numbered-marker items; the distinction is not carried into output.
        ordered: bool,
    },
    /// rows[0] is the header, the rest are data rows, cells trimmed.
    Table { rows: Vec<Vec<String>> },
    KeyValue { key: String, value: String },
    /// Placeholder for a fenced region lifted out in the protect stage.
    BlockRef { index: usize },
    Blank,
}

/// A fenced code region lifted out of the line stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Dense, assigned in source order.
    pub index: usize,
    /// Info-string language tag; empty when the fence had none.
    pub lang: String,
    /// Raw lines between the fences joined by LF, no trailing LF. Opaque to
    /// every later stage.
    pub payload: String,
}
