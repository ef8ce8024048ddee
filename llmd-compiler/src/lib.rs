//! Deterministic Markdown → LLMD compiler core
//!
//! ```text
//!     LLMD is a line-oriented, implicit-scope format that carries the
//!     semantic content of Markdown in substantially fewer tokens, for
//!     consumption by language models. Each output line is typed by its
//!     first characters:
//!
//!     @scope          logical grouping, persists until the next @ line
//!     :k=v k2=v2      attribute pairs (plus the _col/_cols/_pfx metas)
//!     -item / -. item list items with dot-encoded nesting depth
//!     ::lang          block-type header
//!     <<< ... >>>     opaque block payload delimiters
//!     plain text      paragraph or sentence
//!
//!     This is a pure lib: it consumes an already-assembled source string
//!     plus a resolved option record and produces the LLMD text. File
//!     traversal, concatenation order and configuration layering belong to
//!     the callers (see the llmd-cli and llmd-config crates).
//!
//!     The file structure mirrors the pipeline:
//!     .
//!     ├── options.rs          # resolved configuration record
//!     ├── diagnostics.rs      # advisory warnings
//!     ├── ir.rs               # flat node sequence + fenced blocks
//!     └── stages
//!         ├── normalize.rs    # stage 0
//!         ├── fences.rs       # stage 1
//!         ├── classify.rs     # stage 2
//!         ├── emit/           # stages 3+4 (scope, inline, table, batch)
//!         ├── compress.rs     # stage 5
//!         └── finalize.rs     # stage 6
//! ```
//!
//! The compiler is lossy by design and never fails on accepted input; the
//! only side channel is a list of advisory diagnostics. Compiling the same
//! source with the same options yields byte-identical output.

pub mod diagnostics;
pub mod ir;
pub mod options;
pub mod stages;

pub use diagnostics::Diagnostic;
pub use options::{CompileOptions, ScopeMode};

use stages::{classify, compress, emit, fences, finalize, normalize};

/// A compiled document plus the warnings gathered along the way.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// LLMD text, terminated by exactly one LF.
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile Markdown source into LLMD text, discarding diagnostics.
pub fn compile(source: &str, opts: &CompileOptions) -> String {
    compile_with_diagnostics(source, opts).text
}

/// Compile Markdown source into LLMD text, keeping advisory diagnostics.
pub fn compile_with_diagnostics(source: &str, opts: &CompileOptions) -> Compilation {
    let lines = normalize::logical_lines(source);
    let protected = fences::protect(&lines);
    let nodes = classify::classify_lines(&protected.lines);

    let mut lines = emit::emit(&nodes, &protected.blocks, opts);

    lines = compress::pass_c0(&lines);
    if opts.compression >= 1 {
        lines = compress::pass_c1(&lines);
    }
    if opts.compression >= 2 {
        lines = compress::pass_c2(&lines, opts);
    }

    let (lines, diagnostics) = finalize::finalize(lines, opts);

    let mut text = lines.join("\n");
    text.push('\n');
    Compilation { text, diagnostics }
}
