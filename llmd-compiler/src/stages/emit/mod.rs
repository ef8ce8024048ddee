//! Stages 3+4: scope resolution and emission.
//!
//! A single walk over the IR owns all mutable pipeline state: the heading
//! stack, the currently emitted scope and the pending key-value batch. The
//! batch is flushed before any non-KV node is processed and once more at end
//! of stream, so attribute lines always land before the content that follows
//! their source position.

pub mod batch;
pub mod inline;
pub mod scope;
pub mod table;

use crate::ir::{FencedBlock, Node};
use crate::options::CompileOptions;
use batch::KvBatch;
use fancy_regex::Regex as FancyRegex;
use once_cell::sync::Lazy;
use scope::{key_name, scope_name, ScopeStack};
use table::TableWriter;

// Sentence boundary: terminal punctuation, whitespace, then an uppercase
// letter. Look-around keeps the punctuation with the preceding sentence.
static SENTENCE_BOUNDARY: Lazy<FancyRegex> =
    Lazy::new(|| FancyRegex::new(r"(?<=[.!?])\s+(?=[A-Z])").unwrap());

/// Walk the IR and produce the uncompressed LLMD line stream.
pub fn emit(nodes: &[Node], blocks: &[FencedBlock], opts: &CompileOptions) -> Vec<String> {
    let mut emitter = Emitter::new(blocks, opts);
    for node in nodes {
        emitter.node(node);
    }
    emitter.finish()
}

struct Emitter<'a> {
    opts: &'a CompileOptions,
    blocks: &'a [FencedBlock],
    out: Vec<String>,
    stack: ScopeStack,
    current: Option<String>,
    batch: KvBatch,
}

impl<'a> Emitter<'a> {
    fn new(blocks: &'a [FencedBlock], opts: &'a CompileOptions) -> Self {
        Emitter {
            opts,
            blocks,
            out: Vec::new(),
            stack: ScopeStack::new(),
            current: None,
            batch: KvBatch::new(),
        }
    }

    fn node(&mut self, node: &Node) {
        if !matches!(node, Node::KeyValue { .. }) {
            self.batch.flush_into(&mut self.out, self.opts);
        }

        match node {
            Node::Heading { level, text } => self.heading(*level, text),
            Node::Paragraph { text } => self.paragraph(text),
            Node::ListItem { depth, text, .. } => self.list_item(*depth, text),
            Node::KeyValue { key, value } => self.key_value(key, value),
            Node::Table { rows } => self.table(rows),
            Node::BlockRef { index } => self.block(*index),
            Node::Blank => {}
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.batch.flush_into(&mut self.out, self.opts);
        self.out
    }

    fn render(&self, text: &str) -> String {
        inline::render(text, self.opts.compression, self.opts.keep_urls)
    }

    /// Switch to `name` if it is not already the emitted scope. An empty name
    /// still emits a bare `@`; downstream treatment is the caller's concern.
    fn set_scope(&mut self, name: String) {
        if self.current.as_deref() != Some(name.as_str()) {
            self.out.push(format!("@{}", name));
            self.current = Some(name);
        }
    }

    /// Content outside any heading lives under a synthesized `@root`.
    fn ensure_scope(&mut self) {
        if self.current.is_none() {
            self.set_scope("root".to_string());
        }
    }

    fn heading(&mut self, level: usize, text: &str) {
        let name = scope_name(text, self.opts.compression);
        let resolved = self.stack.descend(level, name, self.opts.scope_mode);
        self.set_scope(resolved);
    }

    fn paragraph(&mut self, text: &str) {
        self.ensure_scope();
        let rendered = self.render(text);
        for sentence in self.split_sentences(&rendered) {
            let sentence = sentence.trim();
            if !sentence.is_empty() {
                self.out.push(sentence.to_string());
            }
        }
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        if !self.opts.sentence_split || self.opts.compression < 2 {
            return vec![text.to_string()];
        }
        let parts: Vec<String> = SENTENCE_BOUNDARY
            .split(text)
            .filter_map(|part| part.ok())
            .map(|part| part.to_string())
            .filter(|part| !part.trim().is_empty())
            .collect();
        if parts.is_empty() {
            vec![text.to_string()]
        } else {
            parts
        }
    }

    fn list_item(&mut self, depth: usize, text: &str) {
        self.ensure_scope();
        let rendered = self.render(text);
        if depth == 0 {
            self.out.push(format!("-{}", rendered));
        } else {
            self.out.push(format!("-{} {}", ".".repeat(depth), rendered));
        }
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.ensure_scope();
        let normalized = key_name(key);
        let rendered = self.render(value);
        if normalized.is_empty() {
            // Unkeyable pair degrades to a plain text line.
            let line = self.render(&format!("{}: {}", key, value));
            self.out.push(line);
        } else {
            self.batch.push(normalized, rendered);
        }
    }

    fn table(&mut self, rows: &[Vec<String>]) {
        self.ensure_scope();
        TableWriter::new(self.opts).write(rows, &mut self.out, &mut self.batch);
    }

    fn block(&mut self, index: usize) {
        self.ensure_scope();
        // Placeholders come from the protect stage, so the index is valid
        // unless the source forged one; a forged reference is dropped.
        let Some(block) = self.blocks.get(index) else {
            return;
        };
        let lang = if block.lang.is_empty() {
            "code"
        } else {
            block.lang.as_str()
        };
        self.out.push(format!("::{}", lang));
        self.out.push("<<<".to_string());
        self.out.push(block.payload.clone());
        self.out.push(">>>".to_string());
    }
}
