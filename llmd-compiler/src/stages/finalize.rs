//! Stage 6: validation and anchors.
//!
//! Validation is advisory: content appearing before the first `@` line is
//! reported but never altered. Anchor insertion repeats the active scope
//! after every N content lines so downstream chunking can re-establish
//! context; block groups are never split by an anchor.

use crate::diagnostics::Diagnostic;
use crate::options::CompileOptions;

fn is_block_open(line: &str) -> bool {
    line == "<<<"
}

fn is_block_close(line: &str) -> bool {
    line == ">>>"
}

/// Flag content lines that precede the first scope declaration.
pub fn validate(lines: &[String]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut scope_seen = false;
    let mut in_payload = false;

    for (i, line) in lines.iter().enumerate() {
        if in_payload {
            if is_block_close(line) {
                in_payload = false;
            }
            continue;
        }
        if is_block_open(line) {
            in_payload = true;
            continue;
        }
        if line.starts_with('@') {
            scope_seen = true;
            continue;
        }
        // Metadata and block-type headers carry their own context.
        if line.starts_with('~') || line.starts_with("::") || line.is_empty() {
            continue;
        }
        if !scope_seen {
            diagnostics.push(Diagnostic::new(i + 1, "content before first @scope"));
        }
    }

    diagnostics
}

/// Lines that advance the anchor counter: content under the active scope,
/// excluding scope lines themselves and whole block groups.
fn counts_toward_anchor(line: &str) -> bool {
    !line.starts_with('@') && !line.starts_with("::")
}

/// Re-emit the active scope after every `anchor_every` content lines.
///
/// A due anchor is placed before the next emitted line, so it can never land
/// between `::`, `<<<` and `>>>`; one due at end of stream, or superseded by
/// a scope change, is dropped.
pub fn insert_anchors(lines: &[String], anchor_every: usize) -> Vec<String> {
    if anchor_every == 0 {
        return lines.to_vec();
    }

    let mut out = Vec::with_capacity(lines.len());
    let mut current: Option<&str> = None;
    let mut since_anchor = 0usize;
    let mut pending = false;
    let mut in_payload = false;

    for line in lines {
        if !in_payload && line.starts_with('@') {
            current = Some(line);
            since_anchor = 0;
            pending = false;
            out.push(line.clone());
            continue;
        }

        if pending && !in_payload {
            if let Some(scope) = current {
                out.push(scope.to_string());
            }
            since_anchor = 0;
            pending = false;
        }

        out.push(line.clone());

        if in_payload {
            if is_block_close(line) {
                in_payload = false;
            }
            continue;
        }
        if is_block_open(line) {
            in_payload = true;
            continue;
        }
        if counts_toward_anchor(line) {
            since_anchor += 1;
            if since_anchor >= anchor_every {
                pending = true;
            }
        }
    }

    out
}

/// Run validation and anchor insertion.
pub fn finalize(lines: Vec<String>, opts: &CompileOptions) -> (Vec<String>, Vec<Diagnostic>) {
    let diagnostics = validate(&lines);
    let lines = insert_anchors(&lines, opts.anchor_every);
    (lines, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_clean_stream() {
        let diags = validate(&lines(&["@scope", "text", ":k=v"]));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_validate_flags_early_content() {
        let diags = validate(&lines(&["text first", "@scope", "fine"]));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 1);
    }

    #[test]
    fn test_validate_skips_payload() {
        let diags = validate(&lines(&["::code", "<<<", "raw before scope", ">>>", "@s"]));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_validate_allows_metadata_first() {
        let diags = validate(&lines(&["~meta line", "@scope", "text"]));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_anchor_after_every_n_lines() {
        let result = insert_anchors(&lines(&["@s", "-a", "-b", "-c", "-d", "-e"]), 2);
        assert_eq!(result, vec!["@s", "-a", "-b", "@s", "-c", "-d", "@s", "-e"]);
    }

    #[test]
    fn test_anchor_counter_resets_on_scope_change() {
        let result = insert_anchors(&lines(&["@s", "-a", "@t", "-b", "-c", "-d"]), 2);
        assert_eq!(result, vec!["@s", "-a", "@t", "-b", "-c", "@t", "-d"]);
    }

    #[test]
    fn test_no_trailing_anchor() {
        let result = insert_anchors(&lines(&["@s", "-a", "-b"]), 2);
        assert_eq!(result, vec!["@s", "-a", "-b"]);
    }

    #[test]
    fn test_anchor_never_splits_block_group() {
        let input = lines(&["@s", "-a", "::json", "<<<", "payload", ">>>", "-b"]);
        let result = insert_anchors(&input, 1);
        // The anchor due after "-a" lands before the block group, never
        // between its delimiters.
        assert_eq!(
            result,
            vec!["@s", "-a", "@s", "::json", "<<<", "payload", ">>>", "-b"]
        );
    }

    #[test]
    fn test_zero_disables_anchors() {
        let input = lines(&["@s", "-a", "-b", "-c"]);
        assert_eq!(insert_anchors(&input, 0), input);
    }
}
