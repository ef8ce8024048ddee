//! Stage 1: fenced-region protection.
//!
//! Fenced code is the one region whose bytes must survive the whole pipeline
//! untouched, so it is lifted out before classification. Each region becomes a
//! single placeholder line `⟦BLOCK:n⟧` (U+27E6/U+27E7 brackets) and a
//! `FencedBlock` entry; the emitter reinstates the payload verbatim.

use crate::ir::FencedBlock;
use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(`{3,})([A-Za-z0-9_]*)\s*$").unwrap());

/// Line stream with fenced regions replaced by placeholders.
#[derive(Debug, Clone)]
pub struct Protected {
    pub lines: Vec<String>,
    pub blocks: Vec<FencedBlock>,
}

/// Format the placeholder line for block `index`.
pub fn placeholder(index: usize) -> String {
    format!("\u{27E6}BLOCK:{}\u{27E7}", index)
}

/// Lift fenced regions out of the logical lines.
///
/// A fence closes only on a line whose trimmed form equals the opening
/// backtick run exactly, so longer fences can wrap shorter ones. A fence
/// still open at end of input closes implicitly; the region is kept.
pub fn protect(lines: &[String]) -> Protected {
    let mut blocks: Vec<FencedBlock> = Vec::new();
    let mut out: Vec<String> = Vec::new();

    let mut fence: Option<String> = None;
    let mut lang = String::new();
    let mut payload: Vec<String> = Vec::new();

    for line in lines {
        if fence.is_some() {
            if fence.as_deref() == Some(line.trim()) {
                let index = blocks.len();
                blocks.push(FencedBlock {
                    index,
                    lang: std::mem::take(&mut lang),
                    payload: payload.join("\n"),
                });
                out.push(placeholder(index));
                fence = None;
                payload.clear();
            } else {
                payload.push(line.clone());
            }
        } else if let Some(caps) = FENCE_OPEN.captures(line) {
            fence = Some(caps[1].to_string());
            lang = caps[2].to_string();
            payload.clear();
        } else {
            out.push(line.clone());
        }
    }

    if fence.is_some() {
        let index = blocks.len();
        blocks.push(FencedBlock {
            index,
            lang,
            payload: payload.join("\n"),
        });
        out.push(placeholder(index));
    }

    Protected { lines: out, blocks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_region() {
        let p = protect(&lines(&["before", "```js", "let x = 1;", "```", "after"]));
        assert_eq!(p.lines, vec!["before", "\u{27E6}BLOCK:0\u{27E7}", "after"]);
        assert_eq!(p.blocks.len(), 1);
        assert_eq!(p.blocks[0].lang, "js");
        assert_eq!(p.blocks[0].payload, "let x = 1;");
    }

    #[test]
    fn test_indices_follow_source_order() {
        let p = protect(&lines(&["```py", "x", "```", "mid", "```", "y", "```"]));
        assert_eq!(p.blocks.len(), 2);
        assert_eq!(p.blocks[0].index, 0);
        assert_eq!(p.blocks[1].index, 1);
        assert_eq!(p.blocks[1].lang, "");
        assert_eq!(p.lines[1], "mid");
    }

    #[test]
    fn test_longer_fence_wraps_shorter() {
        let p = protect(&lines(&["````", "```", "inner", "```", "````"]));
        assert_eq!(p.blocks.len(), 1);
        assert_eq!(p.blocks[0].payload, "```\ninner\n```");
    }

    #[test]
    fn test_unterminated_fence_closes_implicitly() {
        let p = protect(&lines(&["```rust", "fn main() {}"]));
        assert_eq!(p.blocks.len(), 1);
        assert_eq!(p.blocks[0].payload, "fn main() {}");
        assert_eq!(p.lines, vec!["\u{27E6}BLOCK:0\u{27E7}"]);
    }

    #[test]
    fn test_unterminated_empty_fence_still_counts() {
        let p = protect(&lines(&["text", "```json"]));
        assert_eq!(p.blocks.len(), 1);
        assert_eq!(p.blocks[0].payload, "");
    }

    #[test]
    fn test_closer_may_carry_surrounding_whitespace() {
        let p = protect(&lines(&["```", "body", "  ```"]));
        assert_eq!(p.blocks.len(), 1);
        assert_eq!(p.blocks[0].payload, "body");
    }

    #[test]
    fn test_opener_with_trailing_text_is_not_a_fence() {
        let p = protect(&lines(&["``` not a fence tag", "x"]));
        assert_eq!(p.blocks.len(), 0);
        assert_eq!(p.lines.len(), 2);
    }
}
