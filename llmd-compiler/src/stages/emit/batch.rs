//! Key-value batching.
//!
//! Pairs accumulate while consecutive key-value content arrives and are
//! written out in one batch at the next non-KV boundary. At compression 0
//! each pair gets its own `:key=value` line; from compression 1 pairs are
//! packed (at most `max_kv_per_line` per `:` line), optionally after
//! factoring a shared key prefix into a `:_pfx=` declaration.

use crate::options::CompileOptions;

/// Pending pairs for the current batch, in arrival order.
#[derive(Debug, Default)]
pub struct KvBatch {
    pairs: Vec<(String, String)>,
}

/// Longest common string prefix across all keys.
fn longest_common_prefix(keys: &[&str]) -> String {
    let mut prefix = match keys.first() {
        Some(k) => k.to_string(),
        None => return String::new(),
    };
    for key in &keys[1..] {
        while !key.starts_with(&prefix) {
            prefix.pop();
            if prefix.is_empty() {
                return prefix;
            }
        }
    }
    prefix
}

/// Decide the `_pfx` value for this key set, if extraction applies.
///
/// The raw common prefix must reach `min_prefix_len` before it is cut back to
/// the last `-`/`_`/`.` separator (kept inclusive); a prefix with no
/// separator, or one that would start at the first character, is rejected.
fn factor_prefix(keys: &[&str], opts: &CompileOptions) -> Option<String> {
    let mut prefix = longest_common_prefix(keys);
    if prefix.len() < opts.min_prefix_len {
        return None;
    }
    let last_sep = prefix.rfind(['-', '_', '.'])?;
    if last_sep == 0 {
        return None;
    }
    prefix.truncate(last_sep + 1);

    let matching = keys.iter().filter(|k| k.starts_with(&prefix)).count();
    if (matching as f64) / (keys.len() as f64) >= opts.min_prefix_pct {
        Some(prefix)
    } else {
        None
    }
}

impl KvBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: String, value: String) {
        self.pairs.push((key, value));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// End the batch, appending its attribute lines to `out`.
    pub fn flush_into(&mut self, out: &mut Vec<String>, opts: &CompileOptions) {
        if self.pairs.is_empty() {
            return;
        }
        let pairs = std::mem::take(&mut self.pairs);

        if opts.compression == 0 {
            for (key, value) in &pairs {
                out.push(format!(":{}={}", key, value));
            }
            return;
        }

        let mut pairs = pairs;
        if opts.prefix_extraction && pairs.len() >= 3 {
            let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
            if let Some(prefix) = factor_prefix(&keys, opts) {
                out.push(format!(":_pfx={}", prefix));
                pairs = pairs
                    .into_iter()
                    .map(|(key, value)| match key.strip_prefix(&prefix) {
                        Some(rest) => (rest.to_string(), value),
                        None => (key, value),
                    })
                    .collect();
            }
        }

        for chunk in pairs.chunks(opts.max_kv_per_line.max(1)) {
            let rendered: Vec<String> = chunk
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            out.push(format!(":{}", rendered.join(" ")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(compression: u8) -> CompileOptions {
        CompileOptions {
            compression,
            ..CompileOptions::default()
        }
    }

    fn flush(batch: &mut KvBatch, opts: &CompileOptions) -> Vec<String> {
        let mut out = Vec::new();
        batch.flush_into(&mut out, opts);
        out
    }

    #[test]
    fn test_c0_one_line_per_pair() {
        let mut batch = KvBatch::new();
        batch.push("alpha".into(), "1".into());
        batch.push("beta".into(), "2".into());
        assert_eq!(flush(&mut batch, &opts(0)), vec![":alpha=1", ":beta=2"]);
    }

    #[test]
    fn test_c1_packs_pairs() {
        let mut batch = KvBatch::new();
        batch.push("alpha".into(), "1".into());
        batch.push("beta".into(), "2".into());
        assert_eq!(flush(&mut batch, &opts(1)), vec![":alpha=1 beta=2"]);
    }

    #[test]
    fn test_chunking_respects_max_per_line() {
        let mut options = opts(1);
        options.max_kv_per_line = 2;
        let mut batch = KvBatch::new();
        for (k, v) in [("a", "1"), ("b", "2"), ("c", "3")] {
            batch.push(k.into(), v.into());
        }
        // Three short keys share no 6-char prefix, so no _pfx line appears.
        assert_eq!(flush(&mut batch, &options), vec![":a=1 b=2", ":c=3"]);
    }

    #[test]
    fn test_flush_resets_the_batch() {
        let mut batch = KvBatch::new();
        batch.push("k".into(), "v".into());
        let _ = flush(&mut batch, &opts(1));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_prefix_extraction() {
        let mut batch = KvBatch::new();
        for (k, v) in [
            ("network_timeout", "5"),
            ("network_retries", "3"),
            ("network_proxy", "off"),
        ] {
            batch.push(k.into(), v.into());
        }
        assert_eq!(
            flush(&mut batch, &opts(1)),
            vec![":_pfx=network_", ":timeout=5 retries=3 proxy=off"]
        );
    }

    #[test]
    fn test_prefix_needs_three_pairs() {
        let mut batch = KvBatch::new();
        batch.push("network_timeout".into(), "5".into());
        batch.push("network_retries".into(), "3".into());
        assert_eq!(
            flush(&mut batch, &opts(1)),
            vec![":network_timeout=5 network_retries=3"]
        );
    }

    #[test]
    fn test_common_prefix_shorter_than_threshold_rejected() {
        // Common prefix "db_" is under the default length of 6.
        let keys = vec!["db_host", "db_port", "db_user"];
        assert_eq!(factor_prefix(&keys, &opts(1)), None);
    }

    #[test]
    fn test_prefix_without_separator_rejected() {
        let keys = vec!["timeout1", "timeout2", "timeout3"];
        assert_eq!(factor_prefix(&keys, &opts(1)), None);
    }

    #[test]
    fn test_prefix_cut_back_to_separator() {
        let keys = vec!["flm-text--secondary", "flm-text--disabled", "flm-text--error"];
        assert_eq!(factor_prefix(&keys, &opts(1)).as_deref(), Some("flm-text--"));
    }

    #[test]
    fn test_outlier_key_defeats_extraction() {
        // The common prefix is computed across every key, so one unrelated
        // key empties it and the batch is written unfactored.
        let mut batch = KvBatch::new();
        for (k, v) in [
            ("widget-color", "red"),
            ("widget-size", "xl"),
            ("widget-kind", "round"),
            ("other", "1"),
        ] {
            batch.push(k.into(), v.into());
        }
        let lines = flush(&mut batch, &opts(1));
        assert_eq!(lines, vec![":widget-color=red widget-size=xl widget-kind=round other=1"]);
    }

    #[test]
    fn test_extraction_disabled_by_option() {
        let mut options = opts(1);
        options.prefix_extraction = false;
        let mut batch = KvBatch::new();
        for (k, v) in [("net_a", "1"), ("net_b", "2"), ("net_c", "3")] {
            batch.push(k.into(), v.into());
        }
        let lines = flush(&mut batch, &options);
        assert!(lines.iter().all(|l| !l.starts_with(":_pfx")));
    }
}
