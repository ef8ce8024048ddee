//! Table handling through the full pipeline: classification, the three
//! encodings, and their interaction with key-value batching.

use llmd_compiler::{compile, CompileOptions};

#[test]
fn test_property_table_becomes_pairs() {
    let source = "\
# S
| Key | Value |
|-----|-------|
| host | localhost |
| port | 8080 |
";
    assert_eq!(
        compile(source, &CompileOptions::default()),
        "@s\n:host=localhost port=8080\n"
    );
}

#[test]
fn test_property_table_with_informative_header_declares_col() {
    let source = "\
# S
| Option | Meaning |
|--------|---------|
| quiet | less output |
| strict | fail fast |
";
    let out = compile(source, &CompileOptions::default());
    assert!(out.contains(":_col=meaning"));
    assert!(out.contains(":quiet=less output strict=fail fast"));
}

#[test]
fn test_keyed_multi_declares_cols_and_packs_values() {
    let source = "\
# S
| Flag | Short | Purpose |
|------|-------|---------|
| verbose | v | more detail |
| output | o | target file |
";
    let out = compile(source, &CompileOptions::default());
    assert!(out.contains(":_cols=flag\u{00A6}short\u{00A6}purpose"));
    assert!(out.contains("verbose=v\u{00A6}more detail"));
    assert!(out.contains("output=o\u{00A6}target file"));
}

#[test]
fn test_duplicate_first_column_emits_raw_rows() {
    let source = "\
# S
| Key | Value |
|-----|-------|
| dup | 1 |
| dup | 2 |
";
    let out = compile(source, &CompileOptions::default());
    assert!(out.contains(":_cols=key\u{00A6}value"));
    assert!(out.contains("dup\u{00A6}1"));
    assert!(out.contains("dup\u{00A6}2"));
}

#[test]
fn test_prose_first_column_emits_raw_rows() {
    let source = "\
# S
| Step | Result |
|------|--------|
| open the lid of the box first | ok |
";
    let out = compile(source, &CompileOptions::default());
    assert!(out.contains("open lid box first\u{00A6}ok"));
}

#[test]
fn test_ragged_table_demotes_to_raw() {
    let source = "\
# S
| A | B |
|---|---|
| x | 1 |
| solo |
";
    let out = compile(source, &CompileOptions::default());
    assert!(out.contains(":_cols=a\u{00A6}b"));
    assert!(out.contains("x\u{00A6}1"));
    assert!(out.contains("solo"));
}

#[test]
fn test_table_pairs_merge_with_following_kv_lines() {
    let source = "\
# S
| Key | Value |
|-----|-------|
| host | localhost |
Port: 8080
";
    // Table pairs and the trailing KV line share one batch.
    assert_eq!(
        compile(source, &CompileOptions::default()),
        "@s\n:host=localhost port=8080\n"
    );
}

#[test]
fn test_inline_markup_in_cells_is_rendered() {
    let source = "\
# S
| Key | Value |
|-----|-------|
| style | **bold** text |
";
    assert_eq!(
        compile(source, &CompileOptions::default()),
        "@s\n:style=bold text\n"
    );
}

#[test]
fn test_boolean_columns_in_keyed_multi() {
    let source = "\
# S
| Name | Default | Purpose |
|------|---------|---------|
| cache | enabled | speed |
| trace | disabled | debug |
";
    let out = compile(source, &CompileOptions::default());
    assert!(out.contains("cache=Y\u{00A6}speed"));
    assert!(out.contains("trace=N\u{00A6}debug"));
}
