//! Input collection and assembly.
//!
//! The compiler core consumes one already-assembled string; this module owns
//! the caller-side contract: directories are walked recursively, only
//! Markdown and LLMD extensions are accepted, the file list is sorted
//! lexicographically, and file contents are joined with a single blank line
//! so multi-file runs stay deterministic.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const ACCEPTED_EXTENSIONS: &[&str] = &["md", "markdown", "llmd"];

fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if path.is_file() && is_accepted(&path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Expand the given paths into a sorted list of source files.
pub fn collect_files(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in inputs {
        if path.is_dir() {
            walk(path, &mut out)?;
        } else if path.is_file() && is_accepted(path) {
            out.push(path.clone());
        }
    }
    out.sort();
    Ok(out)
}

/// Read and concatenate the files with a single blank line between them.
/// Invalid UTF-8 sequences become U+FFFD rather than failing the run.
pub fn assemble(files: &[PathBuf]) -> io::Result<String> {
    let mut assembled = String::new();
    for path in files {
        if !assembled.is_empty() {
            assembled.push('\n');
        }
        let bytes = fs::read(path)?;
        assembled.push_str(&String::from_utf8_lossy(&bytes));
    }
    Ok(assembled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extension_filter() {
        assert!(is_accepted(Path::new("notes.md")));
        assert!(is_accepted(Path::new("notes.MD")));
        assert!(is_accepted(Path::new("doc.markdown")));
        assert!(is_accepted(Path::new("out.llmd")));
        assert!(!is_accepted(Path::new("script.py")));
        assert!(!is_accepted(Path::new("README")));
    }

    #[test]
    fn test_collect_is_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("b.md"), "b").unwrap();
        fs::write(root.join("a.md"), "a").unwrap();
        fs::write(root.join("sub/c.md"), "c").unwrap();
        fs::write(root.join("skip.txt"), "x").unwrap();

        let files = collect_files(&[root.to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "sub/c.md"]);
    }

    #[test]
    fn test_assemble_joins_with_blank_line() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        fs::write(&a, "# A\n").unwrap();
        fs::write(&b, "# B\n").unwrap();
        let text = assemble(&[a, b]).unwrap();
        assert_eq!(text, "# A\n\n# B\n");
    }
}
