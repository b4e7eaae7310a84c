//! Test utilities for code generators.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{collections::BTreeMap, path::Path};

use eyre::Result;

/// Assert that two strings are equal, with a line diff on failure.
pub fn assert_content_eq(expected: &str, actual: &str) {
    if expected != actual {
        let expected_lines: Vec<&str> = expected.lines().collect();
        let actual_lines: Vec<&str> = actual.lines().collect();

        let mut diff = String::new();
        let max_lines = expected_lines.len().max(actual_lines.len());

        for i in 0..max_lines {
            let exp = expected_lines.get(i).copied().unwrap_or("<missing>");
            let act = actual_lines.get(i).copied().unwrap_or("<missing>");

            if exp != act {
                diff.push_str(&format!("Line {}:\n", i + 1));
                diff.push_str(&format!("  expected: {:?}\n", exp));
                diff.push_str(&format!("  actual:   {:?}\n", act));
            }
        }

        if diff.is_empty() {
            diff.push_str("  (contents differ only in trailing newlines)\n");
        }

        panic!("Content mismatch:\n{}", diff);
    }
}

/// Generate into a temporary directory and return it.
///
/// The directory will be cleaned up when the returned `TempDir` is dropped.
pub fn generate_to_temp<F>(generate: F) -> Result<tempfile::TempDir>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let temp_dir = tempfile::TempDir::new()?;
    generate(temp_dir.path())?;
    Ok(temp_dir)
}

/// Read every file below `dir`, keyed by `/`-separated relative path.
pub fn read_tree(dir: &Path) -> Result<BTreeMap<String, String>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, String>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                walk(root, &path, out)?;
            } else {
                let rel = path
                    .strip_prefix(root)?
                    .to_string_lossy()
                    .replace('\\', "/");
                out.insert(rel, std::fs::read_to_string(&path)?);
            }
        }
        Ok(())
    }

    let mut files = BTreeMap::new();
    if dir.exists() {
        walk(dir, dir, &mut files)?;
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_tree_collects_nested_files() {
        let temp = generate_to_temp(|dir| {
            std::fs::create_dir_all(dir.join("a/b"))?;
            std::fs::write(dir.join("a/b/c.rs"), "fn c() {}\n")?;
            std::fs::write(dir.join("top.rs"), "fn top() {}\n")?;
            Ok(())
        })
        .unwrap();

        let files = read_tree(temp.path()).unwrap();

        assert_eq!(
            files.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a/b/c.rs", "top.rs"]
        );
        assert_content_eq("fn c() {}\n", &files["a/b/c.rs"]);
    }

    #[test]
    #[should_panic(expected = "Line 2")]
    fn test_assert_content_eq_reports_line() {
        assert_content_eq("a\nb\n", "a\nc\n");
    }
}
