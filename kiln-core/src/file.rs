use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

/// Trait for types that represent a generated file
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Get the rules for writing this file
    fn rules(&self) -> FileRules;

    /// Render the file content
    fn render(&self) -> String;

    /// Write the file to disk
    fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = self.path(base);
        let rules = self.rules();
        write_with_rules(&path, &rules, &self.render())
    }
}

/// Write `content` to `path`, creating parent directories.
///
/// Existing files are truncated and replaced.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(path, content)
        .wrap_err_with(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

fn write_with_rules(path: &Path, rules: &FileRules, content: &str) -> Result<WriteResult> {
    if rules.overwrite == Overwrite::IfMissing && path.exists() {
        tracing::debug!(path = %path.display(), "file exists, skipping");
        return Ok(WriteResult::Skipped);
    }

    match rules.header {
        Some(header) => write_file(path, &format!("{}\n\n{}", header, content))?,
        None => write_file(path, content)?,
    }
    Ok(WriteResult::Written)
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File was skipped (already exists)
    Skipped,
}

/// A file to be generated
pub struct File {
    path: PathBuf,
    content: String,
    rules: FileRules,
}

impl File {
    /// Create a new file with the given path and content (default rules: always overwrite)
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    /// Replace the write rules.
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the file according to its rules
    pub fn write(&self) -> Result<WriteResult> {
        write_with_rules(&self.path, &self.rules, &self.content)
    }
}

/// Rules that determine how a file should be written
#[derive(Debug, Clone)]
pub struct FileRules {
    pub overwrite: Overwrite,
    pub header: Option<&'static str>,
}

impl FileRules {
    /// Rules for scaffolding that must never clobber user edits.
    pub fn scaffold() -> Self {
        Self {
            overwrite: Overwrite::IfMissing,
            header: None,
        }
    }
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Always overwrite (generated code)
    Always,
    /// Only create if file doesn't exist (scaffolding)
    IfMissing,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            overwrite: Overwrite::Always,
            header: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("c").join("test.rs");

        write_file(&path, "nested").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_write_file_truncates_longer_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.rs");

        write_file(&path, "a much longer first version").unwrap();
        write_file(&path, "short").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_file_write_always_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.rs");
        fs::write(&path, "original").unwrap();

        let result = File::new(&path, "updated").write().unwrap();

        assert_eq!(result, WriteResult::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
    }

    #[test]
    fn test_file_write_if_missing_skips_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kiln.toml");
        fs::write(&path, "original").unwrap();

        let result = File::new(&path, "should not write")
            .with_rules(FileRules::scaffold())
            .write()
            .unwrap();

        assert_eq!(result, WriteResult::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_file_write_if_missing_creates_new() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kiln.toml");

        let file = File::new(&path, "new content").with_rules(FileRules::scaffold());
        assert!(!file.exists());

        assert_eq!(file.write().unwrap(), WriteResult::Written);
        assert!(file.exists());
    }

    #[test]
    fn test_file_write_prepends_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");

        File::new(&path, "body\n")
            .with_rules(FileRules {
                overwrite: Overwrite::Always,
                header: Some("<!-- generated -->"),
            })
            .write()
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<!-- generated -->\n\nbody\n"
        );
    }

    #[test]
    fn test_generated_file_trait_uses_base_dir() {
        struct Readme;

        impl GeneratedFile for Readme {
            fn path(&self, base: &Path) -> PathBuf {
                base.join("README.md")
            }

            fn rules(&self) -> FileRules {
                FileRules::default()
            }

            fn render(&self) -> String {
                "# readme\n".to_string()
            }
        }

        let temp = TempDir::new().unwrap();
        assert_eq!(Readme.write(temp.path()).unwrap(), WriteResult::Written);
        assert_eq!(
            fs::read_to_string(temp.path().join("README.md")).unwrap(),
            "# readme\n"
        );
    }
}
