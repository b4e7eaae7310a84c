//! Clean command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from removing the generated directory.
#[derive(Debug)]
pub struct CleanReport {
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// The generated directory.
    pub gen_dir: PathBuf,
    /// Files below the generated directory, relative to it.
    pub files: Vec<String>,
}

impl Report for CleanReport {
    fn render(&self, out: &mut dyn Output) {
        if self.files.is_empty() {
            out.preformatted("No generated files found.");
            return;
        }

        if self.dry_run {
            out.section(&format!("Would delete {}", self.gen_dir.display()));
        } else {
            out.section(&format!("Deleted {}", self.gen_dir.display()));
        }
        for path in &self.files {
            out.removed_item(path);
        }
    }
}
