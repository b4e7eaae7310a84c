//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from checking a project without writing.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Number of files checked.
    pub checked: usize,
    /// Files that failed to render or finalize.
    pub failures: Vec<FileFailure>,
}

/// A file that could not be generated.
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    /// The error chain, rendered.
    pub message: String,
}

impl CheckReport {
    /// Whether every file rendered and finalized.
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for failure in &self.failures {
            out.error(&format!("{}: {}", failure.path, failure.message));
        }

        if self.is_valid() {
            out.preformatted(&format!(
                "✓ {} is valid ({} file{})",
                self.config_path.display(),
                self.checked,
                if self.checked == 1 { "" } else { "s" }
            ));
        } else {
            out.newline();
            out.preformatted(&format!(
                "{} of {} files failed",
                self.failures.len(),
                self.checked
            ));
        }
    }
}
