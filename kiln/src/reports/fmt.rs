//! Fmt command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from finalizing existing Rust files.
#[derive(Debug)]
pub struct FmtReport {
    /// Whether files were only checked.
    pub check: bool,
    /// Files whose content changed (or would change).
    pub changed: Vec<PathBuf>,
    /// Number of files already canonical.
    pub unchanged: usize,
    /// Files that could not be finalized, with the error.
    pub failures: Vec<(PathBuf, String)>,
}

impl FmtReport {
    /// Whether the run should exit non-zero.
    pub fn is_failure(&self) -> bool {
        !self.failures.is_empty() || (self.check && !self.changed.is_empty())
    }
}

impl Report for FmtReport {
    fn render(&self, out: &mut dyn Output) {
        for (path, message) in &self.failures {
            out.error(&format!("{}: {}", path.display(), message));
        }

        if !self.changed.is_empty() {
            if self.check {
                out.section("Would reformat");
            } else {
                out.section("Reformatted");
            }
            for path in &self.changed {
                out.list_item(&path.display().to_string());
            }
        }

        let total = self.changed.len() + self.unchanged;
        if self.check && !self.changed.is_empty() {
            out.preformatted("Run `kiln fmt` to fix.");
        } else if self.changed.is_empty() && self.failures.is_empty() {
            out.preformatted(&format!(
                "{} file{} already formatted",
                total,
                if total == 1 { "" } else { "s" }
            ));
        }
    }
}
