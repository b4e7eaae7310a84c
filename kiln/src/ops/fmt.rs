//! Fmt operation - finalize existing Rust files in place.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use kiln_codegen_rust::Finalizer;

use crate::reports::FmtReport;

/// Execute the fmt operation.
///
/// Directories are walked recursively for `.rs` files. With `check`, no
/// file is touched and changed files are only reported. A file that fails
/// to finalize is reported and the rest are still processed.
pub fn fmt(paths: &[PathBuf], check: bool) -> Result<FmtReport> {
    let finalizer = Finalizer::new();
    let mut report = FmtReport {
        check,
        changed: Vec::new(),
        unchanged: 0,
        failures: Vec::new(),
    };

    for file in rust_files(paths)? {
        let original = std::fs::read_to_string(&file)
            .wrap_err_with(|| format!("failed to read '{}'", file.display()))?;

        let formatted = match finalizer.format_str(&original) {
            Ok(finalized) => finalized.content,
            Err(e) => {
                report.failures.push((file, first_line(&e.to_string())));
                continue;
            }
        };

        if formatted == original {
            report.unchanged += 1;
            continue;
        }

        if !check && let Err(e) = finalizer.format_file(&file) {
            report.failures.push((file, first_line(&e.to_string())));
            continue;
        }
        tracing::debug!(path = %file.display(), check, "file changed");
        report.changed.push(file);
    }

    Ok(report)
}

fn rust_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(
                super::walk_files(path)?
                    .into_iter()
                    .filter(|file| is_rust(file)),
            );
        } else if path.exists() {
            files.push(path.clone());
        } else {
            eyre::bail!("'{}' does not exist", path.display());
        }
    }
    Ok(files)
}

fn is_rust(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "rs")
}

/// Syntax errors carry the whole file; keep the located message only.
fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}
