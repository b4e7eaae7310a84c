//! Core operations.
//!
//! This module contains the business logic for kiln commands,
//! separated from CLI argument parsing and output rendering.

pub mod bake;
pub mod check;
pub mod clean;
pub mod fmt;
pub mod init;
pub mod list;

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

pub use bake::bake;
pub use check::check;
pub use clean::clean;
pub use fmt::fmt;
pub use init::init;
pub use list::list;

/// Every file below `dir`, sorted, skipping hidden entries and `target`
/// directories.
pub(crate) fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current)
            .wrap_err_with(|| format!("failed to read directory '{}'", current.display()))?;
        for entry in entries {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if name.starts_with('.') {
                continue;
            }
            if path.is_dir() {
                if name != "target" {
                    pending.push(path);
                }
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// `path` relative to `base`, with `/` separators.
pub(crate) fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
