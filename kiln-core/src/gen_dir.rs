//! Layout of the generated output directory.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

/// Name of the subdirectory of the output directory that holds generated
/// files.
///
/// The directory is owned by kiln: it is wiped and re-written on every run.
pub const GEN_DIR: &str = "gen";

/// Path of the generated directory under `output_dir`.
pub fn gen_dir(output_dir: &Path) -> PathBuf {
    output_dir.join(GEN_DIR)
}

/// Remove the generated directory under `output_dir`.
///
/// Returns `true` if a directory was removed, `false` if there was nothing
/// to remove.
pub fn clean_gen_dir(output_dir: &Path) -> Result<bool> {
    let dir = gen_dir(output_dir);
    if !dir.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(&dir)
        .wrap_err_with(|| format!("failed to remove '{}'", dir.display()))?;
    tracing::debug!(dir = %dir.display(), "removed generated directory");
    Ok(true)
}
