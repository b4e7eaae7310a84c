//! Clean operation - remove the generated directory.

use std::path::Path;

use eyre::Result;
use kiln_core::{clean_gen_dir, gen_dir};

use crate::reports::CleanReport;

/// Options for the clean operation.
pub struct CleanOptions<'a> {
    /// Output root containing the generated directory.
    pub output_dir: &'a Path,
    /// Whether to preview without deleting.
    pub dry_run: bool,
}

/// Execute the clean operation.
pub fn clean(opts: CleanOptions) -> Result<CleanReport> {
    let dir = gen_dir(opts.output_dir);
    let files = if dir.is_dir() {
        super::walk_files(&dir)?
            .iter()
            .map(|path| super::relative(path, &dir))
            .collect()
    } else {
        Vec::new()
    };

    if !opts.dry_run {
        clean_gen_dir(opts.output_dir)?;
    }

    Ok(CleanReport {
        dry_run: opts.dry_run,
        gen_dir: dir,
        files,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn populate(root: &Path) {
        fs::create_dir_all(root.join("gen/storage")).unwrap();
        fs::write(root.join("gen/storage/service.rs"), "").unwrap();
        fs::write(root.join("gen/README.md"), "").unwrap();
    }

    #[test]
    fn test_dry_run_lists_without_deleting() {
        let temp = TempDir::new().unwrap();
        populate(temp.path());

        let report = clean(CleanOptions {
            output_dir: temp.path(),
            dry_run: true,
        })
        .unwrap();

        assert_eq!(report.files, vec!["README.md", "storage/service.rs"]);
        assert!(temp.path().join("gen").exists());
    }

    #[test]
    fn test_clean_removes_gen_dir() {
        let temp = TempDir::new().unwrap();
        populate(temp.path());

        let report = clean(CleanOptions {
            output_dir: temp.path(),
            dry_run: false,
        })
        .unwrap();

        assert_eq!(report.files.len(), 2);
        assert!(!temp.path().join("gen").exists());
    }

    #[test]
    fn test_clean_without_gen_dir() {
        let temp = TempDir::new().unwrap();

        let report = clean(CleanOptions {
            output_dir: temp.path(),
            dry_run: false,
        })
        .unwrap();

        assert!(report.files.is_empty());
    }
}
