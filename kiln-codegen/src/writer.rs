//! Multi-file generation driver.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use kiln_core::{clean_gen_dir, gen_dir};

use crate::{Artifact, SectionRenderer};

/// A generated file for preview
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFile {
    /// Path relative to the generated directory
    pub path: String,
    /// Final file content
    pub content: String,
}

/// Result of a generation run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Whether a previous generated directory was removed first.
    pub cleaned: bool,
    /// Files written, in generation order.
    pub written: Vec<PathBuf>,
}

/// Outcome of checking one artifact in memory.
#[derive(Debug)]
pub struct CheckOutcome {
    /// Path relative to the generated directory.
    pub path: PathBuf,
    /// The failure, if the artifact does not render or finalize.
    pub error: Option<eyre::Report>,
}

/// Renders artifacts and hands their bodies to the artifact's finalizer.
///
/// Artifacts are processed one at a time. Each one owns its output path for
/// the duration of its finalize call; distinct paths never interact.
///
/// # Example
///
/// ```no_run
/// use kiln_codegen::{Artifact, RawFile, SectionDescriptor, Writer};
///
/// let readme = RawFile::new("README.md", |pkg| {
///     vec![SectionDescriptor::new("title", "# {{ pkg }}\n").bind("pkg", pkg)]
/// });
/// let artifacts: Vec<Box<dyn Artifact>> = vec![Box::new(readme)];
///
/// let writer = Writer::new("out", "storage");
/// let report = writer.write_all(&artifacts)?;
/// assert_eq!(report.written.len(), 1);
/// # Ok::<(), eyre::Report>(())
/// ```
pub struct Writer {
    output_dir: PathBuf,
    gen_pkg: String,
    renderer: SectionRenderer,
    clean: bool,
}

impl Writer {
    /// Create a writer rooted at `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, gen_pkg: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            gen_pkg: gen_pkg.into(),
            renderer: SectionRenderer::new(),
            clean: true,
        }
    }

    /// Use a renderer with shared templates already registered.
    pub fn with_renderer(mut self, renderer: SectionRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Keep the existing generated directory instead of wiping it.
    pub fn keep_existing(mut self) -> Self {
        self.clean = false;
        self
    }

    /// The generated directory all artifacts are written below.
    pub fn gen_dir(&self) -> PathBuf {
        gen_dir(&self.output_dir)
    }

    /// Absolute path of an artifact.
    pub fn artifact_path(&self, artifact: &dyn Artifact) -> PathBuf {
        self.gen_dir().join(artifact.output_path())
    }

    /// Remove the generated directory.
    pub fn clean(&self) -> Result<bool> {
        clean_gen_dir(&self.output_dir)
    }

    /// Render the sections of an artifact into its candidate body.
    pub fn render(&self, artifact: &dyn Artifact) -> Result<String> {
        let sections = artifact.sections(&self.gen_pkg);
        let body = self.renderer.render_all(&sections)?;
        Ok(body)
    }

    /// Render and finalize a single artifact on disk.
    pub fn write(&self, artifact: &dyn Artifact) -> Result<PathBuf> {
        let path = self.artifact_path(artifact);
        let body = self
            .render(artifact)
            .wrap_err_with(|| format!("failed to render '{}'", path.display()))?;
        artifact
            .finalize(&path, &body)
            .wrap_err_with(|| format!("failed to finalize '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "generated");
        Ok(path)
    }

    /// Generate every artifact, stopping at the first failure.
    ///
    /// Files written before the failure stay on disk; the failing file may
    /// exist but is not guaranteed to be canonical.
    pub fn write_all(&self, artifacts: &[Box<dyn Artifact>]) -> Result<GenerateReport> {
        let mut report = GenerateReport::default();
        if self.clean {
            report.cleaned = self.clean()?;
        }
        for artifact in artifacts {
            let path = self.write(artifact.as_ref())?;
            report.written.push(path);
        }
        Ok(report)
    }

    /// Run every artifact through rendering and formatting in memory.
    pub fn preview(&self, artifacts: &[Box<dyn Artifact>]) -> Result<Vec<PreviewFile>> {
        artifacts
            .iter()
            .map(|artifact| {
                let content = self.format(artifact.as_ref())?;
                Ok(PreviewFile {
                    path: display_path(artifact.output_path()),
                    content,
                })
            })
            .collect()
    }

    /// Check every artifact in memory, collecting failures instead of
    /// stopping at the first one.
    pub fn check(&self, artifacts: &[Box<dyn Artifact>]) -> Vec<CheckOutcome> {
        artifacts
            .iter()
            .map(|artifact| CheckOutcome {
                path: artifact.output_path().to_path_buf(),
                error: self.format(artifact.as_ref()).err(),
            })
            .collect()
    }

    fn format(&self, artifact: &dyn Artifact) -> Result<String> {
        let path = artifact.output_path();
        let body = self
            .render(artifact)
            .wrap_err_with(|| format!("failed to render '{}'", path.display()))?;
        artifact
            .format(&body)
            .wrap_err_with(|| format!("failed to format '{}'", path.display()))
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{RawFile, SectionDescriptor};

    fn readme() -> Box<dyn Artifact> {
        Box::new(RawFile::new("docs/README.md", |pkg| {
            vec![SectionDescriptor::new("title", "# {{ pkg }}").bind("pkg", pkg)]
        }))
    }

    fn broken() -> Box<dyn Artifact> {
        Box::new(RawFile::new("broken.md", |_| {
            vec![SectionDescriptor::new("body", "{{ missing }}")]
        }))
    }

    #[test]
    fn test_write_places_files_under_gen_dir() {
        let temp = TempDir::new().unwrap();
        let writer = Writer::new(temp.path(), "storage");

        let report = writer.write_all(&[readme()]).unwrap();

        let expected = temp.path().join("gen").join("docs").join("README.md");
        assert_eq!(report.written, vec![expected.clone()]);
        assert_eq!(fs::read_to_string(expected).unwrap(), "# storage\n");
    }

    #[test]
    fn test_write_all_wipes_previous_output() {
        let temp = TempDir::new().unwrap();
        let stale = temp.path().join("gen").join("stale.rs");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "struct Old;").unwrap();

        let report = Writer::new(temp.path(), "storage")
            .write_all(&[readme()])
            .unwrap();

        assert!(report.cleaned);
        assert!(!stale.exists());
    }

    #[test]
    fn test_keep_existing_preserves_output() {
        let temp = TempDir::new().unwrap();
        let stale = temp.path().join("gen").join("stale.rs");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "struct Old;").unwrap();

        let report = Writer::new(temp.path(), "storage")
            .keep_existing()
            .write_all(&[readme()])
            .unwrap();

        assert!(!report.cleaned);
        assert!(stale.exists());
    }

    #[test]
    fn test_write_all_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        let writer = Writer::new(temp.path(), "storage");

        let err = writer.write_all(&[broken(), readme()]).unwrap_err();

        assert!(format!("{:?}", err).contains("broken.md"));
        assert!(!temp.path().join("gen").join("docs").exists());
    }

    #[test]
    fn test_preview_does_not_touch_disk() {
        let temp = TempDir::new().unwrap();
        let writer = Writer::new(temp.path(), "divider");

        let files = writer.preview(&[readme()]).unwrap();

        assert_eq!(
            files,
            vec![PreviewFile {
                path: "docs/README.md".to_string(),
                content: "# divider\n".to_string(),
            }]
        );
        assert!(!writer.gen_dir().exists());
    }

    #[test]
    fn test_check_collects_every_failure() {
        let temp = TempDir::new().unwrap();
        let writer = Writer::new(temp.path(), "storage");

        let outcomes = writer.check(&[broken(), readme(), broken()]);

        let failed: Vec<_> = outcomes.iter().filter(|o| o.error.is_some()).collect();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].path, PathBuf::from("broken.md"));
    }
}
