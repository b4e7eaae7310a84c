//! Bake command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from code generation.
#[derive(Debug)]
pub struct BakeReport {
    /// Project name from the manifest.
    pub project: String,

    /// Package name handed to every section.
    pub package: String,

    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// The generated directory.
    pub gen_dir: PathBuf,
    /// Whether a previous generated directory was removed first.
    pub cleaned: bool,
    /// Written files, relative to `gen_dir`.
    pub files: Vec<String>,
    /// Path to phase snapshots, if visualization was enabled.
    pub debug_dir: Option<PathBuf>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    pub files: Vec<PreviewFile>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: String,
    pub content: String,
}

impl Report for BakeReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl BakeReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        if let Some(debug_dir) = &written.debug_dir {
            out.key_value(
                "Pipeline snapshots written to",
                &debug_dir.display().to_string(),
            );
            out.newline();
        }

        out.preformatted(&format!("{} ({})", self.project, self.package));
        out.newline();

        out.section(&format!("Files ({})", written.files.len()));
        for file in &written.files {
            out.added_item(file);
        }
        out.newline();

        let generated = written.gen_dir.display().to_string();
        if written.cleaned {
            out.key_value("Regenerated", &generated);
        } else {
            out.key_value("Generated", &generated);
        }
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for file in &preview.files {
            out.divider(&file.path);
            out.preformatted(file.content.trim_end_matches('\n'));
        }

        out.divider("Summary");
        out.preformatted(&format!(
            "{} file{} would be generated",
            preview.files.len(),
            if preview.files.len() == 1 { "" } else { "s" }
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_render_written() {
        let report = BakeReport {
            project: "storage".to_string(),
            package: "storage".to_string(),
            result: GenerationResult::Written(WrittenResult {
                gen_dir: PathBuf::from("out/gen"),
                cleaned: true,
                files: vec!["service.rs".to_string()],
                debug_dir: None,
            }),
        };

        assert_eq!(
            BufferOutput::render(&report),
            "storage (storage)\n\nFiles (1):\n  + service.rs\n\nRegenerated: out/gen"
        );
    }

    #[test]
    fn test_render_preview() {
        let report = BakeReport {
            project: "storage".to_string(),
            package: "storage".to_string(),
            result: GenerationResult::Preview(PreviewResult {
                files: vec![PreviewFile {
                    path: "lib.rs".to_string(),
                    content: "pub struct S;\n".to_string(),
                }],
            }),
        };

        assert_eq!(
            BufferOutput::render(&report),
            "── lib.rs ──\npub struct S;\n── Summary ──\n1 file would be generated"
        );
    }
}
