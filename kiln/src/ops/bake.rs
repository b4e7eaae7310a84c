//! Bake operation - render and finalize every file in the manifest.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use kiln_codegen::Artifact;

use crate::{
    project::Project,
    reports::{BakeReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult},
};

/// Options for the bake operation.
pub struct BakeOptions<'a> {
    /// Output root; files land in its generated directory.
    pub output_dir: &'a Path,
    /// Whether to preview without writing files.
    pub dry_run: bool,
    /// Whether to remove the generated directory first.
    pub clean: bool,
    /// Where phase snapshots are written, if visualization is enabled.
    pub debug_dir: Option<&'a Path>,
}

/// Execute the bake operation.
///
/// Stops at the first file that fails to render or finalize.
pub fn bake(
    project: &Project,
    artifacts: &[Box<dyn Artifact>],
    opts: BakeOptions,
) -> Result<BakeReport> {
    let manifest = project.manifest();
    let mut writer = project.writer(opts.output_dir)?;
    if !opts.clean {
        writer = writer.keep_existing();
    }

    let result = if opts.dry_run {
        let files = writer
            .preview(artifacts)
            .wrap_err("Failed to preview generated files")?
            .into_iter()
            .map(|f| PreviewFile {
                path: f.path,
                content: f.content,
            })
            .collect();
        GenerationResult::Preview(PreviewResult { files })
    } else {
        let gen_dir = writer.gen_dir();
        let generated = writer
            .write_all(artifacts)
            .wrap_err("Failed to generate files")?;

        GenerationResult::Written(WrittenResult {
            files: generated
                .written
                .iter()
                .map(|path| super::relative(path, &gen_dir))
                .collect(),
            gen_dir,
            cleaned: generated.cleaned,
            debug_dir: opts.debug_dir.map(PathBuf::from),
        })
    };

    Ok(BakeReport {
        project: manifest.project.name().to_string(),
        package: manifest.project.package().to_string(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use kiln_codegen_rust::pipeline::SnapshotPlugin;
    use tempfile::TempDir;

    use super::*;

    const MANIFEST: &str = r#"
[project]
name = "storage"

[[files]]
path = "storage/service.rs"

[[files.sections]]
name = "imports"
template = "use std::fmt;\nuse std::collections::HashMap;"

[[files.sections]]
name = "types"
template = "pub struct {{ name }} { items: HashMap<String, u64> }"
data = { name = "Service" }
"#;

    fn project(manifest: &str) -> (TempDir, Project) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("kiln.toml"), manifest).unwrap();
        let project = Project::open(&temp.path().join("kiln.toml")).unwrap();
        (temp, project)
    }

    fn options(output_dir: &Path) -> BakeOptions<'_> {
        BakeOptions {
            output_dir,
            dry_run: false,
            clean: true,
            debug_dir: None,
        }
    }

    #[test]
    fn test_bake_writes_finalized_files() {
        let (temp, project) = project(MANIFEST);
        let artifacts = project.artifacts(None).unwrap();

        let report = bake(&project, &artifacts, options(temp.path())).unwrap();

        let GenerationResult::Written(written) = report.result else {
            panic!("expected written files");
        };
        assert_eq!(written.files, vec!["storage/service.rs"]);
        assert_eq!(
            fs::read_to_string(temp.path().join("gen/storage/service.rs")).unwrap(),
            "use std::collections::HashMap;\n\npub struct Service {\n    items: HashMap<String, u64>,\n}\n"
        );
    }

    #[test]
    fn test_bake_cleans_stale_files() {
        let (temp, project) = project(MANIFEST);
        let stale = temp.path().join("gen/old.rs");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "pub struct Old;\n").unwrap();
        let artifacts = project.artifacts(None).unwrap();

        let report = bake(&project, &artifacts, options(temp.path())).unwrap();

        assert!(matches!(
            report.result,
            GenerationResult::Written(WrittenResult { cleaned: true, .. })
        ));
        assert!(!stale.exists());
    }

    #[test]
    fn test_bake_keep_existing() {
        let (temp, project) = project(MANIFEST);
        let kept = temp.path().join("gen/kept.rs");
        fs::create_dir_all(kept.parent().unwrap()).unwrap();
        fs::write(&kept, "pub struct Kept;\n").unwrap();
        let artifacts = project.artifacts(None).unwrap();

        bake(
            &project,
            &artifacts,
            BakeOptions {
                clean: false,
                ..options(temp.path())
            },
        )
        .unwrap();

        assert!(kept.exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (temp, project) = project(MANIFEST);
        let artifacts = project.artifacts(None).unwrap();

        let report = bake(
            &project,
            &artifacts,
            BakeOptions {
                dry_run: true,
                ..options(temp.path())
            },
        )
        .unwrap();

        let GenerationResult::Preview(preview) = report.result else {
            panic!("expected a preview");
        };
        assert_eq!(preview.files[0].path, "storage/service.rs");
        assert!(preview.files[0].content.starts_with("use std::collections::HashMap;\n"));
        assert!(!temp.path().join("gen").exists());
    }

    #[test]
    fn test_syntax_error_stops_bake() {
        let (temp, project) = project(
            "[project]\nname = \"demo\"\n\n[[files]]\npath = \"a.rs\"\n\n\
             [[files.sections]]\nname = \"body\"\ntemplate = \"pub struct {\"\n",
        );
        let artifacts = project.artifacts(None).unwrap();

        let err = bake(&project, &artifacts, options(temp.path())).unwrap_err();

        assert!(format!("{err:#}").contains("a.rs"));
        assert!(!temp.path().join("gen/a.rs").exists());
    }

    #[test]
    fn test_visualize_writes_phase_snapshots() {
        let (temp, project) = project(MANIFEST);
        let debug_dir = temp.path().join(".kiln/debug");
        let snapshots = Arc::new(SnapshotPlugin::with_output_dir(&debug_dir));
        let artifacts = project.artifacts(Some(&snapshots)).unwrap();

        bake(
            &project,
            &artifacts,
            BakeOptions {
                debug_dir: Some(&debug_dir),
                ..options(temp.path())
            },
        )
        .unwrap();

        assert_eq!(snapshots.snapshots().len(), 5);
        assert!(debug_dir.exists());
    }
}
