//! Manifest-to-artifact translation.
//!
//! Centralizes how a `kiln.toml` becomes a renderer with shared templates
//! and one [`Artifact`] per `[[files]]` entry.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use eyre::{Result, WrapErr};
use kiln_codegen::{Artifact, RawFile, SectionDescriptor, SectionRenderer, Writer};
use kiln_codegen_rust::{Finalizer, SourceFile, pipeline::SnapshotPlugin};
use kiln_manifest::{FileKind, FileSpec, KilnToml, Manifest};

/// Variable every section can use to refer to the generated package.
const PACKAGE_BINDING: &str = "package";

/// An opened kiln project.
pub struct Project {
    toml: KilnToml,
}

impl Project {
    pub fn open(config: &Path) -> kiln_manifest::Result<Self> {
        Ok(Self {
            toml: KilnToml::open(config)?,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        self.toml.manifest()
    }

    pub fn config_path(&self) -> &Path {
        self.toml.path()
    }

    /// The output root: the override if given, else the manifest's
    /// `project.output` resolved against the manifest directory.
    pub fn output_dir(&self, output: Option<&Path>) -> PathBuf {
        match output {
            Some(dir) => dir.to_path_buf(),
            None => self.toml.output_dir(),
        }
    }

    /// A renderer with every `[templates]` entry registered.
    pub fn renderer(&self) -> Result<SectionRenderer> {
        let mut renderer = SectionRenderer::new();
        for (name, source) in &self.manifest().templates {
            renderer
                .add_template(name.clone(), source.clone())
                .wrap_err_with(|| format!("invalid shared template '{name}'"))?;
        }
        Ok(renderer)
    }

    pub fn writer(&self, output_dir: &Path) -> Result<Writer> {
        let writer = Writer::new(output_dir, self.manifest().project.package());
        Ok(writer.with_renderer(self.renderer()?))
    }

    /// Build one artifact per file, reading `source` templates from disk.
    ///
    /// Rust files get a finalizer with `snapshots` attached when given.
    pub fn artifacts(
        &self,
        snapshots: Option<&Arc<SnapshotPlugin>>,
    ) -> kiln_manifest::Result<Vec<Box<dyn Artifact>>> {
        self.manifest()
            .files
            .iter()
            .map(|file| self.artifact(file, snapshots))
            .collect()
    }

    fn artifact(
        &self,
        file: &FileSpec,
        snapshots: Option<&Arc<SnapshotPlugin>>,
    ) -> kiln_manifest::Result<Box<dyn Artifact>> {
        let sections = file
            .sections
            .iter()
            .map(|section| {
                let template = self.toml.section_template(section)?;
                Ok(SectionDescriptor::new(section.name(), template).with_data(section.data.clone()))
            })
            .collect::<kiln_manifest::Result<Vec<_>>>()?;

        let sections_fn = move |gen_pkg: &str| {
            sections
                .iter()
                .cloned()
                .map(|section| {
                    if section.data().contains_key(PACKAGE_BINDING) {
                        section
                    } else {
                        section.bind(PACKAGE_BINDING, gen_pkg)
                    }
                })
                .collect::<Vec<_>>()
        };

        let artifact: Box<dyn Artifact> = match file.kind() {
            FileKind::Rust => {
                let mut finalizer = Finalizer::new();
                if let Some(plugin) = snapshots {
                    finalizer = finalizer.plugin(Arc::clone(plugin));
                }
                Box::new(SourceFile::new(file.path(), sections_fn).with_finalizer(finalizer))
            }
            FileKind::Raw => Box::new(RawFile::new(file.path(), sections_fn)),
        };
        Ok(artifact)
    }
}
