//! Generated artifacts.
//!
//! An [`Artifact`] is one output file: where it goes, the sections that make
//! up its body, and how the rendered body is turned into the final file.

use std::path::{Path, PathBuf};

use eyre::Result;
use kiln_core::write_file;

use crate::SectionDescriptor;

/// Produces the sections of a file given the generated package root.
pub type SectionsFn = Box<dyn Fn(&str) -> Vec<SectionDescriptor> + Send + Sync>;

/// A single generated output file.
pub trait Artifact {
    /// Path of the file relative to the generated directory.
    fn output_path(&self) -> &Path;

    /// The sections of the file, in order.
    fn sections(&self, gen_pkg: &str) -> Vec<SectionDescriptor>;

    /// Turn a rendered body into the final file at `path`.
    ///
    /// `path` is the absolute location chosen by the driver. The file is
    /// fully overwritten.
    fn finalize(&self, path: &Path, body: &str) -> Result<()>;

    /// Produce the final file content in memory, without touching disk.
    fn format(&self, body: &str) -> Result<String>;
}

/// A file written verbatim (TOML, Markdown, shell scripts...).
pub struct RawFile {
    path: PathBuf,
    sections: SectionsFn,
}

impl RawFile {
    /// Create a raw file generator.
    pub fn new(
        path: impl Into<PathBuf>,
        sections: impl Fn(&str) -> Vec<SectionDescriptor> + Send + Sync + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            sections: Box::new(sections),
        }
    }
}

impl Artifact for RawFile {
    fn output_path(&self) -> &Path {
        &self.path
    }

    fn sections(&self, gen_pkg: &str) -> Vec<SectionDescriptor> {
        (self.sections)(gen_pkg)
    }

    fn finalize(&self, path: &Path, body: &str) -> Result<()> {
        write_file(path, body)
    }

    fn format(&self, body: &str) -> Result<String> {
        Ok(body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_raw_file_sections_receive_gen_pkg() {
        let file = RawFile::new("README.md", |pkg| {
            vec![SectionDescriptor::new("title", "# {{ pkg }}").bind("pkg", pkg)]
        });

        let sections = file.sections("storage/gen");

        assert_eq!(file.output_path(), Path::new("README.md"));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].data()["pkg"], "storage/gen");
    }

    #[test]
    fn test_raw_file_finalize_writes_body_verbatim() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docs").join("README.md");
        let file = RawFile::new("docs/README.md", |_| Vec::new());

        file.finalize(&path, "#  keep   spacing\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "#  keep   spacing\n"
        );
        assert_eq!(file.format("x").unwrap(), "x");
    }
}
