use std::path::{Path, PathBuf};

use kiln_codegen::{Artifact, SectionDescriptor, SectionsFn};

use crate::Finalizer;

/// A generated Rust source file.
///
/// Its rendered body is finalized: unused imports are removed, the rest
/// sorted, and the file pretty-printed and laid out.
///
/// # Example
///
/// ```
/// use kiln_codegen::{Artifact, SectionDescriptor};
/// use kiln_codegen_rust::SourceFile;
///
/// let file = SourceFile::new("storage/service.rs", |_| {
///     vec![
///         SectionDescriptor::new("imports", "use std::fmt;"),
///         SectionDescriptor::new("body", "pub struct {{ name }};").bind("name", "Storage"),
///     ]
/// });
///
/// let body = kiln_codegen::render_sections(&file.sections("storage"))?;
/// assert_eq!(file.format(&body)?, "pub struct Storage;\n");
/// # Ok::<(), eyre::Report>(())
/// ```
pub struct SourceFile {
    path: PathBuf,
    sections: SectionsFn,
    finalizer: Finalizer,
}

impl SourceFile {
    pub fn new(
        path: impl Into<PathBuf>,
        sections: impl Fn(&str) -> Vec<SectionDescriptor> + Send + Sync + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            sections: Box::new(sections),
            finalizer: Finalizer::new(),
        }
    }

    /// Use a finalizer with plugins attached.
    pub fn with_finalizer(mut self, finalizer: Finalizer) -> Self {
        self.finalizer = finalizer;
        self
    }
}

impl Artifact for SourceFile {
    fn output_path(&self) -> &Path {
        &self.path
    }

    fn sections(&self, gen_pkg: &str) -> Vec<SectionDescriptor> {
        (self.sections)(gen_pkg)
    }

    fn finalize(&self, path: &Path, body: &str) -> eyre::Result<()> {
        let finalized = self.finalizer.finalize(path, body)?;
        for diagnostic in &finalized.diagnostics {
            tracing::debug!(path = %path.display(), "{diagnostic}");
        }
        Ok(())
    }

    fn format(&self, body: &str) -> eyre::Result<String> {
        Ok(self.finalizer.format_str(body)?.content)
    }
}
