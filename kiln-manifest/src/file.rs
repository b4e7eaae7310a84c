use std::path::{Path, PathBuf};

use crate::{Error, Manifest, Result, SectionSpec, SourceContext};

/// A kiln.toml file with both raw content and parsed manifest.
pub struct KilnToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl KilnToml {
    /// Open and parse a kiln.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory containing the manifest; relative paths resolve against it.
    pub fn base_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// The configured output directory, resolved against [`base_dir`].
    ///
    /// [`base_dir`]: KilnToml::base_dir
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir().join(&self.manifest.project.output)
    }

    /// Template text for a section: the inline `template`, or the contents
    /// of its `source` file.
    pub fn section_template(&self, section: &SectionSpec) -> Result<String> {
        if let Some(template) = &section.template {
            return Ok(template.clone());
        }

        let source = section.source.as_deref().unwrap_or(Path::new(""));
        let path = self.base_dir().join(source);
        std::fs::read_to_string(&path).map_err(|e| {
            self.source_context().missing_template_error(
                section.name(),
                source,
                section.name.span(),
                e,
            )
        })
    }

    fn source_context(&self) -> SourceContext {
        SourceContext::new(&self.content, self.path.display().to_string())
    }
}
