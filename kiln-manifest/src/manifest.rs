//! The `kiln.toml` data model.
//!
//! ```toml
//! [project]
//! name = "storage"
//! output = "src/generated"
//!
//! [templates]
//! header = "//! Generated by kiln. Do not edit."
//!
//! [[files]]
//! path = "service.rs"
//!
//! [[files.sections]]
//! name = "header"
//! template = "{% include 'header' %}"
//!
//! [[files.sections]]
//! name = "types"
//! source = "templates/types.rs.j2"
//! data = { service = "Storage" }
//! ```

use std::{
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use indexmap::IndexMap;
use serde::Deserialize;
use toml::Spanned;

use crate::{Error, Result, SourceContext, validate};

/// Conventional manifest filename.
pub const MANIFEST_FILE: &str = "kiln.toml";

/// A parsed and validated `kiln.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectConfig,

    /// Named templates shared by every section, usable through
    /// `{% include %}`, `{% import %}` and `{% extends %}`.
    #[serde(default)]
    pub templates: IndexMap<String, String>,

    #[serde(default)]
    pub files: Vec<FileSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: Spanned<String>,

    /// Directory the generated files land in, relative to the manifest.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Generated package name handed to every section. Defaults to `name`.
    #[serde(default)]
    pub package: Option<String>,
}

impl ProjectConfig {
    pub fn name(&self) -> &str {
        self.name.get_ref()
    }

    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or_else(|| self.name())
    }
}

fn default_output() -> PathBuf {
    PathBuf::from(".")
}

/// One generated file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    /// Path relative to the output directory.
    pub path: Spanned<String>,

    #[serde(default)]
    pub kind: Option<FileKind>,

    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

impl FileSpec {
    pub fn path(&self) -> &str {
        self.path.get_ref()
    }

    /// The declared kind, or one inferred from the extension.
    pub fn kind(&self) -> FileKind {
        self.kind.unwrap_or_else(|| FileKind::from_path(self.path()))
    }

    /// The path with `.` components removed and `/` separators, used to
    /// compare entries.
    pub(crate) fn normalized_path(&self) -> String {
        Path::new(self.path())
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// How a generated file is finished after its sections are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Parsed, import-pruned, sorted and pretty-printed.
    Rust,
    /// Written exactly as rendered.
    Raw,
}

impl FileKind {
    pub fn from_path(path: &str) -> Self {
        match Path::new(path).extension() {
            Some(ext) if ext == "rs" => FileKind::Rust,
            _ => FileKind::Raw,
        }
    }
}

/// One section of a generated file.
///
/// Exactly one of `template` and `source` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSpec {
    pub name: Spanned<String>,

    /// Inline template text.
    #[serde(default)]
    pub template: Option<String>,

    /// Template file, relative to the manifest.
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Values bound into the template.
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl SectionSpec {
    pub fn name(&self) -> &str {
        self.name.get_ref()
    }
}

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, MANIFEST_FILE)
    }
}

impl Manifest {
    /// Parse and validate a manifest, naming `filename` in diagnostics.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let manifest: Manifest = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
        validate::validate(&manifest, &ctx)?;
        Ok(manifest)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }
}
