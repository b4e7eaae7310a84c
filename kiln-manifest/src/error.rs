use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the manifest text and its filename so error constructors can attach
/// both to the diagnostic.
///
/// # Example
///
/// ```
/// use kiln_manifest::SourceContext;
///
/// let ctx = SourceContext::new("[project]\nname = \"\"\n", "kiln.toml");
/// let err = ctx.validation_error_at("project name cannot be empty", 17..19);
/// assert_eq!(err.to_string(), "project name cannot be empty");
/// ```
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a validation error without a span.
    pub fn validation_error(&self, message: impl Into<String>) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span: None,
            message: message.into(),
        })
    }

    /// Create a validation error with a span.
    pub fn validation_error_at(
        &self,
        message: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span: Some(span.into()),
            message: message.into(),
        })
    }

    pub fn invalid_path_error(
        &self,
        path: impl Into<String>,
        reason: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidPath {
            src: self.named_source(),
            span: span.into(),
            path: path.into(),
            reason: reason.into(),
        })
    }

    pub fn duplicate_path_error(
        &self,
        path: impl Into<String>,
        first_span: impl Into<SourceSpan>,
        second_span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DuplicatePath {
            src: self.named_source(),
            first_span: first_span.into(),
            second_span: second_span.into(),
            path: path.into(),
        })
    }

    pub fn duplicate_section_error(
        &self,
        name: impl Into<String>,
        file: impl Into<String>,
        first_span: impl Into<SourceSpan>,
        second_span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DuplicateSection {
            src: self.named_source(),
            first_span: first_span.into(),
            second_span: second_span.into(),
            name: name.into(),
            file: file.into(),
        })
    }

    /// Create an error for a section template file that cannot be read.
    pub fn missing_template_error(
        &self,
        section: impl Into<String>,
        path: impl Into<PathBuf>,
        span: impl Into<SourceSpan>,
        source: std::io::Error,
    ) -> Box<Error> {
        Box::new(Error::MissingTemplate {
            src: self.named_source(),
            span: span.into(),
            section: section.into(),
            path: path.into(),
            source,
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("run 'kiln init' to create a new project"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse kiln.toml")]
    #[diagnostic(code(kiln::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(kiln::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("invalid file path '{path}'")]
    #[diagnostic(code(kiln::invalid_path), help("{reason}"))]
    InvalidPath {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid path")]
        span: SourceSpan,
        path: String,
        reason: String,
    },

    #[error("duplicate file path '{path}'")]
    #[diagnostic(
        code(kiln::duplicate_path),
        help("each [[files]] entry must write a different file")
    )]
    DuplicatePath {
        #[source_code]
        src: NamedSource<String>,
        #[label("first declared here")]
        first_span: SourceSpan,
        #[label("declared again here")]
        second_span: SourceSpan,
        path: String,
    },

    #[error("duplicate section '{name}' in '{file}'")]
    #[diagnostic(
        code(kiln::duplicate_section),
        help("section names must be unique within a file")
    )]
    DuplicateSection {
        #[source_code]
        src: NamedSource<String>,
        #[label("first declared here")]
        first_span: SourceSpan,
        #[label("declared again here")]
        second_span: SourceSpan,
        name: String,
        file: String,
    },

    #[error("cannot read template '{}' for section '{section}'", path.display())]
    #[diagnostic(
        code(kiln::missing_template),
        help("`source` paths are relative to the directory containing kiln.toml")
    )]
    MissingTemplate {
        #[source_code]
        src: NamedSource<String>,
        #[label("section declared here")]
        span: SourceSpan,
        section: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
