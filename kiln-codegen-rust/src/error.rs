use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for finalizer operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Display name used for bodies that are not backed by a file.
pub const IN_MEMORY: &str = "<memory>";

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// The rendered body is not a valid Rust source file.
    ///
    /// The display form lists every parser diagnostic followed by the full
    /// body, so the offending template output can be read directly.
    #[error("{diagnostics}\n========\nContent:\n{content}")]
    #[diagnostic(
        code(kiln::syntax),
        help("the rendered sections do not form a valid Rust file; fix the template that produced this text")
    )]
    Syntax {
        path: String,
        /// 1-based line of the first error.
        line: usize,
        /// 1-based column of the first error.
        column: usize,
        message: String,
        /// Every error as `path:line:column: message`, one per line.
        diagnostics: String,
        content: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("failed to {action} '{path}'")]
    #[diagnostic(code(kiln::io))]
    Io {
        path: PathBuf,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The printed text could not be normalized.
    ///
    /// This points at a bug in the structural passes rather than in the
    /// templates: the printer produced text the parser rejects.
    #[error("failed to normalize '{path}': {message}")]
    #[diagnostic(code(kiln::format))]
    Format { path: String, message: String },
}

impl Error {
    /// Build a syntax error from a parser failure on `content`.
    pub fn syntax(path: &str, content: &str, err: &syn::Error) -> Box<Error> {
        let mut diagnostics = Vec::new();
        let mut first = None;

        for e in err {
            let start = e.span().start();
            let line = start.line.max(1);
            let column = start.column + 1;
            diagnostics.push(format!("{path}:{line}:{column}: {e}"));
            if first.is_none() {
                first = Some((line, column, e.to_string()));
            }
        }

        let (line, column, message) = first.unwrap_or_else(|| (1, 1, err.to_string()));
        let offset = offset_of(content, line, column - 1);
        let len = content[offset..].chars().next().map_or(0, char::len_utf8);

        Box::new(Error::Syntax {
            path: path.to_string(),
            line,
            column,
            message,
            diagnostics: diagnostics.join("\n"),
            content: content.to_string(),
            src: NamedSource::new(path, content.to_string()),
            span: SourceSpan::from((offset, len)),
        })
    }

    pub fn io(path: &Path, action: &'static str, source: std::io::Error) -> Box<Error> {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            action,
            source,
        })
    }

    pub fn format(path: &str, message: impl Into<String>) -> Box<Error> {
        Box::new(Error::Format {
            path: path.to_string(),
            message: message.into(),
        })
    }

    /// Whether this error leaves any existing file untouched.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }
}

/// Byte offset of a 1-based line and 0-based character column.
fn offset_of(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let in_line: usize = content[line_start..]
        .chars()
        .take_while(|c| *c != '\n')
        .take(column)
        .map(char::len_utf8)
        .sum();
    line_start + in_line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of_counts_chars() {
        let content = "fn a() {}\nlet é = 1;\n";
        assert_eq!(offset_of(content, 1, 0), 0);
        assert_eq!(offset_of(content, 2, 0), 10);
        // "let é" is 6 bytes for 5 chars
        assert_eq!(offset_of(content, 2, 5), 16);
    }

    #[test]
    fn test_offset_of_clamps_past_end_of_line() {
        let content = "ab\ncd";
        assert_eq!(offset_of(content, 1, 40), 2);
        assert_eq!(offset_of(content, 9, 0), 5);
    }

    #[test]
    fn test_syntax_error_display() {
        let body = "fn main() {\n    let x = ;\n}\n";
        let err = syn::parse_file(body).unwrap_err();

        let err = Error::syntax("gen/main.rs", body, &err);
        let display = err.to_string();

        let Error::Syntax { line, ref src, .. } = *err else {
            panic!("expected syntax error");
        };
        assert_eq!(line, 2);
        assert_eq!(src.name(), "gen/main.rs");
        assert!(display.starts_with("gen/main.rs:2:"));
        assert!(display.ends_with("\n========\nContent:\nfn main() {\n    let x = ;\n}\n"));
    }
}
