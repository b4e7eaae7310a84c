//! Sections and the section renderer.
//!
//! A generated file is described as an ordered list of [`SectionDescriptor`]s,
//! one per logical chunk (module docs, imports, type declarations,
//! functions...). The [`SectionRenderer`] expands each section's template
//! against its data and concatenates the results in order.

use kiln_core::{to_camel_case, to_kebab_case, to_pascal_case, to_snake_case};
use miette::Diagnostic;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A named template plus the data it is rendered with.
///
/// Descriptors are immutable once built: the builder methods consume and
/// return the descriptor.
///
/// # Example
///
/// ```
/// use kiln_codegen::SectionDescriptor;
///
/// let section = SectionDescriptor::new("service", "pub struct {{ name | pascal_case }};")
///     .bind("name", "storage");
/// assert_eq!(section.name(), "service");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    name: String,
    template: String,
    #[serde(default)]
    data: Map<String, Value>,
}

impl SectionDescriptor {
    /// Create a section with no data bindings.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            data: Map::new(),
        }
    }

    /// Bind a single variable.
    pub fn bind(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Replace all bindings.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Use the fields of a serializable struct (or map) as bindings.
    ///
    /// Fails if `data` does not serialize to an object.
    pub fn with_serialized<T: Serialize>(self, data: &T) -> Result<Self, TemplateError> {
        match serde_json::to_value(data) {
            Ok(Value::Object(map)) => Ok(self.with_data(map)),
            Ok(other) => Err(TemplateError::binding(
                &self.name,
                format!("section data must be an object, got {}", json_kind(&other)),
            )),
            Err(e) => Err(TemplateError::binding(&self.name, e.to_string())),
        }
    }

    /// The section name, used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The template source.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The data bindings.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What went wrong while rendering a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateErrorKind {
    /// The template does not compile (unbalanced or unknown directive).
    Syntax,
    /// A variable used by the template has no binding.
    MissingBinding,
    /// The bindings could not be turned into template data.
    Binding,
    /// Any other failure during expansion (bad filter argument, failing include...).
    Render,
}

/// Error raised while rendering a section.
#[derive(Debug, Error, Diagnostic)]
#[error("failed to render section '{section}': {message}")]
#[diagnostic(
    code(kiln::template),
    help("check the template directives and that every variable it uses is bound")
)]
pub struct TemplateError {
    /// Name of the offending section.
    pub section: String,
    /// Error classification.
    pub kind: TemplateErrorKind,
    /// The underlying message.
    pub message: String,
    /// Line in the template, when known.
    pub line: Option<usize>,
}

impl TemplateError {
    fn binding(section: &str, message: impl Into<String>) -> Self {
        Self {
            section: section.to_string(),
            kind: TemplateErrorKind::Binding,
            message: message.into(),
            line: None,
        }
    }

    fn from_minijinja(section: &str, err: minijinja::Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::SyntaxError => TemplateErrorKind::Syntax,
            ErrorKind::UndefinedError => TemplateErrorKind::MissingBinding,
            _ => TemplateErrorKind::Render,
        };
        Self {
            section: section.to_string(),
            kind,
            message: err.to_string(),
            line: err.line(),
        }
    }
}

/// Renders sections with a shared template environment.
///
/// Undefined variables are errors, so a section whose data misses a
/// binding its template needs fails instead of silently rendering an
/// empty string. Templates registered with [`add_template`] can be pulled
/// into sections with `{% include %}`, `{% import %}` or `{% extends %}`.
///
/// The built-in filters `snake_case`, `pascal_case`, `camel_case` and
/// `kebab_case` are always available.
///
/// [`add_template`]: SectionRenderer::add_template
pub struct SectionRenderer {
    env: Environment<'static>,
}

impl SectionRenderer {
    /// Create a renderer with no shared templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.add_filter("snake_case", snake_case);
        env.add_filter("pascal_case", pascal_case);
        env.add_filter("camel_case", camel_case);
        env.add_filter("kebab_case", kebab_case);
        Self { env }
    }

    /// Register a shared template under `name`.
    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), TemplateError> {
        let name = name.into();
        self.env
            .add_template_owned(name.clone(), source.into())
            .map_err(|e| TemplateError::from_minijinja(&name, e))
    }

    /// Render a single section.
    ///
    /// The template is compiled under the section's name, so template
    /// error messages read `(in <section>:<line>)`.
    pub fn render(&self, section: &SectionDescriptor) -> Result<String, TemplateError> {
        self.env
            .render_named_str(&section.name, &section.template, &section.data)
            .map_err(|e| TemplateError::from_minijinja(&section.name, e))
    }

    /// Render all sections and concatenate them in order.
    ///
    /// Every non-empty section output is terminated with a newline so that
    /// adjacent sections never share a line. Nothing is returned unless
    /// every section renders.
    pub fn render_all(&self, sections: &[SectionDescriptor]) -> Result<String, TemplateError> {
        let mut body = String::new();
        for section in sections {
            let text = self.render(section)?;
            tracing::trace!(section = section.name(), bytes = text.len(), "rendered section");
            body.push_str(&text);
            if !text.is_empty() && !text.ends_with('\n') {
                body.push('\n');
            }
        }
        Ok(body)
    }
}

impl Default for SectionRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render sections with a fresh [`SectionRenderer`].
pub fn render_sections(sections: &[SectionDescriptor]) -> Result<String, TemplateError> {
    SectionRenderer::new().render_all(sections)
}

fn snake_case(value: &str) -> String {
    to_snake_case(value)
}

fn pascal_case(value: &str) -> String {
    to_pascal_case(value)
}

fn camel_case(value: &str) -> String {
    to_camel_case(value)
}

fn kebab_case(value: &str) -> String {
    to_kebab_case(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_interpolates_bindings() {
        let section = SectionDescriptor::new("types", "pub struct {{ name | pascal_case }};")
            .bind("name", "integer_divide");

        let out = SectionRenderer::new().render(&section).unwrap();

        assert_eq!(out, "pub struct IntegerDivide;");
    }

    #[test]
    fn test_render_loops_and_conditionals() {
        let section = SectionDescriptor::new(
            "fields",
            "{% for f in fields %}{% if f.public %}pub {% endif %}{{ f.name }}: {{ f.ty }},\n{% endfor %}",
        )
        .bind(
            "fields",
            json!([
                { "name": "a", "ty": "i64", "public": true },
                { "name": "b", "ty": "i64", "public": false },
            ]),
        );

        let out = SectionRenderer::new().render(&section).unwrap();

        assert_eq!(out, "pub a: i64,\nb: i64,\n");
    }

    #[test]
    fn test_render_all_preserves_order_and_duplicates() {
        let sections = vec![
            SectionDescriptor::new("b", "// b"),
            SectionDescriptor::new("a", "// a"),
            SectionDescriptor::new("b-again", "// b"),
        ];

        let body = render_sections(&sections).unwrap();

        assert_eq!(body, "// b\n// a\n// b\n");
    }

    #[test]
    fn test_render_all_keeps_existing_newlines() {
        let sections = vec![
            SectionDescriptor::new("imports", "use std::fmt;\n"),
            SectionDescriptor::new("empty", ""),
            SectionDescriptor::new("body", "fn f() {}\n"),
        ];

        let body = render_sections(&sections).unwrap();

        assert_eq!(body, "use std::fmt;\nfn f() {}\n");
    }

    #[test]
    fn test_missing_binding_names_the_section() {
        let sections = vec![
            SectionDescriptor::new("header", "// ok"),
            SectionDescriptor::new("service", "struct {{ service_name }};"),
        ];

        let err = render_sections(&sections).unwrap_err();

        assert_eq!(err.section, "service");
        assert_eq!(err.kind, TemplateErrorKind::MissingBinding);
        assert!(err.to_string().contains("'service'"));
    }

    #[test]
    fn test_malformed_directive_is_syntax_error() {
        let section = SectionDescriptor::new("broken", "{% if x %}no end");

        let err = SectionRenderer::new().render(&section).unwrap_err();

        assert_eq!(err.section, "broken");
        assert_eq!(err.kind, TemplateErrorKind::Syntax);
    }

    #[test]
    fn test_template_message_points_into_the_section() {
        let sections = vec![
            SectionDescriptor::new("header", "// ok"),
            SectionDescriptor::new("service", "struct S;\n{{ 1 | no_such_filter }}"),
        ];

        let err = render_sections(&sections).unwrap_err();

        assert_eq!(err.line, Some(2));
        assert!(err.message.contains("service:2"), "{}", err.message);
        assert!(!err.message.contains("<string>"), "{}", err.message);
    }

    #[test]
    fn test_shared_templates_can_be_included() {
        let mut renderer = SectionRenderer::new();
        renderer
            .add_template("header", "// Code generated by kiln. DO NOT EDIT.")
            .unwrap();

        let out = renderer
            .render(&SectionDescriptor::new("top", "{% include \"header\" %}"))
            .unwrap();

        assert_eq!(out, "// Code generated by kiln. DO NOT EDIT.");
    }

    #[test]
    fn test_invalid_shared_template_is_reported_by_name() {
        let mut renderer = SectionRenderer::new();

        let err = renderer.add_template("header", "{{ unclosed").unwrap_err();

        assert_eq!(err.section, "header");
        assert_eq!(err.kind, TemplateErrorKind::Syntax);
    }

    #[test]
    fn test_with_serialized_struct() {
        #[derive(Serialize)]
        struct Service {
            name: &'static str,
        }

        let section = SectionDescriptor::new("svc", "mod {{ name | snake_case }};")
            .with_serialized(&Service {
                name: "SecuredService",
            })
            .unwrap();

        assert_eq!(
            SectionRenderer::new().render(&section).unwrap(),
            "mod secured_service;"
        );
    }

    #[test]
    fn test_with_serialized_rejects_non_objects() {
        let err = SectionDescriptor::new("svc", "")
            .with_serialized(&vec![1, 2, 3])
            .unwrap_err();

        assert_eq!(err.kind, TemplateErrorKind::Binding);
        assert!(err.message.contains("an array"));
    }
}
