use std::{
    collections::HashMap,
    ops::Range,
    path::{Component, Path},
};

use crate::{FileSpec, Manifest, Result, SourceContext};

/// Check the rules serde cannot express.
pub(crate) fn validate(manifest: &Manifest, ctx: &SourceContext) -> Result<()> {
    if manifest.project.name().trim().is_empty() {
        return Err(ctx.validation_error_at(
            "project name cannot be empty",
            manifest.project.name.span(),
        ));
    }

    if manifest.templates.keys().any(|name| name.trim().is_empty()) {
        return Err(ctx.validation_error("template names in [templates] cannot be empty"));
    }

    let mut seen: HashMap<String, Range<usize>> = HashMap::new();
    for file in &manifest.files {
        if let Some(reason) = path_problem(file.path()) {
            return Err(ctx.invalid_path_error(file.path(), reason, file.path.span()));
        }

        let key = file.normalized_path();
        if let Some(first) = seen.get(&key) {
            return Err(ctx.duplicate_path_error(file.path(), first.clone(), file.path.span()));
        }
        seen.insert(key, file.path.span());

        validate_sections(file, ctx)?;
    }

    Ok(())
}

fn validate_sections(file: &FileSpec, ctx: &SourceContext) -> Result<()> {
    let mut seen: HashMap<&str, Range<usize>> = HashMap::new();

    for section in &file.sections {
        let name = section.name();
        let span = section.name.span();

        if name.trim().is_empty() {
            return Err(ctx.validation_error_at(
                format!("section in '{}' has an empty name", file.path()),
                span,
            ));
        }

        if let Some(first) = seen.get(name) {
            return Err(ctx.duplicate_section_error(name, file.path(), first.clone(), span));
        }
        seen.insert(name, span.clone());

        match (&section.template, &section.source) {
            (Some(_), None) | (None, Some(_)) => {}
            (None, None) => {
                return Err(ctx.validation_error_at(
                    format!("section '{name}' needs a `template` or a `source`"),
                    span,
                ));
            }
            (Some(_), Some(_)) => {
                return Err(ctx.validation_error_at(
                    format!("section '{name}' sets both `template` and `source`"),
                    span,
                ));
            }
        }
    }

    Ok(())
}

/// Why `path` cannot name a generated file, if it cannot.
fn path_problem(path: &str) -> Option<&'static str> {
    if path.trim().is_empty() {
        return Some("path cannot be empty");
    }
    if path.starts_with('/') || path.starts_with('\\') || Path::new(path).is_absolute() {
        return Some("path must be relative to the output directory");
    }
    if path.ends_with('/') || path.ends_with('\\') {
        return Some("path must name a file, not a directory");
    }

    let components: Vec<_> = Path::new(path).components().collect();
    if components.iter().any(|c| matches!(c, Component::ParentDir)) {
        return Some("path must not contain '..'");
    }
    if !components.iter().any(|c| matches!(c, Component::Normal(_))) {
        return Some("path must name a file, not a directory");
    }

    None
}
