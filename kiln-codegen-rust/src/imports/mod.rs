//! The import model of a Rust source file.
//!
//! Imports are the top-level `use` items without a visibility. Each leaf of
//! a use tree is one [`ImportEntry`]: `use std::io::{self, Write};` yields
//! `std::io` (bound as `io`) and `std::io::Write`.
//!
//! Re-exports (`pub use`), nested `use` items inside functions or inline
//! modules, and `extern crate` are not imports in this sense; they are left
//! exactly where they are.

mod prune;
mod sort;
mod usage;

use std::fmt;

use syn::{Item, ItemUse, UseTree, Visibility, ext::IdentExt};

pub use prune::prune_unused;
pub use sort::sort_imports;
pub use usage::{Usage, used_names};

/// Top-level crates that ship with the toolchain.
const STD_CRATES: &[&str] = &["std", "core", "alloc", "proc_macro", "test"];

/// Path roots that refer to the current crate.
const LOCAL_ROOTS: &[&str] = &["crate", "self", "super"];

/// Import groups, in the order they appear in a finalized file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportGroup {
    /// `std`, `core`, `alloc`...
    Std,
    /// Any third-party crate.
    External,
    /// `crate::`, `self::`, `super::`.
    Local,
}

impl ImportGroup {
    /// Classify an import by the first segment of its path.
    pub fn of(first_segment: &str, leading_colon: bool) -> Self {
        if leading_colon {
            return ImportGroup::External;
        }
        if STD_CRATES.contains(&first_segment) {
            ImportGroup::Std
        } else if LOCAL_ROOTS.contains(&first_segment) {
            ImportGroup::Local
        } else {
            ImportGroup::External
        }
    }

    /// Classify a whole `use` item.
    pub fn of_item(item: &ItemUse) -> Self {
        Self::of(&first_ident(&item.tree), item.leading_colon.is_some())
    }
}

/// One imported name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Full path, `::`-separated. Globs end in `*`.
    pub path: String,
    /// Explicit `as` name, if any (`_` for anonymous trait imports).
    pub alias: Option<String>,
    /// Whether the bound name is referenced outside the imports.
    pub used: bool,
}

impl ImportEntry {
    /// The name this import binds: its alias, or the last path segment.
    pub fn name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.rsplit("::").next().unwrap_or(&self.path),
        }
    }

    pub fn group(&self) -> ImportGroup {
        let leading_colon = self.path.starts_with("::");
        let first = self
            .path
            .trim_start_matches("::")
            .split("::")
            .next()
            .unwrap_or_default();
        ImportGroup::of(first, leading_colon)
    }

    /// Whether pruning may ever remove this import.
    ///
    /// Globs and `as _` imports bind no name that can be looked up, so
    /// their use cannot be decided from the file alone.
    pub fn is_prunable(&self) -> bool {
        !self.path.ends_with('*') && self.alias.as_deref() != Some("_")
    }
}

impl fmt::Display for ImportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} as {}", self.path, alias),
            None => f.write_str(&self.path),
        }
    }
}

/// The `use` item behind `item`, if `item` is an import.
pub fn as_import(item: &Item) -> Option<&ItemUse> {
    match item {
        Item::Use(item_use) if matches!(item_use.vis, Visibility::Inherited) => Some(item_use),
        _ => None,
    }
}

/// Enumerate the imports of a file, with usage computed against its body.
pub fn collect_imports(file: &syn::File) -> Vec<ImportEntry> {
    let used = used_names(file);
    let mut entries = Vec::new();

    for item in &file.items {
        if let Some(item_use) = as_import(item) {
            let root = if item_use.leading_colon.is_some() {
                "::"
            } else {
                ""
            };
            let pinned = !item_use.attrs.is_empty();
            leaves(&item_use.tree, &mut Vec::new(), &mut |path: String, alias| {
                let mut entry = ImportEntry {
                    path: format!("{root}{path}"),
                    alias,
                    used: true,
                };
                if !pinned && entry.is_prunable() {
                    entry.used = used.keeps(&entry);
                }
                entries.push(entry);
            });
        }
    }

    entries
}

/// Walk the leaves of a use tree, calling `visit(path, alias)` for each.
fn leaves(tree: &UseTree, prefix: &mut Vec<String>, visit: &mut dyn FnMut(String, Option<String>)) {
    match tree {
        UseTree::Path(p) => {
            prefix.push(p.ident.unraw().to_string());
            leaves(&p.tree, prefix, visit);
            prefix.pop();
        }
        UseTree::Name(n) => {
            if n.ident == "self" {
                visit(prefix.join("::"), None);
            } else {
                visit(join(prefix, &n.ident.unraw().to_string()), None);
            }
        }
        UseTree::Rename(r) => {
            let path = if r.ident == "self" {
                prefix.join("::")
            } else {
                join(prefix, &r.ident.unraw().to_string())
            };
            visit(path, Some(r.rename.unraw().to_string()));
        }
        UseTree::Glob(_) => visit(join(prefix, "*"), None),
        UseTree::Group(g) => {
            for tree in &g.items {
                leaves(tree, prefix, visit);
            }
        }
    }
}

fn join(prefix: &[String], last: &str) -> String {
    if prefix.is_empty() {
        last.to_string()
    } else {
        format!("{}::{}", prefix.join("::"), last)
    }
}

/// The first identifier of a use tree (`{` groups at the root yield "").
pub(crate) fn first_ident(tree: &UseTree) -> String {
    match tree {
        UseTree::Path(p) => p.ident.unraw().to_string(),
        UseTree::Name(n) => n.ident.unraw().to_string(),
        UseTree::Rename(r) => r.ident.unraw().to_string(),
        UseTree::Glob(_) | UseTree::Group(_) => String::new(),
    }
}
