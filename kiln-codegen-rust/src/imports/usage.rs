//! Which names does a file reference?

use std::collections::HashSet;

use proc_macro2::{TokenStream, TokenTree};
use syn::{
    ExprMethodCall, ItemUse, Macro, MetaList, Pat, PatIdent, Path, UseTree,
    ext::IdentExt,
    visit::{self, Visit},
};

use super::{ImportEntry, as_import};

/// Traits that are usually imported only to call their methods.
const METHOD_TRAITS: &[&str] = &[
    "Borrow",
    "BorrowMut",
    "Buf",
    "BufMut",
    "BufRead",
    "BuildHasher",
    "Context",
    "Deref",
    "DerefMut",
    "Digest",
    "Display",
    "Hash",
    "Hasher",
    "Itertools",
    "Read",
    "Rng",
    "Seek",
    "Spanned",
    "ToTokens",
    "WrapErr",
    "Write",
];

/// Macros that expand to a method call on their first argument.
const METHOD_MACROS: &[&str] = &["write", "writeln"];

/// What the non-import part of a file refers to.
#[derive(Debug, Default)]
pub struct Usage {
    names: HashSet<String>,
    method_calls: bool,
}

impl Usage {
    /// Whether `name` is referenced anywhere outside the imports.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Whether the file calls any method, directly or through `write!`.
    pub fn calls_methods(&self) -> bool {
        self.method_calls
    }

    /// Whether `entry` must stay.
    ///
    /// It stays when its bound name is referenced, or when it looks like a
    /// trait in scope for method syntax (a well-known method trait or an
    /// `...Ext` extension trait) and the file calls methods. Method
    /// resolution is not visible in the tree, so this keeps such a trait
    /// even when no call actually goes through it.
    pub fn keeps(&self, entry: &ImportEntry) -> bool {
        if self.contains(entry.name()) {
            return true;
        }
        let leaf = entry.path.rsplit("::").next().unwrap_or_default();
        self.method_calls && is_method_trait(leaf)
    }
}

fn is_method_trait(name: &str) -> bool {
    METHOD_TRAITS.contains(&name) || (name.len() > 3 && name.ends_with("Ext"))
}

/// Collect every name the file may resolve through an import.
///
/// A name counts when it is the first segment of a relative path, an
/// identifier pattern (which may be an imported constant or unit variant),
/// the first identifier of a nested `use`, any identifier token inside a
/// macro invocation or an attribute argument list, or the first path
/// segment of a string inside an attribute argument list
/// (`#[serde(with = "helpers")]`). Macro bodies are opaque token streams
/// and a lowercase pattern is usually a fresh binding, so these rules
/// over-approximate: an identifier that only happens to match an import
/// keeps that import.
///
/// The top-level imports themselves are skipped, so an import never keeps
/// itself alive.
pub fn used_names(file: &syn::File) -> Usage {
    let mut usage = Usage::default();
    for attr in &file.attrs {
        usage.visit_attribute(attr);
    }
    for item in &file.items {
        if as_import(item).is_none() {
            usage.visit_item(item);
        }
    }
    usage
}

impl Usage {
    fn insert(&mut self, ident: &proc_macro2::Ident) {
        self.names.insert(ident.unraw().to_string());
    }

    fn scan(&mut self, tokens: &TokenStream, strings: bool) {
        for tree in tokens.clone() {
            match tree {
                TokenTree::Ident(ident) => self.insert(&ident),
                TokenTree::Group(group) => self.scan(&group.stream(), strings),
                TokenTree::Literal(lit) if strings => {
                    if let Some(root) = string_path_root(&lit.to_string()) {
                        self.names.insert(root.to_string());
                    }
                }
                TokenTree::Punct(_) | TokenTree::Literal(_) => {}
            }
        }
    }
}

/// First segment of a path written as a plain string literal.
fn string_path_root(literal: &str) -> Option<&str> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let root = inner.split("::").next()?;
    let mut chars = root.chars();
    let first = chars.next()?;
    ((first == '_' || first.is_alphabetic()) && chars.all(|c| c == '_' || c.is_alphanumeric()))
        .then_some(root)
}

impl<'ast> Visit<'ast> for Usage {
    fn visit_path(&mut self, path: &'ast Path) {
        if path.leading_colon.is_none()
            && let Some(first) = path.segments.first()
        {
            self.insert(&first.ident);
        }
        visit::visit_path(self, path);
    }

    fn visit_pat(&mut self, pat: &'ast Pat) {
        // `Less =>` parses as a binding even when `Less` is an imported variant
        if let Pat::Ident(PatIdent {
            ident,
            by_ref: None,
            mutability: None,
            subpat: None,
            ..
        }) = pat
        {
            self.insert(ident);
        }
        visit::visit_pat(self, pat);
    }

    fn visit_expr_method_call(&mut self, call: &'ast ExprMethodCall) {
        self.method_calls = true;
        visit::visit_expr_method_call(self, call);
    }

    fn visit_macro(&mut self, mac: &'ast Macro) {
        visit::visit_macro(self, mac);
        if mac
            .path
            .segments
            .last()
            .is_some_and(|segment| METHOD_MACROS.iter().any(|name| segment.ident == name))
        {
            self.method_calls = true;
        }
        self.scan(&mac.tokens, false);
    }

    fn visit_meta_list(&mut self, list: &'ast MetaList) {
        visit::visit_meta_list(self, list);
        self.scan(&list.tokens, true);
    }

    fn visit_item_use(&mut self, item: &'ast ItemUse) {
        if item.leading_colon.is_none() {
            match &item.tree {
                UseTree::Path(p) => self.insert(&p.ident),
                UseTree::Name(n) => self.insert(&n.ident),
                UseTree::Rename(r) => self.insert(&r.ident),
                UseTree::Glob(_) | UseTree::Group(_) => {}
            }
        }
        visit::visit_item_use(self, item);
    }
}
