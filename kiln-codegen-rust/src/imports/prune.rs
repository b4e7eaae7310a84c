use syn::{Item, UseGroup, UseName, UsePath, UseRename, UseTree, Visibility, ext::IdentExt};

use super::{ImportEntry, Usage, used_names};

/// Remove every import whose bound name is referenced nowhere else.
///
/// A trait that is usually imported for method syntax survives when the
/// file calls methods at all (see [`Usage::keeps`]).
///
/// Braced groups are rewritten in place: a group that loses all its members
/// removes the whole `use` item, a group left with a single member is
/// flattened, and `a::{self}` becomes `a`. Items with attributes,
/// re-exports, globs and `as _` imports are never touched.
///
/// Returns the removed entries in source order.
pub fn prune_unused(file: &mut syn::File) -> Vec<ImportEntry> {
    let used = used_names(file);
    let mut pruner = Pruner {
        used: &used,
        root: "",
        removed: Vec::new(),
    };

    file.items.retain_mut(|item| {
        let Item::Use(item_use) = item else {
            return true;
        };
        if !matches!(item_use.vis, Visibility::Inherited) || !item_use.attrs.is_empty() {
            return true;
        }

        pruner.root = if item_use.leading_colon.is_some() {
            "::"
        } else {
            ""
        };
        match pruner.tree(&item_use.tree, &mut Vec::new()) {
            Some(tree) => {
                item_use.tree = tree;
                true
            }
            None => false,
        }
    });

    pruner.removed
}

struct Pruner<'a> {
    used: &'a Usage,
    root: &'static str,
    removed: Vec<ImportEntry>,
}

impl Pruner<'_> {
    fn tree(&mut self, tree: &UseTree, prefix: &mut Vec<String>) -> Option<UseTree> {
        match tree {
            UseTree::Path(p) => {
                prefix.push(p.ident.unraw().to_string());
                let inner = self.tree(&p.tree, prefix);
                prefix.pop();
                // `a::{self}` is written `a`
                Some(match inner? {
                    UseTree::Name(n) if n.ident == "self" => UseTree::Name(UseName {
                        ident: p.ident.clone(),
                    }),
                    UseTree::Rename(r) if r.ident == "self" => UseTree::Rename(UseRename {
                        ident: p.ident.clone(),
                        as_token: r.as_token,
                        rename: r.rename,
                    }),
                    inner => UseTree::Path(UsePath {
                        ident: p.ident.clone(),
                        colon2_token: p.colon2_token,
                        tree: Box::new(inner),
                    }),
                })
            }
            UseTree::Name(n) => {
                let path = if n.ident == "self" {
                    prefix.join("::")
                } else {
                    super::join(prefix, &n.ident.unraw().to_string())
                };
                self.keep(path, None).then(|| tree.clone())
            }
            UseTree::Rename(r) => {
                let alias = r.rename.unraw().to_string();
                if alias == "_" {
                    return Some(tree.clone());
                }
                let path = if r.ident == "self" {
                    prefix.join("::")
                } else {
                    super::join(prefix, &r.ident.unraw().to_string())
                };
                self.keep(path, Some(alias)).then(|| tree.clone())
            }
            UseTree::Glob(_) => Some(tree.clone()),
            UseTree::Group(g) => {
                let mut kept: Vec<UseTree> = g
                    .items
                    .iter()
                    .filter_map(|item| self.tree(item, prefix))
                    .collect();
                match kept.len() {
                    0 => None,
                    1 => kept.pop(),
                    _ => Some(UseTree::Group(UseGroup {
                        brace_token: g.brace_token,
                        items: kept.into_iter().collect(),
                    })),
                }
            }
        }
    }

    fn keep(&mut self, path: String, alias: Option<String>) -> bool {
        let entry = ImportEntry {
            path: format!("{}{}", self.root, path),
            alias,
            used: false,
        };
        if self.used.keeps(&entry) {
            return true;
        }
        tracing::debug!(import = %entry, "removing unused import");
        self.removed.push(entry);
        false
    }
}
