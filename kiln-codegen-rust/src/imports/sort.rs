use std::cmp::Ordering;

use syn::{Item, ItemUse, UseTree, Visibility, ext::IdentExt};

use super::ImportGroup;

/// Gather the imports into one sorted block.
///
/// The block replaces the first import; later imports move up into it.
/// Imports are ordered by group ([`ImportGroup`]) and then by path, members
/// of braced groups are sorted (`self` first), and exact duplicates are
/// dropped. Re-exports and every other item keep their relative order.
pub fn sort_imports(file: &mut syn::File) {
    let Some(first) = file.items.iter().position(is_import) else {
        return;
    };

    let mut imports = Vec::new();
    let mut rest = Vec::with_capacity(file.items.len());
    for item in std::mem::take(&mut file.items) {
        match item {
            Item::Use(mut item_use) if matches!(item_use.vis, Visibility::Inherited) => {
                sort_tree(&mut item_use.tree);
                imports.push(item_use);
            }
            other => rest.push(other),
        }
    }

    imports.sort_by(compare_items);
    imports.dedup();

    let tail = rest.split_off(first);
    rest.extend(imports.into_iter().map(Item::Use));
    rest.extend(tail);
    file.items = rest;
}

fn is_import(item: &Item) -> bool {
    matches!(item, Item::Use(item_use) if matches!(item_use.vis, Visibility::Inherited))
}

fn compare_items(a: &ItemUse, b: &ItemUse) -> Ordering {
    ImportGroup::of_item(a)
        .cmp(&ImportGroup::of_item(b))
        .then_with(|| compare_keys(&key(&a.tree), &key(&b.tree)))
}

/// Sort group members recursively and drop duplicate members.
fn sort_tree(tree: &mut UseTree) {
    let collapsed = match tree {
        UseTree::Path(p) => {
            sort_tree(&mut p.tree);
            None
        }
        UseTree::Group(g) => {
            let mut items: Vec<UseTree> = std::mem::take(&mut g.items).into_iter().collect();
            for item in &mut items {
                sort_tree(item);
            }
            items.sort_by(|a, b| compare_keys(&key(a), &key(b)));
            items.dedup_by(|a, b| key(a) == key(b));
            if items.len() == 1 && key(&items[0]) != ["self"] {
                items.pop()
            } else {
                g.items = items.into_iter().collect();
                None
            }
        }
        UseTree::Name(_) | UseTree::Rename(_) | UseTree::Glob(_) => None,
    };
    if let Some(single) = collapsed {
        *tree = single;
    }
}

/// Path segments of a use tree, as compared for ordering.
fn key(tree: &UseTree) -> Vec<String> {
    match tree {
        UseTree::Path(p) => {
            let mut segments = vec![p.ident.unraw().to_string()];
            segments.extend(key(&p.tree));
            segments
        }
        UseTree::Name(n) => vec![n.ident.unraw().to_string()],
        UseTree::Rename(r) => vec![format!("{} as {}", r.ident.unraw(), r.rename.unraw())],
        UseTree::Glob(_) => vec!["*".to_string()],
        UseTree::Group(g) => {
            let members: Vec<String> = g.items.iter().map(|t| key(t).join("::")).collect();
            vec![format!("{{{}}}", members.join(", "))]
        }
    }
}

fn compare_keys(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ordering = match (x == "self", y == "self") {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => x.cmp(y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(src: &str) -> String {
        let mut file = syn::parse_file(src).unwrap();
        sort_imports(&mut file);
        prettyplease::unparse(&file)
    }

    #[test]
    fn test_groups_then_paths() {
        let out = sorted(
            "use crate::Error;\nuse serde::Serialize;\nuse std::fmt;\nuse eyre::Result;\nuse std::collections::HashMap;\n",
        );

        assert_eq!(
            out,
            "use std::collections::HashMap;\nuse std::fmt;\nuse eyre::Result;\nuse serde::Serialize;\nuse crate::Error;\n"
        );
    }

    #[test]
    fn test_group_members_sorted_self_first() {
        let out = sorted("use std::io::{Write, Read, self};\n");

        assert_eq!(out, "use std::io::{self, Read, Write};\n");
    }

    #[test]
    fn test_duplicates_removed() {
        let out = sorted("use std::fmt;\nuse std::fmt;\nuse std::io::{Read, Read};\n");

        assert_eq!(out, "use std::fmt;\nuse std::io::Read;\n");
    }

    #[test]
    fn test_late_imports_join_first_position() {
        let out = sorted("//! Docs.\nmod a;\nuse std::fmt;\nfn f() {}\nuse std::borrow::Cow;\n");

        assert_eq!(
            out,
            "//! Docs.\nmod a;\nuse std::borrow::Cow;\nuse std::fmt;\nfn f() {}\n"
        );
    }

    #[test]
    fn test_reexports_stay_in_place() {
        let out = sorted("pub use b::B;\nuse std::fmt;\npub use a::A;\nuse eyre::Result;\n");

        assert_eq!(
            out,
            "pub use b::B;\nuse std::fmt;\nuse eyre::Result;\npub use a::A;\n"
        );
    }

    #[test]
    fn test_file_without_imports_is_unchanged() {
        let out = sorted("fn b() {}\nfn a() {}\n");

        assert_eq!(out, "fn b() {}\nfn a() {}\n");
    }
}
