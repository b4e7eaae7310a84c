//! Textual normalization of printed Rust source.
//!
//! The structural printer emits items back to back. This pass re-parses the
//! printed text to find item boundaries and lays out vertical whitespace:
//!
//! - a blank line after the leading inner attributes and `//!` docs;
//! - runs of `mod x;` declarations, of `pub use` re-exports, and of imports
//!   from the same group stay together, with a blank line between runs;
//! - every other pair of adjacent items (in a file, an inline module, an
//!   `impl` or a `trait`) is separated by one blank line, except adjacent
//!   non-function members of an `impl` or `trait`;
//! - trailing whitespace is stripped and the file ends in one newline.
//!
//! Comment lines directly above an item move with it, so the blank line
//! goes above the comments. A blank line that follows a comment is kept.
//! Lines touched by a literal or a multi-line block comment are copied
//! verbatim, so string contents never change.

use std::collections::BTreeSet;

use proc_macro2::{Span, TokenStream, TokenTree};
use syn::{
    ImplItem, Item, Lit, Macro, MetaList, TraitItem, Visibility,
    spanned::Spanned,
    visit::{self, Visit},
};

use crate::{
    comments::Comments,
    imports::{ImportGroup, as_import},
};

/// Lay out the vertical whitespace of printed source.
///
/// Fails if `text` does not parse.
pub fn normalize_layout(text: &str) -> syn::Result<String> {
    let file = syn::parse_file(text)?;

    let mut literals = LiteralLines::default();
    literals.visit_file(&file);

    let mut layout = Layout::default();
    if !file.attrs.is_empty()
        && let Some(first) = file.items.first()
    {
        layout.blank_before.insert(start_line(first));
    }
    layout.items(&file.items);

    let comments = Comments::scan(text);
    let mut protected = literals.0;
    protected.extend(comments.block_lines());

    Ok(layout.apply(text, &protected, &comments.comment_lines()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemClass {
    ModDecl,
    Import(ImportGroup),
    ReExport,
    ExternCrate,
    Other,
}

impl ItemClass {
    fn of(item: &Item) -> Self {
        if let Some(item_use) = as_import(item) {
            return ItemClass::Import(ImportGroup::of_item(item_use));
        }
        match item {
            Item::Mod(m) if m.content.is_none() => ItemClass::ModDecl,
            Item::Use(u) if !matches!(u.vis, Visibility::Inherited) => ItemClass::ReExport,
            Item::ExternCrate(_) => ItemClass::ExternCrate,
            _ => ItemClass::Other,
        }
    }

    fn runs_with(self, next: ItemClass) -> bool {
        self == next && self != ItemClass::Other
    }
}

#[derive(Default)]
struct Layout {
    /// 1-based lines that get a blank line inserted above them.
    blank_before: BTreeSet<usize>,
}

impl Layout {
    fn items(&mut self, items: &[Item]) {
        for pair in items.windows(2) {
            if !ItemClass::of(&pair[0]).runs_with(ItemClass::of(&pair[1])) {
                self.blank_before.insert(start_line(&pair[1]));
            }
        }

        for item in items {
            match item {
                Item::Mod(m) => {
                    if let Some((_, content)) = &m.content {
                        self.items(content);
                    }
                }
                Item::Impl(imp) => self.members(
                    imp.items
                        .iter()
                        .map(|member| (start_line(member), matches!(member, ImplItem::Fn(_))))
                        .collect(),
                ),
                Item::Trait(tr) => self.members(
                    tr.items
                        .iter()
                        .map(|member| (start_line(member), matches!(member, TraitItem::Fn(_))))
                        .collect(),
                ),
                _ => {}
            }
        }
    }

    /// `(start line, is a function)` for each member of an impl or trait.
    fn members(&mut self, members: Vec<(usize, bool)>) {
        for pair in members.windows(2) {
            let ((_, prev_fn), (start, next_fn)) = (pair[0], pair[1]);
            if prev_fn || next_fn {
                self.blank_before.insert(start);
            }
        }
    }

    fn apply(
        &self,
        text: &str,
        protected: &BTreeSet<usize>,
        comment_lines: &BTreeSet<usize>,
    ) -> String {
        let source: Vec<&str> = text.lines().collect();
        let is_blank = |number: usize| {
            !protected.contains(&number)
                && source
                    .get(number - 1)
                    .is_some_and(|line| line.trim().is_empty())
        };

        // a break above an item goes above the comments that lead into it
        let breaks: BTreeSet<usize> = self
            .blank_before
            .iter()
            .map(|&line| {
                let mut target = line;
                let mut above = line.saturating_sub(1);
                while above > 0 && (comment_lines.contains(&above) || is_blank(above)) {
                    if comment_lines.contains(&above) {
                        target = above;
                    }
                    above -= 1;
                }
                target
            })
            .collect();

        let mut lines: Vec<&str> = Vec::new();
        let mut after_comment = false;
        for (index, &line) in source.iter().enumerate() {
            let number = index + 1;
            if breaks.contains(&number) && lines.last().is_some_and(|last| !last.is_empty()) {
                lines.push("");
            }
            if protected.contains(&number) {
                lines.push(line);
            } else if line.trim().is_empty() {
                if after_comment {
                    lines.push("");
                }
            } else {
                lines.push(line.trim_end());
            }
            after_comment = comment_lines.contains(&number);
        }
        while lines.last().is_some_and(|last| last.is_empty()) {
            lines.pop();
        }

        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

fn start_line(node: &impl Spanned) -> usize {
    node.span().start().line
}

/// Lines covered by literal tokens.
#[derive(Default)]
struct LiteralLines(BTreeSet<usize>);

impl LiteralLines {
    fn cover(&mut self, span: Span) {
        self.0.extend(span.start().line..=span.end().line);
    }

    fn scan(&mut self, tokens: &TokenStream) {
        for tree in tokens.clone() {
            match tree {
                TokenTree::Literal(lit) => self.cover(lit.span()),
                TokenTree::Group(group) => self.scan(&group.stream()),
                TokenTree::Ident(_) | TokenTree::Punct(_) => {}
            }
        }
    }
}

impl<'ast> Visit<'ast> for LiteralLines {
    fn visit_lit(&mut self, lit: &'ast Lit) {
        self.cover(lit.span());
    }

    fn visit_macro(&mut self, mac: &'ast Macro) {
        visit::visit_macro(self, mac);
        self.scan(&mac.tokens);
    }

    fn visit_meta_list(&mut self, list: &'ast MetaList) {
        visit::visit_meta_list(self, list);
        self.scan(&list.tokens);
    }
}
