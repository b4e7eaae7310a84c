//! Plain comments, which the syntax tree does not keep.
//!
//! Doc comments are attributes and travel with the tree. Plain `//` and
//! `/* */` comments live in the gaps between tokens: they are read from the
//! source before it is parsed, pinned to the syntax node that follows them
//! (or, for a comment that ends a line of code, the node ending on that
//! line) and written back next to the same node once the tree is printed.
//!
//! Comments before the first token form the file header and stay at the top
//! of the file.

use std::collections::{BTreeMap, BTreeSet};

use proc_macro2::{LineColumn, Span, TokenStream, TokenTree, extra::DelimSpan};
use syn::{
    Arm, Block, ExprMatch, Field, FieldValue, FieldsNamed, ForeignItem, ImplItem, Item, ItemEnum,
    ItemForeignMod, ItemImpl, ItemMod, ItemTrait, Stmt, TraitItem, Variant,
    spanned::Spanned,
    visit::{self, Visit},
};

/// 1-based line and 0-based column, counted in characters.
type Pos = (usize, usize);

/// One level of indentation in printed code.
const INDENT: &str = "    ";

/// A plain comment of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// The comment text, delimiters included.
    pub text: String,
    start: Pos,
    end: Pos,
    /// Code precedes the comment on its first line.
    trailing: bool,
    /// No token precedes the comment.
    header: bool,
    /// A blank line separates the comment from what follows.
    blank_after: bool,
}

impl Comment {
    /// Line the comment starts on.
    pub fn line(&self) -> usize {
        self.start.0
    }
}

/// The plain comments of a source file, with enough layout information to
/// put them back after the file is re-printed.
#[derive(Debug, Clone, Default)]
pub struct Comments {
    comments: Vec<Comment>,
    /// Lines holding at least part of a token.
    code_lines: BTreeSet<usize>,
    /// Lines a multi-line token starts on.
    open_lines: BTreeSet<usize>,
    /// Lines a multi-line token continues on.
    inner_lines: BTreeSet<usize>,
}

impl Comments {
    /// Find every plain comment in `source`.
    ///
    /// Text that does not tokenize yields no comments; callers parse first.
    pub fn scan(source: &str) -> Self {
        let source = lexable(source);
        let Ok(tokens) = source.parse::<TokenStream>() else {
            return Self::default();
        };

        let mut spans = Vec::new();
        flatten(tokens, &mut spans);
        spans.sort_unstable();

        let index = LineIndex::new(source);
        let mut found = Self::default();
        let mut cursor = 0;
        let mut last_end: Option<Pos> = None;

        for &(start, end) in &spans {
            found.code_lines.extend(start.0..=end.0);
            if start.0 < end.0 {
                found.open_lines.insert(start.0);
                found.inner_lines.extend(start.0 + 1..=end.0);
            }

            let next = index.offset(start);
            if next > cursor {
                found.gap(&index, cursor, next, last_end, false);
            }
            cursor = cursor.max(index.offset(end));
            last_end = last_end.max(Some(end));
        }
        found.gap(&index, cursor, source.len(), last_end, true);

        found
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter()
    }

    /// Lines that hold comments and nothing else.
    pub fn comment_lines(&self) -> BTreeSet<usize> {
        self.comments
            .iter()
            .flat_map(|c| c.start.0..=c.end.0)
            .filter(|line| !self.code_lines.contains(line))
            .collect()
    }

    /// Lines covered by block comments that span several lines.
    pub fn block_lines(&self) -> BTreeSet<usize> {
        self.comments
            .iter()
            .filter(|c| c.end.0 > c.start.0)
            .flat_map(|c| c.start.0..=c.end.0)
            .collect()
    }

    /// Put the comments back into `printed`, the printed form of `tree`.
    ///
    /// `tree` must still carry the spans of the source the comments were
    /// scanned from. Nodes are matched between `tree` and a re-parse of
    /// `printed` by their order; a comment whose node is gone moves to the
    /// next node that remains.
    pub fn reattach(&self, printed: &str, tree: &syn::File) -> syn::Result<String> {
        if self.comments.is_empty() {
            return Ok(printed.to_string());
        }

        let reprinted = syn::parse_file(printed)?;
        let anchors = paired(tree, &reprinted);
        let layout = Comments::scan(printed);
        let lines: Vec<&str> = printed.lines().collect();

        let mut header = Vec::new();
        let mut above: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut end_of: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        let mut trailer = Vec::new();

        for comment in &self.comments {
            if comment.header {
                header.push(comment.text.clone());
                if comment.blank_after {
                    header.push(String::new());
                }
                continue;
            }

            let owner = comment
                .trailing
                .then(|| owner_end_line(comment, &anchors))
                .flatten()
                .filter(|line| !layout.open_lines.contains(line));
            if let Some(line) = owner {
                end_of.entry(line).or_default().push(&comment.text);
                continue;
            }

            match next_anchor(comment, &anchors) {
                Some(anchor) if !layout.inner_lines.contains(&anchor.start.0) => {
                    let line = anchor.start.0;
                    let current = line.checked_sub(1).and_then(|i| lines.get(i));
                    let mut indent = current.map_or("", |l| leading_whitespace(l)).to_string();
                    if anchor.kind == AnchorKind::Close {
                        indent.push_str(INDENT);
                    }

                    let entry = above.entry(line).or_default();
                    entry.push(format!("{indent}{}", comment.text));
                    if comment.blank_after && anchor.kind == AnchorKind::Node {
                        entry.push(String::new());
                    }
                }
                _ => trailer.push(comment.text.clone()),
            }
        }

        let header_at = usize::from(reprinted.shebang.is_some()).min(lines.len());
        let mut out = String::with_capacity(printed.len());
        for (index, line) in lines.iter().enumerate() {
            if index == header_at {
                push_lines(&mut out, &header);
            }
            if let Some(extra) = above.get(&(index + 1)) {
                push_lines(&mut out, extra);
            }
            out.push_str(line);
            for text in end_of.get(&(index + 1)).into_iter().flatten() {
                out.push(' ');
                out.push_str(text);
            }
            out.push('\n');
        }
        if header_at == lines.len() {
            push_lines(&mut out, &header);
        }
        push_lines(&mut out, &trailer);

        Ok(out)
    }

    /// Record the comments in `source[from..to]`, which holds no tokens.
    fn gap(
        &mut self,
        index: &LineIndex<'_>,
        from: usize,
        to: usize,
        last_end: Option<Pos>,
        at_eof: bool,
    ) {
        let text = &index.text[from..to];
        let mut i = 0;

        while i < text.len() {
            let rest = &text[i..];
            let len = if rest.starts_with("//") {
                rest.find('\n').unwrap_or(rest.len())
            } else if rest.starts_with("/*") {
                block_comment_len(rest)
            } else {
                i += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            };

            let start = index.pos(from + i);
            let after = &rest[len..];
            let spacing = &after[..after.len() - after.trim_start().len()];
            let reaches_eof = at_eof && spacing.len() == after.len();

            self.comments.push(Comment {
                text: rest[..len].trim_end().to_string(),
                start,
                end: index.pos(from + i + len),
                trailing: last_end.is_some_and(|end| end.0 == start.0),
                header: last_end.is_none(),
                blank_after: !reaches_eof && spacing.matches('\n').count() >= 2,
            });
            i += len;
        }
    }
}

/// The text `syn::parse_file` actually parses: no byte order mark, and a
/// shebang line blanked out.
fn lexable(source: &str) -> &str {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    if let Some(rest) = source.strip_prefix("#!")
        && !rest.trim_start().starts_with('[')
    {
        return source.find('\n').map_or("", |idx| &source[idx..]);
    }
    source
}

/// Length of the (possibly nested) block comment `text` starts with.
fn block_comment_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth = depth.saturating_sub(1);
                i += 2;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    text.len()
}

fn flatten(tokens: TokenStream, spans: &mut Vec<(Pos, Pos)>) {
    for tree in tokens {
        match tree {
            TokenTree::Group(group) => {
                spans.push(range(group.span_open()));
                flatten(group.stream(), spans);
                spans.push(range(group.span_close()));
            }
            other => spans.push(range(other.span())),
        }
    }
}

fn range(span: Span) -> (Pos, Pos) {
    (pos(span.start()), pos(span.end()))
}

fn pos(at: LineColumn) -> Pos {
    (at.line, at.column)
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn push_lines(out: &mut String, lines: &[String]) {
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
}

/// Converts between byte offsets and line/column positions.
struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, starts }
    }

    fn offset(&self, (line, column): Pos) -> usize {
        let Some(&start) = self.starts.get(line.saturating_sub(1)) else {
            return self.text.len();
        };
        self.text[start..]
            .char_indices()
            .nth(column)
            .map_or(self.text.len(), |(i, _)| start + i)
    }

    fn pos(&self, offset: usize) -> Pos {
        let line = self.starts.partition_point(|&start| start <= offset);
        let start = self.starts[line - 1];
        (line, self.text[start..offset].chars().count())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnchorKind {
    /// A node a comment can sit above.
    Node,
    /// The closing brace of a block.
    Close,
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    kind: AnchorKind,
    start: Pos,
    end: Pos,
}

/// Anchors of both trees, matched by position in the traversal.
///
/// If the printed tree has a different shape, only top-level items are
/// matched.
fn paired(original: &syn::File, printed: &syn::File) -> Vec<(Anchor, Anchor)> {
    let before = Anchors::of(original);
    let after = Anchors::of(printed);
    if before.len() == after.len() && before.iter().zip(&after).all(|(a, b)| a.kind == b.kind) {
        return before.into_iter().zip(after).collect();
    }

    tracing::debug!("printed tree differs in shape, pinning comments to top-level items");
    let before = Anchors::top_level(original);
    let after = Anchors::top_level(printed);
    if before.len() == after.len() {
        before.into_iter().zip(after).collect()
    } else {
        Vec::new()
    }
}

/// Printed line where the node a trailing comment follows ends.
fn owner_end_line(comment: &Comment, anchors: &[(Anchor, Anchor)]) -> Option<usize> {
    anchors
        .iter()
        .filter(|(original, _)| {
            original.kind == AnchorKind::Node
                && original.end.0 == comment.start.0
                && original.end <= comment.start
        })
        .max_by_key(|(original, _)| original.end)
        .map(|(_, printed)| printed.end.0)
}

/// The printed anchor of the first node after `comment`.
fn next_anchor(comment: &Comment, anchors: &[(Anchor, Anchor)]) -> Option<Anchor> {
    anchors
        .iter()
        .filter(|(original, _)| original.start >= comment.end)
        .min_by_key(|(original, _)| original.start)
        .map(|&(_, printed)| printed)
}

/// Collects anchors in a fixed traversal order.
#[derive(Default)]
struct Anchors(Vec<Anchor>);

impl Anchors {
    fn of(file: &syn::File) -> Vec<Anchor> {
        let mut anchors = Self::default();
        anchors.visit_file(file);
        anchors.0
    }

    fn top_level(file: &syn::File) -> Vec<Anchor> {
        let mut anchors = Self::default();
        for item in &file.items {
            anchors.node(item);
        }
        anchors.0
    }

    fn node(&mut self, node: &impl Spanned) {
        let (start, end) = range(node.span());
        self.0.push(Anchor {
            kind: AnchorKind::Node,
            start,
            end,
        });
    }

    fn close(&mut self, delim: &DelimSpan) {
        let (start, end) = range(delim.close());
        self.0.push(Anchor {
            kind: AnchorKind::Close,
            start,
            end,
        });
    }
}

impl<'ast> Visit<'ast> for Anchors {
    fn visit_item(&mut self, node: &'ast Item) {
        self.node(node);
        visit::visit_item(self, node);
    }

    fn visit_impl_item(&mut self, node: &'ast ImplItem) {
        self.node(node);
        visit::visit_impl_item(self, node);
    }

    fn visit_trait_item(&mut self, node: &'ast TraitItem) {
        self.node(node);
        visit::visit_trait_item(self, node);
    }

    fn visit_foreign_item(&mut self, node: &'ast ForeignItem) {
        self.node(node);
        visit::visit_foreign_item(self, node);
    }

    fn visit_stmt(&mut self, node: &'ast Stmt) {
        self.node(node);
        visit::visit_stmt(self, node);
    }

    fn visit_field(&mut self, node: &'ast Field) {
        self.node(node);
        visit::visit_field(self, node);
    }

    fn visit_field_value(&mut self, node: &'ast FieldValue) {
        self.node(node);
        visit::visit_field_value(self, node);
    }

    fn visit_variant(&mut self, node: &'ast Variant) {
        self.node(node);
        visit::visit_variant(self, node);
    }

    fn visit_arm(&mut self, node: &'ast Arm) {
        self.node(node);
        visit::visit_arm(self, node);
    }

    fn visit_block(&mut self, node: &'ast Block) {
        visit::visit_block(self, node);
        self.close(&node.brace_token.span);
    }

    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        visit::visit_item_mod(self, node);
        if let Some((brace, _)) = &node.content {
            self.close(&brace.span);
        }
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        visit::visit_item_impl(self, node);
        self.close(&node.brace_token.span);
    }

    fn visit_item_trait(&mut self, node: &'ast ItemTrait) {
        visit::visit_item_trait(self, node);
        self.close(&node.brace_token.span);
    }

    fn visit_item_enum(&mut self, node: &'ast ItemEnum) {
        visit::visit_item_enum(self, node);
        self.close(&node.brace_token.span);
    }

    fn visit_item_foreign_mod(&mut self, node: &'ast ItemForeignMod) {
        visit::visit_item_foreign_mod(self, node);
        self.close(&node.brace_token.span);
    }

    fn visit_fields_named(&mut self, node: &'ast FieldsNamed) {
        visit::visit_fields_named(self, node);
        self.close(&node.brace_token.span);
    }

    fn visit_expr_match(&mut self, node: &'ast ExprMatch) {
        visit::visit_expr_match(self, node);
        self.close(&node.brace_token.span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        Comments::scan(source).iter().map(|c| c.text.clone()).collect()
    }

    fn roundtrip(source: &str) -> String {
        let comments = Comments::scan(source);
        let tree = syn::parse_file(source).unwrap();
        comments
            .reattach(&prettyplease::unparse(&tree), &tree)
            .unwrap()
    }

    #[test]
    fn test_scan_finds_plain_comments_only() {
        let found = texts(
            "// header\n//! crate docs\n/// item docs\nfn f() { /* inline */ let s = \"// not a comment\"; }\n/** block docs */\nstruct S; // trailing\n",
        );

        assert_eq!(found, vec!["// header", "/* inline */", "// trailing"]);
    }

    #[test]
    fn test_scan_nested_block_comment() {
        let found = texts("/* outer /* inner */ still outer */\nfn f() {}\n");

        assert_eq!(found, vec!["/* outer /* inner */ still outer */"]);
    }

    #[test]
    fn test_scan_classifies_position() {
        let comments = Comments::scan("// top\n\nfn f() {} // after f\n// before g\nfn g() {}\n");
        let found: Vec<_> = comments.iter().collect();

        assert!(found[0].header && found[0].blank_after);
        assert!(found[1].trailing && !found[1].header);
        assert!(!found[2].trailing && !found[2].blank_after);
        assert_eq!(found[2].line(), 4);
    }

    #[test]
    fn test_comment_lines_exclude_code() {
        let comments = Comments::scan("fn f() {} // trailing\n// own line\n/*\n block\n*/\nfn g() {}\n");

        assert_eq!(comments.comment_lines(), BTreeSet::from([2, 3, 4, 5]));
        assert_eq!(comments.block_lines(), BTreeSet::from([3, 4, 5]));
    }

    #[test]
    fn test_reattach_keeps_header_and_item_comments() {
        let out = roundtrip(
            "// Code generated by kiln. DO NOT EDIT.\n\nuse std::str;\n// Checks the bytes.\nfn valid(b: &[u8]) -> bool { str::from_utf8(b).is_ok() }\n",
        );

        assert_eq!(
            out,
            "// Code generated by kiln. DO NOT EDIT.\n\nuse std::str;\n// Checks the bytes.\nfn valid(b: &[u8]) -> bool {\n    str::from_utf8(b).is_ok()\n}\n"
        );
    }

    #[test]
    fn test_reattach_inside_bodies() {
        let out = roundtrip(
            "fn f() -> u8 {\n    // first\n    let a = 1; // one\n    a\n    // last\n}\n",
        );

        assert_eq!(
            out,
            "fn f() -> u8 {\n    // first\n    let a = 1; // one\n    a\n    // last\n}\n"
        );
    }

    #[test]
    fn test_reattach_follows_moved_nodes() {
        let source = "use std::io;\n// formatting\nuse std::fmt;\nfn f(_: io::Empty, _: fmt::Error) {}\n";
        let comments = Comments::scan(source);
        let mut tree = syn::parse_file(source).unwrap();
        tree.items.swap(0, 1);

        let out = comments
            .reattach(&prettyplease::unparse(&tree), &tree)
            .unwrap();

        assert!(out.starts_with("// formatting\nuse std::fmt;\nuse std::io;\n"));
    }

    #[test]
    fn test_reattach_without_comments_is_identity() {
        let tree = syn::parse_file("fn f() {}").unwrap();
        let printed = prettyplease::unparse(&tree);

        assert_eq!(Comments::default().reattach(&printed, &tree).unwrap(), printed);
    }

    #[test]
    fn test_comment_only_file() {
        assert_eq!(roundtrip("// nothing here yet\n"), "// nothing here yet\n");
    }
}
