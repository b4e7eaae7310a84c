//! Parse phase - the body must be a complete Rust file.

use crate::{
    Error, Result,
    comments::Comments,
    pipeline::{FinalizeContext, Phase},
};

/// Parses the candidate body into a syntax tree and collects the plain
/// comments the tree does not keep.
///
/// Nothing is written before this phase succeeds, so a body that does not
/// parse leaves any existing file untouched.
pub struct ParsePhase;

impl Phase for ParsePhase {
    fn name(&self) -> &'static str {
        "parse"
    }

    fn description(&self) -> &'static str {
        "Parse the rendered body as a Rust source file"
    }

    fn run(&self, ctx: &mut FinalizeContext) -> Result<()> {
        let file = syn::parse_file(&ctx.source)
            .map_err(|e| Error::syntax(&ctx.display_path(), &ctx.source, &e))?;
        ctx.syntax = Some(file);
        ctx.comments = Comments::scan(&ctx.source);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_body() {
        let mut ctx = FinalizeContext::in_memory("fn main() {}\n");

        ParsePhase.run(&mut ctx).unwrap();

        assert_eq!(ctx.syntax.unwrap().items.len(), 1);
    }

    #[test]
    fn test_parse_collects_comments() {
        let mut ctx = FinalizeContext::in_memory("// header
fn main() {} // entry
");

        ParsePhase.run(&mut ctx).unwrap();

        let texts: Vec<_> = ctx.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["// header", "// entry"]);
    }

    #[test]
    fn test_parse_reports_position() {
        let mut ctx = FinalizeContext::for_file("gen/broken.rs", "struct S {\n    a: u8,\n");

        let err = ParsePhase.run(&mut ctx).unwrap_err();

        assert!(err.is_syntax());
        assert!(err.to_string().starts_with("gen/broken.rs:"));
        assert!(ctx.syntax.is_none());
    }
}
