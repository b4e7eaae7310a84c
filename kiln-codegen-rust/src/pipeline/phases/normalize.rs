//! Normalize phase - textual layout, second write.

use std::fs;

use crate::{
    Error, Result,
    layout::normalize_layout,
    pipeline::{FinalizeContext, Phase},
};

/// Lays out blank lines and trailing whitespace of the printed text.
///
/// For on-disk files the printed text is read back from the file written
/// by the print phase and the file is overwritten with the result.
pub struct NormalizePhase;

impl Phase for NormalizePhase {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn description(&self) -> &'static str {
        "Normalize blank lines and trailing whitespace"
    }

    fn run(&self, ctx: &mut FinalizeContext) -> Result<()> {
        let display = ctx.display_path();
        let printed = match &ctx.path {
            Some(path) => fs::read_to_string(path).map_err(|e| Error::io(path, "read", e))?,
            None => ctx
                .output
                .take()
                .ok_or_else(|| Error::format(&display, "nothing printed; the print phase has not run"))?,
        };

        let normalized = normalize_layout(&printed)
            .map_err(|e| Error::format(&display, format!("printed text does not parse: {e}")))?;

        if let Some(path) = &ctx.path {
            fs::write(path, &normalized).map_err(|e| Error::io(path, "write", e))?;
        }

        ctx.output = Some(normalized);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_normalize_reads_back_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lib.rs");
        fs::write(&path, "fn a() {}\nfn b() {}\n").unwrap();
        let mut ctx = FinalizeContext::for_file(&path, "ignored");

        NormalizePhase.run(&mut ctx).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fn a() {}\n\nfn b() {}\n");
    }

    #[test]
    fn test_unparsable_printed_text_is_format_error() {
        let mut ctx = FinalizeContext::in_memory("");
        ctx.output = Some("fn {".to_string());

        let err = NormalizePhase.run(&mut ctx).unwrap_err();

        assert!(matches!(*err, Error::Format { .. }));
    }
}
