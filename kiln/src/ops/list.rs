//! List operation - describe the files a manifest generates.

use kiln_manifest::{FileKind, Manifest};

use crate::reports::{ListReport, ListedFile, ListedSection};

/// Execute the list operation.
pub fn list(manifest: &Manifest) -> ListReport {
    let files = manifest
        .files
        .iter()
        .map(|file| ListedFile {
            path: file.path().to_string(),
            kind: match file.kind() {
                FileKind::Rust => "rust",
                FileKind::Raw => "raw",
            },
            sections: file
                .sections
                .iter()
                .map(|section| ListedSection {
                    name: section.name().to_string(),
                    origin: match &section.source {
                        Some(source) => source.display().to_string(),
                        None => "inline".to_string(),
                    },
                })
                .collect(),
        })
        .collect();

    ListReport { files }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list() {
        let manifest: Manifest = r#"
[project]
name = "demo"

[[files]]
path = "lib.rs"

[[files.sections]]
name = "body"
source = "templates/body.rs.j2"

[[files]]
path = "snippet.rs"
kind = "raw"
"#
        .parse()
        .unwrap();

        let report = list(&manifest);

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].kind, "rust");
        assert_eq!(report.files[0].sections[0].origin, "templates/body.rs.j2");
        assert_eq!(report.files[1].kind, "raw");
        assert!(report.files[1].sections.is_empty());
    }
}
