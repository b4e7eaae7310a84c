//! List command report data structures.

use super::output::{Output, Report};

/// Files and sections declared in a manifest.
#[derive(Debug)]
pub struct ListReport {
    pub files: Vec<ListedFile>,
}

#[derive(Debug)]
pub struct ListedFile {
    pub path: String,
    /// `rust` or `raw`.
    pub kind: &'static str,
    pub sections: Vec<ListedSection>,
}

#[derive(Debug)]
pub struct ListedSection {
    pub name: String,
    /// `inline` or the template file path.
    pub origin: String,
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        if self.files.is_empty() {
            out.preformatted("No files defined");
            return;
        }

        out.section("Files");
        for file in &self.files {
            out.list_item(&format!("{} ({})", file.path, file.kind));
            for section in &file.sections {
                out.key_value_indented(&format!("  {}", section.name), &section.origin);
            }
        }
    }
}
