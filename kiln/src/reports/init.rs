//! Init command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from creating a starter project.
#[derive(Debug)]
pub struct InitReport {
    pub name: String,
    pub dir: PathBuf,
    /// Created files, relative to `dir`.
    pub created: Vec<String>,
}

impl Report for InitReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!(
            "Created kiln project '{}' in {}",
            self.name,
            self.dir.display()
        ));
        for file in &self.created {
            out.added_item(file);
        }
        out.newline();
        out.section("Next steps");
        if self.dir != PathBuf::from(".") {
            out.list_item(&format!("cd {}", self.dir.display()));
        }
        out.list_item("kiln bake");
    }
}
