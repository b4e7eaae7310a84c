//! Snapshot tests for finalized Rust files.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use kiln_codegen::{SectionDescriptor, render_sections};
use kiln_codegen_rust::Finalizer;
use serde_json::json;

/// Render sections and finalize the body in memory.
fn finalize_sections(sections: &[SectionDescriptor]) -> String {
    let body = render_sections(sections).expect("Failed to render sections");
    Finalizer::new()
        .format_str(&body)
        .expect("Failed to finalize")
        .content
}

#[test]
fn test_service_file() {
    let sections = vec![
        SectionDescriptor::new("header", "//! Storage service."),
        SectionDescriptor::new(
            "imports",
            "use std::fmt;\nuse std::collections::HashMap;\nuse serde::Serialize;\nuse crate::error::Error;\nuse std::io;",
        ),
        SectionDescriptor::new(
            "types",
            r#"/// A stored item.
#[derive(Debug, Clone, Serialize)]
pub struct {{ name }} { pub id: u64, pub label: String }"#,
        )
        .bind("name", "Item"),
        SectionDescriptor::new(
            "display",
            r#"impl fmt::Display for {{ name }} {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.label)
    }
}"#,
        )
        .bind("name", "Item"),
        SectionDescriptor::new(
            "service",
            r#"pub struct Service { items: HashMap<u64, {{ name }}> }
impl Service {
    pub fn get(&self, id: u64) -> Result<&{{ name }}, Error> {
        self.items.get(&id).ok_or(Error::NotFound(id))
    }
}"#,
        )
        .bind("name", "Item"),
    ];

    insta::assert_snapshot!("service_file", finalize_sections(&sections));
}

#[test]
fn test_module_root() {
    let sections = vec![
        SectionDescriptor::new(
            "modules",
            "{% for m in modules %}mod {{ m }};\n{% endfor %}",
        )
        .bind("modules", json!(["error", "service"])),
        SectionDescriptor::new(
            "exports",
            "pub use error::Error;\npub use service::Service;",
        ),
        SectionDescriptor::new(
            "imports",
            "use crate::service::Config;\nuse std::sync::Arc;\nuse std::path::PathBuf;",
        ),
        SectionDescriptor::new(
            "build",
            "pub fn build(config: Config) -> Arc<Service> { Arc::new(Service::new(config)) }",
        ),
    ];

    insta::assert_snapshot!("module_root", finalize_sections(&sections));
}
