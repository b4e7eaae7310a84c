//! Init operation - scaffold a starter project.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use kiln_core::{File, FileRules, GeneratedFile, WriteResult, to_snake_case};
use kiln_manifest::MANIFEST_FILE;

use crate::reports::InitReport;

/// Path of the starter section template, relative to the project.
const TEMPLATE_PATH: &str = "templates/types.rs.j2";

const STARTER_TEMPLATE: &str = r#"use std::collections::HashMap;
use std::fmt;

/// Entries of the {{ service }} service.
#[derive(Debug, Default)]
pub struct {{ service | pascal_case }} {
    entries: HashMap<String, String>,
}

impl {{ service | pascal_case }} {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}
"#;

/// Starter `kiln.toml`.
struct StarterManifest {
    name: String,
}

impl GeneratedFile for StarterManifest {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(MANIFEST_FILE)
    }

    fn rules(&self) -> FileRules {
        FileRules {
            header: Some("# Created by `kiln init`. Run `kiln bake` to generate files."),
            ..FileRules::default()
        }
    }

    fn render(&self) -> String {
        format!(
            r#"[project]
name = "{name}"
output = "."

[templates]
header = "// Code generated by kiln. DO NOT EDIT.\n\n"

[[files]]
path = "{module}.rs"

[[files.sections]]
name = "header"
template = "{{% include 'header' %}}"

[[files.sections]]
name = "types"
source = "{template}"

[files.sections.data]
service = "{name}"
"#,
            name = self.name,
            module = to_snake_case(&self.name),
            template = TEMPLATE_PATH,
        )
    }
}

/// Execute the init operation.
///
/// Fails if `dir` already holds a manifest.
pub fn init(dir: &Path, name: Option<&str>) -> Result<InitReport> {
    let name = match name {
        Some(name) => name.to_string(),
        None => dir_name(dir)?,
    };

    if dir.join(MANIFEST_FILE).exists() {
        eyre::bail!(
            "'{}' already exists",
            dir.join(MANIFEST_FILE).display()
        );
    }

    let mut created = Vec::new();

    let manifest = StarterManifest { name: name.clone() };
    if manifest.write(dir).wrap_err("failed to create kiln.toml")? == WriteResult::Written {
        created.push(MANIFEST_FILE.to_string());
    }

    // an edited template from an earlier project is kept
    let template = File::new(dir.join(TEMPLATE_PATH), STARTER_TEMPLATE)
        .with_rules(FileRules::scaffold());
    if template
        .write()
        .wrap_err_with(|| format!("failed to create '{TEMPLATE_PATH}'"))?
        == WriteResult::Written
    {
        created.push(TEMPLATE_PATH.to_string());
    }

    Ok(InitReport {
        name,
        dir: dir.to_path_buf(),
        created,
    })
}

fn dir_name(dir: &Path) -> Result<String> {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .wrap_err("Failed to get current directory")?
            .join(dir)
    };
    absolute
        .components()
        .next_back()
        .and_then(|c| c.as_os_str().to_str())
        .filter(|name| *name != "." && *name != "/")
        .map(str::to_string)
        .ok_or_else(|| eyre::eyre!("'{}' has no usable directory name", dir.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use kiln_manifest::KilnToml;
    use tempfile::TempDir;

    use super::*;
    use crate::{ops, project::Project};

    #[test]
    fn test_init_creates_a_bakeable_project() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("inventory");

        let report = init(&dir, None).unwrap();

        assert_eq!(report.name, "inventory");
        assert_eq!(report.created, vec!["kiln.toml", "templates/types.rs.j2"]);
        assert!(KilnToml::open(dir.join("kiln.toml")).is_ok());

        let project = Project::open(&dir.join("kiln.toml")).unwrap();
        let artifacts = project.artifacts(None).unwrap();
        let checked = ops::check(&project, &artifacts).unwrap();
        assert!(checked.is_valid(), "{:?}", checked.failures);
    }

    #[test]
    fn test_starter_output_drops_unused_import() {
        let temp = TempDir::new().unwrap();
        init(temp.path(), Some("store")).unwrap();
        let project = Project::open(&temp.path().join("kiln.toml")).unwrap();
        let artifacts = project.artifacts(None).unwrap();

        let preview = project
            .writer(temp.path())
            .unwrap()
            .preview(&artifacts)
            .unwrap();

        assert_eq!(preview[0].path, "store.rs");
        assert!(preview[0].content.starts_with(
            "// Code generated by kiln. DO NOT EDIT.\n\nuse std::collections::HashMap;\n\n"
        ));
        assert!(!preview[0].content.contains("use std::fmt;"));
        assert!(preview[0].content.contains("pub struct Store {"));
    }

    #[test]
    fn test_init_refuses_existing_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("kiln.toml"), "[project]\nname = \"x\"\n").unwrap();

        let err = init(temp.path(), Some("demo")).unwrap_err();

        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            fs::read_to_string(temp.path().join("kiln.toml")).unwrap(),
            "[project]\nname = \"x\"\n"
        );
    }

    #[test]
    fn test_init_keeps_existing_template() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("templates")).unwrap();
        fs::write(temp.path().join("templates/types.rs.j2"), "pub struct Mine;\n").unwrap();

        let report = init(temp.path(), Some("demo")).unwrap();

        assert_eq!(report.created, vec!["kiln.toml"]);
        assert_eq!(
            fs::read_to_string(temp.path().join("templates/types.rs.j2")).unwrap(),
            "pub struct Mine;\n"
        );
    }
}
