//! Staged manifest patching
//!
//! Extra dependencies are merged into the `[dependencies]` table of the
//! staged `Cargo.toml`. Editing goes through `toml_edit` so the rest of the
//! document keeps its layout and comments.

use std::collections::BTreeMap;
use std::path::Path;

use toml_edit::{DocumentMut, InlineTable, Item};

use crate::error::{BuildError, Result};

/// Source or version of a dependency to inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySpec {
    /// `name = "1.0"`
    Version(String),
    /// `name = { path = "...", version = "..." }`
    Detailed(BTreeMap<String, String>),
}

impl DependencySpec {
    pub fn version(version: impl Into<String>) -> Self {
        Self::Version(version.into())
    }

    /// Dependency on a local crate directory.
    pub fn path(path: &Path) -> Self {
        Self::Detailed(BTreeMap::from([(
            "path".to_string(),
            path.to_string_lossy().into_owned(),
        )]))
    }

    fn to_item(&self) -> Item {
        match self {
            Self::Version(version) => toml_edit::value(version.as_str()),
            Self::Detailed(fields) => {
                let mut table = InlineTable::new();
                for (key, value) in fields {
                    table.insert(key.as_str(), value.as_str().into());
                }
                toml_edit::value(table)
            }
        }
    }
}

/// Merge `extra` into the `[dependencies]` table of the manifest at `path`.
///
/// The table is created when missing. Entries from `extra` replace existing
/// entries of the same name.
pub fn patch_manifest(path: &Path, extra: &BTreeMap<String, DependencySpec>) -> Result<()> {
    let content = pkg_fs::read_text(path)?;
    let patched = patch_content(&content, extra).map_err(|message| BuildError::ManifestPatch {
        path: path.to_path_buf(),
        message,
    })?;
    pkg_fs::write_text(path, &patched)?;

    tracing::debug!(
        path = %path.display(),
        added = extra.len(),
        "Patched staged manifest"
    );
    Ok(())
}

fn patch_content(
    content: &str,
    extra: &BTreeMap<String, DependencySpec>,
) -> std::result::Result<String, String> {
    let mut doc: DocumentMut = content
        .parse()
        .map_err(|e: toml_edit::TomlError| e.to_string())?;

    let dependencies = doc
        .entry("dependencies")
        .or_insert(toml_edit::table())
        .as_table_like_mut()
        .ok_or_else(|| "`dependencies` is not a table".to_string())?;

    for (name, spec) in extra {
        dependencies.insert(name, spec.to_item());
    }

    Ok(doc.to_string())
}
