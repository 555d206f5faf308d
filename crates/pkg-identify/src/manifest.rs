//! `Cargo.toml` parsing for package identification.
//!
//! Only two things are read from a manifest: `package.name` and the keys of
//! the `[dependencies]` table. Everything else in the document is ignored,
//! including values that would not pass Cargo's own validation.
//!
//! # Example TOML
//!
//! ```toml
//! [package]
//! name = "widget"
//!
//! [dependencies]
//! gear = { path = "../gear" }
//! spring = "1.0"
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::Result;

/// The parts of a `Cargo.toml` relevant to identification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    /// Value of `package.name`, if present and a string.
    pub name: Option<String>,
    /// Keys of the `[dependencies]` table.
    pub dependencies: BTreeSet<String>,
}

impl PackageManifest {
    /// Parse manifest content, failing on invalid TOML.
    pub fn parse(content: &str) -> Result<Self> {
        let table: toml::Table = content.parse()?;
        Ok(Self::from_table(&table))
    }

    /// Build a manifest from an already parsed document.
    pub fn from_table(table: &toml::Table) -> Self {
        Self {
            name: extract_project_name(table),
            dependencies: extract_dependencies(table).into_iter().collect(),
        }
    }

    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = pkg_fs::read_text(path)?;
        Self::parse(&content)
    }

    /// Read and parse the manifest at `path`, treating any failure as an
    /// empty manifest.
    ///
    /// A malformed manifest somewhere in a workspace must not stop discovery
    /// of the packages around it.
    pub fn load_lenient(path: &Path) -> Self {
        match Self::load(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Ignoring unreadable manifest");
                Self::default()
            }
        }
    }
}

/// Name and dependencies resolved for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedData {
    /// `package.name`, or the manifest directory's base name.
    pub name: Option<String>,
    /// Declared dependencies without the package itself.
    pub depends: BTreeSet<String>,
}

/// Extract the project name and dependencies from the manifest at `cargo_toml`.
///
/// Falls back to the containing directory's name when the manifest has no
/// usable `package.name`. The resolved name is never part of `depends`.
pub fn extract_data(cargo_toml: &Path) -> ExtractedData {
    let manifest = PackageManifest::load_lenient(cargo_toml);

    let name = manifest.name.or_else(|| directory_name(cargo_toml));

    let mut depends = manifest.dependencies;
    if let Some(name) = &name {
        depends.remove(name);
    }

    ExtractedData { name, depends }
}

/// Extract `package.name` from a parsed manifest.
///
/// Returns `None` when the key is missing, not a string, or empty.
pub fn extract_project_name(content: &toml::Table) -> Option<String> {
    content
        .get("package")
        .and_then(|package| package.as_table())
        .and_then(|package| package.get("name"))
        .and_then(|name| name.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Extract the keys of the `[dependencies]` table from a parsed manifest.
pub fn extract_dependencies(content: &toml::Table) -> Vec<String> {
    match content.get("dependencies").and_then(|deps| deps.as_table()) {
        Some(deps) => deps.keys().cloned().collect(),
        None => Vec::new(),
    }
}

fn directory_name(cargo_toml: &Path) -> Option<String> {
    let parent = cargo_toml.parent()?;

    let name = parent
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    if name.is_some() {
        return name;
    }

    // "." and "" have no file name of their own
    let resolved = if parent.as_os_str().is_empty() {
        dunce::canonicalize(".")
    } else {
        dunce::canonicalize(parent)
    };
    resolved
        .ok()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}
