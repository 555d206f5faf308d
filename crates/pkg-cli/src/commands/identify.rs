//! Identify command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use pkg_identify::{CargoPackageIdentification, PackageIdentification, PackageMetadata};
use serde_json::json;

use crate::error::Result;

/// Run the identify command
pub fn run_identify(paths: &[PathBuf], json: bool) -> Result<i32> {
    let identifier = CargoPackageIdentification::new();

    let mut identified = Vec::new();
    let mut skipped = Vec::new();
    for path in paths {
        match identify_path(&identifier, path)? {
            Some(metadata) => identified.push(metadata),
            None => skipped.push(path.clone()),
        }
    }

    if json {
        let output = json!({
            "packages": identified,
            "skipped": skipped,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(0);
    }

    for metadata in &identified {
        print_package(metadata);
    }
    for path in &skipped {
        println!(
            "{} {} ({})",
            "-".dimmed(),
            path.display(),
            "no Cargo.toml".dimmed()
        );
    }

    Ok(0)
}

/// Identify the package in `path`; `None` when it is not a Cargo package.
pub(crate) fn identify_path(
    identifier: &dyn PackageIdentification,
    path: &Path,
) -> Result<Option<PackageMetadata>> {
    let mut metadata = PackageMetadata::new(path);
    identifier.identify(&mut metadata)?;

    if metadata.package_type.as_deref() == Some(identifier.id()) {
        Ok(Some(metadata))
    } else {
        tracing::debug!(path = %path.display(), "Not a Cargo package");
        Ok(None)
    }
}

fn print_package(metadata: &PackageMetadata) {
    let name = metadata.name.as_deref().unwrap_or("?");
    println!(
        "{} {} ({})",
        "+".green(),
        name.cyan(),
        metadata.path().display()
    );

    let deps = metadata.dependencies.build();
    if deps.is_empty() {
        println!("    {}", "no dependencies".dimmed());
    } else {
        let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
        println!("    {}: {}", "depends".dimmed(), deps.join(", "));
    }
}
