//! PackageIdentification trait and the Cargo identifier

use crate::error::{Error, Result};
use crate::manifest::extract_data;
use crate::metadata::PackageMetadata;
use crate::{CARGO_PACKAGE_TYPE, MANIFEST_FILENAME};

/// An identifier that recognises one kind of package.
///
/// Implementations fill in whatever the metadata does not know yet and
/// leave everything else untouched. Directories that are not theirs are
/// ignored without error.
pub trait PackageIdentification: Send + Sync {
    /// Type tag this identifier assigns.
    fn id(&self) -> &str;

    fn identify(&self, metadata: &mut PackageMetadata) -> Result<()>;
}

/// Identifies Cargo packages with `Cargo.toml` files.
#[derive(Debug, Default)]
pub struct CargoPackageIdentification;

impl CargoPackageIdentification {
    pub fn new() -> Self {
        Self
    }
}

impl PackageIdentification for CargoPackageIdentification {
    fn id(&self) -> &str {
        CARGO_PACKAGE_TYPE
    }

    fn identify(&self, metadata: &mut PackageMetadata) -> Result<()> {
        if metadata
            .package_type
            .as_deref()
            .is_some_and(|t| t != CARGO_PACKAGE_TYPE)
        {
            return Ok(());
        }

        let cargo_toml = metadata.path().join(MANIFEST_FILENAME);
        if !cargo_toml.is_file() {
            return Ok(());
        }

        let data = extract_data(&cargo_toml);
        if data.name.is_none() && metadata.name.is_none() {
            return Err(Error::Config { path: cargo_toml });
        }

        tracing::debug!(
            path = %metadata.path().display(),
            name = ?data.name,
            dependencies = data.depends.len(),
            "Identified Cargo package"
        );

        metadata.claim_type(CARGO_PACKAGE_TYPE);
        metadata.claim_name(data.name);
        metadata.dependencies.union(&data.depends);

        Ok(())
    }
}
