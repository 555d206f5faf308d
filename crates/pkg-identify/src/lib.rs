//! Cargo package identification.
//!
//! Locates a `Cargo.toml` in a package directory, reads the project name and
//! the declared `[dependencies]`, and merges them into orchestrator-owned
//! [`PackageMetadata`].

pub mod error;
pub mod identification;
pub mod manifest;
pub mod metadata;

/// File name of the manifest that marks a directory as a Cargo package.
pub const MANIFEST_FILENAME: &str = "Cargo.toml";

/// Package type tag set on metadata identified by this crate.
pub const CARGO_PACKAGE_TYPE: &str = "cargo";

pub use error::{Error, Result};
pub use identification::{CargoPackageIdentification, PackageIdentification};
pub use manifest::{
    ExtractedData, PackageManifest, extract_data, extract_dependencies, extract_project_name,
};
pub use metadata::{DependencyPhase, DependencySets, PackageMetadata};
