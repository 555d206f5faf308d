use std::path::PathBuf;

/// Errors that can occur while identifying a package.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither the manifest nor the existing metadata yield a package name.
    #[error("Failed to extract project name from '{path}'")]
    Config { path: PathBuf },

    /// Manifest is not valid TOML.
    #[error("failed to parse Cargo manifest: {0}")]
    Parse(#[from] toml::de::Error),

    /// Manifest could not be read.
    #[error(transparent)]
    Fs(#[from] pkg_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
