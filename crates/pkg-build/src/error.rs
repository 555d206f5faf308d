//! Error types for pkg-build

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that abort a package build.
///
/// A cargo run that exits non-zero is not an error: its exit code is
/// returned as the build result.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Could not find '{tool}' executable{hint}")]
    ToolNotFound { tool: String, hint: String },

    #[error(transparent)]
    Fs(#[from] pkg_fs::Error),

    #[error("Failed to patch manifest at {path}: {message}")]
    ManifestPatch { path: PathBuf, message: String },

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid environment hook: {0}")]
    Hook(String),
}

/// Failure to compute the environment a build runs in.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("Install prefix {prefix} of dependency '{name}' does not exist")]
    MissingPrefix { name: String, prefix: PathBuf },

    #[error("Malformed hook entry in {path} (line {line}): {content}")]
    MalformedHook {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error(transparent)]
    Fs(#[from] pkg_fs::Error),
}
