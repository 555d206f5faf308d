//! Cargo executable discovery
//!
//! The executable is looked up once, typically at process start, and handed
//! to [`CargoBuildTask`](crate::CargoBuildTask). A missing executable is only
//! reported when a build actually needs it.

use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};

/// Environment variable naming the cargo command to use instead of `cargo`.
pub const CARGO_COMMAND_ENV: &str = "CARGO_COMMAND";

const DEFAULT_COMMAND: &str = "cargo";

/// Result of looking up the cargo executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoExecutable {
    command: String,
    path: Option<PathBuf>,
}

impl CargoExecutable {
    /// Look up `$CARGO_COMMAND` (default `cargo`) on `PATH`.
    pub fn discover() -> Self {
        let command = std::env::var(CARGO_COMMAND_ENV)
            .ok()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND.to_string());
        Self::lookup(&command)
    }

    /// Look up `command` on `PATH`.
    pub fn lookup(command: &str) -> Self {
        let path = pkg_fs::find_executable(command);
        match &path {
            Some(found) => tracing::debug!(command, path = %found.display(), "Found cargo executable"),
            None => tracing::debug!(command, "Cargo executable not found"),
        }
        Self {
            command: command.to_string(),
            path,
        }
    }

    /// Use `path` without checking it.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            command: path.to_string_lossy().into_owned(),
            path: Some(path),
        }
    }

    /// An executable that was not found.
    pub fn missing() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            path: None,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Resolved path, or [`BuildError::ToolNotFound`].
    pub fn path(&self) -> Result<&Path> {
        self.path.as_deref().ok_or_else(|| BuildError::ToolNotFound {
            tool: self.command.clone(),
            hint: "\n  Install: https://rustup.rs".to_string(),
        })
    }
}
