//! Build environment resolution
//!
//! The default resolver starts from the current process environment and
//! applies the hooks every dependency registered at install time. Hooks are
//! read from `<prefix>/share/<name>/package.dsv`, one `type;name;value`
//! entry per line:
//!
//! ```text
//! source;share/gear/hook/cargo_gear_path.dsv
//! prepend-non-duplicate;PATH;lib/gear/bin
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::context::Dependency;
use crate::error::EnvironmentError;

/// Environment variables for a child process.
pub type Environment = BTreeMap<String, String>;

/// Computes the environment a package is built in.
#[async_trait]
pub trait EnvironmentResolver: Send + Sync {
    async fn resolve(
        &self,
        phase: &str,
        build_base: &Path,
        dependencies: &[Dependency],
    ) -> Result<Environment, EnvironmentError>;
}

/// Process environment plus the hooks of every dependency.
#[derive(Debug, Clone, Default)]
pub struct InheritedEnvironment {
    base: Option<Environment>,
}

impl InheritedEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `base` instead of the process environment.
    pub fn with_base(base: Environment) -> Self {
        Self { base: Some(base) }
    }

    fn base_environment(&self) -> Environment {
        match &self.base {
            Some(base) => base.clone(),
            None => utf8_environment(std::env::vars_os()),
        }
    }
}

#[async_trait]
impl EnvironmentResolver for InheritedEnvironment {
    async fn resolve(
        &self,
        phase: &str,
        build_base: &Path,
        dependencies: &[Dependency],
    ) -> Result<Environment, EnvironmentError> {
        let mut env = self.base_environment();

        for dependency in dependencies {
            if !dependency.prefix.is_dir() {
                return Err(EnvironmentError::MissingPrefix {
                    name: dependency.name.clone(),
                    prefix: dependency.prefix.clone(),
                });
            }

            let package_dsv = dependency
                .prefix
                .join("share")
                .join(&dependency.name)
                .join("package.dsv");
            if !package_dsv.is_file() {
                tracing::debug!(dependency = %dependency.name, "No environment hooks");
                continue;
            }
            apply_dsv(&mut env, &dependency.prefix, &package_dsv)?;
        }

        tracing::debug!(
            phase,
            build_base = %build_base.display(),
            dependencies = dependencies.len(),
            "Resolved build environment"
        );
        Ok(env)
    }
}

/// Collect `vars`, dropping variables that are not valid UTF-8.
///
/// Dropped variables do not reach the build: the runner starts the child
/// from an empty environment.
fn utf8_environment(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Environment {
    let mut env = Environment::new();
    for (key, value) in vars {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => {
                env.insert(key, value);
            }
            (Ok(key), Err(_)) => {
                tracing::debug!(variable = %key, "Dropping environment variable with non-UTF-8 value");
            }
            (Err(key), _) => {
                tracing::debug!(
                    variable = %key.to_string_lossy(),
                    "Dropping environment variable with non-UTF-8 name"
                );
            }
        }
    }
    env
}

/// Apply one `.dsv` file, following `source` entries.
///
/// A file that ends up sourcing itself, directly or through other files, is
/// reported as [`EnvironmentError::MalformedHook`] at the offending entry.
pub fn apply_dsv(env: &mut Environment, prefix: &Path, dsv: &Path) -> Result<(), EnvironmentError> {
    apply_dsv_nested(env, prefix, dsv, &mut vec![dsv.to_path_buf()])
}

/// `active` holds the chain of files currently being applied.
fn apply_dsv_nested(
    env: &mut Environment,
    prefix: &Path,
    dsv: &Path,
    active: &mut Vec<PathBuf>,
) -> Result<(), EnvironmentError> {
    let content = pkg_fs::read_text(dsv)?;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || EnvironmentError::MalformedHook {
            path: dsv.to_path_buf(),
            line: index + 1,
            content: line.to_string(),
        };

        let mut fields = line.splitn(3, ';');
        let kind = fields.next().unwrap_or_default();
        match kind {
            "source" => {
                let relative = fields.next().filter(|r| !r.is_empty()).ok_or_else(malformed)?;
                let sourced = prefix.join(relative);
                // Only the descriptor format is interpreted; shell variants are for users
                if sourced.extension().is_some_and(|ext| ext == "dsv") {
                    if active.contains(&sourced) {
                        return Err(malformed());
                    }
                    active.push(sourced.clone());
                    apply_dsv_nested(env, prefix, &sourced, active)?;
                    active.pop();
                }
            }
            "prepend-non-duplicate" | "append-non-duplicate" | "set" | "set-if-unset" => {
                let name = fields.next().filter(|n| !n.is_empty()).ok_or_else(malformed)?;
                let value = fields.next().ok_or_else(malformed)?;
                apply_entry(env, prefix, kind, name, value);
            }
            _ => return Err(malformed()),
        }
    }

    Ok(())
}

fn apply_entry(env: &mut Environment, prefix: &Path, kind: &str, name: &str, value: &str) {
    match kind {
        "prepend-non-duplicate" => {
            let value = prefixed(prefix, value);
            let paths = join_unique(&value, env.get(name), true);
            env.insert(name.to_string(), paths);
        }
        "append-non-duplicate" => {
            let value = prefixed(prefix, value);
            let paths = join_unique(&value, env.get(name), false);
            env.insert(name.to_string(), paths);
        }
        "set" => {
            env.insert(name.to_string(), prefixed_if_exists(prefix, value));
        }
        _ => {
            if !env.contains_key(name) {
                env.insert(name.to_string(), prefixed_if_exists(prefix, value));
            }
        }
    }
}

fn prefixed(prefix: &Path, value: &str) -> String {
    if value.is_empty() {
        prefix.to_string_lossy().into_owned()
    } else {
        prefix.join(value).to_string_lossy().into_owned()
    }
}

fn prefixed_if_exists(prefix: &Path, value: &str) -> String {
    let candidate = prefix.join(value);
    if !value.is_empty() && candidate.exists() {
        candidate.to_string_lossy().into_owned()
    } else {
        value.to_string()
    }
}

fn join_unique(value: &str, existing: Option<&String>, prepend: bool) -> String {
    let mut entries: Vec<PathBuf> = existing
        .map(|e| std::env::split_paths(e).collect())
        .unwrap_or_default();
    entries.retain(|entry| !entry.as_os_str().is_empty() && entry != Path::new(value));

    if prepend {
        entries.insert(0, PathBuf::from(value));
    } else {
        entries.push(PathBuf::from(value));
    }

    std::env::join_paths(entries)
        .map(|joined: OsString| joined.to_string_lossy().into_owned())
        .unwrap_or_else(|_| value.to_string())
}
