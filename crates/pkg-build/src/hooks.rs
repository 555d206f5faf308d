//! Environment hooks and activation scripts
//!
//! A hook describes one change to an environment variable that applies when
//! an installed package is activated. Hooks are written under
//! `<install_base>/share/<pkg>/hook/` as a `.dsv` descriptor (read back by
//! [`InheritedEnvironment`](crate::InheritedEnvironment)) and a POSIX shell
//! snippet. Activation scripts in `share/<pkg>/` list every hook.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};

/// How a hook changes its variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookMode {
    Prepend,
    Append,
    Set,
}

impl HookMode {
    fn dsv_type(self) -> &'static str {
        match self {
            Self::Prepend => "prepend-non-duplicate",
            Self::Append => "append-non-duplicate",
            Self::Set => "set",
        }
    }
}

impl fmt::Display for HookMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepend => write!(f, "prepend"),
            Self::Append => write!(f, "append"),
            Self::Set => write!(f, "set"),
        }
    }
}

/// A registered hook: its name and the files backing it, relative to the
/// install prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookDescriptor {
    pub name: String,
    pub files: Vec<PathBuf>,
}

/// Persists a single environment hook.
pub trait HookRegistrar: Send + Sync {
    fn create_hook(
        &self,
        hook_name: &str,
        install_base: &Path,
        pkg_name: &str,
        variable: &str,
        relative_path: &Path,
        mode: HookMode,
    ) -> Result<HookDescriptor>;
}

/// Writes the activation scripts of a package from its hooks.
pub trait ScriptWriter: Send + Sync {
    fn write_scripts(&self, pkg_name: &str, install_base: &Path, hooks: &[HookDescriptor])
    -> Result<()>;
}

/// Writes `.dsv` and `.sh` hook files.
#[derive(Debug, Default)]
pub struct DsvHookRegistrar;

impl DsvHookRegistrar {
    pub fn new() -> Self {
        Self
    }
}

impl HookRegistrar for DsvHookRegistrar {
    fn create_hook(
        &self,
        hook_name: &str,
        install_base: &Path,
        pkg_name: &str,
        variable: &str,
        relative_path: &Path,
        mode: HookMode,
    ) -> Result<HookDescriptor> {
        if hook_name.is_empty() || hook_name.contains(['/', '\\']) {
            return Err(BuildError::Hook(format!("bad hook name '{}'", hook_name)));
        }
        if variable.is_empty() || variable.contains(['=', ';']) {
            return Err(BuildError::Hook(format!("bad variable name '{}'", variable)));
        }

        let hook_dir = Path::new("share").join(pkg_name).join("hook");
        let value = relative_path.to_string_lossy();

        let dsv = hook_dir.join(format!("{}.dsv", hook_name));
        pkg_fs::write_text(
            &install_base.join(&dsv),
            &format!("{};{};{}\n", mode.dsv_type(), variable, value),
        )?;

        let sh = hook_dir.join(format!("{}.sh", hook_name));
        pkg_fs::write_text(&install_base.join(&sh), &shell_hook(variable, &value, mode))?;

        tracing::debug!(hook = hook_name, variable, %mode, "Created environment hook");

        Ok(HookDescriptor {
            name: hook_name.to_string(),
            files: vec![dsv, sh],
        })
    }
}

fn shell_hook(variable: &str, value: &str, mode: HookMode) -> String {
    let full = if value.is_empty() {
        "$PKG_CURRENT_PREFIX".to_string()
    } else {
        format!("$PKG_CURRENT_PREFIX/{}", value)
    };
    let body = match mode {
        HookMode::Prepend => format!(
            "case \":${{{var}}}:\" in\n  *\":{full}:\"*) ;;\n  *) export {var}=\"{full}${{{var}:+:${var}}}\" ;;\nesac\n",
            var = variable,
            full = full
        ),
        HookMode::Append => format!(
            "case \":${{{var}}}:\" in\n  *\":{full}:\"*) ;;\n  *) export {var}=\"${{{var}:+${var}:}}{full}\" ;;\nesac\n",
            var = variable,
            full = full
        ),
        HookMode::Set => format!("export {}=\"{}\"\n", variable, full),
    };
    format!("# generated by cargo-pkg\n{}", body)
}

/// Writes `package.dsv` and `package.sh` listing every hook.
#[derive(Debug, Default)]
pub struct DsvScriptWriter;

impl DsvScriptWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptWriter for DsvScriptWriter {
    fn write_scripts(
        &self,
        pkg_name: &str,
        install_base: &Path,
        hooks: &[HookDescriptor],
    ) -> Result<()> {
        let share = install_base.join("share").join(pkg_name);

        let mut dsv = String::new();
        let mut sh = format!(
            "# generated by cargo-pkg\nPKG_CURRENT_PREFIX=\"{}\"\n",
            install_base.to_string_lossy()
        );
        for hook in hooks {
            for file in &hook.files {
                let file = file.to_string_lossy();
                dsv.push_str(&format!("source;{}\n", file));
                if file.ends_with(".sh") {
                    sh.push_str(&format!(". \"$PKG_CURRENT_PREFIX/{}\"\n", file));
                }
            }
        }
        sh.push_str("unset PKG_CURRENT_PREFIX\n");

        pkg_fs::write_text(&share.join("package.dsv"), &dsv)?;
        pkg_fs::write_text(&share.join("package.sh"), &sh)?;

        tracing::info!(package = pkg_name, hooks = hooks.len(), "Wrote activation scripts");
        Ok(())
    }
}
