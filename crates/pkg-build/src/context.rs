//! Per-package build context

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::hooks::HookDescriptor;
use crate::patch::DependencySpec;

/// A dependency that is already installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    /// Install prefix the dependency was installed into.
    pub prefix: PathBuf,
}

impl Dependency {
    pub fn new(name: impl Into<String>, prefix: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
        }
    }
}

/// Caller-tunable parts of a build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Extra compiler flags, appended to `RUSTFLAGS`.
    pub cargo_args: Vec<String>,
    /// Entries merged into the staged manifest's `[dependencies]`.
    pub extra_dependencies: BTreeMap<String, DependencySpec>,
    /// Hooks written to the activation scripts ahead of the `PATH` hook.
    pub additional_hooks: Vec<HookDescriptor>,
    /// Register the `PATH` hook but do not write activation scripts.
    pub skip_hook_creation: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cargo flags; leading whitespace is stripped from each token so
    /// a flag can be passed as `" --help"` without being taken for an option.
    pub fn with_cargo_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cargo_args = args
            .into_iter()
            .map(|arg| arg.as_ref().trim_start().to_string())
            .collect();
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>, spec: DependencySpec) -> Self {
        self.extra_dependencies.insert(name.into(), spec);
        self
    }

    pub fn with_hook(mut self, hook: HookDescriptor) -> Self {
        self.additional_hooks.push(hook);
        self
    }

    pub fn skip_hook_creation(mut self, skip: bool) -> Self {
        self.skip_hook_creation = skip;
        self
    }
}

/// Everything the build task needs to build one package.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub pkg_name: String,
    /// Package source directory, never written to.
    pub source_path: PathBuf,
    /// Staging directory, also used as `CARGO_TARGET_DIR`.
    pub build_base: PathBuf,
    /// Install prefix of this package.
    pub install_base: PathBuf,
    /// Installed dependencies in activation order.
    pub dependencies: Vec<Dependency>,
    pub options: BuildOptions,
}

impl BuildContext {
    pub fn new(
        pkg_name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        build_base: impl Into<PathBuf>,
        install_base: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pkg_name: pkg_name.into(),
            source_path: source_path.into(),
            build_base: build_base.into(),
            install_base: install_base.into(),
            dependencies: Vec::new(),
            options: BuildOptions::default(),
        }
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// `--root` passed to `cargo install`: `<install_base>/lib/<pkg>`.
    pub fn install_root(&self) -> PathBuf {
        self.install_base.join(self.lib_dir())
    }

    /// Binary directory relative to the install prefix: `lib/<pkg>/bin`.
    pub fn bin_dir(&self) -> PathBuf {
        self.lib_dir().join("bin")
    }

    /// Staged manifest location.
    pub fn staged_manifest(&self) -> PathBuf {
        self.build_base.join(pkg_identify::MANIFEST_FILENAME)
    }

    fn lib_dir(&self) -> PathBuf {
        Path::new("lib").join(&self.pkg_name)
    }
}
