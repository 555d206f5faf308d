//! Orchestrator-owned package metadata

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Phase in which a dependency is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyPhase {
    Build,
    Run,
}

impl fmt::Display for DependencyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Run => write!(f, "run"),
        }
    }
}

/// Dependency names per phase.
///
/// Sets only grow: there is no way to remove an entry once merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencySets {
    build: BTreeSet<String>,
    run: BTreeSet<String>,
}

impl DependencySets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&self) -> &BTreeSet<String> {
        &self.build
    }

    pub fn run(&self) -> &BTreeSet<String> {
        &self.run
    }

    pub fn get(&self, phase: DependencyPhase) -> &BTreeSet<String> {
        match phase {
            DependencyPhase::Build => &self.build,
            DependencyPhase::Run => &self.run,
        }
    }

    /// Merge `deps` into a single phase.
    pub fn union_phase<'a, I>(&mut self, phase: DependencyPhase, deps: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        let target = match phase {
            DependencyPhase::Build => &mut self.build,
            DependencyPhase::Run => &mut self.run,
        };
        target.extend(deps.into_iter().cloned());
    }

    /// Merge `deps` into both the build and run phases.
    pub fn union(&mut self, deps: &BTreeSet<String>) {
        self.union_phase(DependencyPhase::Build, deps);
        self.union_phase(DependencyPhase::Run, deps);
    }
}

/// What the orchestrator knows about a candidate package directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    /// Package type tag, e.g. `"cargo"`.
    #[serde(rename = "type")]
    pub package_type: Option<String>,
    /// Package name, first identifier to set it wins.
    pub name: Option<String>,
    /// Package directory.
    pub path: PathBuf,
    pub dependencies: DependencySets,
}

impl PackageMetadata {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            package_type: None,
            name: None,
            path: path.into(),
            dependencies: DependencySets::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the type tag unless another identifier already claimed it.
    pub fn claim_type(&mut self, package_type: &str) {
        if self.package_type.is_none() {
            self.package_type = Some(package_type.to_string());
        }
    }

    /// Set the name unless it is already known.
    pub fn claim_name(&mut self, name: Option<String>) {
        if self.name.is_none() {
            self.name = name;
        }
    }
}
