//! [`TestPackage`] builder for build and identification scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace with `src/<pkg>`, `build/<pkg>` and
/// `install/<pkg>` locations for one package.
///
/// # Example
///
/// ```rust,no_run
/// use pkg_test_utils::package::TestPackage;
///
/// let pkg = TestPackage::new("widget")
///     .with_manifest("[package]\nname = \"widget\"\n")
///     .with_file("src/main.rs", "fn main() {}\n");
/// assert!(pkg.source().join("Cargo.toml").is_file());
/// ```
pub struct TestPackage {
    temp_dir: TempDir,
    name: String,
}

impl TestPackage {
    /// Create a workspace with an empty source directory for `name`.
    pub fn new(name: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("src").join(name)).unwrap();
        Self {
            temp_dir,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Package source directory.
    pub fn source(&self) -> PathBuf {
        self.root().join("src").join(&self.name)
    }

    /// Build directory (not created).
    pub fn build_base(&self) -> PathBuf {
        self.root().join("build").join(&self.name)
    }

    /// Install prefix (not created).
    pub fn install_base(&self) -> PathBuf {
        self.root().join("install").join(&self.name)
    }

    /// Write `Cargo.toml` in the source directory.
    pub fn with_manifest(self, content: &str) -> Self {
        self.with_file("Cargo.toml", content)
    }

    /// Write a file relative to the source directory.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.source().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Create an install prefix for a dependency, optionally with a
    /// `package.dsv` whose lines are `hooks`.
    pub fn install_dependency(&self, name: &str, hooks: &[&str]) -> PathBuf {
        let prefix = self.root().join("install").join(name);
        let share = prefix.join("share").join(name);
        fs::create_dir_all(&share).unwrap();
        if !hooks.is_empty() {
            let mut content = hooks.join("\n");
            content.push('\n');
            fs::write(share.join("package.dsv"), content).unwrap();
        }
        prefix
    }

    /// Read a file relative to the build directory.
    pub fn read_build_file(&self, relative: &str) -> String {
        fs::read_to_string(self.build_base().join(relative)).unwrap()
    }

    /// Assert a file exists relative to the install prefix.
    pub fn assert_installed(&self, relative: &str) {
        let path = self.install_base().join(relative);
        assert!(path.exists(), "Expected installed file: {}", path.display());
    }

    /// Assert a file does not exist relative to the install prefix.
    pub fn assert_not_installed(&self, relative: &str) {
        let path = self.install_base().join(relative);
        assert!(!path.exists(), "Unexpected installed file: {}", path.display());
    }
}
