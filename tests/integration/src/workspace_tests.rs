//! Identify and build a small workspace of Cargo packages end to end.
//!
//! The fixture packages under `test-fixtures/packages` are identified, put in
//! dependency order and built one after the other, each seeing the installed
//! prefixes of the packages it depends on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pkg_build::{
    BuildContext, BuildOptions, BuildTask, CargoBuildTask, CargoExecutable, Dependency,
    DependencySpec,
};
use pkg_identify::{CargoPackageIdentification, PackageIdentification, PackageMetadata};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/packages")
}

/// Identify every fixture package, keyed by name.
fn identify_all() -> BTreeMap<String, PackageMetadata> {
    let identifier = CargoPackageIdentification::new();
    let mut packages = BTreeMap::new();
    for name in ["widget", "gear"] {
        let mut metadata = PackageMetadata::new(fixtures().join(name));
        identifier.identify(&mut metadata).unwrap();
        packages.insert(metadata.name.clone().unwrap(), metadata);
    }
    packages
}

/// Packages in an order where every workspace dependency comes first.
fn build_order(packages: &BTreeMap<String, PackageMetadata>) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    while order.len() < packages.len() {
        let ready = packages
            .iter()
            .find(|(name, metadata)| {
                !order.contains(name)
                    && metadata
                        .dependencies
                        .build()
                        .iter()
                        .filter(|dep| packages.contains_key(*dep))
                        .all(|dep| order.contains(dep))
            })
            .map(|(name, _)| name.clone())
            .expect("dependency cycle in fixtures");
        order.push(ready);
    }
    order
}

/// Build all fixtures into `workspace` with `task`, returning exit codes.
async fn build_workspace(task: &CargoBuildTask, workspace: &Path) -> Vec<(String, i32)> {
    let packages = identify_all();
    let mut results = Vec::new();

    for name in build_order(&packages) {
        let metadata = &packages[&name];
        let mut options = BuildOptions::new();
        let mut context = BuildContext::new(
            &name,
            metadata.path(),
            workspace.join("build").join(&name),
            workspace.join("install").join(&name),
        );
        for dep in metadata.dependencies.build() {
            if let Some(dep_metadata) = packages.get(dep) {
                context = context
                    .with_dependency(Dependency::new(dep, workspace.join("install").join(dep)));
                options = options.with_dependency(dep, DependencySpec::path(dep_metadata.path()));
            }
        }

        let code = task.build(&context.with_options(options)).await.unwrap();
        results.push((name, code));
    }
    results
}

#[test]
fn test_fixtures_identify_with_dependencies() {
    let packages = identify_all();

    assert_eq!(packages.keys().collect::<Vec<_>>(), vec!["gear", "widget"]);
    let widget = &packages["widget"];
    assert_eq!(widget.package_type.as_deref(), Some("cargo"));
    assert!(widget.dependencies.build().contains("gear"));
    assert_eq!(widget.dependencies.build(), widget.dependencies.run());
    assert!(packages["gear"].dependencies.build().is_empty());
}

#[test]
fn test_build_order_puts_dependencies_first() {
    assert_eq!(build_order(&identify_all()), vec!["gear", "widget"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_workspace_builds_in_order_with_fake_cargo() {
    use pkg_test_utils::fake_cargo::FakeCargo;

    let workspace = TempDir::new().unwrap();
    let cargo = FakeCargo::install(&workspace.path().join("tools"), 0);
    let task = CargoBuildTask::new(CargoExecutable::at(cargo.path()));

    let results = build_workspace(&task, workspace.path()).await;

    assert_eq!(
        results,
        vec![("gear".to_string(), 0), ("widget".to_string(), 0)]
    );

    // widget was built last, with gear's bin directory first on PATH
    let path = cargo.logged("PATH").unwrap();
    let first = std::env::split_paths(&path).next().unwrap();
    assert_eq!(first, workspace.path().join("install/gear/lib/gear/bin"));

    // The staged widget manifest points at the gear sources
    let staged = pkg_fs::read_text(&workspace.path().join("build/widget/Cargo.toml")).unwrap();
    assert!(staged.contains(fixtures().join("gear").to_string_lossy().as_ref()));
    assert!(staged.starts_with("# Widget depends on gear"));

    // Sources are never written to
    let source = pkg_fs::read_text(&fixtures().join("widget/Cargo.toml")).unwrap();
    assert!(source.contains("gear = { path = \"../gear\" }"));
}

#[tokio::test]
#[ignore = "invokes the real cargo toolchain"]
async fn test_workspace_builds_with_real_cargo() {
    let cargo = CargoExecutable::discover();
    if cargo.path().is_err() {
        return;
    }

    let workspace = TempDir::new().unwrap();
    let task = CargoBuildTask::new(cargo);

    let results = build_workspace(&task, workspace.path()).await;

    assert!(results.iter().all(|(_, code)| *code == 0), "{:?}", results);
    let bin = if cfg!(windows) { "widget.exe" } else { "widget" };
    assert!(
        workspace
            .path()
            .join("install/widget/lib/widget/bin")
            .join(bin)
            .is_file()
    );
}
