//! Build task behaviour with recorded collaborators.

mod common;

use common::{FixedEnvironment, RecordingHooks, RecordingRunner};
use pkg_build::{
    BuildContext, BuildError, BuildOptions, BuildTask, CargoBuildTask, CargoExecutable,
    Dependency, DependencySpec, Environment, HookDescriptor, HookMode, InheritedEnvironment,
    ProcessOutcome,
};
use pkg_test_utils::package::TestPackage;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MANIFEST: &str = r#"[package]
name = "widget"
version = "0.1.0"
edition = "2021"

[dependencies]
gear = "1.0"
"#;

struct Harness {
    task: CargoBuildTask,
    runner: Arc<RecordingRunner>,
    hooks: Arc<RecordingHooks>,
}

fn harness(cargo: CargoExecutable, runner: RecordingRunner, env: Environment) -> Harness {
    let runner = Arc::new(runner);
    let hooks = Arc::new(RecordingHooks::default());
    let task = CargoBuildTask::new(cargo)
        .with_resolver(Arc::new(FixedEnvironment(env)))
        .with_runner(runner.clone())
        .with_hook_registrar(hooks.clone())
        .with_script_writer(hooks.clone());
    Harness {
        task,
        runner,
        hooks,
    }
}

fn context(pkg: &TestPackage) -> BuildContext {
    BuildContext::new(
        pkg.name(),
        pkg.source(),
        pkg.build_base(),
        pkg.install_base(),
    )
}

fn widget() -> TestPackage {
    TestPackage::new("widget")
        .with_manifest(MANIFEST)
        .with_file("src/main.rs", "fn main() {}\n")
}

#[tokio::test]
async fn test_successful_build_runs_cargo_install() {
    let pkg = widget();
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::new(),
    );

    let rc = h.task.build(&context(&pkg)).await.unwrap();
    assert_eq!(rc, 0);

    let runs = h.runner.runs();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(run.command.program, PathBuf::from("/opt/rust/bin/cargo"));
    assert_eq!(
        run.command.args,
        vec![
            OsString::from("install"),
            OsString::from("--force"),
            OsString::from("--quiet"),
            OsString::from("--path"),
            pkg.build_base().into_os_string(),
            OsString::from("--root"),
            pkg.install_base().join("lib/widget").into_os_string(),
        ]
    );
    assert_eq!(run.cwd, pkg.build_base());
}

#[tokio::test]
async fn test_stages_sources_and_sets_target_dir() {
    let pkg = widget();
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::from([("HOME".to_string(), "/home/dev".to_string())]),
    );

    h.task.build(&context(&pkg)).await.unwrap();

    assert_eq!(pkg.read_build_file("src/main.rs"), "fn main() {}\n");
    let env = &h.runner.runs()[0].env;
    assert_eq!(env["CARGO_TARGET_DIR"], pkg.build_base().to_string_lossy());
    assert_eq!(env["HOME"], "/home/dev");
    assert!(!env.contains_key("RUSTFLAGS"));
}

#[tokio::test]
async fn test_existing_build_directory_is_reused() {
    let pkg = widget();
    fs::create_dir_all(pkg.build_base().join("release")).unwrap();
    fs::write(pkg.build_base().join("release/.fingerprint"), "cached").unwrap();
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::new(),
    );

    let rc = h.task.build(&context(&pkg)).await.unwrap();

    assert_eq!(rc, 0);
    assert_eq!(pkg.read_build_file("release/.fingerprint"), "cached");
}

#[tokio::test]
async fn test_extra_dependencies_patch_staged_manifest_only() {
    let pkg = widget();
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::new(),
    );
    let options = BuildOptions::new()
        .with_dependency("gear", DependencySpec::path(Path::new("/ws/src/gear")))
        .with_dependency("spring", DependencySpec::version("2.1"));

    h.task
        .build(&context(&pkg).with_options(options))
        .await
        .unwrap();

    let staged: toml::Table = pkg.read_build_file("Cargo.toml").parse().unwrap();
    assert_eq!(
        staged["dependencies"]["gear"]["path"].as_str(),
        Some("/ws/src/gear")
    );
    assert_eq!(staged["dependencies"]["spring"].as_str(), Some("2.1"));
    assert_eq!(staged["package"]["name"].as_str(), Some("widget"));

    // Sources are never modified
    assert_eq!(
        fs::read_to_string(pkg.source().join("Cargo.toml")).unwrap(),
        MANIFEST
    );
}

#[tokio::test]
async fn test_manifest_without_dependencies_gets_table() {
    let pkg = TestPackage::new("bare").with_manifest("[package]\nname = \"bare\"\n");
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::new(),
    );

    h.task.build(&context(&pkg)).await.unwrap();

    let staged: toml::Table = pkg.read_build_file("Cargo.toml").parse().unwrap();
    assert!(staged["dependencies"].as_table().unwrap().is_empty());
}

#[tokio::test]
async fn test_cargo_args_append_to_rustflags() {
    let pkg = widget();
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::from([("RUSTFLAGS".to_string(), "-D warnings".to_string())]),
    );
    let options = BuildOptions::new().with_cargo_args([" -C", "target-cpu=native"]);

    h.task
        .build(&context(&pkg).with_options(options))
        .await
        .unwrap();

    let env = &h.runner.runs()[0].env;
    assert_eq!(env["RUSTFLAGS"], "-D warnings -C target-cpu=native");
}

#[tokio::test]
async fn test_success_registers_path_hook_and_scripts() {
    let pkg = widget();
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::new(),
    );
    let extra = HookDescriptor {
        name: "extra".to_string(),
        files: vec![PathBuf::from("share/widget/hook/extra.dsv")],
    };

    h.task
        .build(&context(&pkg).with_options(BuildOptions::new().with_hook(extra.clone())))
        .await
        .unwrap();

    let hooks = h.hooks.hooks();
    assert_eq!(hooks.len(), 1);
    assert_eq!(hooks[0].name, "cargo_widget_path");
    assert_eq!(hooks[0].install_base, pkg.install_base());
    assert_eq!(hooks[0].pkg_name, "widget");
    assert_eq!(hooks[0].variable, "PATH");
    assert_eq!(hooks[0].relative_path, PathBuf::from("lib/widget/bin"));
    assert_eq!(hooks[0].mode, HookMode::Prepend);

    let scripts = h.hooks.scripts();
    assert_eq!(scripts.len(), 1);
    let names: Vec<_> = scripts[0].1.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["extra", "cargo_widget_path"]);
}

#[tokio::test]
async fn test_skip_hook_creation_skips_scripts_only() {
    let pkg = widget();
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::new(),
    );

    h.task
        .build(&context(&pkg).with_options(BuildOptions::new().skip_hook_creation(true)))
        .await
        .unwrap();

    assert_eq!(h.hooks.hooks().len(), 1);
    assert!(h.hooks.scripts().is_empty());
}

#[tokio::test]
async fn test_no_exit_code_counts_as_success() {
    let pkg = widget();
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::with_outcome(ProcessOutcome::default()),
        Environment::new(),
    );

    let rc = h.task.build(&context(&pkg)).await.unwrap();

    assert_eq!(rc, 0);
    assert_eq!(h.hooks.hooks().len(), 1);
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(101)]
#[tokio::test]
async fn test_failing_cargo_exit_code_propagates_without_hook(#[case] code: i32) {
    let pkg = widget();
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(code),
        Environment::new(),
    );

    let rc = h.task.build(&context(&pkg)).await.unwrap();

    assert_eq!(rc, code);
    assert!(h.hooks.hooks().is_empty());
    assert!(h.hooks.scripts().is_empty());
}

#[tokio::test]
async fn test_missing_cargo_fails_before_spawn_and_hooks() {
    let pkg = widget();
    let h = harness(
        CargoExecutable::missing(),
        RecordingRunner::exiting(0),
        Environment::new(),
    );

    let result = h.task.build(&context(&pkg)).await;

    assert!(matches!(result, Err(BuildError::ToolNotFound { .. })));
    assert!(h.runner.runs().is_empty());
    assert!(h.hooks.hooks().is_empty());
}

#[tokio::test]
async fn test_environment_failure_returns_one() {
    let pkg = widget();
    let runner = Arc::new(RecordingRunner::exiting(0));
    let hooks = Arc::new(RecordingHooks::default());
    let task = CargoBuildTask::new(CargoExecutable::at("/opt/rust/bin/cargo"))
        .with_resolver(Arc::new(InheritedEnvironment::new()))
        .with_runner(runner.clone())
        .with_hook_registrar(hooks.clone())
        .with_script_writer(hooks.clone());
    let ctx = context(&pkg).with_dependency(Dependency::new(
        "gear",
        pkg.root().join("install/gear-never-built"),
    ));

    let rc = task.build(&ctx).await.unwrap();

    assert_eq!(rc, 1);
    assert!(runner.runs().is_empty());
    assert!(hooks.hooks().is_empty());
    assert!(!pkg.build_base().exists());
}

#[tokio::test]
async fn test_missing_staged_manifest_is_an_error() {
    let pkg = TestPackage::new("empty");
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::new(),
    );

    let result = h.task.build(&context(&pkg)).await;

    assert!(matches!(result, Err(BuildError::Fs(_))));
    assert!(h.runner.runs().is_empty());
}

#[tokio::test]
async fn test_invalid_staged_manifest_is_an_error() {
    let pkg = TestPackage::new("broken").with_manifest("[package\nname = ");
    let h = harness(
        CargoExecutable::at("/opt/rust/bin/cargo"),
        RecordingRunner::exiting(0),
        Environment::new(),
    );

    let result = h.task.build(&context(&pkg)).await;

    assert!(matches!(result, Err(BuildError::ManifestPatch { .. })));
    assert!(h.runner.runs().is_empty());
}

#[tokio::test]
async fn test_dependency_hooks_reach_build_environment() {
    let pkg = widget();
    let gear = pkg.install_dependency(
        "gear",
        &["source;share/gear/hook/cargo_gear_path.dsv"],
    );
    fs::create_dir_all(gear.join("share/gear/hook")).unwrap();
    fs::write(
        gear.join("share/gear/hook/cargo_gear_path.dsv"),
        "prepend-non-duplicate;PATH;lib/gear/bin\n",
    )
    .unwrap();

    let runner = Arc::new(RecordingRunner::exiting(0));
    let hooks = Arc::new(RecordingHooks::default());
    let base = Environment::from([("PATH".to_string(), "/usr/bin".to_string())]);
    let task = CargoBuildTask::new(CargoExecutable::at("/opt/rust/bin/cargo"))
        .with_resolver(Arc::new(InheritedEnvironment::with_base(base)))
        .with_runner(runner.clone())
        .with_hook_registrar(hooks.clone())
        .with_script_writer(hooks.clone());

    let ctx = context(&pkg).with_dependency(Dependency::new("gear", &gear));
    assert_eq!(task.build(&ctx).await.unwrap(), 0);

    let path = runner.runs()[0].env["PATH"].clone();
    let entries: Vec<PathBuf> = std::env::split_paths(&path).collect();
    assert_eq!(entries, vec![gear.join("lib/gear/bin"), PathBuf::from("/usr/bin")]);
}
