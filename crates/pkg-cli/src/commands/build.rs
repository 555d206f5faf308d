//! Build command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use pkg_build::{
    BuildContext, BuildOptions, BuildTask, CargoBuildTask, CargoExecutable, Dependency,
    DependencySpec,
};
use pkg_identify::CargoPackageIdentification;

use crate::commands::identify::identify_path;
use crate::error::{CliError, Result};

/// Arguments of the build command
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    pub path: PathBuf,
    pub build_base: PathBuf,
    pub install_base: PathBuf,
    pub cargo_args: Vec<String>,
    pub dependencies: Vec<(String, String)>,
    pub patch_versions: Vec<(String, String)>,
    pub patch_paths: Vec<(String, String)>,
    pub skip_hook_creation: bool,
}

/// Run the build command, returning the exit code of the build
pub fn run_build(args: BuildArgs) -> Result<i32> {
    let metadata = identify_path(&CargoPackageIdentification::new(), &args.path)?
        .ok_or_else(|| {
            CliError::user(format!(
                "'{}' is not a Cargo package (no Cargo.toml)",
                args.path.display()
            ))
        })?;
    let name = metadata
        .name
        .ok_or_else(|| CliError::user(format!("No package name for '{}'", args.path.display())))?;

    let context = build_context(&name, &args)?;
    let task = CargoBuildTask::new(CargoExecutable::discover());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(task.build(&context))?;

    if code == 0 {
        println!(
            "{} Installed {} into {}",
            "OK".green().bold(),
            name.cyan(),
            context.install_base.display()
        );
    } else {
        eprintln!(
            "{} Building {} failed with exit code {}",
            "FAILED".red().bold(),
            name.cyan(),
            code
        );
    }

    Ok(code)
}

/// Context for `name` with every path made absolute.
///
/// Cargo runs inside the build directory, so paths relative to the caller's
/// working directory would resolve differently for the child.
fn build_context(name: &str, args: &BuildArgs) -> Result<BuildContext> {
    let mut options = BuildOptions::new()
        .with_cargo_args(&args.cargo_args)
        .skip_hook_creation(args.skip_hook_creation);
    for (dep, version) in &args.patch_versions {
        options = options.with_dependency(dep.as_str(), DependencySpec::version(version.as_str()));
    }
    for (dep, path) in &args.patch_paths {
        options = options.with_dependency(dep.as_str(), DependencySpec::path(&absolute(path)?));
    }

    let mut context = BuildContext::new(
        name,
        absolute(&args.path)?,
        absolute(&args.build_base)?,
        absolute(&args.install_base)?,
    )
    .with_options(options);
    for (dep, prefix) in &args.dependencies {
        context = context.with_dependency(Dependency::new(dep.as_str(), absolute(prefix)?));
    }
    Ok(context)
}

fn absolute(path: impl AsRef<Path>) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}
