//! Cargo build task

use std::sync::Arc;

use async_trait::async_trait;
use pkg_identify::{CARGO_PACKAGE_TYPE, DependencyPhase};

use crate::context::BuildContext;
use crate::environment::{Environment, EnvironmentResolver, InheritedEnvironment};
use crate::error::Result;
use crate::executable::CargoExecutable;
use crate::hooks::{DsvHookRegistrar, DsvScriptWriter, HookMode, HookRegistrar, ScriptWriter};
use crate::patch::patch_manifest;
use crate::process::{CommandLine, ProcessOutcome, ProcessRunner, TokioProcessRunner};

/// Variable pointing cargo at the build directory for artifacts.
pub const TARGET_DIR_VAR: &str = "CARGO_TARGET_DIR";

/// Variable collecting extra compiler flags.
pub const RUSTFLAGS_VAR: &str = "RUSTFLAGS";

/// Builds one package type.
#[async_trait]
pub trait BuildTask: Send + Sync {
    /// Package type this task builds.
    fn id(&self) -> &str;

    /// Build and install the package, returning the exit code.
    ///
    /// `Ok(0)` is success. Failures of the build tool come back as its exit
    /// code; `Err` is reserved for conditions that prevent a build attempt.
    async fn build(&self, context: &BuildContext) -> Result<i32>;
}

/// Builds Cargo packages with `cargo install`.
pub struct CargoBuildTask {
    cargo: CargoExecutable,
    resolver: Arc<dyn EnvironmentResolver>,
    hooks: Arc<dyn HookRegistrar>,
    scripts: Arc<dyn ScriptWriter>,
    runner: Arc<dyn ProcessRunner>,
}

impl CargoBuildTask {
    /// Task using `cargo` and the default collaborators.
    pub fn new(cargo: CargoExecutable) -> Self {
        Self {
            cargo,
            resolver: Arc::new(InheritedEnvironment::new()),
            hooks: Arc::new(DsvHookRegistrar::new()),
            scripts: Arc::new(DsvScriptWriter::new()),
            runner: Arc::new(TokioProcessRunner::new()),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn EnvironmentResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_hook_registrar(mut self, hooks: Arc<dyn HookRegistrar>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_script_writer(mut self, scripts: Arc<dyn ScriptWriter>) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn cargo(&self) -> &CargoExecutable {
        &self.cargo
    }

    /// The `cargo install` invocation for `context`.
    pub fn command_line(&self, context: &BuildContext) -> Result<CommandLine> {
        let cargo = self.cargo.path()?;
        Ok(CommandLine::new(cargo)
            .arg("install")
            .arg("--force")
            .arg("--quiet")
            .arg("--path")
            .arg(&context.build_base)
            .arg("--root")
            .arg(context.install_root()))
    }

    /// Stage the sources, patch the manifest and run cargo.
    async fn run_cargo(
        &self,
        context: &BuildContext,
        mut env: Environment,
    ) -> Result<ProcessOutcome> {
        tracing::debug!(package = %context.pkg_name, "build");

        std::fs::create_dir_all(&context.build_base)
            .map_err(|e| pkg_fs::Error::io(&context.build_base, e))?;

        env.insert(
            TARGET_DIR_VAR.to_string(),
            context.build_base.to_string_lossy().into_owned(),
        );
        append_rustflags(&mut env, &context.options.cargo_args);

        let command = self.command_line(context)?;

        pkg_fs::copy_tree(&context.source_path, &context.build_base)?;
        patch_manifest(
            &context.staged_manifest(),
            &context.options.extra_dependencies,
        )?;

        self.runner
            .run(&command, &context.build_base, &env)
            .await
    }

    fn register_hooks(&self, context: &BuildContext) -> Result<()> {
        let pkg = &context.pkg_name;
        let path_hook = self.hooks.create_hook(
            &format!("cargo_{}_path", pkg),
            &context.install_base,
            pkg,
            "PATH",
            &context.bin_dir(),
            HookMode::Prepend,
        )?;

        if context.options.skip_hook_creation {
            return Ok(());
        }

        let mut hooks = context.options.additional_hooks.clone();
        hooks.push(path_hook);
        self.scripts
            .write_scripts(pkg, &context.install_base, &hooks)
    }
}

#[async_trait]
impl BuildTask for CargoBuildTask {
    fn id(&self) -> &str {
        CARGO_PACKAGE_TYPE
    }

    async fn build(&self, context: &BuildContext) -> Result<i32> {
        tracing::info!(
            "Building Cargo package in '{}'",
            context.source_path.display()
        );

        let env = match self
            .resolver
            .resolve(
                &DependencyPhase::Build.to_string(),
                &context.build_base,
                &context.dependencies,
            )
            .await
        {
            Ok(env) => env,
            Err(e) => {
                tracing::error!("{}", e);
                return Ok(1);
            }
        };

        let outcome = self.run_cargo(context, env).await?;
        if !outcome.success() {
            let code = outcome.returncode.unwrap_or(1);
            tracing::warn!(package = %context.pkg_name, code, "cargo install failed");
            return Ok(code);
        }

        self.register_hooks(context)?;
        Ok(0)
    }
}

/// Append `flags` to `RUSTFLAGS`, keeping any value already there.
fn append_rustflags(env: &mut Environment, flags: &[String]) {
    if flags.is_empty() {
        return;
    }

    let joined = flags.join(" ");
    let value = env.entry(RUSTFLAGS_VAR.to_string()).or_default();
    if !value.is_empty() {
        value.push(' ');
    }
    value.push_str(&joined);
}
