use async_trait::async_trait;
use pkg_build::{
    BuildError, CommandLine, Dependency, Environment, EnvironmentError, EnvironmentResolver,
    HookDescriptor, HookMode, HookRegistrar, ProcessOutcome, ProcessRunner, ScriptWriter,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One recorded `ProcessRunner::run` call.
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub command: CommandLine,
    pub cwd: PathBuf,
    pub env: Environment,
}

/// Runner that records calls and returns a fixed outcome.
pub struct RecordingRunner {
    outcome: ProcessOutcome,
    pub runs: Mutex<Vec<RecordedRun>>,
}

impl RecordingRunner {
    pub fn exiting(code: i32) -> Self {
        Self::with_outcome(ProcessOutcome::exited(code))
    }

    pub fn with_outcome(outcome: ProcessOutcome) -> Self {
        Self {
            outcome,
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(
        &self,
        command: &CommandLine,
        cwd: &Path,
        env: &Environment,
    ) -> Result<ProcessOutcome, BuildError> {
        self.runs.lock().unwrap().push(RecordedRun {
            command: command.clone(),
            cwd: cwd.to_path_buf(),
            env: env.clone(),
        });
        Ok(self.outcome)
    }
}

/// Resolver returning a fixed environment.
pub struct FixedEnvironment(pub Environment);

#[async_trait]
impl EnvironmentResolver for FixedEnvironment {
    async fn resolve(
        &self,
        _phase: &str,
        _build_base: &Path,
        _dependencies: &[Dependency],
    ) -> Result<Environment, EnvironmentError> {
        Ok(self.0.clone())
    }
}

/// One recorded `HookRegistrar::create_hook` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedHook {
    pub name: String,
    pub install_base: PathBuf,
    pub pkg_name: String,
    pub variable: String,
    pub relative_path: PathBuf,
    pub mode: HookMode,
}

/// Hook registrar and script writer that only record.
#[derive(Default)]
pub struct RecordingHooks {
    pub hooks: Mutex<Vec<RecordedHook>>,
    pub scripts: Mutex<Vec<(String, Vec<HookDescriptor>)>>,
}

impl RecordingHooks {
    pub fn hooks(&self) -> Vec<RecordedHook> {
        self.hooks.lock().unwrap().clone()
    }

    pub fn scripts(&self) -> Vec<(String, Vec<HookDescriptor>)> {
        self.scripts.lock().unwrap().clone()
    }
}

impl HookRegistrar for RecordingHooks {
    fn create_hook(
        &self,
        hook_name: &str,
        install_base: &Path,
        pkg_name: &str,
        variable: &str,
        relative_path: &Path,
        mode: HookMode,
    ) -> Result<HookDescriptor, BuildError> {
        self.hooks.lock().unwrap().push(RecordedHook {
            name: hook_name.to_string(),
            install_base: install_base.to_path_buf(),
            pkg_name: pkg_name.to_string(),
            variable: variable.to_string(),
            relative_path: relative_path.to_path_buf(),
            mode,
        });
        Ok(HookDescriptor {
            name: hook_name.to_string(),
            files: vec![PathBuf::from(format!("share/{}/hook/{}.dsv", pkg_name, hook_name))],
        })
    }
}

impl ScriptWriter for RecordingHooks {
    fn write_scripts(
        &self,
        pkg_name: &str,
        _install_base: &Path,
        hooks: &[HookDescriptor],
    ) -> Result<(), BuildError> {
        self.scripts
            .lock()
            .unwrap()
            .push((pkg_name.to_string(), hooks.to_vec()));
        Ok(())
    }
}
