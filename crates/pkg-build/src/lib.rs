//! Build driver for Cargo packages.
//!
//! [`CargoBuildTask`] stages a package's sources into its build directory,
//! merges extra dependencies into the staged `Cargo.toml`, runs
//! `cargo install` and registers a `PATH` hook for the installed binaries.
//!
//! The host-side concerns are traits so an orchestrator can plug in its own:
//!
//! - [`EnvironmentResolver`] computes the build environment from dependencies
//! - [`HookRegistrar`] and [`ScriptWriter`] persist environment hooks
//! - [`ProcessRunner`] executes the cargo command
//!
//! Each has a standalone default implementation in this crate.

pub mod context;
pub mod environment;
pub mod error;
pub mod executable;
pub mod hooks;
pub mod patch;
pub mod process;
pub mod task;

pub use context::{BuildContext, BuildOptions, Dependency};
pub use environment::{Environment, EnvironmentResolver, InheritedEnvironment};
pub use error::{BuildError, EnvironmentError, Result};
pub use executable::{CARGO_COMMAND_ENV, CargoExecutable};
pub use hooks::{
    DsvHookRegistrar, DsvScriptWriter, HookDescriptor, HookMode, HookRegistrar, ScriptWriter,
};
pub use patch::{DependencySpec, patch_manifest};
pub use process::{CommandLine, ProcessOutcome, ProcessRunner, TokioProcessRunner};
pub use task::{BuildTask, CargoBuildTask};
