//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Identify and build Cargo packages
#[derive(Parser, Debug)]
#[command(name = "cargo-pkg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Identify Cargo packages in the given directories
    ///
    /// Directories without a Cargo.toml are reported as skipped.
    ///
    /// Examples:
    ///   cargo-pkg identify src/widget src/gear
    ///   cargo-pkg identify src/* --json
    Identify {
        /// Package directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Build and install a Cargo package with `cargo install`
    ///
    /// Examples:
    ///   cargo-pkg build src/widget --build-base build/widget --install-base install/widget
    ///   cargo-pkg build src/widget --build-base b --install-base i --dep gear=install/gear
    ///   cargo-pkg build src/widget --build-base b --install-base i --cargo-args " -C" opt-level=3
    Build {
        /// Package source directory
        path: PathBuf,

        /// Directory the sources are staged and built in
        #[arg(long, env = "PKG_BUILD_BASE")]
        build_base: PathBuf,

        /// Install prefix of the package
        #[arg(long, env = "PKG_INSTALL_BASE")]
        install_base: PathBuf,

        /// Pass arguments to Cargo projects. Arguments matching other options
        /// must be prefixed by a space, e.g. --cargo-args " --help"
        #[arg(long, num_args = 0.., value_name = "ARG")]
        cargo_args: Vec<String>,

        /// Installed dependency as NAME=PREFIX (repeatable, in activation order)
        #[arg(long = "dep", value_name = "NAME=PREFIX", value_parser = parse_key_value)]
        dependencies: Vec<(String, String)>,

        /// Add NAME = "VERSION" to the staged manifest's dependencies
        #[arg(long = "patch-dep", value_name = "NAME=VERSION", value_parser = parse_key_value)]
        patch_versions: Vec<(String, String)>,

        /// Add NAME = { path = PATH } to the staged manifest's dependencies
        #[arg(long = "patch-path", value_name = "NAME=PATH", value_parser = parse_key_value)]
        patch_paths: Vec<(String, String)>,

        /// Register the PATH hook without writing activation scripts
        #[arg(long)]
        skip_hook_creation: bool,
    },
}

/// Parse `KEY=VALUE`, splitting on the first `=`.
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("missing name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
