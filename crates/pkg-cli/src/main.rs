//! cargo-pkg CLI
//!
//! Standalone driver for Cargo package identification and builds.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    tracing::debug!("Verbose mode enabled");

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<i32> {
    match cmd {
        Commands::Identify { paths, json } => commands::run_identify(&paths, json),
        Commands::Build {
            path,
            build_base,
            install_base,
            cargo_args,
            dependencies,
            patch_versions,
            patch_paths,
            skip_hook_creation,
        } => commands::run_build(commands::BuildArgs {
            path,
            build_base,
            install_base,
            cargo_args,
            dependencies,
            patch_versions,
            patch_paths,
            skip_hook_creation,
        }),
    }
}
