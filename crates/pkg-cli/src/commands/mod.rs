//! Command implementations for pkg-cli

pub mod build;
pub mod identify;

pub use build::{BuildArgs, run_build};
pub use identify::run_identify;
