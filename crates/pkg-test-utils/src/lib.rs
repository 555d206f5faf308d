//! Shared test utilities for the cargo-pkg workspace.
//!
//! This crate provides fixtures for Cargo package directories and stand-in
//! cargo executables. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`package`]: [`TestPackage`](package::TestPackage) workspace builder
//! - [`fake_cargo`]: scripts that pose as `cargo` and record their calls

pub mod fake_cargo;
pub mod package;
