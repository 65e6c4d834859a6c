//! piwallet-prefs library entry point.
//!
//! Re-exports the CLI definition and command runner so that tests and the
//! binary entry point in `main.rs` share the same module tree.

pub mod cli;
pub mod commands;
