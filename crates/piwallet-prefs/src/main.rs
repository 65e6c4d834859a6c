//! piwallet-prefs entry point.
//!
//! Opens a settings file and inspects or edits it through the typed settings
//! layer.  Diagnostics go to stderr (level via `RUST_LOG`, default `info`);
//! command output goes to stdout so `show --json` can be piped.
//!
//! # Usage
//!
//! ```text
//! piwallet-prefs [--file PATH] show [--json]
//! piwallet-prefs set-flag biometrics-enabled true
//! piwallet-prefs set-currency GBP
//! piwallet-prefs set-node 10.0.0.2 9333
//! piwallet-prefs mark-backed-up
//! ```

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use piwallet_prefs::cli::Cli;
use piwallet_prefs::commands::run;
use piwallet_settings::{FileStore, SettingsStore, SystemLocale};

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match &cli.file {
        Some(path) => FileStore::open(path),
        None => FileStore::open_default(),
    }
    .context("failed to open settings file")?;
    info!("using settings file {}", store.path().display());

    let mutating = cli.command.is_mutating();
    let settings = SettingsStore::new(store, SystemLocale);
    let output = run(cli.command, &settings)?;

    // The store logs and swallows write failures; surface them here instead.
    if mutating {
        settings
            .store()
            .persist()
            .with_context(|| format!("failed to write {}", settings.store().path().display()))?;
    }

    println!("{output}");
    Ok(())
}
