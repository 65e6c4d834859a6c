//! Executes parsed commands against a [`SettingsStore`].
//!
//! Commands return their output as a `String` so tests can run them against a
//! `MemoryStore` without touching stdout or the file system.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::net::Ipv4Addr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use piwallet_settings::{
    BoolSetting, CustomNode, KeyValueStore, LocaleProvider, SettingsStore,
};

use crate::cli::{flag_name, Command};

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Everything the wallet would read, as plain serialisable fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSnapshot {
    pub currency_code: String,
    pub max_digits: i64,
    pub flags: BTreeMap<&'static str, bool>,
    pub push_token_hex: Option<String>,
    pub current_rate: Option<RateDto>,
    pub custom_node: Option<NodeDto>,
    /// Seconds since the Unix epoch; negative before 1970.
    pub write_paper_phrase_date: Option<i64>,
    pub legacy_wallet_needs_backup: Option<bool>,
    pub wallet_requires_backup: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateDto {
    pub code: String,
    pub name: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDto {
    /// Dotted form of the packed host, when it fits in 32 bits.
    pub host: Option<String>,
    pub host_raw: i64,
    pub port: i64,
}

impl SettingsSnapshot {
    /// Reads every setting through the facade.
    pub fn capture<S: KeyValueStore, L: LocaleProvider>(settings: &SettingsStore<S, L>) -> Self {
        Self {
            currency_code: settings.currency_code().to_string(),
            max_digits: settings.max_digits(),
            flags: BoolSetting::ALL
                .into_iter()
                .map(|s| (flag_name(s), settings.get_bool(s)))
                .collect(),
            push_token_hex: settings.push_token().map(|t| hex(&t)),
            current_rate: settings.current_rate().map(|r| RateDto {
                code: r.code,
                name: r.name,
                rate: r.rate,
            }),
            custom_node: settings.custom_node().map(|n| NodeDto {
                host: u32::try_from(n.host)
                    .ok()
                    .map(|h| Ipv4Addr::from(h).to_string()),
                host_raw: n.host,
                port: n.port,
            }),
            write_paper_phrase_date: settings.write_paper_phrase_date().map(epoch_secs),
            legacy_wallet_needs_backup: settings.legacy_wallet_needs_backup(),
            wallet_requires_backup: settings.wallet_requires_backup(),
        }
    }

    /// Human-readable `name: value` lines.
    pub fn to_text(&self) -> String {
        fn opt<T: std::fmt::Display>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string)
        }

        let mut out = String::new();
        let _ = writeln!(out, "currency: {}", self.currency_code);
        let _ = writeln!(out, "max-digits: {}", self.max_digits);
        for (name, value) in &self.flags {
            let _ = writeln!(out, "{name}: {value}");
        }
        let _ = writeln!(out, "push-token: {}", opt(&self.push_token_hex));
        let rate = self
            .current_rate
            .as_ref()
            .map(|r| format!("{} {} ({})", r.rate, r.code, r.name));
        let _ = writeln!(out, "current-rate: {}", opt(&rate));
        let node = self.custom_node.as_ref().map(|n| match &n.host {
            Some(host) => format!("{host}:{}", n.port),
            None => format!("{}:{}", n.host_raw, n.port),
        });
        let _ = writeln!(out, "custom-node: {}", opt(&node));
        let _ = writeln!(out, "paper-phrase-date: {}", opt(&self.write_paper_phrase_date));
        let _ = writeln!(
            out,
            "legacy-needs-backup: {}",
            opt(&self.legacy_wallet_needs_backup)
        );
        let _ = write!(out, "requires-backup: {}", self.wallet_requires_backup);
        out
    }
}

fn epoch_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

// ── Execution ─────────────────────────────────────────────────────────────────

/// Runs `command` and returns what should be printed.
///
/// # Errors
///
/// Returns an error only if JSON serialisation fails.
pub fn run<S: KeyValueStore, L: LocaleProvider>(
    command: Command,
    settings: &SettingsStore<S, L>,
) -> anyhow::Result<String> {
    let output = match command {
        Command::Show { json: false } => SettingsSnapshot::capture(settings).to_text(),
        Command::Show { json: true } => {
            serde_json::to_string_pretty(&SettingsSnapshot::capture(settings))
                .context("failed to serialise settings snapshot")?
        }
        Command::Keys => settings.store().keys().join("\n"),
        Command::SetFlag { flag, value } => {
            let setting = BoolSetting::from(flag);
            settings.set_bool(setting, value);
            info!("set {} to {value}", flag_name(setting));
            format!("{}: {}", flag_name(setting), settings.get_bool(setting))
        }
        Command::SetCurrency { code } => {
            settings.set_currency_code(&code);
            let effective = settings.currency_code();
            if effective != code.as_str() {
                format!("stored {code}; not an accepted currency, reads as {effective}")
            } else {
                format!("currency: {effective}")
            }
        }
        Command::SetMaxDigits { digits } => {
            settings.set_max_digits(digits);
            format!("max-digits: {}", settings.max_digits())
        }
        Command::SetNode { host, port } => {
            settings.set_custom_node(Some(CustomNode {
                host: i64::from(u32::from(host)),
                port: i64::from(port),
            }));
            info!("custom node set to {host}:{port}");
            format!("custom-node: {host}:{port}")
        }
        Command::ClearNode => {
            settings.set_custom_node(None);
            "custom-node: -".to_string()
        }
        Command::MarkBackedUp => {
            settings.set_write_paper_phrase_date(Some(SystemTime::now()));
            format!("requires-backup: {}", settings.wallet_requires_backup())
        }
        Command::RemoveLegacyBackupFlag => {
            settings.remove_legacy_wallet_needs_backup_flag();
            format!("requires-backup: {}", settings.wallet_requires_backup())
        }
    };
    Ok(output)
}
