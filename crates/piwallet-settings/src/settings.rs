//! `SettingsStore`: the typed facade over the backing key-value store.
//!
//! Every preference the wallet persists is read and written through this
//! type.  It owns three policies:
//!
//! - **Defaults** – an unset setting reads as the default recorded in the
//!   setting table ([`crate::domain::keys`]); no getter fails.
//! - **Read-side correction** – the display currency is validated against the
//!   allow-list, and the deprecated milli-unit digit count is upgraded, on
//!   *every* read.  Writes are stored verbatim, so a corrupted store can never
//!   produce an invalid value in memory.
//! - **Soft failure** – a malformed exchange-rate record reads as `None`.
//!
//! # Lifetime and sharing
//!
//! Build one `SettingsStore` at process start and hand it (usually in an
//! `Arc`) to every consumer.  The facade itself holds no locks and caches
//! nothing: each getter is one store read, each setter one store write, so a
//! read always sees the latest write from any thread.  There is no atomicity
//! across settings; use [`SettingsStore::set_custom_node`] to write both
//! halves of the custom node from a single call.

use std::time::SystemTime;

use tracing::debug;

use crate::domain::backup;
use crate::domain::currency::{CurrencyCode, FALLBACK_CURRENCY_CODE};
use crate::domain::keys::{spec_for, BoolSetting, SettingKey, MAX_DISPLAY_DIGITS};
use crate::domain::rate::Rate;
use crate::locale::LocaleProvider;
use crate::store::{KeyValueStore, Record, StoredValue};

/// A user-configured peer to connect to instead of the default node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomNode {
    /// Host address as persisted (a packed IPv4 address).
    pub host: i64,
    pub port: i64,
}

/// Typed access to all persisted wallet preferences.
#[derive(Debug)]
pub struct SettingsStore<S, L> {
    store: S,
    locale: L,
}

impl<S: KeyValueStore, L: LocaleProvider> SettingsStore<S, L> {
    /// Wraps `store`, using `locale` for the default display currency.
    pub fn new(store: S, locale: L) -> Self {
        Self { store, locale }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self, key: SettingKey) -> Option<StoredValue> {
        self.store.get(key.storage_key())
    }

    fn write(&self, key: SettingKey, value: StoredValue) {
        debug_assert!(spec_for(key).writable, "{key:?} is read-only");
        self.store.set(key.storage_key(), value);
    }

    fn write_optional(&self, key: SettingKey, value: Option<StoredValue>) {
        match value {
            Some(value) => self.write(key, value),
            None => self.store.remove(key.storage_key()),
        }
    }

    // ── Booleans ──────────────────────────────────────────────────────────────

    /// Returns the stored flag, or its default (`false`) when unset.
    pub fn get_bool(&self, setting: BoolSetting) -> bool {
        self.read(setting.key())
            .map_or(setting.default_value(), |value| value.coerce_bool())
    }

    pub fn set_bool(&self, setting: BoolSetting, value: bool) {
        self.write(setting.key(), StoredValue::Bool(value));
    }

    // ── Display currency ──────────────────────────────────────────────────────

    /// The user's display currency.
    ///
    /// Reads the stored code; when none is stored, asks the locale, falling
    /// back to `EUR`.  The result is then checked against the allow-list and
    /// anything not on it (including a non-string stored value) reads as `EUR`.
    pub fn currency_code(&self) -> CurrencyCode {
        let candidate = match self.read(SettingKey::DefaultCurrencyCode) {
            Some(value) => value.as_str().map(str::to_string),
            None => Some(
                self.locale
                    .currency_code()
                    .unwrap_or_else(|| FALLBACK_CURRENCY_CODE.to_string()),
            ),
        };

        match candidate {
            Some(code) => CurrencyCode::parse(&code).unwrap_or_else(|| {
                debug!("currency code {code:?} is not accepted; using {FALLBACK_CURRENCY_CODE}");
                CurrencyCode::fallback()
            }),
            None => {
                debug!("stored currency is not a string; using {FALLBACK_CURRENCY_CODE}");
                CurrencyCode::fallback()
            }
        }
    }

    /// Stores `code` verbatim.  Validation happens on read.
    pub fn set_currency_code(&self, code: &str) {
        self.write(SettingKey::DefaultCurrencyCode, StoredValue::Str(code.to_string()));
    }

    // ── Display digits ────────────────────────────────────────────────────────

    /// Maximum digits shown for native-unit amounts.
    ///
    /// Defaults to 8.  A stored 5 (the retired milli-unit display) reads as 8
    /// on every read; the stored value itself is left alone.
    pub fn max_digits(&self) -> i64 {
        let stored = self.read(MAX_DISPLAY_DIGITS.key).map(|v| v.coerce_int());
        let digits = MAX_DISPLAY_DIGITS.resolve(stored);
        if let Some(stored) = stored.filter(|&s| s != digits) {
            debug!("upgrading legacy max digits {stored} to {digits}");
        }
        digits
    }

    pub fn set_max_digits(&self, digits: i64) {
        self.write(SettingKey::MaxDisplayDigits, StoredValue::Int(digits));
    }

    // ── Push token ────────────────────────────────────────────────────────────

    pub fn push_token(&self) -> Option<Vec<u8>> {
        self.read(SettingKey::PushToken)
            .and_then(|v| v.as_bytes().map(<[u8]>::to_vec))
    }

    /// Stores the token, or deletes it when `token` is `None`.
    pub fn set_push_token(&self, token: Option<&[u8]>) {
        self.write_optional(
            SettingKey::PushToken,
            token.map(|t| StoredValue::Bytes(t.to_vec())),
        );
    }

    // ── Exchange rate ─────────────────────────────────────────────────────────

    /// The last persisted exchange rate.
    ///
    /// Returns `None` when nothing is stored, when the stored value is not a
    /// record, or when the record cannot be decoded into a [`Rate`].
    pub fn current_rate(&self) -> Option<Rate> {
        let record = self.current_rate_data()?;
        match Rate::from_record(&record) {
            Ok(rate) => Some(rate),
            Err(e) => {
                debug!("ignoring stored exchange rate: {e}");
                None
            }
        }
    }

    /// The raw stored exchange-rate record, without decoding it.
    pub fn current_rate_data(&self) -> Option<Record> {
        self.read(SettingKey::CurrentExchangeRate)
            .and_then(|v| v.as_record().cloned())
    }

    /// Stores a raw exchange-rate record, or deletes it when `data` is `None`.
    pub fn set_current_rate_data(&self, data: Option<Record>) {
        self.write_optional(SettingKey::CurrentExchangeRate, data.map(StoredValue::Record));
    }

    pub fn set_current_rate(&self, rate: &Rate) {
        self.set_current_rate_data(Some(rate.to_record()));
    }

    // ── Custom node ───────────────────────────────────────────────────────────

    /// The configured custom node, only when both host and port are stored.
    pub fn custom_node(&self) -> Option<CustomNode> {
        Some(CustomNode {
            host: self.custom_node_host()?,
            port: self.custom_node_port()?,
        })
    }

    pub fn custom_node_host(&self) -> Option<i64> {
        self.read(SettingKey::CustomNodeHost).map(|v| v.coerce_int())
    }

    pub fn custom_node_port(&self) -> Option<i64> {
        self.read(SettingKey::CustomNodePort).map(|v| v.coerce_int())
    }

    pub fn set_custom_node_host(&self, host: Option<i64>) {
        self.write_optional(SettingKey::CustomNodeHost, host.map(StoredValue::Int));
    }

    pub fn set_custom_node_port(&self, port: Option<i64>) {
        self.write_optional(SettingKey::CustomNodePort, port.map(StoredValue::Int));
    }

    /// Writes (or clears) both halves of the custom node from one call site.
    pub fn set_custom_node(&self, node: Option<CustomNode>) {
        self.set_custom_node_host(node.map(|n| n.host));
        self.set_custom_node_port(node.map(|n| n.port));
    }

    // ── Backup state ──────────────────────────────────────────────────────────

    /// When the user finished writing down their recovery phrase.
    pub fn write_paper_phrase_date(&self) -> Option<SystemTime> {
        self.read(SettingKey::WritePaperPhraseDate)
            .and_then(|v| v.as_timestamp())
    }

    pub fn set_write_paper_phrase_date(&self, date: Option<SystemTime>) {
        self.write_optional(SettingKey::WritePaperPhraseDate, date.map(StoredValue::Timestamp));
    }

    /// The backup flag written by older app versions, if still present.
    pub fn legacy_wallet_needs_backup(&self) -> Option<bool> {
        self.read(SettingKey::LegacyWalletNeedsBackup)
            .map(|v| v.coerce_bool())
    }

    /// Deletes the legacy backup flag.  Safe to call when it is already gone.
    pub fn remove_legacy_wallet_needs_backup_flag(&self) {
        self.store
            .remove(SettingKey::LegacyWalletNeedsBackup.storage_key());
    }

    /// Whether the user still has to back up the wallet.  Recomputed on every call.
    pub fn wallet_requires_backup(&self) -> bool {
        backup::wallet_requires_backup(
            self.write_paper_phrase_date(),
            self.legacy_wallet_needs_backup(),
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
