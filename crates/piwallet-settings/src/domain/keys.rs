//! The setting table: every persisted preference, its storage key, value kind,
//! default and read rule, in one place.
//!
//! Boolean and integer rows are built from typed descriptions
//! ([`BoolSetting::default_value`], [`MAX_DISPLAY_DIGITS`]) that the
//! [`SettingsStore`](crate::settings::SettingsStore) accessors read directly,
//! so an accessor can never disagree with its row about what an unset or
//! out-of-range setting reads as.
//!
//! # Storage keys
//!
//! Storage keys are the strings written to the backing store.  They are
//! frozen: renaming one silently resets that preference for every existing
//! install.  The mix of casing conventions is historical.

/// Every setting owned by the settings subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    BiometricsEnabled,
    DefaultCurrencyCode,
    HasAcquiredShareDataPermission,
    IsAmountSwapped,
    MaxDisplayDigits,
    PushToken,
    CurrentExchangeRate,
    CustomNodeHost,
    CustomNodePort,
    HasPromptedShareData,
    HasPromptedBiometrics,
    HasShownWelcome,
    WritePaperPhraseDate,
    LegacyWalletNeedsBackup,
}

impl SettingKey {
    /// Every key, in table order.
    pub const ALL: [SettingKey; 14] = [
        SettingKey::BiometricsEnabled,
        SettingKey::DefaultCurrencyCode,
        SettingKey::HasAcquiredShareDataPermission,
        SettingKey::IsAmountSwapped,
        SettingKey::MaxDisplayDigits,
        SettingKey::PushToken,
        SettingKey::CurrentExchangeRate,
        SettingKey::CustomNodeHost,
        SettingKey::CustomNodePort,
        SettingKey::HasPromptedShareData,
        SettingKey::HasPromptedBiometrics,
        SettingKey::HasShownWelcome,
        SettingKey::WritePaperPhraseDate,
        SettingKey::LegacyWalletNeedsBackup,
    ];

    /// The string under which this setting is persisted.
    pub fn storage_key(self) -> &'static str {
        match self {
            SettingKey::BiometricsEnabled => "isbiometricsenabled",
            SettingKey::DefaultCurrencyCode => "defaultcurrency",
            SettingKey::HasAcquiredShareDataPermission => "has_acquired_permission",
            SettingKey::IsAmountSwapped => "isBtcSwappedKey",
            SettingKey::MaxDisplayDigits => "SETTINGS_MAX_DIGITS",
            SettingKey::PushToken => "pushTokenKey",
            SettingKey::CurrentExchangeRate => "currentRateKey",
            SettingKey::CustomNodeHost => "customNodeIPKey",
            SettingKey::CustomNodePort => "customNodePortKey",
            // Older builds wrote this prompt under "haspromptedtouched",
            // sharing the biometrics prompt's key. The two are now independent.
            SettingKey::HasPromptedShareData => "hasPromptedShareDataKey",
            SettingKey::HasPromptedBiometrics => "haspromptedtouched",
            SettingKey::HasShownWelcome => "hasShownWelcomeKey",
            SettingKey::WritePaperPhraseDate => "writepaperphrasedatekey",
            SettingKey::LegacyWalletNeedsBackup => "WALLET_NEEDS_BACKUP",
        }
    }

    /// Looks a setting up by its storage key.
    pub fn from_storage_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.storage_key() == key)
    }
}

/// The kind of value a setting holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Str,
    Bytes,
    Timestamp,
    Record,
}

/// What a setting reads as when nothing is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    /// The device locale's currency, or the fallback currency.
    LocaleCurrency,
    /// The accessor returns `None`.
    Absent,
}

/// A correction applied to a stored value on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRule {
    /// Values outside the currency allow-list read as the fallback currency.
    CurrencyAllowList,
    /// A deprecated stored value is upgraded to its replacement.
    Remap { from: i64, to: i64 },
}

impl ReadRule {
    /// Applies an integer rule to `value`.  Non-integer rules leave it unchanged.
    pub fn apply_int(self, value: i64) -> i64 {
        match self {
            ReadRule::Remap { from, to } if value == from => to,
            _ => value,
        }
    }
}

/// One row of the setting table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingSpec {
    pub key: SettingKey,
    pub kind: ValueKind,
    pub default: DefaultValue,
    pub read_rule: Option<ReadRule>,
    /// `false` for settings the app only reads and deletes.
    pub writable: bool,
}

/// Typed description of an integer setting: its default as an `i64` and the
/// correction applied on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntSetting {
    pub key: SettingKey,
    pub default: i64,
    pub read_rule: Option<ReadRule>,
}

impl IntSetting {
    /// What the setting reads as, given the stored value (if any).
    pub fn resolve(self, stored: Option<i64>) -> i64 {
        match (stored, self.read_rule) {
            (None, _) => self.default,
            (Some(value), Some(rule)) => rule.apply_int(value),
            (Some(value), None) => value,
        }
    }
}

const fn row(
    key: SettingKey,
    kind: ValueKind,
    default: DefaultValue,
    read_rule: Option<ReadRule>,
) -> SettingSpec {
    SettingSpec {
        key,
        kind,
        default,
        read_rule,
        writable: true,
    }
}

/// Default number of digits shown for native-unit amounts (whole units).
pub const DEFAULT_MAX_DIGITS: i64 = 8;

/// Deprecated digit count for the milli-unit display, upgraded on read.
pub const LEGACY_MILLI_UNIT_DIGITS: i64 = 5;

/// The display-digits setting.  A stored 5 reads as 8.
pub const MAX_DISPLAY_DIGITS: IntSetting = IntSetting {
    key: SettingKey::MaxDisplayDigits,
    default: DEFAULT_MAX_DIGITS,
    read_rule: Some(ReadRule::Remap {
        from: LEGACY_MILLI_UNIT_DIGITS,
        to: DEFAULT_MAX_DIGITS,
    }),
};

const fn bool_row(setting: BoolSetting) -> SettingSpec {
    row(
        setting.key(),
        ValueKind::Bool,
        DefaultValue::Bool(setting.default_value()),
        None,
    )
}

const fn int_row(setting: IntSetting) -> SettingSpec {
    row(
        setting.key,
        ValueKind::Int,
        DefaultValue::Int(setting.default),
        setting.read_rule,
    )
}

/// The setting table.
pub static SETTING_SPECS: [SettingSpec; 14] = [
    bool_row(BoolSetting::BiometricsEnabled),
    row(
        SettingKey::DefaultCurrencyCode,
        ValueKind::Str,
        DefaultValue::LocaleCurrency,
        Some(ReadRule::CurrencyAllowList),
    ),
    bool_row(BoolSetting::HasAcquiredShareDataPermission),
    bool_row(BoolSetting::IsAmountSwapped),
    int_row(MAX_DISPLAY_DIGITS),
    row(SettingKey::PushToken, ValueKind::Bytes, DefaultValue::Absent, None),
    row(SettingKey::CurrentExchangeRate, ValueKind::Record, DefaultValue::Absent, None),
    row(SettingKey::CustomNodeHost, ValueKind::Int, DefaultValue::Absent, None),
    row(SettingKey::CustomNodePort, ValueKind::Int, DefaultValue::Absent, None),
    bool_row(BoolSetting::HasPromptedShareData),
    bool_row(BoolSetting::HasPromptedBiometrics),
    bool_row(BoolSetting::HasShownWelcome),
    row(SettingKey::WritePaperPhraseDate, ValueKind::Timestamp, DefaultValue::Absent, None),
    SettingSpec {
        key: SettingKey::LegacyWalletNeedsBackup,
        kind: ValueKind::Bool,
        default: DefaultValue::Absent,
        read_rule: None,
        writable: false,
    },
];

/// Returns the table row for `key`.
pub fn spec_for(key: SettingKey) -> &'static SettingSpec {
    // Rows are in `SettingKey::ALL` order; the test below keeps it that way.
    &SETTING_SPECS[key as usize]
}

/// Boolean preferences with a `false` default, as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolSetting {
    BiometricsEnabled,
    HasAcquiredShareDataPermission,
    /// Display amounts in fiat instead of the native unit.
    IsAmountSwapped,
    HasPromptedShareData,
    HasPromptedBiometrics,
    HasShownWelcome,
}

impl BoolSetting {
    pub const ALL: [BoolSetting; 6] = [
        BoolSetting::BiometricsEnabled,
        BoolSetting::HasAcquiredShareDataPermission,
        BoolSetting::IsAmountSwapped,
        BoolSetting::HasPromptedShareData,
        BoolSetting::HasPromptedBiometrics,
        BoolSetting::HasShownWelcome,
    ];

    pub const fn key(self) -> SettingKey {
        match self {
            BoolSetting::BiometricsEnabled => SettingKey::BiometricsEnabled,
            BoolSetting::HasAcquiredShareDataPermission => {
                SettingKey::HasAcquiredShareDataPermission
            }
            BoolSetting::IsAmountSwapped => SettingKey::IsAmountSwapped,
            BoolSetting::HasPromptedShareData => SettingKey::HasPromptedShareData,
            BoolSetting::HasPromptedBiometrics => SettingKey::HasPromptedBiometrics,
            BoolSetting::HasShownWelcome => SettingKey::HasShownWelcome,
        }
    }

    /// What the flag reads as when nothing is stored.
    pub const fn default_value(self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_rows_follow_key_order() {
        for (i, key) in SettingKey::ALL.iter().enumerate() {
            assert_eq!(SETTING_SPECS[i].key, *key, "row {i} is out of order");
            assert_eq!(spec_for(*key).key, *key);
        }
    }

    #[test]
    fn test_storage_keys_are_unique() {
        let keys: HashSet<_> = SettingKey::ALL.iter().map(|k| k.storage_key()).collect();
        assert_eq!(keys.len(), SettingKey::ALL.len());
    }

    #[test]
    fn test_prompt_settings_use_distinct_keys() {
        assert_ne!(
            SettingKey::HasPromptedShareData.storage_key(),
            SettingKey::HasPromptedBiometrics.storage_key()
        );
    }

    #[test]
    fn test_from_storage_key_inverts_storage_key() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_storage_key(key.storage_key()), Some(key));
        }
        assert_eq!(SettingKey::from_storage_key("unknown"), None);
    }

    #[test]
    fn test_bool_settings_default_to_false() {
        for setting in BoolSetting::ALL {
            let spec = spec_for(setting.key());
            assert_eq!(spec.kind, ValueKind::Bool);
            assert_eq!(spec.default, DefaultValue::Bool(false));
            assert!(spec.writable);
        }
    }

    #[test]
    fn test_max_digits_rule_only_remaps_legacy_value() {
        let rule = spec_for(SettingKey::MaxDisplayDigits)
            .read_rule
            .expect("max digits has a read rule");
        assert_eq!(rule.apply_int(5), 8);
        assert_eq!(rule.apply_int(8), 8);
        assert_eq!(rule.apply_int(2), 2);
        assert_eq!(rule.apply_int(12), 12);
    }

    #[test]
    fn test_typed_settings_agree_with_table_rows() {
        for setting in BoolSetting::ALL {
            assert_eq!(
                spec_for(setting.key()).default,
                DefaultValue::Bool(setting.default_value()),
                "{setting:?}"
            );
        }

        let digits = spec_for(MAX_DISPLAY_DIGITS.key);
        assert_eq!(digits.key, SettingKey::MaxDisplayDigits);
        assert_eq!(digits.kind, ValueKind::Int);
        assert_eq!(digits.default, DefaultValue::Int(MAX_DISPLAY_DIGITS.default));
        assert_eq!(digits.read_rule, MAX_DISPLAY_DIGITS.read_rule);

        let currency = spec_for(SettingKey::DefaultCurrencyCode);
        assert_eq!(currency.default, DefaultValue::LocaleCurrency);
        assert_eq!(currency.read_rule, Some(ReadRule::CurrencyAllowList));
    }

    #[test]
    fn test_int_setting_resolve_applies_default_and_rule() {
        assert_eq!(MAX_DISPLAY_DIGITS.resolve(None), 8);
        assert_eq!(MAX_DISPLAY_DIGITS.resolve(Some(5)), 8);
        assert_eq!(MAX_DISPLAY_DIGITS.resolve(Some(2)), 2);

        let plain = IntSetting {
            key: SettingKey::CustomNodePort,
            default: 0,
            read_rule: None,
        };
        assert_eq!(plain.resolve(Some(5)), 5);
        assert_eq!(plain.resolve(None), 0);
    }

    #[test]
    fn test_legacy_backup_flag_is_read_only() {
        let spec = spec_for(SettingKey::LegacyWalletNeedsBackup);
        assert!(!spec.writable);
        assert_eq!(spec.default, DefaultValue::Absent);
    }
}
