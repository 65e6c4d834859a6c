//! # piwallet-settings
//!
//! Typed, persisted wallet preferences.
//!
//! The wallet keeps its durable preferences (display currency, digit count,
//! biometrics and prompt flags, the last exchange rate, a custom node, backup
//! state) in a simple key-value store.  This crate is the only code that
//! touches those keys; everything else goes through the typed
//! [`SettingsStore`] facade.
//!
//! # Architecture overview (for beginners)
//!
//! - **`domain`** – Pure rules with no I/O: the setting table (storage key,
//!   default, read rule for every preference), currency validation, the
//!   exchange-rate record and the "wallet requires backup" predicate.
//!
//! - **`store`** – The [`KeyValueStore`] trait and its two implementations: an
//!   in-memory map and a write-through TOML file.
//!
//! - **`locale`** – Where the default display currency comes from when the
//!   user has never picked one.
//!
//! - **`settings`** – The facade itself.  Getters never fail: an unset key
//!   reads as its default, an invalid currency reads as `EUR`, a malformed
//!   exchange rate reads as `None`.
//!
//! ```rust
//! use piwallet_settings::{BoolSetting, FixedLocale, MemoryStore, SettingsStore};
//!
//! let settings = SettingsStore::new(MemoryStore::new(), FixedLocale::new("GBP"));
//! assert_eq!(settings.max_digits(), 8);
//! assert_eq!(settings.currency_code(), "GBP");
//! assert!(settings.wallet_requires_backup());
//!
//! settings.set_bool(BoolSetting::BiometricsEnabled, true);
//! assert!(settings.get_bool(BoolSetting::BiometricsEnabled));
//! ```

pub mod domain;
pub mod error;
pub mod locale;
pub mod settings;
pub mod store;

// Re-export the most-used types at the crate root so callers can write
// `piwallet_settings::SettingsStore` instead of the full module path.
pub use domain::currency::{CurrencyCode, ACCEPTED_CURRENCY_CODES, FALLBACK_CURRENCY_CODE};
pub use domain::keys::{BoolSetting, SettingKey, SettingSpec, SETTING_SPECS};
pub use domain::rate::{Rate, RateError};
pub use error::StoreError;
pub use locale::{FixedLocale, LocaleProvider, SystemLocale};
pub use settings::{CustomNode, SettingsStore};
pub use store::file::FileStore;
pub use store::memory::MemoryStore;
pub use store::{KeyValueStore, Record, StoredValue};
