//! Device locale lookup.
//!
//! The default display currency comes from the device locale when the user
//! has never picked one.  [`LocaleProvider`] abstracts that lookup so the
//! settings facade can be tested with a fixed locale.
//!
//! [`SystemLocale`] follows POSIX precedence for the monetary category:
//! `LC_ALL`, then `LC_MONETARY`, then `LANG`.  A locale string has the shape
//! `language_REGION[.encoding][@modifier]`, e.g. `en_GB.UTF-8`; the region
//! selects the currency.

/// Trait abstracting the device locale's currency.
#[cfg_attr(test, mockall::automock)]
pub trait LocaleProvider: Send + Sync {
    /// The ISO 4217 code of the locale's currency, if the locale has one.
    fn currency_code(&self) -> Option<String>;
}

/// Environment variables consulted by [`SystemLocale`], highest priority first.
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MONETARY", "LANG"];

/// Reads the currency from the process locale environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocale;

impl LocaleProvider for SystemLocale {
    fn currency_code(&self) -> Option<String> {
        // The first non-empty variable decides, even if it names no currency.
        let locale = LOCALE_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())?;
        currency_for_locale(&locale).map(str::to_string)
    }
}

/// A locale with a fixed currency (or none).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedLocale(pub Option<String>);

impl FixedLocale {
    pub fn new(code: impl Into<String>) -> Self {
        Self(Some(code.into()))
    }

    /// A locale without a currency, e.g. the `C` locale.
    pub fn none() -> Self {
        Self(None)
    }
}

impl LocaleProvider for FixedLocale {
    fn currency_code(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Extracts the region from a locale string and maps it to its currency.
///
/// Returns `None` for `C`, `POSIX`, locales without a region, and regions
/// not in the table.
pub fn currency_for_locale(locale: &str) -> Option<&'static str> {
    let base = locale.split(['.', '@']).next().unwrap_or_default();
    let (_language, region) = base.split_once(['_', '-'])?;
    currency_for_region(&region.to_ascii_uppercase())
}

/// Maps an ISO 3166 alpha-2 region code to its currency.
pub fn currency_for_region(region: &str) -> Option<&'static str> {
    let code = match region {
        "US" | "EC" | "SV" | "PR" | "PA" => "USD",
        "AT" | "BE" | "CY" | "DE" | "EE" | "ES" | "FI" | "FR" | "GR" | "IE" | "IT" | "LT"
        | "LU" | "LV" | "MT" | "NL" | "PT" | "SI" | "SK" | "ME" | "AD" | "MC" | "SM" | "VA" => {
            "EUR"
        }
        "JP" => "JPY",
        "BG" => "BGN",
        "CZ" => "CZK",
        "DK" | "GL" | "FO" => "DKK",
        "GB" | "IM" | "JE" | "GG" => "GBP",
        "HU" => "HUF",
        "PL" => "PLN",
        "RO" => "RON",
        "SE" => "SEK",
        "CH" | "LI" => "CHF",
        "NO" => "NOK",
        "HR" => "HRK",
        "RU" => "RUB",
        "TR" => "TRY",
        "AU" => "AUD",
        "BR" => "BRL",
        "CA" => "CAD",
        "CN" => "CNY",
        "HK" => "HKD",
        "ID" => "IDR",
        "IL" => "ILS",
        "IN" => "INR",
        "KR" => "KRW",
        "MX" => "MXN",
        "MY" => "MYR",
        "NZ" => "NZD",
        "PH" => "PHP",
        "SD" => "SDG",
        "TH" => "THB",
        "ZA" => "ZAR",
        // Not on the display allow-list; the settings layer falls back to EUR.
        "AR" => "ARS",
        "CL" => "CLP",
        "EG" => "EGP",
        "NG" => "NGN",
        "SG" => "SGD",
        "TW" => "TWD",
        "UA" => "UAH",
        "VN" => "VND",
        _ => return None,
    };
    Some(code)
}
