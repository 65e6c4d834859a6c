//! Display currency codes and the allow-list they are validated against.

use std::fmt;

/// Currency used whenever the stored or locale-derived code is unusable.
pub const FALLBACK_CURRENCY_CODE: &str = "EUR";

/// Fiat currencies the wallet can display rates for.
pub const ACCEPTED_CURRENCY_CODES: [&str; 32] = [
    "USD", "EUR", "JPY", "BGN", "CZK", "DKK", "GBP", "HUF", "PLN", "RON", "SEK", "CHF", "NOK",
    "HRK", "RUB", "TRY", "AUD", "BRL", "CAD", "CNY", "HKD", "IDR", "ILS", "INR", "KRW", "MXN",
    "MYR", "NZD", "PHP", "SDG", "THB", "ZAR",
];

/// Returns `true` if `code` is on the allow-list (exact, case-sensitive match).
pub fn is_accepted(code: &str) -> bool {
    ACCEPTED_CURRENCY_CODES.contains(&code)
}

/// A currency code that is guaranteed to be on the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(&'static str);

impl CurrencyCode {
    /// Returns the allow-listed code equal to `code`, or `None`.
    pub fn parse(code: &str) -> Option<Self> {
        ACCEPTED_CURRENCY_CODES
            .iter()
            .find(|accepted| **accepted == code)
            .map(|accepted| Self(*accepted))
    }

    /// The fallback code, `EUR`.
    pub fn fallback() -> Self {
        Self(FALLBACK_CURRENCY_CODE)
    }

    /// Validates `code`, substituting the fallback when it is not accepted.
    pub fn or_fallback(code: &str) -> Self {
        Self::parse(code).unwrap_or_else(Self::fallback)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl PartialEq<&str> for CurrencyCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
