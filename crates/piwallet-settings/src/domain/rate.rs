//! Exchange rate record.
//!
//! The current rate is stored as a generic [`Record`] so that rate-refresh
//! code can persist whatever the rate service returned.  Turning that record
//! back into a [`Rate`] is fallible: a record written by an older app version,
//! or truncated by a crash, may be missing fields.

use thiserror::Error;

use crate::store::{Record, StoredValue};

pub const CODE_FIELD: &str = "code";
pub const NAME_FIELD: &str = "name";
pub const RATE_FIELD: &str = "rate";
pub const RECIPROCAL_CODE_FIELD: &str = "reciprocalCode";

/// Errors produced when decoding a [`Rate`] from a record.
#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    /// A required field is absent.
    #[error("rate record is missing required field `{0}`")]
    MissingField(&'static str),

    /// A field is present but holds the wrong kind of value.
    #[error("rate record field `{field}` must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// The price of one unit of the wallet's native currency in a fiat currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    /// Fiat currency code, e.g. `USD`.
    pub code: String,
    /// Human-readable currency name, e.g. `US Dollar`.
    pub name: String,
    /// Fiat units per native unit.
    pub rate: f64,
    /// Code of the reciprocal currency, when the rate service supplies one.
    pub reciprocal_code: Option<String>,
}

impl Rate {
    /// Builds a rate from a stored record.
    ///
    /// `rate` accepts an integer as well as a float.  Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::MissingField`] or [`RateError::WrongType`] when
    /// `code`, `name` or `rate` cannot be read, or when `reciprocalCode` is
    /// present but not a string.
    pub fn from_record(record: &Record) -> Result<Self, RateError> {
        let code = required_str(record, CODE_FIELD)?;
        let name = required_str(record, NAME_FIELD)?;
        let rate = match record.get(RATE_FIELD) {
            None => return Err(RateError::MissingField(RATE_FIELD)),
            Some(value) => value.as_float().ok_or(RateError::WrongType {
                field: RATE_FIELD,
                expected: "a number",
                found: value.kind(),
            })?,
        };
        let reciprocal_code = match record.get(RECIPROCAL_CODE_FIELD) {
            None => None,
            Some(value) => Some(
                value
                    .as_str()
                    .ok_or(RateError::WrongType {
                        field: RECIPROCAL_CODE_FIELD,
                        expected: "a string",
                        found: value.kind(),
                    })?
                    .to_string(),
            ),
        };

        Ok(Self {
            code,
            name,
            rate,
            reciprocal_code,
        })
    }

    /// Encodes this rate as a record readable by [`Rate::from_record`].
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(CODE_FIELD.to_string(), StoredValue::Str(self.code.clone()));
        record.insert(NAME_FIELD.to_string(), StoredValue::Str(self.name.clone()));
        record.insert(RATE_FIELD.to_string(), StoredValue::Float(self.rate));
        if let Some(reciprocal) = &self.reciprocal_code {
            record.insert(
                RECIPROCAL_CODE_FIELD.to_string(),
                StoredValue::Str(reciprocal.clone()),
            );
        }
        record
    }
}

fn required_str(record: &Record, field: &'static str) -> Result<String, RateError> {
    let value = record.get(field).ok_or(RateError::MissingField(field))?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or(RateError::WrongType {
            field,
            expected: "a string",
            found: value.kind(),
        })
}
