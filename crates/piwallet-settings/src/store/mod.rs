//! Backing key-value stores for the settings facade.
//!
//! The settings layer never talks to a file or database directly.  It talks
//! to a [`KeyValueStore`]: a process-wide map from string keys to
//! dynamically-typed [`StoredValue`]s.  Two implementations ship with the
//! crate:
//!
//! - [`memory::MemoryStore`] – a thread-safe in-memory map (tests, ephemeral
//!   sessions).
//! - [`file::FileStore`] – a thread-safe, write-through store persisted as a
//!   TOML file in the platform config directory.
//!
//! # Type coercion (for beginners)
//!
//! A preferences database stores whatever it was handed, so a key that the
//! settings layer expects to hold a boolean may contain an integer written by
//! an older app version.  Instead of failing, scalar reads *coerce*:
//!
//! | Read as | Stored value            | Result                          |
//! |---------|-------------------------|---------------------------------|
//! | bool    | `Int(n)` / `Float(f)`   | `n != 0` / `f != 0.0`           |
//! | bool    | `Str(s)`                | `s` is `true`, `yes` or `1`     |
//! | int     | `Bool(b)`               | `0` or `1`                      |
//! | int     | `Float(f)`              | `f` truncated                   |
//! | int     | `Str(s)`                | `s` parsed, else `0`            |
//!
//! Every other mismatch reads as the type's zero value.  Compound reads
//! (string, bytes, timestamp, record) of a mismatched value return `None`.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

pub mod file;
pub mod memory;

/// A structured value: a map from field name to dynamically-typed value.
pub type Record = BTreeMap<String, StoredValue>;

/// A dynamically-typed value held by a [`KeyValueStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Persisted as signed seconds plus nanoseconds, so dates before 1970
    /// are stored like any other.
    Timestamp(#[serde(with = "timestamp_format")] SystemTime),
    Record(Record),
}

/// Serde representation of a [`SystemTime`] as `{ secs, nanos }` relative to
/// the Unix epoch.  `secs` is floored, so `nanos` is always in `0..1e9`:
/// half a second before the epoch is `{ secs = -1, nanos = 500000000 }`.
mod timestamp_format {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    const NANOS_PER_SEC: u32 = 1_000_000_000;

    #[derive(Serialize, Deserialize)]
    struct EpochOffset {
        secs: i64,
        nanos: u32,
    }

    fn to_offset(time: SystemTime) -> Option<EpochOffset> {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Some(EpochOffset {
                secs: i64::try_from(after.as_secs()).ok()?,
                nanos: after.subsec_nanos(),
            }),
            Err(e) => {
                let before = e.duration();
                let secs = i64::try_from(before.as_secs()).ok()?;
                Some(match before.subsec_nanos() {
                    0 => EpochOffset { secs: -secs, nanos: 0 },
                    n => EpochOffset {
                        secs: -secs - 1,
                        nanos: NANOS_PER_SEC - n,
                    },
                })
            }
        }
    }

    fn from_offset(offset: &EpochOffset) -> Option<SystemTime> {
        if offset.nanos >= NANOS_PER_SEC {
            return None;
        }
        let nanos = Duration::from_nanos(u64::from(offset.nanos));
        let whole = Duration::from_secs(offset.secs.unsigned_abs());
        if offset.secs >= 0 {
            UNIX_EPOCH.checked_add(whole)?.checked_add(nanos)
        } else {
            UNIX_EPOCH.checked_sub(whole)?.checked_add(nanos)
        }
    }

    pub fn serialize<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
        to_offset(*time)
            .ok_or_else(|| S::Error::custom("timestamp is out of range"))?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
        let offset = EpochOffset::deserialize(deserializer)?;
        from_offset(&offset).ok_or_else(|| {
            D::Error::custom(format!(
                "invalid timestamp {{ secs = {}, nanos = {} }}",
                offset.secs, offset.nanos
            ))
        })
    }

}

impl StoredValue {
    /// Reads this value as a boolean, coercing numbers and strings.
    pub fn coerce_bool(&self) -> bool {
        match self {
            StoredValue::Bool(b) => *b,
            StoredValue::Int(n) => *n != 0,
            StoredValue::Float(f) => *f != 0.0,
            StoredValue::Str(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes") || s == "1"
            }
            _ => false,
        }
    }

    /// Reads this value as an integer, coercing booleans, floats and numeric strings.
    pub fn coerce_int(&self) -> i64 {
        match self {
            StoredValue::Int(n) => *n,
            StoredValue::Bool(b) => i64::from(*b),
            // `as` saturates and maps NaN to 0.
            StoredValue::Float(f) => *f as i64,
            StoredValue::Str(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Reads this value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            StoredValue::Float(f) => Some(*f),
            StoredValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            StoredValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<SystemTime> {
        match self {
            StoredValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            StoredValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Short name of the variant, matching the `kind` tag in the settings file.
    pub fn kind(&self) -> &'static str {
        match self {
            StoredValue::Bool(_) => "bool",
            StoredValue::Int(_) => "int",
            StoredValue::Float(_) => "float",
            StoredValue::Str(_) => "str",
            StoredValue::Bytes(_) => "bytes",
            StoredValue::Timestamp(_) => "timestamp",
            StoredValue::Record(_) => "record",
        }
    }
}

/// Trait abstracting the durable key-value store behind the settings facade.
///
/// Implementations must be safe to share between threads; every method takes
/// `&self` and the implementation provides its own locking.  Writes never
/// report failure to the caller: a store that cannot persist logs the failure
/// and keeps serving the in-memory value.
///
/// The production implementation is [`file::FileStore`]; tests use
/// [`memory::MemoryStore`] or the generated `MockKeyValueStore`.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<StoredValue>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: StoredValue);
    /// Deletes `key`.  Deleting an absent key is a no-op.
    fn remove(&self, key: &str);
    /// Returns every key currently present, in sorted order.
    fn keys(&self) -> Vec<String>;

    /// Returns `true` when `key` holds a value.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<StoredValue> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: StoredValue) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
