//! Domain types for wallet preferences.
//!
//! Pure logic with no I/O: the setting table, currency validation, the
//! exchange-rate record and the backup predicate.  The
//! [`settings`](crate::settings) facade combines these with a backing store.

pub mod backup;
pub mod currency;
pub mod keys;
pub mod rate;
