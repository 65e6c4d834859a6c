//! The "wallet requires backup" predicate.
//!
//! The wallet nags the user to write down their recovery phrase until they
//! have done so once.  Two settings feed the decision:
//!
//! - `WritePaperPhraseDate` – set when the user finishes the backup flow.
//! - `LegacyWalletNeedsBackup` – a flag written by older app versions.
//!
//! The historical rule had four arms:
//!
//! ```text
//! if date is set                      → false
//! else if legacy flag == true         → true
//! else if date is unset               → true
//! else                                → false
//! ```
//!
//! The third arm restates the negation of the first, so the fourth is
//! unreachable and the legacy flag can never change the outcome.  The
//! function below is the equivalent two-branch form; the tests compare it
//! against the four-arm rule for every input.

use std::time::SystemTime;

/// Returns `true` while the user has not completed the paper-phrase backup.
///
/// Pure: depends only on its arguments.
pub fn wallet_requires_backup(
    write_paper_phrase_date: Option<SystemTime>,
    legacy_needs_backup: Option<bool>,
) -> bool {
    match (write_paper_phrase_date, legacy_needs_backup) {
        (Some(_), _) => false,
        (None, Some(true)) => true,
        (None, _) => true,
    }
}
