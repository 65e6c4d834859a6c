//! TOML-file-backed [`KeyValueStore`].
//!
//! Persists every entry to the platform-appropriate settings file:
//! - Windows:  `%APPDATA%\piwallet\settings.toml`
//! - Linux:    `~/.config/piwallet/settings.toml`
//! - macOS:    `~/Library/Application Support/piwallet/settings.toml`
//!
//! Each entry is written as a table tagged with its value kind:
//!
//! ```toml
//! [entries.SETTINGS_MAX_DIGITS]
//! kind = "int"
//! value = 8
//!
//! [entries.pushTokenKey]
//! kind = "bytes"
//! value = [222, 173, 190, 239]
//! ```
//!
//! # Write-through
//!
//! There is no dirty flag and no batching.  Every `set` and `remove` rewrites
//! the whole file before returning, while holding the write lock, so the file
//! always reflects the latest in-memory state and concurrent writers cannot
//! interleave partial files.  A failed write is logged at `warn` and the
//! in-memory value is kept; callers that need the error can call
//! [`FileStore::persist`] themselves.
//!
//! The new content goes to `settings.toml.tmp` first and is then renamed over
//! `settings.toml`.  A crash mid-write leaves the previous file intact; the
//! stale `.tmp` file is never read and is replaced by the next write.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{KeyValueStore, StoredValue};
use crate::error::StoreError;

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// On-disk layout of the settings file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    entries: BTreeMap<String, StoredValue>,
}

/// A thread-safe key-value store persisted to a TOML file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, StoredValue>>,
}

impl FileStore {
    /// Opens the store at `path`, starting empty if the file does not exist yet.
    ///
    /// Nothing is written until the first `set` or `remove`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for file-system errors other than "not
    /// found", and [`StoreError::Parse`] if the TOML is malformed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let file: SettingsFile = toml::from_str(&content)?;
                debug!("loaded {} settings from {}", file.entries.len(), path.display());
                file.entries
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no settings file at {}; starting empty", path.display());
                BTreeMap::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Opens the store at the platform default location.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoPlatformConfigDir`] when the base directory
    /// cannot be determined, plus every error [`FileStore::open`] can return.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(settings_file_path()?)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current in-memory state to disk.
    ///
    /// Creates the parent directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for file-system failures or
    /// [`StoreError::Serialize`] if serialization fails.
    pub fn persist(&self) -> Result<(), StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        write_entries(&self.path, &entries)
    }

    /// Applies `mutate` to the map and writes the result while still holding the lock.
    fn mutate_and_persist(&self, mutate: impl FnOnce(&mut BTreeMap<String, StoredValue>)) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        mutate(&mut entries);
        if let Err(e) = write_entries(&self.path, &entries) {
            warn!("failed to persist settings to {}: {e}", self.path.display());
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: StoredValue) {
        self.mutate_and_persist(|entries| {
            entries.insert(key.to_string(), value);
        });
    }

    fn remove(&self, key: &str) {
        let present = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key);
        if !present {
            return;
        }
        self.mutate_and_persist(|entries| {
            entries.remove(key);
        });
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

fn write_entries(path: &Path, entries: &BTreeMap<String, StoredValue>) -> Result<(), StoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let file = SettingsFile {
        entries: entries.clone(),
    };
    let content = toml::to_string_pretty(&file)?;

    let staging = staging_path(path);
    let written = std::fs::File::create(&staging).and_then(|mut f| {
        f.write_all(content.as_bytes())?;
        f.sync_all()
    });
    if let Err(source) = written {
        std::fs::remove_file(&staging).ok();
        return Err(StoreError::Io {
            path: staging,
            source,
        });
    }

    std::fs::rename(&staging, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The sibling file a write is staged in before it replaces `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(SETTINGS_FILE_NAME));
    name.push(".tmp");
    path.with_file_name(name)
}

// ── Platform paths ────────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the settings file.
///
/// # Errors
///
/// Returns [`StoreError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn settings_dir() -> Result<PathBuf, StoreError> {
    platform_config_dir().ok_or(StoreError::NoPlatformConfigDir)
}

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`StoreError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn settings_file_path() -> Result<PathBuf, StoreError> {
    Ok(settings_dir()?.join(SETTINGS_FILE_NAME))
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("piwallet"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("piwallet"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("piwallet")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;
    use std::time::{Duration, SystemTime};
    use uuid::Uuid;

    fn temp_settings_path() -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("piwallet_test_{}", Uuid::new_v4()));
        let path = dir.join(SETTINGS_FILE_NAME);
        (dir, path)
    }

    #[test]
    fn test_open_missing_file_starts_empty_without_creating_it() {
        // Arrange
        let (dir, path) = temp_settings_path();

        // Act
        let store = FileStore::open(&path).expect("missing file must open");

        // Assert
        assert!(store.keys().is_empty());
        assert!(!path.exists(), "open must not write anything");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_set_writes_through_and_survives_reopen() {
        // Arrange
        let (dir, path) = temp_settings_path();
        let ts = SystemTime::UNIX_EPOCH + Duration::new(1_600_000_000, 250);
        let mut record = Record::new();
        record.insert("code".to_string(), StoredValue::Str("USD".to_string()));
        record.insert("rate".to_string(), StoredValue::Float(0.25));

        // Act
        {
            let store = FileStore::open(&path).unwrap();
            store.set("flag", StoredValue::Bool(true));
            store.set("digits", StoredValue::Int(8));
            store.set("token", StoredValue::Bytes(vec![0xde, 0xad]));
            store.set("date", StoredValue::Timestamp(ts));
            store.set("rate", StoredValue::Record(record.clone()));
            store.set("code", StoredValue::Str("GBP".to_string()));
        }
        let reopened = FileStore::open(&path).unwrap();

        // Assert
        assert_eq!(reopened.get("flag"), Some(StoredValue::Bool(true)));
        assert_eq!(reopened.get("digits"), Some(StoredValue::Int(8)));
        assert_eq!(reopened.get("token"), Some(StoredValue::Bytes(vec![0xde, 0xad])));
        assert_eq!(reopened.get("date"), Some(StoredValue::Timestamp(ts)));
        assert_eq!(reopened.get("rate"), Some(StoredValue::Record(record)));
        assert_eq!(reopened.get("code"), Some(StoredValue::Str("GBP".to_string())));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_pre_epoch_timestamp_does_not_block_later_writes() {
        // Arrange
        let (dir, path) = temp_settings_path();
        let before_1970 = SystemTime::UNIX_EPOCH - Duration::from_secs(1);

        // Act
        {
            let store = FileStore::open(&path).unwrap();
            store.set("writepaperphrasedatekey", StoredValue::Timestamp(before_1970));
            store.set("SETTINGS_MAX_DIGITS", StoredValue::Int(12));
            assert!(store.persist().is_ok());
        }
        let reopened = FileStore::open(&path).unwrap();

        // Assert
        assert_eq!(
            reopened.get("writepaperphrasedatekey"),
            Some(StoredValue::Timestamp(before_1970))
        );
        assert_eq!(reopened.get("SETTINGS_MAX_DIGITS"), Some(StoredValue::Int(12)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_timestamp_is_stored_as_seconds_and_nanos() {
        let (dir, path) = temp_settings_path();
        let store = FileStore::open(&path).unwrap();

        store.set(
            "date",
            StoredValue::Timestamp(SystemTime::UNIX_EPOCH - Duration::from_millis(1500)),
        );

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("kind = \"timestamp\""), "got:\n{content}");
        assert!(content.contains("secs = -2"), "got:\n{content}");
        assert!(content.contains("nanos = 500000000"), "got:\n{content}");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_leaves_no_staging_file_behind() {
        let (dir, path) = temp_settings_path();
        let store = FileStore::open(&path).unwrap();

        store.set("a", StoredValue::Int(1));
        store.remove("a");

        assert!(path.exists());
        assert!(!staging_path(&path).exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_interrupted_write_keeps_previous_file_readable() {
        // Arrange: a complete file plus a truncated staging file, as left by a
        // crash between the two steps of a write.
        let (dir, path) = temp_settings_path();
        FileStore::open(&path)
            .unwrap()
            .set("defaultcurrency", StoredValue::Str("JPY".to_string()));
        std::fs::write(staging_path(&path), "[entries.defaultcurr").unwrap();

        // Act
        let store = FileStore::open(&path).unwrap();
        store.set("isbiometricsenabled", StoredValue::Bool(true));
        let reopened = FileStore::open(&path).unwrap();

        // Assert
        assert_eq!(reopened.get("defaultcurrency"), Some(StoredValue::Str("JPY".to_string())));
        assert_eq!(reopened.get("isbiometricsenabled"), Some(StoredValue::Bool(true)));
        assert!(!staging_path(&path).exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_staging_path_is_a_sibling() {
        let path = Path::new("/cfg/piwallet/settings.toml");
        assert_eq!(staging_path(path), Path::new("/cfg/piwallet/settings.toml.tmp"));
    }

    #[test]
    fn test_remove_is_persisted() {
        let (dir, path) = temp_settings_path();
        let store = FileStore::open(&path).unwrap();
        store.set("WALLET_NEEDS_BACKUP", StoredValue::Bool(true));

        store.remove("WALLET_NEEDS_BACKUP");
        store.remove("WALLET_NEEDS_BACKUP");

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("WALLET_NEEDS_BACKUP"), None);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_uses_tagged_entry_tables() {
        let (dir, path) = temp_settings_path();
        let store = FileStore::open(&path).unwrap();

        store.set("SETTINGS_MAX_DIGITS", StoredValue::Int(8));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("SETTINGS_MAX_DIGITS"), "got:\n{content}");
        assert!(content.contains("kind = \"int\""), "got:\n{content}");
        assert!(content.contains("value = 8"), "got:\n{content}");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_hand_written_file() {
        // Arrange
        let (dir, path) = temp_settings_path();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            &path,
            r#"
[entries.defaultcurrency]
kind = "str"
value = "JPY"

[entries.isbiometricsenabled]
kind = "bool"
value = true
"#,
        )
        .unwrap();

        // Act
        let store = FileStore::open(&path).unwrap();

        // Assert
        assert_eq!(store.get("defaultcurrency"), Some(StoredValue::Str("JPY".to_string())));
        assert_eq!(store.get("isbiometricsenabled"), Some(StoredValue::Bool(true)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_malformed_file_returns_parse_error() {
        let (dir, path) = temp_settings_path();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = FileStore::open(&path);

        assert!(matches!(result, Err(StoreError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_unknown_kind_returns_parse_error() {
        let (dir, path) = temp_settings_path();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[entries.a]\nkind = \"color\"\nvalue = 1\n").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StoreError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_persist_reports_io_errors() {
        // Arrange: once opened, the parent directory is replaced by a regular
        // file, so every write must fail.
        let (dir, _) = temp_settings_path();
        let blocker = dir.join("blocker");
        let store = FileStore::open(blocker.join(SETTINGS_FILE_NAME)).unwrap();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&blocker, "x").unwrap();

        // Act
        store.set("a", StoredValue::Int(1));
        let result = store.persist();

        // Assert: the failed write is swallowed by `set` but surfaced by `persist`
        assert_eq!(store.get("a"), Some(StoredValue::Int(1)));
        assert!(matches!(result, Err(StoreError::Io { .. })));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_settings_file_path_ends_with_settings_toml() {
        if let Ok(path) = settings_file_path() {
            assert!(path.ends_with(SETTINGS_FILE_NAME), "got {path:?}");
            assert!(path.parent().is_some_and(|p| p.ends_with("piwallet")));
        }
        // NoPlatformConfigDir is acceptable in a stripped CI environment.
    }
}
