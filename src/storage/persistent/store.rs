//! File-backed settings store.
//!
//! Reads are served from an in-memory copy of the map. Every write encodes
//! the full map to a temporary file and renames it over the settings file;
//! the in-memory copy is only updated once the rename succeeded.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::storage::traits::{SettingValue, SettingsStore, StorageError};

use super::codec;
use super::file_lock::FileLock;
use super::FileSettingsConfig;

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

type SettingsMap = BTreeMap<String, SettingValue>;

/// Settings store persisted to a single checksummed file.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    tmp_path: PathBuf,
    sync_on_write: bool,
    values: RwLock<SettingsMap>,
    _lock: FileLock,
}

impl FileSettingsStore {
    /// Opens the settings directory, creating it if needed, and loads the
    /// existing settings file if there is one.
    ///
    /// # Errors
    ///
    /// See [`super::open_settings`].
    pub fn open(dir: &Path, config: FileSettingsConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;

        let lock = FileLock::acquire(dir).map_err(|e| {
            if e.kind() == ErrorKind::WouldBlock {
                StorageError::Locked(format!("{}: {e}", dir.display()))
            } else {
                StorageError::Io(e)
            }
        })?;

        let path = dir.join(&config.file_name);
        let tmp_path = dir.join(format!("{}.tmp", config.file_name));

        // A leftover temp file means a write never reached its rename.
        if tmp_path.exists() {
            warn!(path = %tmp_path.display(), "discarding incomplete settings write");
            fs::remove_file(&tmp_path)?;
        }

        let values = match fs::read(&path) {
            Ok(bytes) => codec::decode::<SettingsMap>(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => SettingsMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };
        debug!(path = %path.display(), keys = values.len(), "opened settings file");

        Ok(Self {
            path,
            tmp_path,
            sync_on_write: config.sync_on_write,
            values: RwLock::new(values),
            _lock: lock,
        })
    }

    /// Path of the settings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &SettingsMap) -> Result<(), StorageError> {
        let bytes = codec::encode(values)?;

        let mut file = fs::File::create(&self.tmp_path)?;
        file.write_all(&bytes)?;
        if self.sync_on_write {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(&self.tmp_path, &self.path)?;
        Ok(())
    }

    fn apply(
        &self,
        context: &'static str,
        change: impl FnOnce(&mut SettingsMap) -> bool,
    ) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| lock_err(context))?;
        let mut next = values.clone();
        if !change(&mut next) {
            return Ok(());
        }
        if let Err(e) = self.flush(&next) {
            // Best effort: the previous settings file is still intact.
            let _ = fs::remove_file(&self.tmp_path);
            return Err(e);
        }
        *values = next;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, StorageError> {
        let values = self.values.read().map_err(|_| lock_err("settings.get"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: SettingValue) -> Result<(), StorageError> {
        self.apply("settings.set", |map| {
            if map.get(key) == Some(&value) {
                return false;
            }
            map.insert(key.to_string(), value);
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.apply("settings.remove", |map| map.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let values = self.values.read().map_err(|_| lock_err("settings.keys"))?;
        Ok(values.keys().cloned().collect())
    }
}
