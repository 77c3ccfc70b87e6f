//! In-memory storage backend.
//!
//! Thread-safe implementation of [`SettingsStore`] backed by a map.
//! It is intended for tests, embedded usage, and as a reference
//! implementation of the trait contract.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::storage::traits::{SettingValue, SettingsStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    values: RwLock<HashMap<String, SettingValue>>,
}

impl InMemorySettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `values`.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SettingValue>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, StorageError> {
        let values = self.values.read().map_err(|_| lock_err("settings.get"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: SettingValue) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| lock_err("settings.set"))?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| lock_err("settings.remove"))?;
        values.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let values = self.values.read().map_err(|_| lock_err("settings.keys"))?;
        let mut keys: Vec<String> = values.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
