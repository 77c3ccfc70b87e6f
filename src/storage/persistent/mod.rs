//! Durable settings backend.
//!
//! The settings map lives in a single file inside a directory the process
//! owns exclusively:
//! - File locking so a second process cannot open the same settings
//! - CRC32 checksums for corruption detection
//! - Write-to-temp then rename, so a failed write never replaces the
//!   previous file
//!
//! ```text
//! <dir>/
//! ├── .hamenu.lock       exclusive lock (flock / LockFileEx)
//! ├── settings.hamenu    [magic][version][len][json][crc32]
//! └── settings.hamenu.tmp  transient, only during a write
//! ```

mod codec;
mod file_lock;
mod store;

pub use file_lock::FileLock;
pub use store::FileSettingsStore;

use std::path::Path;

use crate::storage::traits::StorageError;

/// Configuration for the file backend.
#[derive(Debug, Clone)]
pub struct FileSettingsConfig {
    /// Name of the settings file inside the directory.
    pub file_name: String,
    /// Whether to fsync after every write (slower but safer).
    pub sync_on_write: bool,
}

impl Default for FileSettingsConfig {
    fn default() -> Self {
        Self {
            file_name: "settings.hamenu".to_string(),
            sync_on_write: true,
        }
    }
}

impl FileSettingsConfig {
    /// Checks that the configuration names a plain file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::BackendError`] for an empty file name or one
    /// containing a path separator.
    pub fn validate(self) -> Result<Self, StorageError> {
        if self.file_name.trim().is_empty() {
            return Err(StorageError::BackendError(
                "file_name must not be empty".to_string(),
            ));
        }
        if self.file_name.contains(['/', '\\']) {
            return Err(StorageError::BackendError(format!(
                "file_name must not contain a path separator (got {:?})",
                self.file_name
            )));
        }
        Ok(self)
    }
}

/// Open or create a settings directory at the given path.
///
/// # Errors
/// - If the directory cannot be created or accessed
/// - If another process holds the lock ([`StorageError::Locked`])
/// - If an existing settings file is corrupted
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
/// use hamenu::storage::open_settings;
/// use hamenu::{MenuItemStore, Preferences};
///
/// let settings = open_settings("./ha-menu", None)?;
/// let store = MenuItemStore::new(Preferences::new(Arc::new(settings)));
/// ```
pub fn open_settings(
    path: impl AsRef<Path>,
    config: Option<FileSettingsConfig>,
) -> Result<FileSettingsStore, StorageError> {
    let cfg = config.unwrap_or_default().validate()?;
    FileSettingsStore::open(path.as_ref(), cfg)
}
