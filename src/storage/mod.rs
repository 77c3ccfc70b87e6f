//! Settings storage for hamenu.
//!
//! The core never talks to a global preference store. Everything goes
//! through the [`SettingsStore`] trait, which is injected into
//! [`crate::Preferences`].
//!
//! Backends:
//! - [`InMemorySettingsStore`] for tests and embedded use
//! - `FileSettingsStore` (feature `persistent`) for a durable settings file

mod memory;
mod traits;

#[cfg(feature = "persistent")]
pub mod persistent;

pub use memory::InMemorySettingsStore;
pub use traits::{SettingValue, SettingsStore, StorageError};

#[cfg(feature = "persistent")]
pub use persistent::{open_settings, FileSettingsConfig, FileSettingsStore};
