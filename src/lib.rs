//! # hamenu - menu configuration core for a Home Assistant menu client
//!
//! The client shows a menu of controllable items pulled from a Home
//! Assistant server. The user picks which domains and groups appear and in
//! which order; this crate keeps that choice consistent with whatever the
//! server reports on each refresh.
//!
//! ## Core Concepts
//!
//! - **Entity**: a live `<domain>.<name>` object reported by the server
//! - **RecognizedDomain**: the closed set of domains the menu understands
//! - **MenuItem**: one persisted row, either a whole domain or one group
//! - **Reconciliation**: merging the persisted rows with a live snapshot
//!   into an indexed, render-ready menu
//! - **Migration**: turning legacy flat settings into menu items
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hamenu::storage::InMemorySettingsStore;
//! use hamenu::{Entity, MenuItemStore, Preferences};
//!
//! let prefs = Preferences::new(Arc::new(InMemorySettingsStore::new()));
//! let store = MenuItemStore::new(prefs);
//!
//! let live = vec![
//!     Entity::new("light.porch", "Porch", "off")?,
//!     Entity::new("group.kitchen", "Kitchen", "on")?,
//! ];
//! let menu = store.reconcile(&live)?;
//!
//! // Five migrated domains, then the newly seen group, disabled.
//! let kitchen = menu.get("kitchen").unwrap();
//! assert_eq!(kitchen.index, 6);
//! assert!(!kitchen.enabled);
//!
//! store.remember(&menu)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod entity;
pub mod error;
pub mod legacy;
pub mod menu;
pub mod preferences;
pub mod storage;
pub mod store;

// Re-export primary types at crate root for convenience
pub use entity::{classify_domain, Entity, EntityId, RecognizedDomain, RecognizedType};
pub use error::{MenuError, MenuResult, ValidationError};
pub use legacy::LegacyDomainFlags;
pub use menu::{MenuItem, MenuItemKind};
pub use preferences::Preferences;
pub use storage::{InMemorySettingsStore, SettingValue, SettingsStore, StorageError};
pub use store::{reconcile, FallbackReason, ListSource, LoadedList, MenuItemStore, ReconciledMenu};
