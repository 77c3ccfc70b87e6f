//! The menu item store and reconciliation.
//!
//! [`MenuItemStore`] owns the persisted, user-ordered list of menu items.
//! On every refresh the list is merged with the live entity snapshot by
//! [`reconcile`]:
//!
//! 1. Persisted items are walked in stored order. Domain items always
//!    survive; group items survive only while `group.<name>` is live, and
//!    take the live friendly name.
//! 2. Live groups that are not yet configured are appended, disabled, in
//!    snapshot order.
//!
//! Each surviving item gets the next 1-based index, so indices are
//! contiguous and follow exactly that traversal.

use std::collections::HashMap;

use tracing::debug;

use crate::entity::Entity;
use crate::error::{MenuError, MenuResult};
use crate::legacy;
use crate::menu::{self, MenuItem, MenuItemKind};
use crate::preferences::{Preferences, CURRENT_SETTINGS_VERSION};

/// Why the structured list could not be used as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No structured list has been stored yet.
    Absent,
    /// A structured list is stored but does not decode.
    Malformed(String),
}

/// Where a loaded list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSource {
    /// Decoded from the structured list.
    Stored,
    /// Synthesized from legacy settings.
    Migrated(FallbackReason),
}

/// The persisted list together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedList {
    pub items: Vec<MenuItem>,
    pub source: ListSource,
}

impl LoadedList {
    #[must_use]
    pub const fn is_migrated(&self) -> bool {
        matches!(self.source, ListSource::Migrated(_))
    }
}

/// Render-ready result of [`reconcile`], keyed by item identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledMenu {
    items: HashMap<String, MenuItem>,
}

impl ReconciledMenu {
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&MenuItem> {
        self.items.get(identifier)
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.items.contains_key(identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MenuItem)> {
        self.items.iter()
    }

    /// Items in display order.
    #[must_use]
    pub fn ordered(&self) -> Vec<&MenuItem> {
        let mut items: Vec<&MenuItem> = self.items.values().collect();
        items.sort_by_key(|item| item.index);
        items
    }

    /// Enabled items in display order.
    #[must_use]
    pub fn enabled(&self) -> Vec<&MenuItem> {
        self.ordered().into_iter().filter(|item| item.enabled).collect()
    }

    #[must_use]
    pub fn into_map(self) -> HashMap<String, MenuItem> {
        self.items
    }

    fn push(&mut self, item: MenuItem) {
        let index = self.items.len() + 1;
        let item = item.with_index(index);
        self.items.insert(item.identifier.clone(), item);
    }
}

/// Merges a persisted list with a live entity snapshot.
///
/// Pure: the result depends only on the two inputs. A repeated identifier
/// in `persisted` keeps its first occurrence; later copies are skipped
/// without consuming an index.
///
/// # Examples
///
/// ```
/// use hamenu::{reconcile, Entity, MenuItem, RecognizedDomain};
///
/// let persisted = vec![
///     MenuItem::domain(RecognizedDomain::Light, true),
///     MenuItem::group("gone", true, ""),
/// ];
/// let live = vec![Entity::new("group.new", "New", "on")?];
///
/// let menu = reconcile(&persisted, &live);
/// assert_eq!(menu.len(), 2);
/// assert_eq!(menu.get("light").map(|i| i.index), Some(1));
/// assert!(menu.get("gone").is_none());
/// assert_eq!(menu.get("new").map(|i| (i.index, i.enabled)), Some((2, false)));
/// # Ok::<(), hamenu::ValidationError>(())
/// ```
#[must_use]
pub fn reconcile(persisted: &[MenuItem], live: &[Entity]) -> ReconciledMenu {
    let mut live_groups: HashMap<&str, &Entity> = HashMap::new();
    for entity in live.iter().filter(|e| e.is_group()) {
        live_groups.entry(entity.name_without_domain()).or_insert(entity);
    }

    let mut menu = ReconciledMenu::default();

    for item in persisted {
        if menu.contains(&item.identifier) {
            debug!(identifier = %item.identifier, "skipping duplicate menu item");
            continue;
        }
        match item.kind {
            MenuItemKind::Group => {
                let Some(group) = live_groups.get(item.identifier.as_str()) else {
                    debug!(identifier = %item.identifier, "configured group not on server");
                    continue;
                };
                menu.push(MenuItem {
                    friendly_name: group.friendly_name.clone(),
                    ..item.clone()
                });
            }
            MenuItemKind::Domain => menu.push(item.clone()),
        }
    }

    for entity in live.iter().filter(|e| e.is_group()) {
        let name = entity.name_without_domain();
        if !menu.contains(name) {
            menu.push(MenuItem::group(name, false, entity.friendly_name.clone()));
        }
    }

    menu
}

/// Owner of the persisted menu list.
#[derive(Debug, Clone)]
pub struct MenuItemStore {
    prefs: Preferences,
}

impl MenuItemStore {
    #[must_use]
    pub const fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Loads the persisted list, migrating legacy settings when no usable
    /// structured list is stored.
    ///
    /// A malformed list is never an error; it is reported through
    /// [`LoadedList::source`].
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Storage`] if the settings backend fails.
    pub fn load_persisted_list(&self) -> MenuResult<LoadedList> {
        let reason = match self.prefs.menu_items_json()? {
            None => FallbackReason::Absent,
            Some(Ok(json)) if json.is_empty() => FallbackReason::Absent,
            Some(Ok(json)) => match menu::decode_list(&json) {
                Ok(items) => {
                    return Ok(LoadedList {
                        items,
                        source: ListSource::Stored,
                    })
                }
                Err(e) => FallbackReason::Malformed(e.to_string()),
            },
            Some(Err(kind)) => FallbackReason::Malformed(format!("stored as {kind}, not a string")),
        };

        let flags = self.prefs.legacy_domain_flags()?;
        let groups = self.prefs.raw_group_list()?;
        let items = legacy::migrate(&flags, &groups);
        debug!(?reason, items = items.len(), "migrated legacy menu settings");

        Ok(LoadedList {
            items,
            source: ListSource::Migrated(reason),
        })
    }

    /// Loads the persisted list and reconciles it with `live`.
    ///
    /// Nothing is written back; see [`MenuItemStore::remember`].
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Storage`] if the settings backend fails.
    pub fn reconcile(&self, live: &[Entity]) -> MenuResult<ReconciledMenu> {
        let loaded = self.load_persisted_list()?;
        Ok(reconcile(&loaded.items, live))
    }

    /// Stores `items` as the structured list and marks the settings as
    /// schema version 2.
    ///
    /// The version is written before the list, so a rejected write never
    /// leaves a new list behind an old version marker.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Serialization`] without writing anything if the
    /// list cannot be encoded, or [`MenuError::Storage`] if the backend
    /// rejects the write.
    pub fn persist(&self, items: &[MenuItem]) -> MenuResult<()> {
        let json = menu::encode_list(items).map_err(|e| MenuError::Serialization {
            message: e.to_string(),
        })?;

        self.prefs.set_settings_version(CURRENT_SETTINGS_VERSION)?;
        self.prefs.set_menu_items_json(json)?;
        debug!(items = items.len(), "persisted menu items");
        Ok(())
    }

    /// Persists a reconciled menu in display order, so newly discovered
    /// groups are kept for the next session.
    ///
    /// # Errors
    ///
    /// See [`MenuItemStore::persist`].
    pub fn remember(&self, menu: &ReconciledMenu) -> MenuResult<()> {
        let items: Vec<MenuItem> = menu.ordered().into_iter().cloned().collect();
        self.persist(&items)
    }
}
