//! Typed access to the client's settings.
//!
//! [`Preferences`] wraps an injected [`SettingsStore`] and owns the key
//! names and value conventions shared with existing installations. Missing
//! values read as the type's default (`false`, `0`, `""`).

use std::sync::Arc;

use tracing::warn;

use crate::entity::RecognizedDomain;
use crate::error::MenuResult;
use crate::legacy::LegacyDomainFlags;
use crate::storage::{SettingValue, SettingsStore};

/// Settings keys. These names are part of the on-disk format.
pub mod keys {
    pub const SETTINGS_VERSION: &str = "settingsVersion";
    pub const SERVER: &str = "server";
    pub const TOKEN: &str = "token";
    pub const LAUNCH: &str = "launch";
    pub const GROUP_LIST: &str = "group";
    pub const MENU_ITEMS: &str = "menu_items";
    pub const DOMAIN_LIGHTS: &str = "domain_lights";
    pub const DOMAIN_SWITCHES: &str = "domain_switches";
    pub const DOMAIN_AUTOMATIONS: &str = "domain_automations";
    pub const DOMAIN_INPUT_BOOLEANS: &str = "domain_inputbooleans";
    pub const DOMAIN_INPUT_SELECTS: &str = "domain_inputselects";
}

/// Schema version written alongside the structured menu list.
pub const CURRENT_SETTINGS_VERSION: i64 = 2;

/// Legacy per-domain toggle key for a controllable domain.
#[must_use]
pub const fn legacy_domain_key(domain: RecognizedDomain) -> Option<&'static str> {
    match domain {
        RecognizedDomain::Light => Some(keys::DOMAIN_LIGHTS),
        RecognizedDomain::Switch => Some(keys::DOMAIN_SWITCHES),
        RecognizedDomain::Automation => Some(keys::DOMAIN_AUTOMATIONS),
        RecognizedDomain::InputBoolean => Some(keys::DOMAIN_INPUT_BOOLEANS),
        RecognizedDomain::InputSelect => Some(keys::DOMAIN_INPUT_SELECTS),
        RecognizedDomain::Group | RecognizedDomain::Unknown => None,
    }
}

/// Client configuration backed by a [`SettingsStore`].
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn SettingsStore>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    fn read_bool(&self, key: &str) -> MenuResult<bool> {
        Ok(match self.store.get(key)? {
            None => false,
            Some(value) => value.as_bool().unwrap_or_else(|| {
                warn!(key, found = value.kind(), "expected bool setting, using false");
                false
            }),
        })
    }

    fn read_int(&self, key: &str) -> MenuResult<i64> {
        Ok(match self.store.get(key)? {
            None => 0,
            Some(value) => value.as_int().unwrap_or_else(|| {
                warn!(key, found = value.kind(), "expected int setting, using 0");
                0
            }),
        })
    }

    fn read_string(&self, key: &str) -> MenuResult<Option<String>> {
        Ok(match self.store.get(key)? {
            None => None,
            Some(SettingValue::String(s)) => Some(s),
            Some(value) => {
                warn!(key, found = value.kind(), "expected string setting, ignoring");
                None
            }
        })
    }

    fn write(&self, key: &str, value: impl Into<SettingValue>) -> MenuResult<()> {
        self.store.set(key, value.into())?;
        Ok(())
    }

    pub fn settings_version(&self) -> MenuResult<i64> {
        self.read_int(keys::SETTINGS_VERSION)
    }

    pub fn set_settings_version(&self, version: i64) -> MenuResult<()> {
        self.write(keys::SETTINGS_VERSION, version)
    }

    /// Server base URL without a trailing slash.
    pub fn server(&self) -> MenuResult<String> {
        let mut url = self.read_string(keys::SERVER)?.unwrap_or_default();
        if url.ends_with('/') {
            url.pop();
        }
        Ok(url)
    }

    /// Stores the server URL with surrounding whitespace removed.
    pub fn set_server(&self, url: &str) -> MenuResult<()> {
        self.write(keys::SERVER, url.trim())
    }

    pub fn token(&self) -> MenuResult<String> {
        Ok(self.read_string(keys::TOKEN)?.unwrap_or_default())
    }

    /// Stores the access token with surrounding whitespace removed.
    pub fn set_token(&self, token: &str) -> MenuResult<()> {
        self.write(keys::TOKEN, token.trim())
    }

    /// Whether the client starts at login.
    pub fn launch(&self) -> MenuResult<bool> {
        self.read_bool(keys::LAUNCH)
    }

    pub fn set_launch(&self, launch: bool) -> MenuResult<()> {
        self.write(keys::LAUNCH, launch)
    }

    /// The legacy comma separated group list, exactly as stored.
    pub fn raw_group_list(&self) -> MenuResult<String> {
        Ok(self.read_string(keys::GROUP_LIST)?.unwrap_or_default())
    }

    pub fn set_group_list(&self, groups: &str) -> MenuResult<()> {
        self.write(keys::GROUP_LIST, groups.trim())
    }

    /// Legacy toggle for a controllable domain; `false` for other domains.
    pub fn domain_enabled(&self, domain: RecognizedDomain) -> MenuResult<bool> {
        match legacy_domain_key(domain) {
            Some(key) => self.read_bool(key),
            None => Ok(false),
        }
    }

    /// Sets the legacy toggle for a controllable domain. Other domains
    /// have no toggle and are ignored.
    pub fn set_domain_enabled(&self, domain: RecognizedDomain, enabled: bool) -> MenuResult<()> {
        match legacy_domain_key(domain) {
            Some(key) => self.write(key, enabled),
            None => {
                warn!(%domain, "domain has no legacy toggle");
                Ok(())
            }
        }
    }

    /// All five legacy domain toggles.
    pub fn legacy_domain_flags(&self) -> MenuResult<LegacyDomainFlags> {
        Ok(LegacyDomainFlags {
            lights: self.domain_enabled(RecognizedDomain::Light)?,
            switches: self.domain_enabled(RecognizedDomain::Switch)?,
            automations: self.domain_enabled(RecognizedDomain::Automation)?,
            input_booleans: self.domain_enabled(RecognizedDomain::InputBoolean)?,
            input_selects: self.domain_enabled(RecognizedDomain::InputSelect)?,
        })
    }

    /// The stored menu list document, if one is stored.
    ///
    /// A value of the wrong shape is returned as `Err(kind)` so the caller
    /// can treat it as malformed rather than absent.
    pub fn menu_items_json(&self) -> MenuResult<Option<Result<String, &'static str>>> {
        Ok(self.store.get(keys::MENU_ITEMS)?.map(|value| match value {
            SettingValue::String(s) => Ok(s),
            other => Err(other.kind()),
        }))
    }

    pub fn set_menu_items_json(&self, json: String) -> MenuResult<()> {
        self.write(keys::MENU_ITEMS, json)
    }
}
