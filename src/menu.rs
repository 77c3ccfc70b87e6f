//! User-configured menu items.
//!
//! A [`MenuItem`] is one row of the persisted menu configuration. The JSON
//! shape (`entityId`, `itemType`, `subMenu`, `enabled`, `friendlyName`) is
//! shared with existing installations and must stay backward compatible.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::RecognizedDomain;

/// What a menu item stands for.
///
/// Persisted as a stable integer code; older settings that spelled the kind
/// out by name are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawKind", into = "u8")]
pub enum MenuItemKind {
    /// A whole domain section, e.g. every light.
    Domain,
    /// A single server-side group.
    Group,
}

impl MenuItemKind {
    /// Persisted integer code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Domain => 1,
            Self::Group => 2,
        }
    }

    /// Inverse of [`MenuItemKind::code`].
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Domain),
            2 => Some(Self::Group),
            _ => None,
        }
    }
}

impl fmt::Display for MenuItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => write!(f, "domain"),
            Self::Group => write!(f, "group"),
        }
    }
}

impl From<MenuItemKind> for u8 {
    fn from(kind: MenuItemKind) -> Self {
        kind.code()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKind {
    Code(u8),
    Name(String),
}

impl TryFrom<RawKind> for MenuItemKind {
    type Error = String;

    fn try_from(raw: RawKind) -> Result<Self, Self::Error> {
        match raw {
            RawKind::Code(code) => {
                Self::from_code(code).ok_or_else(|| format!("unknown item type code {code}"))
            }
            RawKind::Name(name) => match name.to_ascii_lowercase().as_str() {
                "domain" => Ok(Self::Domain),
                "group" => Ok(Self::Group),
                _ => Err(format!("unknown item type '{name}'")),
            },
        }
    }
}

/// One configured row of the menu.
///
/// `identifier` is the domain name for [`MenuItemKind::Domain`] items and
/// the group name without its `group.` prefix for [`MenuItemKind::Group`]
/// items. `index` is assigned by reconciliation and never persisted.
///
/// # Examples
///
/// ```
/// use hamenu::{MenuItem, MenuItemKind, RecognizedDomain};
///
/// let lights = MenuItem::domain(RecognizedDomain::Light, true);
/// assert_eq!(lights.identifier, "light");
/// assert_eq!(lights.kind, MenuItemKind::Domain);
/// assert_eq!(lights.friendly_name, "Lights");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "entityId")]
    pub identifier: String,

    #[serde(rename = "itemType")]
    pub kind: MenuItemKind,

    #[serde(rename = "subMenu", default)]
    pub has_sub_menu: bool,

    pub enabled: bool,

    #[serde(rename = "friendlyName", default)]
    pub friendly_name: String,

    #[serde(skip)]
    pub index: usize,
}

impl MenuItem {
    /// Creates a domain-kind item titled with the domain's display name.
    #[must_use]
    pub fn domain(domain: RecognizedDomain, enabled: bool) -> Self {
        Self {
            identifier: domain.as_str().to_string(),
            kind: MenuItemKind::Domain,
            has_sub_menu: false,
            enabled,
            friendly_name: domain.display_name().to_string(),
            index: 0,
        }
    }

    /// Creates a group-kind item for the group named `name` (no prefix).
    #[must_use]
    pub fn group(name: impl Into<String>, enabled: bool, friendly_name: impl Into<String>) -> Self {
        Self {
            identifier: name.into(),
            kind: MenuItemKind::Group,
            has_sub_menu: false,
            enabled,
            friendly_name: friendly_name.into(),
            index: 0,
        }
    }

    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self.kind, MenuItemKind::Group)
    }

    /// Returns a copy carrying the given display index.
    #[must_use]
    pub fn with_index(&self, index: usize) -> Self {
        Self {
            index,
            ..self.clone()
        }
    }
}

/// Encodes a menu list in the persisted JSON format.
///
/// # Errors
///
/// Returns the serializer error unchanged.
pub fn encode_list(items: &[MenuItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Decodes a persisted menu list.
///
/// # Errors
///
/// Returns the deserializer error unchanged.
pub fn decode_list(json: &str) -> Result<Vec<MenuItem>, serde_json::Error> {
    serde_json::from_str(json)
}
