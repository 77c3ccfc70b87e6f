//! Live entities and domain classification.
//!
//! Every entity the server reports carries an identifier of the form
//! `<domain>.<name>`. The domain decides how the entity is presented, so it
//! is classified once into the closed [`RecognizedDomain`] set and every
//! call site dispatches on that enum instead of comparing strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Separator between the domain and the object name in an entity id.
pub const DOMAIN_SEPARATOR: char = '.';

/// The entity domains the menu knows how to present.
///
/// Anything else maps to [`RecognizedDomain::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognizedDomain {
    Switch,
    Light,
    InputBoolean,
    Automation,
    InputSelect,
    Group,
    Unknown,
}

impl RecognizedDomain {
    /// Domains that are listed as a whole (one menu section per domain),
    /// in the order legacy settings are migrated.
    pub const CONTROLLABLE: [Self; 5] = [
        Self::Light,
        Self::Switch,
        Self::Automation,
        Self::InputBoolean,
        Self::InputSelect,
    ];

    /// Wire name of the domain as it appears in entity ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Light => "light",
            Self::InputBoolean => "input_boolean",
            Self::Automation => "automation",
            Self::InputSelect => "input_select",
            Self::Group => "group",
            Self::Unknown => "unknown",
        }
    }

    /// Behavioral tag for this domain.
    #[must_use]
    pub const fn recognized_type(self) -> RecognizedType {
        match self {
            Self::Switch => RecognizedType::Switch,
            Self::Light => RecognizedType::Light,
            Self::InputBoolean => RecognizedType::InputBoolean,
            Self::Automation => RecognizedType::Automation,
            Self::InputSelect => RecognizedType::InputSelect,
            Self::Group => RecognizedType::Group,
            Self::Unknown => RecognizedType::Unknown,
        }
    }

    /// Section title used for a domain-kind menu item.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Switch => "Switches",
            Self::Light => "Lights",
            Self::InputBoolean => "Input Booleans",
            Self::Automation => "Automations",
            Self::InputSelect => "Input Selects",
            Self::Group => "Groups",
            Self::Unknown => "Unknown",
        }
    }

    /// True for domains whose entities expose a list of selectable options.
    #[must_use]
    pub const fn supports_options(self) -> bool {
        matches!(self, Self::InputSelect)
    }

    /// True for domains that are configured as a whole menu section.
    #[must_use]
    pub const fn is_controllable(self) -> bool {
        matches!(
            self,
            Self::Light | Self::Switch | Self::Automation | Self::InputBoolean | Self::InputSelect
        )
    }
}

impl fmt::Display for RecognizedDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable numeric tag per recognized domain.
///
/// The discriminants are shared with older clients and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum RecognizedType {
    Switch = 2,
    Light = 3,
    InputBoolean = 4,
    Automation = 5,
    InputSelect = 6,
    Group = 7,
    Unknown = 999,
}

impl RecognizedType {
    /// Returns the numeric code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// Classifies a domain string.
///
/// Exact, case-sensitive match; everything else (including the empty
/// string) is [`RecognizedDomain::Unknown`].
///
/// # Examples
///
/// ```
/// use hamenu::{classify_domain, RecognizedDomain};
///
/// assert_eq!(classify_domain("light"), RecognizedDomain::Light);
/// assert_eq!(classify_domain("Light"), RecognizedDomain::Unknown);
/// assert_eq!(classify_domain("weather"), RecognizedDomain::Unknown);
/// ```
#[must_use]
pub fn classify_domain(domain: &str) -> RecognizedDomain {
    match domain {
        "switch" => RecognizedDomain::Switch,
        "light" => RecognizedDomain::Light,
        "input_boolean" => RecognizedDomain::InputBoolean,
        "automation" => RecognizedDomain::Automation,
        "input_select" => RecognizedDomain::InputSelect,
        "group" => RecognizedDomain::Group,
        _ => RecognizedDomain::Unknown,
    }
}

/// A validated `<domain>.<name>` entity identifier.
///
/// The domain is everything before the first separator, the name is
/// everything after it. Both parts must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    raw: String,
    split: usize,
}

impl EntityId {
    /// Parses an entity identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEntityId`] when the separator is
    /// missing or either side of it is empty.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let Some(split) = raw.find(DOMAIN_SEPARATOR) else {
            return Err(ValidationError::InvalidEntityId {
                id: raw,
                reason: "missing domain separator",
            });
        };
        if split == 0 {
            return Err(ValidationError::InvalidEntityId {
                id: raw,
                reason: "empty domain",
            });
        }
        if split + 1 == raw.len() {
            return Err(ValidationError::InvalidEntityId {
                id: raw,
                reason: "empty object name",
            });
        }
        Ok(Self { raw, split })
    }

    /// The full identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Substring before the first separator.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.raw[..self.split]
    }

    /// Substring after the first separator.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.raw[self.split + DOMAIN_SEPARATOR.len_utf8()..]
    }

    /// Classification of [`EntityId::domain`].
    #[must_use]
    pub fn recognized_domain(&self) -> RecognizedDomain {
        classify_domain(self.domain())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for EntityId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.raw
    }
}

/// A live entity as reported by the server.
///
/// The core treats a slice of entities as an immutable snapshot.
///
/// # Examples
///
/// ```
/// use hamenu::{Entity, RecognizedDomain};
///
/// let lamp = Entity::new("light.kitchen_lamp", "Kitchen Lamp", "on")?;
/// assert_eq!(lamp.domain(), "light");
/// assert_eq!(lamp.domain_type(), RecognizedDomain::Light);
/// assert_eq!(lamp.name_without_domain(), "kitchen_lamp");
/// # Ok::<(), hamenu::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,

    #[serde(default)]
    pub friendly_name: String,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub options: Vec<String>,
}

impl Entity {
    /// Creates an entity without options.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEntityId`] if `id` is malformed.
    pub fn new(
        id: impl Into<String>,
        friendly_name: impl Into<String>,
        state: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: EntityId::parse(id)?,
            friendly_name: friendly_name.into(),
            state: state.into(),
            options: Vec::new(),
        })
    }

    /// Sets the selectable options.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        self.id.domain()
    }

    #[must_use]
    pub fn domain_type(&self) -> RecognizedDomain {
        self.id.recognized_domain()
    }

    #[must_use]
    pub fn recognized_type(&self) -> RecognizedType {
        self.domain_type().recognized_type()
    }

    #[must_use]
    pub fn name_without_domain(&self) -> &str {
        self.id.name()
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.domain_type() == RecognizedDomain::Group
    }

    /// Decodes the server's state list (`GET /api/states`).
    ///
    /// Only `entity_id`, `state`, `attributes.friendly_name` and
    /// `attributes.options` are read; other fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEntityPayload`] if the JSON does not
    /// have the expected shape, or [`ValidationError::InvalidEntityId`] for
    /// the first malformed identifier.
    pub fn from_states_json(json: &str) -> Result<Vec<Self>, ValidationError> {
        let raw: Vec<RawState> = serde_json::from_str(json).map_err(|e| {
            ValidationError::InvalidEntityPayload {
                message: e.to_string(),
            }
        })?;

        raw.into_iter()
            .map(|state| {
                Ok(Self {
                    id: EntityId::parse(state.entity_id)?,
                    friendly_name: state.attributes.friendly_name,
                    state: state.state,
                    options: state.attributes.options,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawState {
    entity_id: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    attributes: RawAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct RawAttributes {
    #[serde(default)]
    friendly_name: String,
    #[serde(default)]
    options: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_exact_and_case_sensitive() {
        assert_eq!(classify_domain("switch"), RecognizedDomain::Switch);
        assert_eq!(classify_domain("input_boolean"), RecognizedDomain::InputBoolean);
        assert_eq!(classify_domain("input_select"), RecognizedDomain::InputSelect);
        assert_eq!(classify_domain("group"), RecognizedDomain::Group);
        assert_eq!(classify_domain("automation"), RecognizedDomain::Automation);
        assert_eq!(classify_domain("SWITCH"), RecognizedDomain::Unknown);
        assert_eq!(classify_domain(" light"), RecognizedDomain::Unknown);
        assert_eq!(classify_domain(""), RecognizedDomain::Unknown);
    }

    #[test]
    fn classify_round_trips_every_recognized_name() {
        for domain in [
            RecognizedDomain::Switch,
            RecognizedDomain::Light,
            RecognizedDomain::InputBoolean,
            RecognizedDomain::Automation,
            RecognizedDomain::InputSelect,
            RecognizedDomain::Group,
        ] {
            assert_eq!(classify_domain(domain.as_str()), domain);
        }
    }

    #[test]
    fn recognized_type_codes_are_stable() {
        assert_eq!(RecognizedDomain::Switch.recognized_type().code(), 2);
        assert_eq!(RecognizedDomain::Light.recognized_type().code(), 3);
        assert_eq!(RecognizedDomain::InputBoolean.recognized_type().code(), 4);
        assert_eq!(RecognizedDomain::Automation.recognized_type().code(), 5);
        assert_eq!(RecognizedDomain::InputSelect.recognized_type().code(), 6);
        assert_eq!(RecognizedDomain::Group.recognized_type().code(), 7);
        assert_eq!(RecognizedDomain::Unknown.recognized_type().code(), 999);
    }

    #[test]
    fn only_input_select_supports_options() {
        assert!(RecognizedDomain::InputSelect.supports_options());
        assert!(!RecognizedDomain::Light.supports_options());
        assert!(!RecognizedDomain::Group.supports_options());
    }

    #[test]
    fn controllable_domains_exclude_group_and_unknown() {
        for domain in RecognizedDomain::CONTROLLABLE {
            assert!(domain.is_controllable());
        }
        assert!(!RecognizedDomain::Group.is_controllable());
        assert!(!RecognizedDomain::Unknown.is_controllable());
    }

    #[test]
    fn entity_derives_domain_and_name() {
        let e = Entity::new("light.kitchen_lamp", "Kitchen Lamp", "on").unwrap();
        assert_eq!(e.domain(), "light");
        assert_eq!(e.domain_type(), RecognizedDomain::Light);
        assert_eq!(e.recognized_type(), RecognizedType::Light);
        assert_eq!(e.name_without_domain(), "kitchen_lamp");
        assert!(!e.is_group());

        let weather = Entity::new("weather.home", "Home", "sunny").unwrap();
        assert_eq!(weather.domain_type(), RecognizedDomain::Unknown);
    }

    #[test]
    fn entity_id_splits_on_first_separator() {
        let id = EntityId::parse("sensor.outdoor.temp").unwrap();
        assert_eq!(id.domain(), "sensor");
        assert_eq!(id.name(), "outdoor.temp");
    }

    #[test]
    fn entity_id_rejects_malformed_input() {
        for raw in ["kitchen", "", ".kitchen", "light."] {
            let err = EntityId::parse(raw).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidEntityId { .. }), "{raw}");
        }
    }

    #[test]
    fn entity_id_deserialization_validates() {
        let ok: EntityId = serde_json::from_str("\"switch.fan\"").unwrap();
        assert_eq!(ok.domain(), "switch");
        assert!(serde_json::from_str::<EntityId>("\"fan\"").is_err());
    }

    #[test]
    fn decode_states_payload() {
        let json = r#"[
            {"entity_id": "group.kitchen", "state": "on",
             "attributes": {"friendly_name": "Kitchen", "entity_id": ["light.a"]},
             "last_changed": "2020-01-01T00:00:00+00:00"},
            {"entity_id": "input_select.mode", "state": "Away",
             "attributes": {"friendly_name": "Mode", "options": ["Home", "Away"]}},
            {"entity_id": "sun.sun", "state": "above_horizon"}
        ]"#;

        let entities = Entity::from_states_json(json).unwrap();
        assert_eq!(entities.len(), 3);
        assert!(entities[0].is_group());
        assert_eq!(entities[0].friendly_name, "Kitchen");
        assert_eq!(entities[1].options, vec!["Home".to_string(), "Away".to_string()]);
        assert!(entities[2].friendly_name.is_empty());
        assert_eq!(entities[2].domain_type(), RecognizedDomain::Unknown);
    }

    #[test]
    fn decode_states_rejects_bad_identifier() {
        let json = r#"[{"entity_id": "broken", "state": "on"}]"#;
        let err = Entity::from_states_json(json).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEntityId { .. }));
    }

    #[test]
    fn decode_states_rejects_wrong_shape() {
        let err = Entity::from_states_json(r#"{"entity_id": "light.a"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEntityPayload { .. }));
    }
}
