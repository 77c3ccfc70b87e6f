//! Migration of pre-structured settings.
//!
//! Before the menu list was stored as a structured document, the client
//! kept five per-domain booleans and a free-form, comma separated list of
//! group names. These functions turn that data into [`MenuItem`]s.

use std::collections::HashSet;

use crate::entity::RecognizedDomain;
use crate::menu::MenuItem;

/// Group names that used to stand in for whole domains. Removed during
/// migration because domains are configured directly now.
pub const DEPRECATED_GROUP_TOKENS: [&str; 3] = ["all_lights", "all_switches", "all_automations"];

/// The five legacy per-domain toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyDomainFlags {
    pub lights: bool,
    pub switches: bool,
    pub automations: bool,
    pub input_booleans: bool,
    pub input_selects: bool,
}

impl LegacyDomainFlags {
    /// Toggle for `domain`; `false` for domains without a legacy toggle.
    #[must_use]
    pub const fn enabled(&self, domain: RecognizedDomain) -> bool {
        match domain {
            RecognizedDomain::Light => self.lights,
            RecognizedDomain::Switch => self.switches,
            RecognizedDomain::Automation => self.automations,
            RecognizedDomain::InputBoolean => self.input_booleans,
            RecognizedDomain::InputSelect => self.input_selects,
            RecognizedDomain::Group | RecognizedDomain::Unknown => false,
        }
    }
}

/// Cleans up a legacy group list into `a,b,c` form.
///
/// Deprecated tokens are removed by plain substring replacement, so a
/// group called `small_lights` loses its `all_lights` tail and becomes
/// `sm`. Existing installations were migrated with this rule and it is
/// kept as is.
///
/// # Examples
///
/// ```
/// use hamenu::legacy::normalize_group_list;
///
/// assert_eq!(normalize_group_list("all_lights,Kitchen, ,Garden,,"), "Kitchen,Garden");
/// assert_eq!(normalize_group_list(" upstairs  downstairs "), "upstairs,downstairs");
/// ```
#[must_use]
pub fn normalize_group_list(raw: &str) -> String {
    let mut list = raw.to_string();
    for token in DEPRECATED_GROUP_TOKENS {
        list = list.replace(token, "");
    }

    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Group names from a legacy list, newest first.
///
/// The legacy list was kept oldest first, so the order is reversed.
/// Repeated names keep their first position in the reversed order.
#[must_use]
pub fn parse_group_list(raw: &str) -> Vec<String> {
    let normalized = normalize_group_list(raw);
    let mut seen = HashSet::new();
    normalized
        .rsplit(',')
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Builds the initial structured menu list from legacy settings.
///
/// One domain item per controllable domain, in
/// [`RecognizedDomain::CONTROLLABLE`] order, followed by one enabled group
/// item per legacy group.
#[must_use]
pub fn migrate(flags: &LegacyDomainFlags, raw_group_list: &str) -> Vec<MenuItem> {
    let domains = RecognizedDomain::CONTROLLABLE
        .into_iter()
        .map(|domain| MenuItem::domain(domain, flags.enabled(domain)));

    let groups = parse_group_list(raw_group_list)
        .into_iter()
        .map(|name| MenuItem::group(name, true, ""));

    domains.chain(groups).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::menu::MenuItemKind;

    #[test]
    fn normalize_strips_deprecated_tokens_and_separators() {
        assert_eq!(
            normalize_group_list("all_lights all_switches,all_automations"),
            ""
        );
        assert_eq!(normalize_group_list(",,,a,,,,b,,,"), "a,b");
        assert_eq!(normalize_group_list("a\tb\nc"), "a,b,c");
        assert_eq!(normalize_group_list(""), "");
    }

    #[test]
    fn substring_removal_quirk_is_kept() {
        assert_eq!(normalize_group_list("small_lights"), "sm");
        assert_eq!(normalize_group_list("hall_switches_2"), "h_2");
    }

    #[test]
    fn parse_reverses_order() {
        assert_eq!(
            parse_group_list("all_lights,Kitchen, ,Garden,,"),
            vec!["Garden".to_string(), "Kitchen".to_string()]
        );
    }

    #[test]
    fn parse_empty_list_yields_nothing() {
        assert!(parse_group_list("").is_empty());
        assert!(parse_group_list(" , ,all_lights").is_empty());
    }

    #[test]
    fn parse_drops_repeated_names() {
        assert_eq!(
            parse_group_list("a,b,a"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn migrate_domains_in_fixed_order() {
        let flags = LegacyDomainFlags {
            lights: true,
            switches: false,
            automations: true,
            input_booleans: false,
            input_selects: true,
        };
        let items = migrate(&flags, "");
        let summary: Vec<(&str, bool)> = items
            .iter()
            .map(|item| (item.identifier.as_str(), item.enabled))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("light", true),
                ("switch", false),
                ("automation", true),
                ("input_boolean", false),
                ("input_select", true),
            ]
        );
        assert!(items.iter().all(|item| item.kind == MenuItemKind::Domain));
        assert_eq!(items[3].friendly_name, "Input Booleans");
    }

    #[test]
    fn migrate_appends_enabled_groups() {
        let items = migrate(&LegacyDomainFlags::default(), "all_lights,Kitchen, ,Garden,,");
        assert_eq!(items.len(), 7);
        let groups: Vec<&MenuItem> = items.iter().filter(|item| item.is_group()).collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].identifier, "Garden");
        assert_eq!(groups[1].identifier, "Kitchen");
        assert!(groups.iter().all(|g| g.enabled && g.friendly_name.is_empty()));
    }
}
