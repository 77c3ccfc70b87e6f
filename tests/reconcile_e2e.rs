//! End-to-end tests for the menu item store.
//!
//! These drive the public API only: settings in, reconciled menu out.

use std::collections::HashSet;
use std::sync::Arc;

use hamenu::preferences::keys;
use hamenu::{
    reconcile, Entity, FallbackReason, InMemorySettingsStore, ListSource, MenuItem, MenuItemKind,
    MenuItemStore, Preferences, RecognizedDomain, SettingValue,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn store_with(values: Vec<(&str, SettingValue)>) -> MenuItemStore {
    MenuItemStore::new(Preferences::new(Arc::new(InMemorySettingsStore::with_values(values))))
}

const NAMES: [&str; 8] = ["kitchen", "garden", "attic", "den", "hall", "patio", "office", "garage"];

fn random_case(rng: &mut StdRng) -> (Vec<MenuItem>, Vec<Entity>) {
    let mut persisted = Vec::new();
    for _ in 0..rng.gen_range(0..10) {
        if rng.gen_bool(1.0 / 3.0) {
            let domain = RecognizedDomain::CONTROLLABLE[rng.gen_range(0..RecognizedDomain::CONTROLLABLE.len())];
            persisted.push(MenuItem::domain(domain, rng.gen_bool(0.5)));
        } else {
            let name = NAMES[rng.gen_range(0..NAMES.len())];
            persisted.push(MenuItem::group(name, rng.gen_bool(0.5), ""));
        }
    }

    let mut live = Vec::new();
    for _ in 0..rng.gen_range(0..10) {
        let name = NAMES[rng.gen_range(0..NAMES.len())];
        let id = match rng.gen_range(0..3) {
            0 => format!("light.{name}"),
            1 => format!("weather.{name}"),
            _ => format!("group.{name}"),
        };
        live.push(Entity::new(id, name.to_uppercase(), "on").unwrap());
    }

    (persisted, live)
}

#[test]
fn indices_are_contiguous_and_unique() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let (persisted, live) = random_case(&mut rng);
        let menu = reconcile(&persisted, &live);

        let mut indices: Vec<usize> = menu.iter().map(|(_, item)| item.index).collect();
        indices.sort_unstable();
        let expected: Vec<usize> = (1..=menu.len()).collect();
        assert_eq!(indices, expected);

        for (key, item) in menu.iter() {
            assert_eq!(key, &item.identifier);
        }
    }
}

#[test]
fn result_keys_match_membership_rules() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let (persisted, live) = random_case(&mut rng);
        let menu = reconcile(&persisted, &live);

        let live_groups: HashSet<&str> = live
            .iter()
            .filter(|e| e.is_group())
            .map(Entity::name_without_domain)
            .collect();
        let persisted_ids: HashSet<&str> = persisted.iter().map(|i| i.identifier.as_str()).collect();

        let mut expected: HashSet<&str> = HashSet::new();
        for item in &persisted {
            if item.kind == MenuItemKind::Domain || live_groups.contains(item.identifier.as_str()) {
                expected.insert(item.identifier.as_str());
            }
        }
        expected.extend(live_groups.iter().copied());

        let actual: HashSet<&str> = menu.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(actual, expected);

        for name in &live_groups {
            if !persisted_ids.contains(name) {
                let item = menu.get(name).unwrap();
                assert!(!item.enabled, "new group {name} must start disabled");
                assert_eq!(item.kind, MenuItemKind::Group);
            }
        }
    }
}

#[test]
fn reconcile_is_repeatable() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let (persisted, live) = random_case(&mut rng);
        assert_eq!(reconcile(&persisted, &live), reconcile(&persisted, &live));
    }
}

#[test]
fn legacy_install_end_to_end() {
    let store = store_with(vec![
        (keys::DOMAIN_LIGHTS, SettingValue::Bool(true)),
        (keys::DOMAIN_SWITCHES, SettingValue::Bool(false)),
        (keys::DOMAIN_AUTOMATIONS, SettingValue::Bool(true)),
        (keys::DOMAIN_INPUT_BOOLEANS, SettingValue::Bool(false)),
        (keys::DOMAIN_INPUT_SELECTS, SettingValue::Bool(true)),
        (keys::GROUP_LIST, SettingValue::from("all_lights,Kitchen, ,Garden,,")),
    ]);

    let loaded = store.load_persisted_list().unwrap();
    assert_eq!(loaded.source, ListSource::Migrated(FallbackReason::Absent));

    let live = vec![
        Entity::new("group.Kitchen", "Kitchen Lights", "on").unwrap(),
        Entity::new("group.downstairs", "Downstairs", "off").unwrap(),
        Entity::new("light.lamp", "Lamp", "on").unwrap(),
    ];
    let menu = store.reconcile(&live).unwrap();

    let order: Vec<(&str, bool)> = menu
        .ordered()
        .into_iter()
        .map(|i| (i.identifier.as_str(), i.enabled))
        .collect();
    assert_eq!(
        order,
        vec![
            ("light", true),
            ("switch", false),
            ("automation", true),
            ("input_boolean", false),
            ("input_select", true),
            ("Kitchen", true),
            ("downstairs", false),
        ]
    );
    assert_eq!(menu.get("Kitchen").unwrap().friendly_name, "Kitchen Lights");

    store.remember(&menu).unwrap();
    assert_eq!(store.preferences().settings_version().unwrap(), 2);

    let reloaded = store.load_persisted_list().unwrap();
    assert_eq!(reloaded.source, ListSource::Stored);
    assert_eq!(reloaded.items.len(), 7);
    // Garden was not live, so remembering the menu forgets it.
    assert!(reloaded.items.iter().all(|i| i.identifier != "Garden"));
}

#[test]
fn persist_then_reload_round_trip() {
    let store = store_with(vec![]);
    let items = vec![
        MenuItem::group("upstairs", true, "Upstairs"),
        MenuItem::domain(RecognizedDomain::InputSelect, false),
        MenuItem {
            has_sub_menu: true,
            ..MenuItem::group("attic", false, "")
        },
        MenuItem::domain(RecognizedDomain::Light, true).with_index(12),
    ];
    store.persist(&items).unwrap();

    let reloaded = store.load_persisted_list().unwrap().items;
    let strip = |list: &[MenuItem]| -> Vec<MenuItem> { list.iter().map(|i| i.with_index(0)).collect() };
    assert_eq!(strip(&reloaded), strip(&items));
}

#[test]
fn corrupted_list_recovers_to_migration() {
    let store = store_with(vec![
        (keys::MENU_ITEMS, SettingValue::from("{not json")),
        (keys::GROUP_LIST, SettingValue::from("den")),
    ]);
    let loaded = store.load_persisted_list().unwrap();
    assert!(matches!(loaded.source, ListSource::Migrated(FallbackReason::Malformed(_))));
    assert_eq!(loaded.items.last().unwrap().identifier, "den");

    let menu = store.reconcile(&[Entity::new("group.den", "Den", "on").unwrap()]).unwrap();
    assert_eq!(menu.get("den").unwrap().index, 6);
    assert!(menu.get("den").unwrap().enabled);
}

#[test]
fn states_payload_feeds_reconcile() {
    let json = r#"[
        {"entity_id": "group.living", "state": "on", "attributes": {"friendly_name": "Living"}},
        {"entity_id": "switch.fan", "state": "off", "attributes": {"friendly_name": "Fan"}}
    ]"#;
    let live = Entity::from_states_json(json).unwrap();
    let menu = reconcile(&[MenuItem::domain(RecognizedDomain::Switch, true)], &live);
    assert_eq!(menu.get("switch").unwrap().index, 1);
    assert_eq!(menu.get("living").unwrap().index, 2);
}
